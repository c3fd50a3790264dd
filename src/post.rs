//! Defines the [`Post`] type and its conversions into template values.

use crate::link::post_path;
use crate::tag::Tag;
use gtmpl::Value;
use std::collections::HashMap;

/// Represents a blog post.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Post {
    /// The unique identifier of the post. It doubles as the path segment of
    /// the post's page (`/blog/{slug}`).
    pub slug: String,

    /// The date of the post as written in its frontmatter (ISO-8601).
    pub date: String,

    /// The title of the post.
    pub title: String,

    /// A short description of the post shown on listing pages.
    pub summary: String,

    /// The post's tags, in frontmatter order.
    pub tags: Vec<String>,

    /// The body of the post rendered to HTML.
    pub body: String,
}

impl Post {
    /// The path of the post's page.
    pub fn url(&self) -> String {
        post_path(&self.slug)
    }

    /// The post's tags as [`Tag`]s, in frontmatter order.
    pub fn tag_chips(&self) -> Vec<Tag> {
        self.tags.iter().map(|t| Tag::new(t)).collect()
    }

    /// Converts the post into a [`Value`] for the post template. The result
    /// has the fields of [`Post::summarize`] plus `body`.
    pub fn to_value(&self) -> Value {
        let mut m = self.fields();
        m.insert("body".to_owned(), Value::String(self.body.clone()));
        Value::Object(m)
    }

    /// Converts the post into a [`Value`] for listing templates. The result
    /// is a [`Value::Object`] with fields `slug`, `url`, `title`, `date`,
    /// `summary`, and `tags`.
    pub fn summarize(&self) -> Value {
        Value::Object(self.fields())
    }

    fn fields(&self) -> HashMap<String, Value> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("slug".to_owned(), Value::String(self.slug.clone()));
        m.insert("url".to_owned(), Value::String(self.url()));
        m.insert("title".to_owned(), Value::String(self.title.clone()));
        m.insert("date".to_owned(), Value::String(self.date.clone()));
        m.insert("summary".to_owned(), Value::String(self.summary.clone()));
        m.insert(
            "tags".to_owned(),
            Value::Array(self.tag_chips().iter().map(Value::from).collect()),
        );
        m
    }
}
