//! Defines the [`Tag`] type, which represents a [`crate::post::Post`] tag as
//! it is shown on listing pages (a "chip" linking to the tag's listing).

use crate::link::tag_path;
use gtmpl::Value;
use std::hash::{Hash, Hasher};

/// Represents a [`crate::post::Post`] tag. Posts store their tags as plain
/// strings; a [`Tag`] pairs the display name with the URL of the tag's first
/// listing page.
#[derive(Clone, Debug)]
pub struct Tag {
    /// The tag as written in the post's frontmatter.
    pub name: String,

    /// The path of the tag's first listing page (`/tags/{slugified_name}`).
    pub url: String,
}

impl Tag {
    /// Builds a [`Tag`] from its display name.
    pub fn new(name: &str) -> Tag {
        Tag {
            name: name.to_owned(),
            url: tag_path(name),
        }
    }

    /// The key used to group posts by tag. Two tags with the same key share
    /// a listing.
    pub fn key(&self) -> String {
        slug::slugify(&self.name)
    }
}

impl Hash for Tag {
    /// Implements [`Hash`] for [`Tag`] by delegating to [`Tag::key`].
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state)
    }
}

impl PartialEq for Tag {
    /// Implements [`PartialEq`] and [`Eq`] for [`Tag`] by comparing keys.
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl Eq for Tag {}

impl From<&Tag> for Value {
    /// Converts [`Tag`]s into [`Value`]s for templating.
    fn from(t: &Tag) -> Value {
        use std::collections::HashMap;
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("tag".to_owned(), Value::String(t.name.clone()));
        m.insert("url".to_owned(), Value::String(t.url.clone()));
        Value::Object(m)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tags_with_same_slug_are_equal() {
        assert_eq!(Tag::new("macOS"), Tag::new("MacOS"));
        assert_ne!(Tag::new("rust"), Tag::new("go"));
    }

    #[test]
    fn test_tag_url() {
        assert_eq!("/tags/web-dev", Tag::new("Web Dev").url);
    }
}
