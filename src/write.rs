use crate::config::SiteMetadata;
use crate::date;
use crate::home;
use crate::link::{blog_page_path, output_file, tag_page_path};
use crate::post::*;
use crate::tag::Tag;
use gtmpl::{Template, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Responsible for indexing, templating, and writing HTML pages to disk from
/// [`Post`] sources.
pub struct Writer<'a> {
    /// The template for the home page. The rendered post list is available
    /// to it as `item`.
    pub home_template: &'a Template,

    /// The template for post pages.
    pub post_template: &'a Template,

    /// The template for listing pages (all posts and per-tag listings).
    pub list_template: &'a Template,

    /// Site metadata. It's made available to every template as `site`, and
    /// drives the home page and the listing page size.
    pub site: &'a SiteMetadata,

    /// The root of the output directory. Each page is written to the
    /// `index.html` file of the directory matching its path, e.g. the post
    /// `/blog/foo` is written to `{output_directory}/blog/foo/index.html`.
    pub output_directory: &'a Path,
}

impl Writer<'_> {
    /// Takes a single [`Page`], templates it, and writes it to disk.
    fn write_page(&self, page: &Page) -> Result<()> {
        let mut value = page.to_value();
        if let Value::Object(obj) = &mut value {
            obj.insert("site".to_owned(), site_value(self.site));
        }
        debug!(path = %page.file_path.display(), "writing page");
        page.template.execute(
            &mut std::fs::File::create(&page.file_path)?,
            &gtmpl::Context::from(value)?,
        )?;
        Ok(())
    }

    /// Takes a slice of [`Post`] (newest first), indexes it by tag, and
    /// writes the home page, the post pages, and the listing pages to disk.
    pub fn write_posts(&self, posts: &[Post]) -> Result<()> {
        let mut seen_dirs: HashSet<PathBuf> = HashSet::new();
        let home = self.home_page(posts)?;
        std::iter::once(home)
            .chain(post_pages(posts, self.output_directory, self.post_template))
            .chain(index_pages(
                posts,
                self.output_directory,
                self.site.posts_per_page(),
                self.list_template,
            ))
            .map(|page| {
                if let Some(dir) = page.file_path.parent() {
                    if seen_dirs.insert(dir.to_owned()) {
                        std::fs::create_dir_all(dir)?;
                    }
                }
                self.write_page(&page)
            })
            .collect()
    }

    fn home_page(&self, posts: &[Post]) -> Result<Page<'_>> {
        Ok(Page {
            title: self.site.title.clone(),
            item: Value::String(home::render(posts, self.site)?.into_string()),
            file_path: output_file(self.output_directory, "/"),
            prev: None,
            next: None,
            template: self.home_template,
        })
    }
}

/// Converts the site metadata into a [`Value`] with fields `title`,
/// `description`, `locale`, and `url`.
fn site_value(site: &SiteMetadata) -> Value {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("title".to_owned(), Value::String(site.title.clone()));
    m.insert(
        "description".to_owned(),
        match &site.description {
            Some(d) => Value::String(d.clone()),
            None => Value::Nil,
        },
    );
    m.insert("locale".to_owned(), Value::String(site.locale.clone()));
    m.insert("url".to_owned(), Value::String(site.site_url.to_string()));
    Value::Object(m)
}

/// An object representing an output HTML file. A [`Page`] can be converted to a
/// [`Value`] and thus rendered in a template via [`Page::to_value`].
struct Page<'a> {
    /// The page's heading, e.g. the post title or the tag name.
    title: String,

    /// The main item for the page.
    item: Value,

    /// The target location on disk for the output file.
    file_path: PathBuf,

    /// The path of the previous page, if any.
    prev: Option<String>,

    /// The path of the next page, if any.
    next: Option<String>,

    /// The template with which the page will be rendered.
    template: &'a Template,
}

impl Page<'_> {
    /// Converts a [`Page`] into a [`Value`]. The result is a [`Value::Object`]
    /// with fields `title`, `item`, `prev`, and `next` (see [`Page`] for
    /// descriptions).
    fn to_value(&self) -> Value {
        let option_to_value = |opt: &Option<String>| match opt {
            Some(path) => Value::String(path.clone()),
            None => Value::Nil,
        };

        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(self.title.clone()));
        m.insert("item".to_owned(), self.item.clone());
        m.insert("prev".to_owned(), option_to_value(&self.prev));
        m.insert("next".to_owned(), option_to_value(&self.next));
        Value::Object(m)
    }
}

/// Creates all of the post [`Page`]s for a set of [`Post`]s. Since posts are
/// ordered newest first, `prev` points at the newer post and `next` at the
/// older one.
fn post_pages<'a>(
    posts: &'a [Post],
    output_directory: &'a Path,
    template: &'a Template,
) -> impl Iterator<Item = Page<'a>> {
    posts.iter().enumerate().map(move |(i, post)| Page {
        title: post.title.clone(),
        item: post.to_value(),
        file_path: output_file(output_directory, &post.url()),
        prev: match i < 1 {
            true => None,
            false => Some(posts[i - 1].url()),
        },
        next: match i + 1 >= posts.len() {
            true => None,
            false => Some(posts[i + 1].url()),
        },
        template,
    })
}

/// Creates all of the listing [`Page`]s for a set of [`Post`]s: the listing of
/// all posts followed by one listing per tag.
fn index_pages<'a>(
    posts: &'a [Post],
    output_directory: &'a Path,
    page_size: usize,
    template: &'a Template,
) -> impl Iterator<Item = Page<'a>> {
    index_posts(posts)
        .into_iter()
        .flat_map(move |i| i.to_pages(output_directory, page_size, template))
}

/// Which listing an [`Index`] is: all posts, or the posts of one tag.
#[derive(Clone, Debug, PartialEq)]
enum Listing {
    All,
    Tag(String),
}

impl Listing {
    fn page_path(&self, page: usize) -> String {
        match self {
            Listing::All => blog_page_path(page),
            Listing::Tag(tag) => tag_page_path(tag, page),
        }
    }
}

/// `Index` represents a collection of [`Post`]s shown on one (paginated)
/// listing.
struct Index<'a> {
    listing: Listing,

    /// The heading for the listing's pages.
    title: String,

    /// The posts associated with the index.
    posts: Vec<&'a Post>,
}

impl<'a> Index<'a> {
    /// Converts the index to a list of listing pages of `page_size` posts
    /// each. An index without posts still gets one (empty) page.
    fn to_pages<'t>(
        &self,
        output_directory: &Path,
        page_size: usize,
        template: &'t Template,
    ) -> Vec<Page<'t>> {
        let chunks: Vec<&[&Post]> = match self.posts.is_empty() {
            true => vec![&self.posts[..]],
            false => self.posts.chunks(page_size).collect(),
        };
        let total_pages = chunks.len();

        chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| {
                let page = i + 1;
                Page {
                    title: self.title.clone(),
                    item: Value::Array(chunk.iter().map(|p| p.summarize()).collect()),
                    file_path: output_file(output_directory, &self.listing.page_path(page)),
                    prev: match page > 1 {
                        false => None,
                        true => Some(self.listing.page_path(page - 1)),
                    },
                    next: match page < total_pages {
                        false => None,
                        true => Some(self.listing.page_path(page + 1)),
                    },
                    template,
                }
            })
            .collect()
    }
}

/// Indexes a list of [`Post`] objects: one index for all posts, then one per
/// tag ordered by tag key. Tags are grouped by their slug; the listing is
/// titled after the first spelling encountered. A post that repeats a tag is
/// listed once.
fn index_posts(posts: &[Post]) -> Vec<Index<'_>> {
    let mut tags: BTreeMap<String, Index> = BTreeMap::new();
    for post in posts {
        // tags that differ only in case or punctuation share a listing
        let mut seen: HashSet<Tag> = HashSet::new();
        for tag in post.tag_chips() {
            if seen.contains(&tag) {
                continue;
            }
            tags.entry(tag.key())
                .or_insert_with(|| Index {
                    listing: Listing::Tag(tag.name.clone()),
                    title: tag.name.clone(),
                    posts: Vec::new(),
                })
                .posts
                .push(post);
            seen.insert(tag);
        }
    }

    let mut indices = vec![Index {
        listing: Listing::All,
        title: String::from("All Posts"),
        posts: posts.iter().collect(),
    }];
    indices.extend(tags.into_values());
    indices
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error rendering the home page.
    Home(date::Error),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl From<date::Error> for Error {
    fn from(err: date::Error) -> Error {
        Error::Home(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Home(err) => write!(f, "Rendering home page: {}", err),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Home(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}
