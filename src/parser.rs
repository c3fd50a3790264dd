//! Defines the [`Parser`] and [`Error`] types, i.e. the logic for parsing
//! posts from the file system into memory.

use std::{
    cmp::Reverse,
    collections::HashMap,
    fmt,
    fs::File,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::{date, markdown, post::Post};

const MARKDOWN_EXTENSION: &str = "md";

/// Parses [`Post`] objects from source files.
pub struct Parser<'a> {
    /// `source_directory` is the directory containing the post sources. Post
    /// slugs are the source paths relative to this directory.
    source_directory: &'a Path,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser. See fields on [`Parser`] for argument
    /// descriptions.
    pub fn new(source_directory: &'a Path) -> Parser<'a> {
        Parser { source_directory }
    }

    /// Parses the source file at `relative_path`. Returns `None` for drafts.
    fn parse_post(&self, relative_path: &Path) -> Result<Option<Post>> {
        match self._parse_post(relative_path) {
            Ok(p) => Ok(p),
            Err(e) => Err(Error::Annotated(
                format!("parsing post `{}`", relative_path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_post(&self, relative_path: &Path) -> Result<Option<Post>> {
        use std::io::Read;
        let mut contents = String::new();
        File::open(self.source_directory.join(relative_path))?
            .read_to_string(&mut contents)?;

        let (frontmatter, body) = split_frontmatter(&contents)?;
        let frontmatter: Frontmatter = serde_yaml::from_str(frontmatter)?;
        if frontmatter.draft {
            return Ok(None);
        }

        let mut post = Post {
            slug: slug_for(relative_path)?,
            title: frontmatter.title,
            date: frontmatter.date,
            summary: match frontmatter.summary {
                Some(summary) => summary,
                None => markdown::summary(body).unwrap_or_default(),
            },
            tags: frontmatter.tags,
            body: String::default(),
        };
        markdown::to_html(&mut post.body, body);
        Ok(Some(post))
    }

    /// Searches the source directory (recursively) for post files (extension
    /// = `.md`) and returns a list of [`Post`] objects sorted by date (most
    /// recent first). Drafts are skipped. Each post file must be structured as
    /// follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with fields `title`, `date`, and optionally
    ///    `tags`, `summary` and `draft`
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Post body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// title: Hello, world!
    /// date: 2021-04-16
    /// tags: [greet]
    /// summary: A first post.
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    pub fn parse_posts(&self) -> Result<Vec<Post>> {
        let mut posts = Vec::new();
        let mut sources: HashMap<String, PathBuf> = HashMap::new();
        for result in WalkDir::new(self.source_directory).sort_by_file_name() {
            let entry = result?;
            if !entry.file_type().is_file()
                || entry.path().extension().map_or(true, |e| e != MARKDOWN_EXTENSION)
            {
                continue;
            }

            // strip_prefix() should never fail since every entry is below
            // the source directory
            let relative_path = entry
                .path()
                .strip_prefix(self.source_directory)
                .map_err(|_| InvalidFileNameError(entry.path().to_owned()))?;
            match self.parse_post(relative_path)? {
                Some(post) => {
                    if let Some(first) = sources.get(&post.slug) {
                        return Err(Error::DuplicateSlug {
                            slug: post.slug,
                            first: first.clone(),
                            second: relative_path.to_owned(),
                        });
                    }
                    debug!(slug = %post.slug, "parsed post");
                    sources.insert(post.slug.clone(), relative_path.to_owned());
                    posts.push(post);
                }
                None => debug!(path = %relative_path.display(), "skipping draft"),
            }
        }

        sort_newest_first(&mut posts);
        Ok(posts)
    }
}

/// Sorts posts by the instant they were published, newest first. Posts whose
/// dates can't be parsed go last, ordered by their raw date.
fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by_cached_key(|p| Reverse((date::parse_instant(&p.date).ok(), p.date.clone())));
}

/// Splits a post source into its YAML frontmatter and markdown body.
fn split_frontmatter(input: &str) -> Result<(&str, &str)> {
    const FENCE: &str = "---";
    if !input.starts_with(FENCE) {
        return Err(Error::FrontmatterMissingStartFence);
    }
    let rest = &input[FENCE.len()..];

    // the closing fence must sit on a line of its own
    for (offset, _) in rest.match_indices("\n---") {
        let after = &rest[offset + 1 + FENCE.len()..];
        let line_end = after.find('\n').unwrap_or(after.len());
        if after[..line_end].trim().is_empty() {
            return Ok((&rest[..offset + 1], &after[line_end..]));
        }
    }
    Err(Error::FrontmatterMissingEndFence)
}

/// Derives a post's slug from its source path: `2021/recap.md` becomes
/// `2021/recap`, and a bundle `recap/index.md` becomes `recap`.
fn slug_for(relative_path: &Path) -> Result<String> {
    let without_extension = if relative_path.ends_with("index.md") {
        relative_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| InvalidFileNameError(relative_path.to_owned()))?
            .to_owned()
    } else {
        relative_path.with_extension("")
    };

    let mut segments = Vec::new();
    for component in without_extension.components() {
        segments.push(
            component
                .as_os_str()
                .to_str()
                .ok_or_else(|| InvalidFileNameError(relative_path.to_owned()))?,
        );
    }
    Ok(segments.join("/"))
}

#[derive(Deserialize, Clone)]
struct Frontmatter {
    /// The title of the post.
    pub title: String,

    /// The date of the post.
    pub date: String,

    /// The tags associated with the post.
    #[serde(default)]
    pub tags: Vec<String>,

    /// A short description of the post. Falls back to the text above the
    /// fold.
    #[serde(default)]
    pub summary: Option<String>,

    /// Drafts are not published.
    #[serde(default)]
    pub draft: bool,
}

#[derive(Debug)]
pub struct InvalidFileNameError(PathBuf);

impl fmt::Display for InvalidFileNameError {
    /// Displays an [`InvalidFileNameError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid file name: {:?}", &self.0)
    }
}

impl std::error::Error for InvalidFileNameError {
    /// Implements the [`std::error::Error`] trait for [`InvalidFileNameError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a post source file is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one was
    /// missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// Returned when a source path can't be turned into a slug.
    InvalidFileName(InvalidFileNameError),

    /// Returned when two source files map to the same slug (e.g., `a.md` and
    /// `a/index.md`).
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::InvalidFileName(err) => err.fmt(f),
            Error::DuplicateSlug {
                slug,
                first,
                second,
            } => write!(
                f,
                "duplicate slug `{}`: `{}` and `{}`",
                slug,
                first.display(),
                second.display()
            ),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::InvalidFileName(err) => Some(err),
            Error::DuplicateSlug { .. } => None,
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<InvalidFileNameError> for Error {
    fn from(err: InvalidFileNameError) -> Error {
        Error::InvalidFileName(err)
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator while walking the source directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_posts() -> Result<()> {
        let posts = Parser::new(Path::new("./testdata/site/data/blog/")).parse_posts()?;

        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(vec!["bundle", "nested/deep-dive", "simple"], slugs);

        let simple = &posts[2];
        assert_eq!("Simple", simple.title);
        assert_eq!("2021-04-16", simple.date);
        assert_eq!(vec!["rust", "Web Dev", "rust"], simple.tags);
        assert_eq!("A post with a summary in its frontmatter.", simple.summary);
        assert_eq!("<p>Today is the first day.</p>\n", simple.body);

        // no summary in the frontmatter, so the text above the fold is used
        assert_eq!("Everything about nesting.", posts[1].summary);
        Ok(())
    }

    #[test]
    fn test_split_frontmatter() -> Result<()> {
        let (frontmatter, body) = split_frontmatter("---\ntitle: x\n---\nbody")?;
        assert_eq!("\ntitle: x\n", frontmatter);
        assert_eq!("\nbody", body);
        Ok(())
    }

    #[test]
    fn test_fence_inside_frontmatter_value() -> Result<()> {
        let (frontmatter, body) = split_frontmatter(
            "---\ntitle: Rust --- a retrospective\ndate: 2024-01-05\n---\nBody",
        )?;
        let frontmatter: Frontmatter = serde_yaml::from_str(frontmatter)?;
        assert_eq!("Rust --- a retrospective", frontmatter.title);
        assert_eq!("2024-01-05", frontmatter.date);
        assert_eq!("\nBody", body);
        Ok(())
    }

    #[test]
    fn test_parse_post_with_dashes_in_title() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join("retro.md"),
            "---\ntitle: Rust --- a retrospective\ndate: 2024-01-05\n---\nLooking back.\n",
        )?;
        let posts = Parser::new(dir.path()).parse_posts()?;
        assert_eq!(1, posts.len());
        assert_eq!("retro", posts[0].slug);
        assert_eq!("Rust --- a retrospective", posts[0].title);
        assert_eq!("<p>Looking back.</p>\n", posts[0].body);
        Ok(())
    }

    #[test]
    fn test_closing_fence_at_end_of_input() -> Result<()> {
        let (frontmatter, body) = split_frontmatter("---\ntitle: x\n---")?;
        assert_eq!("\ntitle: x\n", frontmatter);
        assert_eq!("", body);
        Ok(())
    }

    #[test]
    fn test_duplicate_slugs() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir(dir.path().join("a"))?;
        let source = "---\ntitle: A\ndate: 2024-01-05\n---\nBody\n";
        std::fs::write(dir.path().join("a.md"), source)?;
        std::fs::write(dir.path().join("a").join("index.md"), source)?;

        match Parser::new(dir.path()).parse_posts() {
            Err(Error::DuplicateSlug {
                slug,
                first,
                second,
            }) => {
                assert_eq!("a", slug);
                // `a/` sorts before `a.md`, so the bundle is seen first
                assert_eq!(Path::new("a/index.md"), first);
                assert_eq!(Path::new("a.md"), second);
            }
            other => panic!("wanted a duplicate slug error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_sort_newest_first() {
        let post = |slug: &str, date: &str| Post {
            slug: slug.to_owned(),
            date: date.to_owned(),
            ..Post::default()
        };
        let mut posts = vec![
            post("utc", "2024-01-10T01:00:00+00:00"),
            post("bad", "someday"),
            post("plain", "2024-01-08"),
            post("eastern", "2024-01-09T23:00:00-05:00"),
        ];
        sort_newest_first(&mut posts);
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(vec!["eastern", "utc", "plain", "bad"], slugs);
    }

    #[test]
    fn test_missing_start_fence() {
        assert!(matches!(
            split_frontmatter("title: x\n---\n"),
            Err(Error::FrontmatterMissingStartFence)
        ));
    }

    #[test]
    fn test_missing_end_fence() {
        assert!(matches!(
            split_frontmatter("---\ntitle: x\n"),
            Err(Error::FrontmatterMissingEndFence)
        ));
    }

    #[test]
    fn test_slug_for() -> Result<()> {
        assert_eq!("hello", slug_for(Path::new("hello.md"))?);
        assert_eq!("2021/recap", slug_for(Path::new("2021/recap.md"))?);
        assert_eq!("bundle", slug_for(Path::new("bundle/index.md"))?);
        assert!(slug_for(Path::new("index.md")).is_err());
        Ok(())
    }
}
