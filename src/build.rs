//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: parsing the posts
//! ([`crate::parser`]), rendering the home, post, and listing pages
//! ([`crate::write`]), copying the static source directory into the static
//! output directory, and generating the Atom feed.

use crate::config::Config;
use crate::feed::{write_feed, Error as FeedError};
use crate::parser::{Error as ParseError, Parser as PostParser};
use crate::write::{Error as WriteError, Writer};
use gtmpl::Template;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The name of the feed file in the output directory.
pub const FEED_FILE: &str = "feed.xml";

/// Builds the site from a [`Config`] object. This calls into
/// [`PostParser::parse_posts`], [`Writer::write_posts`], and
/// [`write_feed`] which do the heavy-lifting. This function also copies the
/// static assets from source directory to the output directory.
pub fn build_site(config: &Config) -> Result<()> {
    // collect all posts
    let posts = PostParser::new(&config.posts_source_directory).parse_posts()?;
    info!(count = posts.len(), "parsed posts");

    // Parse the template files.
    let home_template = parse_template(config.home_template.iter())?;
    let post_template = parse_template(config.post_template.iter())?;
    let list_template = parse_template(config.list_template.iter())?;

    // Only the directories the generator owns are cleaned, in case the output
    // directory holds anything else.
    rmdir(&config.blog_output_directory)?;
    rmdir(&config.tags_output_directory)?;
    rmdir(&config.static_output_directory)?;

    Writer {
        home_template: &home_template,
        post_template: &post_template,
        list_template: &list_template,
        site: &config.site,
        output_directory: &config.root_output_directory,
    }
    .write_posts(&posts)?;
    info!(output = %config.root_output_directory.display(), "wrote pages");

    if config.static_source_directory.is_dir() {
        copy_dir(
            &config.static_source_directory,
            &config.static_output_directory,
        )?;
        info!("copied static files");
    }

    write_feed(
        &config.site,
        &posts,
        File::create(config.root_output_directory.join(FEED_FILE))?,
    )?;
    info!("wrote feed");

    Ok(())
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &dst.join(entry.file_name()))?;
        } else {
            debug!(file = %entry.path().display(), "copying");
            std::fs::copy(entry.path(), dst.join(entry.file_name()))?;
        }
    }

    Ok(())
}

// Loads the template file contents, concatenates them, and parses the result
// into a single template.
fn parse_template<P: AsRef<Path>>(template_files: impl Iterator<Item = P>) -> Result<Template> {
    let mut contents = String::new();
    for template_file in template_files {
        use std::io::Read;
        let template_file = template_file.as_ref();
        File::open(template_file)
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?
            .read_to_string(&mut contents)?;
        contents.push(' ');
    }

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during parsing, writing,
/// cleaning output directories, parsing template files, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during parsing.
    Parse(ParseError),

    /// Returned for errors writing pages to disk as HTML files.
    Write(WriteError),

    /// Returned for I/O problems while cleaning output directories.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Feed(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs::read_to_string;

    #[test]
    fn test_build_site() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let output = tempfile::tempdir()?;
        let config = Config::from_directory(Path::new("./testdata/site"), Some(output.path()))?;
        build_site(&config)?;

        let root = output.path();
        let home = read_to_string(root.join("index.html"))?;
        assert!(home.contains("<title>Test Blog</title>"));
        assert_eq!(3, home.matches("<li ").count());
        assert!(home.contains(">2023年3月3日</time>"));
        assert!(home.contains("id=\"newsletter\""));
        // three posts fit on the home page
        assert!(!home.contains("aria-label=\"All posts\""));

        let post = read_to_string(root.join("blog/nested/deep-dive/index.html"))?;
        assert!(post.contains("<h1>A Deep Dive</h1>"));
        assert!(post.contains("<em>nesting</em>"));
        assert!(post.contains("href=\"/blog/bundle\""));
        assert!(post.contains("href=\"/blog/simple\""));

        assert!(root.join("blog/index.html").is_file());
        assert!(root.join("tags/rust/index.html").is_file());
        assert!(root.join("tags/web-dev/index.html").is_file());
        assert!(!root.join("blog/unfinished/index.html").exists());
        assert_eq!(
            "body { margin: 0; }\n",
            read_to_string(root.join("static/style.css"))?
        );
        assert!(read_to_string(root.join(FEED_FILE))?.contains("A Deep Dive"));
        Ok(())
    }

    #[test]
    fn test_missing_template_file() {
        let missing = Path::new("./testdata/site/theme/missing.html");
        assert!(matches!(
            parse_template(std::iter::once(missing)),
            Err(Error::OpenTemplateFile { .. })
        ));
    }

    #[test]
    fn test_rmdir_missing_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        rmdir(&dir.path().join("nothing-here"))
    }
}
