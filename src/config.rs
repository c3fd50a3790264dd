//! Loads the project configuration: the site metadata from `site.yaml` and
//! the theme's template lists from `theme/theme.yaml`.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

const PROJECT_FILE: &str = "site.yaml";

#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
struct PageSize(usize);
impl Default for PageSize {
    fn default() -> Self {
        PageSize(5)
    }
}

/// The author of the site, used for the feed.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

/// Newsletter settings. Only the presence of a provider matters to the
/// generator; the signup itself is handled by the provider.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Newsletter {
    #[serde(default)]
    pub provider: Option<String>,
}

/// Site-wide metadata, deserialized from `site.yaml`.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SiteMetadata {
    /// The title of the site.
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub author: Option<Author>,

    /// The absolute URL the site is served from, used for feed links.
    pub site_url: Url,

    /// The locale used for formatting dates (e.g., `en-US`).
    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default)]
    pub newsletter: Option<Newsletter>,

    #[serde(default)]
    posts_per_page: PageSize,
}

fn open(path: &Path, kind: &str) -> Result<File> {
    File::open(path).with_context(|| format!("Opening {} file `{}`", kind, path.display()))
}

fn default_locale() -> String {
    String::from("en-US")
}

impl SiteMetadata {
    /// The configured newsletter provider. A missing `newsletter` section, a
    /// missing `provider` and an empty `provider` all mean "no newsletter".
    pub fn newsletter_provider(&self) -> Option<&str> {
        self.newsletter
            .as_ref()?
            .provider
            .as_deref()
            .filter(|provider| !provider.is_empty())
    }

    /// The number of posts per listing page (at least one).
    pub fn posts_per_page(&self) -> usize {
        self.posts_per_page.0.max(1)
    }
}

#[derive(Deserialize)]
struct Theme {
    home_template: Vec<PathBuf>,
    post_template: Vec<PathBuf>,
    list_template: Vec<PathBuf>,
}

/// Everything needed to build a site: where the sources live, where the
/// output goes, and which templates to apply.
pub struct Config {
    pub site: SiteMetadata,
    pub posts_source_directory: PathBuf,
    pub static_source_directory: PathBuf,
    pub home_template: Vec<PathBuf>,
    pub post_template: Vec<PathBuf>,
    pub list_template: Vec<PathBuf>,
    pub root_output_directory: PathBuf,
    pub blog_output_directory: PathBuf,
    pub tags_output_directory: PathBuf,
    pub static_output_directory: PathBuf,
}

impl Config {
    /// Searches `dir` and its ancestors for `site.yaml` and loads the
    /// project it belongs to. Without an explicit `output_directory`, the
    /// site is built into `_site` next to `site.yaml`.
    pub fn from_directory(dir: &Path, output_directory: Option<&Path>) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path, output_directory)
                .with_context(|| format!("Loading configuration from `{}`", path.display()))
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, output_directory),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    pub fn from_project_file(path: &Path, output_directory: Option<&Path>) -> Result<Config> {
        let site: SiteMetadata = serde_yaml::from_reader(open(path, "project")?)?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )
        })?;

        let theme_dir = project_root.join("theme");
        let theme: Theme = serde_yaml::from_reader(open(&theme_dir.join("theme.yaml"), "theme")?)?;
        let resolve = |templates: &[PathBuf]| -> Vec<PathBuf> {
            templates
                .iter()
                .map(|relpath| theme_dir.join(relpath))
                .collect()
        };

        let output_directory = match output_directory {
            Some(dir) => dir.to_owned(),
            None => project_root.join("_site"),
        };

        Ok(Config {
            site,
            posts_source_directory: project_root.join("data").join("blog"),
            static_source_directory: project_root.join("static"),
            home_template: resolve(&theme.home_template),
            post_template: resolve(&theme.post_template),
            list_template: resolve(&theme.list_template),
            blog_output_directory: output_directory.join("blog"),
            tags_output_directory: output_directory.join("tags"),
            static_output_directory: output_directory.join("static"),
            root_output_directory: output_directory,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn site(yaml: &str) -> SiteMetadata {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_defaults() {
        let site = site("title: Blog\nsite_url: https://example.com/\n");
        assert_eq!("en-US", site.locale);
        assert_eq!(5, site.posts_per_page());
        assert_eq!(None, site.newsletter_provider());
        assert_eq!(None, site.author);
    }

    #[test]
    fn test_newsletter_provider() {
        let base = "title: Blog\nsite_url: https://example.com/\n";
        assert_eq!(
            Some("buttondown"),
            site(&format!("{}newsletter:\n  provider: buttondown\n", base)).newsletter_provider()
        );
        assert_eq!(
            None,
            site(&format!("{}newsletter:\n  provider: ''\n", base)).newsletter_provider()
        );
        assert_eq!(
            None,
            site(&format!("{}newsletter:\n  provider: ~\n", base)).newsletter_provider()
        );
        assert_eq!(
            None,
            site(&format!("{}newsletter: {{}}\n", base)).newsletter_provider()
        );
    }

    #[test]
    fn test_from_directory_walks_up() -> Result<()> {
        let config = Config::from_directory(Path::new("./testdata/site/data/blog"), None)?;
        assert_eq!("Test Blog", config.site.title);
        assert_eq!("zh-CN", config.site.locale);
        assert_eq!(3, config.site.posts_per_page());
        assert_eq!(
            Path::new("./testdata/site/data/blog"),
            config.posts_source_directory
        );
        assert_eq!(
            vec![
                Path::new("./testdata/site/theme/base.html").to_owned(),
                Path::new("./testdata/site/theme/home.html").to_owned(),
            ],
            config.home_template
        );
        assert_eq!(
            Path::new("./testdata/site/_site/blog"),
            config.blog_output_directory
        );
        Ok(())
    }

    #[test]
    fn test_missing_project_file() {
        let dir = tempfile::tempdir().unwrap();
        // the temp dir's ancestors are not expected to contain a project file
        assert!(Config::from_directory(dir.path(), None).is_err());
    }
}
