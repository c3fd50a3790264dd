//! Site paths. Every link the generator emits, and every output file it
//! writes, is derived from the functions in this module so the two can never
//! disagree.

use std::path::{Path, PathBuf};

/// The listing of all posts.
pub const BLOG_PATH: &str = "/blog";

/// The prefix for tag listings.
pub const TAGS_PATH: &str = "/tags";

/// The detail page for the post with the given slug.
pub fn post_path(slug: &str) -> String {
    format!("{}/{}", BLOG_PATH, slug)
}

/// Page `page` (1-based) of the listing of all posts. The first page lives at
/// [`BLOG_PATH`] itself.
pub fn blog_page_path(page: usize) -> String {
    paginated(BLOG_PATH, page)
}

/// The first listing page for `tag`. Tags are slugified so that e.g., `macOS`
/// and `MacOS` resolve to the same page.
pub fn tag_path(tag: &str) -> String {
    format!("{}/{}", TAGS_PATH, slug::slugify(tag))
}

/// Page `page` (1-based) of the listing for `tag`.
pub fn tag_page_path(tag: &str, page: usize) -> String {
    paginated(&tag_path(tag), page)
}

fn paginated(base: &str, page: usize) -> String {
    match page {
        0 | 1 => base.to_owned(),
        _ => format!("{}/page/{}", base, page),
    }
}

/// Maps a site path onto the file that serves it, i.e. `/blog/foo` becomes
/// `{root}/blog/foo/index.html` and `/` becomes `{root}/index.html`.
pub fn output_file(root: &Path, path: &str) -> PathBuf {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_owned(), |dir, segment| dir.join(segment))
        .join("index.html")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_post_path() {
        assert_eq!("/blog/hello-world", post_path("hello-world"));
        assert_eq!("/blog/2021/recap", post_path("2021/recap"));
    }

    #[test]
    fn test_blog_page_path() {
        assert_eq!("/blog", blog_page_path(1));
        assert_eq!("/blog/page/3", blog_page_path(3));
    }

    #[test]
    fn test_tag_paths() {
        assert_eq!("/tags/next-js", tag_path("Next.js"));
        assert_eq!(tag_path("macOS"), tag_path("MacOS"));
        assert_eq!("/tags/rust/page/2", tag_page_path("Rust", 2));
    }

    #[test]
    fn test_output_file() {
        let root = Path::new("/tmp/site");
        assert_eq!(root.join("index.html"), output_file(root, "/"));
        assert_eq!(
            root.join("blog").join("a").join("b").join("index.html"),
            output_file(root, "/blog/a/b"),
        );
    }
}
