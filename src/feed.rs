//! Support for creating Atom feeds from a list of posts.

use crate::config::{Author, SiteMetadata};
use crate::date::{self, parse_date};
use crate::post::Post;
use atom_syndication::{
    Entry, EntryBuilder, Error as AtomError, Feed, FeedBuilder, Link, LinkBuilder, Person,
    PersonBuilder, Text,
};
use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use std::fmt;
use std::io::Write;
use url::{ParseError as UrlParseError, Url};

/// Creates a feed from the site metadata and a list of [`Post`]s (newest
/// first) and writes the result to a [`std::io::Write`].
pub fn write_feed<W: Write>(site: &SiteMetadata, posts: &[Post], w: W) -> Result<()> {
    feed(site, posts)?.write_to(w)?;
    Ok(())
}

fn feed(site: &SiteMetadata, posts: &[Post]) -> Result<Feed> {
    let entries = feed_entries(site, posts)?;

    // The feed changes whenever a post is added, so the newest post's date
    // is the feed's date.
    let updated = match entries.first() {
        Some(entry) => *entry.updated(),
        None => utc().from_utc_datetime(&Utc::now().naive_utc()),
    };

    let mut builder = FeedBuilder::default();
    builder
        .title(site.title.as_str())
        .id(site.site_url.to_string())
        .updated(updated)
        .authors(author_to_people(site.author.as_ref()))
        .links(vec![alternate(site.site_url.as_str())])
        .entries(entries);
    if let Some(description) = &site.description {
        builder.subtitle(Some(Text::from(description.as_str())));
    }
    Ok(builder.build())
}

fn feed_entries(site: &SiteMetadata, posts: &[Post]) -> Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = Vec::with_capacity(posts.len());

    for post in posts {
        let url = post_url(&site.site_url, post)?;
        let date = midnight(&post.date)?;
        entries.push(
            EntryBuilder::default()
                .id(url.to_string())
                .title(post.title.as_str())
                .updated(date)
                .published(Some(date))
                .authors(author_to_people(site.author.as_ref()))
                .links(vec![alternate(url.as_str())])
                .summary(Some(Text::from(post.summary.as_str())))
                .build(),
        );
    }
    Ok(entries)
}

/// The absolute URL of a post's page. The post path is joined relative to
/// `site_url`, so a site served below a subpath keeps it.
fn post_url(site_url: &Url, post: &Post) -> Result<Url> {
    Ok(site_url.join(post.url().trim_start_matches('/'))?)
}

/// Post dates carry no time or timezone, so posts are treated as published at
/// midnight UTC.
fn midnight(date: &str) -> Result<DateTime<FixedOffset>> {
    let naive = parse_date(date)?;
    match naive.and_hms_opt(0, 0, 0) {
        Some(naive_date_time) => Ok(utc().from_utc_datetime(&naive_date_time)),
        None => Err(Error::Date(date::Error::InvalidDate(date.to_owned()))),
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

fn alternate(href: &str) -> Link {
    LinkBuilder::default()
        .href(href)
        .rel("alternate")
        .build()
}

fn author_to_people(author: Option<&Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![PersonBuilder::default()
            .name(author.name.as_str())
            .email(author.email.clone())
            .build()],
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants inlude I/O, Atom, URL, and
/// date parsing issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when a post's URL can't be built from the site URL.
    UrlParse(UrlParseError),

    /// Returned when there is an issue parsing a post's date.
    Date(date::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
            Error::Date(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::UrlParse(err) => Some(err),
            Error::Date(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<UrlParseError> for Error {
    fn from(err: UrlParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl From<date::Error> for Error {
    /// Converts [`date::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator when parsing post dates.
    fn from(err: date::Error) -> Error {
        Error::Date(err)
    }
}
