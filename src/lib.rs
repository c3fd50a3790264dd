//! The library code for the `frontpage` static blog generator. The
//! architecture can be generally broken down into two distinct steps:
//!
//! 1. Parsing posts from source files on disk ([`crate::parser`])
//! 2. Converting the posts into output files on disk ([`crate::write`])
//!
//! The second step writes three kinds of pages:
//!
//! 1. The home page, which lists the most recent posts ([`crate::home`])
//! 2. One page per post
//! 3. Listing pages: all posts, and the posts of each tag, paginated
//!
//! Every page is rendered through the theme's templates. The home page's post
//! list is rendered by the generator itself and handed to the home template,
//! so its structure (how many posts, which links, whether the newsletter
//! signup appears) is the same for every theme.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod date;
pub mod feed;
pub mod home;
pub mod link;
pub mod markdown;
pub mod parser;
pub mod post;
pub mod tag;
pub mod write;
