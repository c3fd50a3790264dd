//! The home page's list of recent posts. [`render`] lays out the newest
//! [`MAX_DISPLAY`] posts as cards linking to their pages, followed by a link
//! to the full listing when there are more posts, and a newsletter signup
//! panel when the site has a newsletter provider.
//!
//! Rendering is a pure function of the posts and the site metadata. The only
//! way it can fail is a post date that can't be formatted, in which case no
//! markup is produced at all.

use crate::config::SiteMetadata;
use crate::date::{self, format_date};
use crate::link::BLOG_PATH;
use crate::post::Post;
use crate::tag::Tag;
use maud::{html, Markup, PreEscaped};

/// The number of posts shown on the home page.
pub const MAX_DISPLAY: usize = 5;

/// Shown in place of the list when there are no posts.
pub const EMPTY_MESSAGE: &str = "No posts found.";

/// The endpoint the newsletter form posts to.
pub const NEWSLETTER_ENDPOINT: &str = "/api/newsletter";

/// The posts shown on the home page: the first [`MAX_DISPLAY`] of `posts`, in
/// their given order.
pub fn select(posts: &[Post]) -> &[Post] {
    &posts[..posts.len().min(MAX_DISPLAY)]
}

/// Renders the home page's post list. `posts` is expected newest first and is
/// never reordered.
pub fn render(posts: &[Post], site: &SiteMetadata) -> Result<Markup> {
    // Dates are formatted up front so a bad one fails the whole render.
    let items = select(posts)
        .iter()
        .map(|post| Ok((post, format_date(&post.date, &site.locale)?)))
        .collect::<Result<Vec<(&Post, String)>>>()?;

    Ok(html! {
        div class="divide-y divide-gray-200 dark:divide-gray-700" {
            ul class="grid grid-cols-1 gap-8 2xl:grid-cols-2 2xl:gap-12" {
                @if posts.is_empty() {
                    (EMPTY_MESSAGE)
                }
                @for (post, formatted_date) in &items {
                    (card(post, formatted_date))
                }
            }
        }
        @if posts.len() > MAX_DISPLAY {
            div class="mt-12 flex justify-end text-base font-medium leading-6" {
                a href=(BLOG_PATH)
                    class="rounded-lg border border-primary-500 px-4 py-2 text-primary-500 transition-colors hover:bg-primary-500 hover:text-white dark:hover:text-white"
                    aria-label="All posts" {
                    "All Posts " (PreEscaped("&rarr;"))
                }
            }
        }
        @if let Some(provider) = site.newsletter_provider() {
            div id="newsletter"
                class="mt-16 flex items-center justify-center border-t border-gray-200 pt-8 dark:border-gray-700" {
                (newsletter_form(provider))
            }
        }
    })
}

/// A single post card. The title is the visible link; an invisible anchor
/// covers the whole card so it is clickable anywhere.
fn card(post: &Post, formatted_date: &str) -> Markup {
    let url = post.url();
    html! {
        li class="group relative rounded-xl border border-gray-200 p-6 transition-shadow hover:shadow-lg dark:border-gray-700 2xl:p-8"
            data-slug=(post.slug) {
            article {
                div class="flex flex-col space-y-4" {
                    div class="flex items-center justify-between" {
                        div class="flex flex-wrap gap-2" {
                            @for tag in post.tag_chips() {
                                (tag_chip(&tag))
                            }
                        }
                        time datetime=(post.date) class="text-sm text-gray-500 dark:text-gray-400" {
                            (formatted_date)
                        }
                    }
                    div class="space-y-4" {
                        h2 class="text-2xl font-bold leading-8 tracking-tight transition-colors group-hover:text-primary-500" {
                            a href=(url) class="text-gray-900 dark:text-gray-100" {
                                (post.title)
                            }
                        }
                        div class="prose prose-sm max-w-none text-gray-500 line-clamp-3 dark:text-gray-400" {
                            (post.summary)
                        }
                        a href=(url)
                            class="absolute inset-0 z-0"
                            aria-label=(format!("Read more: \"{}\"", post.title)) {
                            span class="sr-only" { "Read more" }
                        }
                    }
                }
            }
        }
    }
}

fn tag_chip(tag: &Tag) -> Markup {
    html! {
        a href=(tag.url)
            class="relative z-10 mr-3 text-sm font-medium uppercase text-primary-500 hover:text-primary-600 dark:hover:text-primary-400"
            data-tag=(tag.name) {
            (tag.name)
        }
    }
}

fn newsletter_form(provider: &str) -> Markup {
    html! {
        div data-provider=(provider) {
            div class="pb-1 text-lg font-semibold text-gray-800 dark:text-gray-100" {
                "Subscribe to the newsletter"
            }
            form action=(NEWSLETTER_ENDPOINT) method="post" class="flex flex-col sm:flex-row" {
                label for="email-input" class="sr-only" { "Email address" }
                input id="email-input"
                    name="email"
                    type="email"
                    autocomplete="email"
                    placeholder="Enter your email"
                    class="w-72 rounded-md px-4 focus:border-transparent focus:outline-none focus:ring-2 focus:ring-primary-600 dark:bg-black"
                    required;
                div class="mt-2 flex w-full rounded-md shadow-sm sm:ml-3 sm:mt-0" {
                    button type="submit"
                        class="w-full rounded-md bg-primary-500 px-4 py-2 font-medium text-white hover:bg-primary-700 sm:py-0" {
                        "Sign up"
                    }
                }
            }
        }
    }
}

/// Rendering fails only when a date can't be formatted.
pub type Result<T> = std::result::Result<T, date::Error>;
