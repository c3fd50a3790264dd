use pulldown_cmark::*;

/// The marker separating a post's summary from the rest of its body.
pub const FOLD_TAG: &str = "<!-- more -->";

/// Converts markdown to HTML, appending the result to `w`.
pub fn to_html(w: &mut String, markdown: &str) {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    html::push_html(w, Parser::new_ext(markdown, options));
}

/// Extracts the plain text above the [`FOLD_TAG`], if the markdown has one.
/// Formatting is dropped so the result can be shown as a summary.
pub fn summary(markdown: &str) -> Option<String> {
    let i = markdown.find(FOLD_TAG)?;
    let mut text = String::new();
    for ev in Parser::new(&markdown[..i]) {
        match ev {
            Event::Text(s) | Event::Code(s) => text.push_str(&s),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(Tag::Paragraph) | Event::End(Tag::Heading(_)) => {
                text.push(' ')
            }
            _ => {}
        }
    }
    Some(text.trim().to_owned())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_to_html() {
        let mut out = String::new();
        to_html(&mut out, "# Hello\n\nSome ~~old~~ *text*.");
        assert_eq!(
            "<h1>Hello</h1>\n<p>Some <del>old</del> <em>text</em>.</p>\n",
            out
        );
    }

    #[test]
    fn test_summary_above_fold() {
        assert_eq!(
            Some(String::from("First line continued. Second para")),
            summary(
                "First *line*\ncontinued.\n\nSecond `para`\n\n<!-- more -->\n\nRest"
            ),
        );
    }

    #[test]
    fn test_summary_without_fold() {
        assert_eq!(None, summary("No fold here."));
    }
}
