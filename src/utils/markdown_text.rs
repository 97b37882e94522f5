/// Plain-text rendering of message bodies
///
/// Desktop notifications cannot show markup, so message bodies are reduced to
/// the text a reader would see.
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

pub fn strip_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let mut text = String::new();
    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::Start(Tag::Item) => {
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
            }
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::CodeBlock) => {
                text.push('\n');
            }
            _ => {}
        }
    }

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_inline_markup() {
        assert_eq!(strip_markdown("**Backup** finished in `42s`"), "Backup finished in 42s");
        assert_eq!(strip_markdown("[docs](https://example.com)"), "docs");
    }

    #[test]
    fn test_strip_keeps_paragraphs_apart() {
        assert_eq!(strip_markdown("# Disk\n\nalmost full"), "Disk\nalmost full");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(strip_markdown("server restarted"), "server restarted");
    }
}
