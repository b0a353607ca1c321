use std::collections::{HashMap, HashSet};

/// Render an AI explanation to sanitized HTML.
///
/// Explanations arrive as markdown with tables, lists and the occasional
/// inline image of a diagram.
#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let mut options = pulldown_cmark::Options::empty();
    options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
    options.insert(pulldown_cmark::Options::ENABLE_TABLES);

    let parser = pulldown_cmark::Parser::new_ext(input, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    sanitize_html(&html)
}

#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "div", "span", "br", "em", "strong", "b", "i", "del", "code", "pre", "blockquote",
        "ul", "ol", "li", "a", "h1", "h2", "h3", "h4", "table", "thead", "tbody", "tr", "th",
        "td", "hr", "img", "sub", "sup",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href"].into_iter().collect());
    attributes.insert("img", ["src", "alt"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{markdown_to_html, sanitize_html};

    #[test]
    fn renders_lists_and_tables() {
        let html = markdown_to_html("1. First\n2. Second\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<ol>"));
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>2</td>"));
    }

    #[test]
    fn strips_scripts_and_javascript_links() {
        let html = markdown_to_html("[Link](javascript:alert(1))\n\n<script>alert(1)</script>");
        assert!(html.contains("Link"));
        assert!(!html.contains("javascript:"));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn drops_unlisted_attributes() {
        let html = sanitize_html("<p onclick=\"x()\" class=\"y\">Hi</p>");
        assert_eq!(html, "<p>Hi</p>");
    }
}
