use std::collections::{HashMap, HashSet};

/// Render assistant Markdown (GFM tables, strikethrough, task lists) to
/// sanitized HTML.
#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let mut options = pulldown_cmark::Options::empty();
    options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
    options.insert(pulldown_cmark::Options::ENABLE_TABLES);
    options.insert(pulldown_cmark::Options::ENABLE_TASKLISTS);

    let parser = pulldown_cmark::Parser::new_ext(input, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    sanitize_html(&html)
}

#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "br", "em", "strong", "del", "code", "pre", "blockquote", "ul", "ol", "li", "a",
        "h1", "h2", "h3", "h4", "h5", "h6", "hr", "table", "thead", "tbody", "tr", "th", "td",
        "input",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href"].into_iter().collect());
    attributes.insert("input", ["type", "checked", "disabled"].into_iter().collect());
    attributes.insert("th", ["style"].into_iter().collect());
    attributes.insert("td", ["style"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .link_rel(Some("noopener noreferrer"))
        .clean(html)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::markdown_to_html;

    #[test]
    fn strips_script_links() {
        let html = markdown_to_html("[Link](javascript:alert(1))");
        assert!(html.contains("Link"));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn drops_raw_script_tags() {
        let html = markdown_to_html("Halo <script>alert(1)</script>");
        assert!(!html.contains("<script"));
        assert!(html.contains("Halo"));
    }

    #[test]
    fn renders_tables_and_emphasis() {
        let html = markdown_to_html("**HTML** dulu\n\n| Level | Kelas |\n|---|---|\n| Dasar | 2 |\n");
        assert!(html.contains("<strong>HTML</strong>"));
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>Dasar</td>"));
    }

    #[test]
    fn renders_fenced_code() {
        let html = markdown_to_html("```\nfn main() {}\n```");
        assert!(html.contains("<pre><code>fn main() {}"));
    }
}
