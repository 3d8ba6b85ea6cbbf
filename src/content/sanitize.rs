use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Removes anything that looks like a tag. Text between tags is kept as-is,
/// including character references.
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "").into_owned()
}

/// Parses `html` as a fragment and keeps only its text, dropping the bodies
/// of `script` and `style` elements. The result is plain text and must be
/// escaped when embedded in markup.
pub fn sanitize_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut text = String::with_capacity(html.len());

    for node in fragment.root_element().descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };

        let in_raw_text = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|e| e.name()))
            .is_some_and(|name| name == "script" || name == "style");

        if !in_raw_text {
            text.push_str(chunk);
        }
    }

    text
}
