//! Markdown subset to HTML, for assistant answers.
//!
//! Input is untrusted: every piece of text is HTML-escaped before any
//! markup is produced, and only `http(s)` links become anchors.
//!
//! Supported: fenced code blocks, `#` headings, `-`/`*`/`+` and `1.` lists,
//! paragraphs with hard line breaks, `` `code` ``, `**bold**`/`__bold__`,
//! `*italic*`/`_italic_`, `[text](https://...)`.

use once_cell::sync::Lazy;
use regex::Regex;

/// A closing `#` run only counts when separated from the text.
static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+?)(?:\s+#+)?\s*$").expect("heading pattern"));
static UNORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-*+]\s+(.*)$").expect("list pattern"));
static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)[.)]\s+(.*)$").expect("list pattern"));

/// Spans whose content is not formatted further.
///
/// Link targets may contain one level of balanced parentheses.
static ATOM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"`([^`\n]+)`|\[([^\]\n]+)\]\((https?://(?:[^\s()]|\([^\s()]*\))+)\)")
        .expect("atom pattern")
});
/// Lazy so that single `*` or `_` inside stay for the italic pass.
static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").expect("bold pattern"));
static ITALIC_STAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*\s](?:[^*\n]*[^*\s])?)\*").expect("italic pattern"));
static ITALIC_UNDERSCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b_([^_\n]+)_\b").expect("italic pattern"));

#[derive(Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn emphasize(escaped: &str) -> String {
    let bold = BOLD.replace_all(escaped, |caps: &regex::Captures| {
        let inner = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        format!("<strong>{}</strong>", inner)
    });
    let italic = ITALIC_STAR.replace_all(&bold, "<em>$1</em>");
    ITALIC_UNDERSCORE.replace_all(&italic, "<em>$1</em>").into_owned()
}

/// Renders inline markup of a single line.
pub fn render_inline(text: &str) -> String {
    let mut out = String::new();
    let mut last = 0;

    for caps in ATOM.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&emphasize(&escape_html(&text[last..whole.start()])));

        if let Some(code) = caps.get(1) {
            out.push_str("<code>");
            out.push_str(&escape_html(code.as_str()));
            out.push_str("</code>");
        } else if let (Some(label), Some(url)) = (caps.get(2), caps.get(3)) {
            out.push_str(&format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                escape_html(url.as_str()),
                escape_html(label.as_str())
            ));
        }
        last = whole.end();
    }

    out.push_str(&emphasize(&escape_html(&text[last..])));
    out
}

#[derive(Default)]
struct Renderer {
    html: String,
    paragraph: Vec<String>,
    /// Kind, first number and items of the open list.
    list: Option<(ListKind, u64, Vec<String>)>,
    code: Option<(Option<String>, Vec<String>)>,
}

impl Renderer {
    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let lines: Vec<String> =
            self.paragraph.drain(..).map(|l| render_inline(l.trim())).collect();
        self.html.push_str("<p>");
        self.html.push_str(&lines.join("<br>"));
        self.html.push_str("</p>");
    }

    fn flush_list(&mut self) {
        let Some((kind, start, items)) = self.list.take() else {
            return;
        };
        if kind == ListKind::Ordered && start != 1 {
            self.html.push_str(&format!("<ol start=\"{}\">", start));
        } else {
            self.html.push_str(&format!("<{}>", kind.tag()));
        }
        for item in items {
            self.html.push_str("<li>");
            self.html.push_str(&render_inline(item.trim()));
            self.html.push_str("</li>");
        }
        self.html.push_str(&format!("</{}>", kind.tag()));
    }

    fn flush_code(&mut self) {
        let Some((language, lines)) = self.code.take() else {
            return;
        };
        match language {
            Some(lang) => self.html.push_str(&format!("<pre><code class=\"language-{}\">", lang)),
            None => self.html.push_str("<pre><code>"),
        }
        self.html.push_str(&escape_html(&lines.join("\n")));
        self.html.push_str("</code></pre>");
    }

    fn flush_text(&mut self) {
        self.flush_paragraph();
        self.flush_list();
    }

    fn push_item(&mut self, kind: ListKind, start: u64, item: &str) {
        self.flush_paragraph();
        if self.list.as_ref().is_some_and(|(k, _, _)| *k != kind) {
            self.flush_list();
        }
        self.list
            .get_or_insert_with(|| (kind, start, Vec::new()))
            .2
            .push(item.to_string());
    }

    fn line(&mut self, line: &str) {
        let trimmed = line.trim_start();

        if let Some((_, lines)) = self.code.as_mut() {
            if trimmed.starts_with("```") {
                self.flush_code();
            } else {
                lines.push(line.to_string());
            }
            return;
        }

        if let Some(info) = trimmed.strip_prefix("```") {
            self.flush_text();
            let language = info
                .trim()
                .split_whitespace()
                .next()
                .filter(|l| l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '+'))
                .map(str::to_string);
            self.code = Some((language, Vec::new()));
        } else if trimmed.is_empty() {
            self.flush_text();
        } else if let Some(caps) = HEADING.captures(trimmed) {
            self.flush_text();
            let level = caps[1].len();
            self.html
                .push_str(&format!("<h{0}>{1}</h{0}>", level, render_inline(&caps[2])));
        } else if let Some(caps) = UNORDERED_ITEM.captures(line) {
            self.push_item(ListKind::Unordered, 1, &caps[1]);
        } else if let Some(caps) = ORDERED_ITEM.captures(line) {
            let start = caps[1].parse().unwrap_or(1);
            self.push_item(ListKind::Ordered, start, &caps[2]);
        } else {
            self.flush_list();
            self.paragraph.push(line.to_string());
        }
    }

    fn finish(mut self) -> String {
        self.flush_code();
        self.flush_text();
        self.html
    }
}

/// Renders a markdown subset to an HTML fragment.
pub fn render_markdown(source: &str) -> String {
    let mut renderer = Renderer::default();
    for line in source.lines() {
        renderer.line(line);
    }
    renderer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_html() {
        assert_eq!(
            render_markdown("<script>alert('x')</script>"),
            "<p>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;</p>"
        );
    }

    #[test]
    fn test_inline_emphasis() {
        assert_eq!(
            render_inline("**bold** and *italic* and _also_"),
            "<strong>bold</strong> and <em>italic</em> and <em>also</em>"
        );
        assert_eq!(render_inline("snake_case_name"), "snake_case_name");
        assert_eq!(render_inline("2 * 3 * 4"), "2 * 3 * 4");
    }

    #[test]
    fn test_code_span_is_literal() {
        assert_eq!(
            render_inline("use `**ptr` <here>"),
            "use <code>**ptr</code> &lt;here&gt;"
        );
    }

    #[test]
    fn test_links() {
        assert_eq!(
            render_inline("[docs](https://example.com/a_b)"),
            "<a href=\"https://example.com/a_b\" target=\"_blank\" rel=\"noopener noreferrer\">docs</a>"
        );
        assert_eq!(render_inline("[x](javascript:alert(1))"), "[x](javascript:alert(1))");
    }

    #[test]
    fn test_blocks() {
        let source =
            "# Summary\nFirst line\nsecond line\n\n- one\n- **two**\n1. alpha\n2. beta\n\nEnd";
        assert_eq!(
            render_markdown(source),
            "<h1>Summary</h1><p>First line<br>second line</p>\
             <ul><li>one</li><li><strong>two</strong></li></ul>\
             <ol><li>alpha</li><li>beta</li></ol><p>End</p>"
        );
    }

    #[test]
    fn test_heading_keeps_trailing_hash_in_text() {
        assert_eq!(render_markdown("# Using C#"), "<h1>Using C#</h1>");
        assert_eq!(render_markdown("## F# ##"), "<h2>F#</h2>");
        assert_eq!(render_markdown("### Closed ###"), "<h3>Closed</h3>");
    }

    #[test]
    fn test_italic_nested_in_bold() {
        assert_eq!(
            render_markdown("a **b *c* d** e"),
            "<p>a <strong>b <em>c</em> d</strong> e</p>"
        );
        assert_eq!(
            render_inline("**one** and **two**"),
            "<strong>one</strong> and <strong>two</strong>"
        );
    }

    #[test]
    fn test_ordered_list_keeps_start() {
        assert_eq!(
            render_markdown("3. three\n4. four"),
            "<ol start=\"3\"><li>three</li><li>four</li></ol>"
        );
    }

    #[test]
    fn test_link_with_parentheses() {
        assert_eq!(
            render_inline("see [Rust](https://en.wikipedia.org/wiki/Rust_(lang)) now"),
            "see <a href=\"https://en.wikipedia.org/wiki/Rust_(lang)\" \
             target=\"_blank\" rel=\"noopener noreferrer\">Rust</a> now"
        );
    }

    #[test]
    fn test_code_fence() {
        let source = "```rust\nlet x = a < b;\n**not bold**\n```\nafter";
        assert_eq!(
            render_markdown(source),
            "<pre><code class=\"language-rust\">let x = a &lt; b;\n**not bold**</code></pre><p>after</p>"
        );
    }

    #[test]
    fn test_unterminated_fence_still_renders() {
        assert_eq!(render_markdown("```\ncode"), "<pre><code>code</code></pre>");
    }
}
