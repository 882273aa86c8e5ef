//! Markdown converter - deterministic DOM to markdown mapping
//!
//! Walks the sanitized HTML tree and emits markdown: headings, paragraphs,
//! emphasis, code (inline and fenced), blockquotes, nested lists, pipe
//! tables, links, and images. Line wrapping is disabled; whatever fits on
//! one source line stays on one output line.
//!
//! Literal markdown control characters in text content are backslash
//! escaped, so converting the output back through a markdown parser
//! reproduces the original text.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("hardcoded selector 'body' is valid"));

static CODE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("code").expect("hardcoded selector 'code' is valid"));

/// Converts an HTML fragment to markdown
///
/// # Arguments
///
/// * `html` - The (sanitized) HTML to convert
/// * `remove_links` - Render `<a>` elements as bare text instead of
///   `[text](href)`
/// * `remove_images` - Drop `<img>` elements instead of emitting
///   `![alt](src)`
pub fn convert(html: &str, remove_links: bool, remove_images: bool) -> String {
    let document = Html::parse_document(html);
    let root = document
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| document.root_element());

    let converter = Converter {
        remove_links,
        remove_images,
    };

    tidy(&converter.render_children(root))
}

struct Converter {
    remove_links: bool,
    remove_images: bool,
}

impl Converter {
    /// Renders all child nodes of an element, concatenated
    fn render_children(&self, element: ElementRef<'_>) -> String {
        use scraper::node::Node;

        let mut out = String::new();
        for child in element.children() {
            match child.value() {
                Node::Text(text) => out.push_str(&escape_markdown(&collapse_whitespace(text))),
                Node::Element(_) => {
                    if let Some(child_elem) = ElementRef::wrap(child) {
                        out.push_str(&self.render_element(child_elem));
                    }
                }
                _ => {}
            }
        }
        out
    }

    fn render_element(&self, element: ElementRef<'_>) -> String {
        let name = element.value().name();
        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name.as_bytes()[1] - b'0';
                let text = self.render_children(element).replace('\n', " ");
                let text = text.trim();
                if text.is_empty() {
                    String::new()
                } else {
                    format!("\n\n{} {}\n\n", "#".repeat(level as usize), text)
                }
            }

            "p" => {
                let text = self.render_children(element);
                let text = text.trim();
                if text.is_empty() {
                    String::new()
                } else {
                    format!("\n\n{}\n\n", text)
                }
            }

            "br" => "\n".to_string(),
            "hr" => "\n\n---\n\n".to_string(),

            "em" | "i" => self.wrap_inline(element, "*"),
            "strong" | "b" => self.wrap_inline(element, "**"),
            "del" | "s" | "strike" => self.wrap_inline(element, "~~"),

            "code" => render_code_span(&element.text().collect::<String>()),
            "pre" => render_code_block(element),

            "blockquote" => {
                let inner = squeeze_newlines(self.render_children(element));
                let inner = inner.trim();
                if inner.is_empty() {
                    return String::new();
                }
                let quoted: Vec<String> = inner
                    .lines()
                    .map(|line| {
                        if line.trim().is_empty() {
                            ">".to_string()
                        } else {
                            format!("> {}", line)
                        }
                    })
                    .collect();
                format!("\n\n{}\n\n", quoted.join("\n"))
            }

            "ul" => self.render_list(element, false),
            "ol" => self.render_list(element, true),

            "table" => self.render_table(element),

            "a" => {
                let text = self.render_children(element);
                let text = text.trim();
                if self.remove_links {
                    return text.to_string();
                }
                match element.value().attr("href") {
                    Some(href) if !href.is_empty() => format!("[{}]({})", text, href),
                    _ => text.to_string(),
                }
            }

            "img" => {
                if self.remove_images {
                    return String::new();
                }
                match element.value().attr("src") {
                    Some(src) if !src.is_empty() => {
                        let alt = element.value().attr("alt").unwrap_or("");
                        format!("![{}]({})", escape_markdown(alt), src)
                    }
                    _ => String::new(),
                }
            }

            // Block containers: children flow as blocks of their own
            "div" | "section" | "article" | "main" | "figure" | "figcaption" | "details"
            | "summary" | "address" | "li" | "dd" | "dt" | "dl" => {
                let inner = self.render_children(element);
                let inner = inner.trim();
                if inner.is_empty() {
                    String::new()
                } else {
                    format!("\n\n{}\n\n", inner)
                }
            }

            // Should have been sanitized away, but never contribute content
            "script" | "style" | "noscript" | "head" | "title" | "template" | "iframe" => {
                String::new()
            }

            // Everything else (span, u, abbr, mark, ...) passes through inline
            _ => self.render_children(element),
        }
    }

    fn wrap_inline(&self, element: ElementRef<'_>, marker: &str) -> String {
        let text = self.render_children(element);
        let text = text.trim();
        if text.is_empty() {
            String::new()
        } else {
            format!("{}{}{}", marker, text, marker)
        }
    }

    /// Renders a list; nested lists indent under their item's marker
    fn render_list(&self, element: ElementRef<'_>, ordered: bool) -> String {
        let start: usize = element
            .value()
            .attr("start")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);

        let mut items = Vec::new();
        let mut index = start;

        for child in element.children() {
            let Some(item) = ElementRef::wrap(child) else {
                continue;
            };
            if item.value().name() != "li" {
                continue;
            }

            let marker = if ordered {
                format!("{}. ", index)
            } else {
                "- ".to_string()
            };
            index += 1;

            let content = squeeze_newlines(self.render_children(item));
            let content = content.trim().to_string();
            let indent = " ".repeat(marker.len());

            let mut lines = content.lines();
            let first = lines.next().unwrap_or("");
            let mut rendered = format!("{}{}", marker, first);
            for line in lines {
                rendered.push('\n');
                if !line.trim().is_empty() {
                    rendered.push_str(&indent);
                    rendered.push_str(line);
                }
            }
            items.push(rendered);
        }

        if items.is_empty() {
            String::new()
        } else {
            format!("\n\n{}\n\n", items.join("\n"))
        }
    }

    /// Renders a table as a pipe table; the first row becomes the header
    fn render_table(&self, element: ElementRef<'_>) -> String {
        let mut rows: Vec<Vec<String>> = Vec::new();
        collect_rows(element, &mut |row| {
            let mut cells = Vec::new();
            for cell in row.children() {
                let Some(cell) = ElementRef::wrap(cell) else {
                    continue;
                };
                let name = cell.value().name();
                if name != "td" && name != "th" {
                    continue;
                }
                let text = self.render_children(cell).replace('\n', " ");
                cells.push(collapse_whitespace(text.trim()));
            }
            if !cells.is_empty() {
                rows.push(cells);
            }
        });

        if rows.is_empty() {
            return String::new();
        }

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut lines = Vec::new();

        for (i, row) in rows.iter().enumerate() {
            let mut padded: Vec<&str> = row.iter().map(String::as_str).collect();
            padded.resize(columns, "");
            lines.push(format!("| {} |", padded.join(" | ")));
            if i == 0 {
                lines.push(format!("| {} |", vec!["---"; columns].join(" | ")));
            }
        }

        format!("\n\n{}\n\n", lines.join("\n"))
    }
}

/// Walks table sections in document order and hands each `<tr>` to `f`
fn collect_rows(element: ElementRef<'_>, f: &mut impl FnMut(ElementRef<'_>)) {
    for child in element.children() {
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        match child.value().name() {
            "tr" => f(child),
            "thead" | "tbody" | "tfoot" => collect_rows(child, f),
            _ => {}
        }
    }
}

/// Renders inline code, extending the backtick fence past any runs inside
fn render_code_span(text: &str) -> String {
    // Inline code is white-space: normal in HTML, so runs collapse
    let text = collapse_whitespace(text);
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    let fence = "`".repeat(longest_backtick_run(text) + 1);
    if text.starts_with('`') || text.ends_with('`') {
        format!("{} {} {}", fence, text, fence)
    } else {
        format!("{}{}{}", fence, text, fence)
    }
}

/// Renders a `<pre>` block as a fenced code block
///
/// The language is taken from a `language-*` class on the inner `<code>`
/// element (or the `<pre>` itself).
fn render_code_block(element: ElementRef<'_>) -> String {
    let code = element.text().collect::<String>();
    let code = code.trim_end_matches('\n').trim_start_matches('\n');

    let language = element
        .select(&CODE_SELECTOR)
        .next()
        .map(|c| c.value().classes().collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter()
        .chain(element.value().classes())
        .find_map(|class| class.strip_prefix("language-"))
        .unwrap_or("")
        .to_string();

    let fence = "`".repeat(longest_backtick_run(code).max(2) + 1);
    format!("\n\n{}{}\n{}\n{}\n\n", fence, language, code, fence)
}

fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in text.chars() {
        if ch == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Collapses runs of whitespace into single spaces, as HTML rendering does
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out
}

/// Backslash-escapes markdown control characters in literal text
fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(
            ch,
            '\\' | '`' | '*' | '_' | '[' | ']' | '#' | '|' | '<' | '>'
        ) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Collapses runs of three or more newlines down to a blank line
fn squeeze_newlines(text: String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for ch in text.chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(ch);
            }
        } else {
            newlines = 0;
            out.push(ch);
        }
    }
    out
}

/// Final cleanup: trims trailing spaces, collapses blank-line runs, and
/// strips leading/trailing blank lines. Fenced code blocks pass through
/// untouched.
fn tidy(markdown: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut in_fence = false;

    for raw in markdown.lines() {
        if in_fence {
            lines.push(raw.to_string());
            if raw.trim_start().starts_with("```") {
                in_fence = false;
            }
            continue;
        }

        let line = raw.trim_end();

        if line.trim_start().starts_with("```") {
            in_fence = true;
            lines.push(line.trim_start().to_string());
            continue;
        }

        if line.trim().is_empty() {
            if lines.last().map(|l| l.is_empty()) != Some(true) && !lines.is_empty() {
                lines.push(String::new());
            }
        } else {
            lines.push(collapse_inner_spaces(line));
        }
    }

    while lines.last().map(|l| l.is_empty()) == Some(true) {
        lines.pop();
    }

    lines.join("\n")
}

/// Collapses interior space runs on a line, leaving indentation alone
///
/// Adjacent text nodes each contribute their own boundary space; rendered
/// HTML shows a single one.
fn collapse_inner_spaces(line: &str) -> String {
    let indent_len = line.len() - line.trim_start().len();
    let (indent, rest) = line.split_at(indent_len);

    let mut out = String::with_capacity(line.len());
    out.push_str(indent);
    let mut previous_space = false;
    for ch in rest.chars() {
        if ch == ' ' {
            if !previous_space {
                out.push(ch);
            }
            previous_space = true;
        } else {
            out.push(ch);
            previous_space = false;
        }
    }
    out
}
