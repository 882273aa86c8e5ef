//! Sanitizer - strips non-content elements before conversion
//!
//! Produces a cleaned copy of the located content subtree by serializing it
//! while skipping excluded nodes. Scripts, styles, and noscript blocks are
//! always dropped; navigation furniture, tables, and images go according to
//! policy. The source document itself is never touched.

use crate::policy::CrawlPolicy;
use ego_tree::NodeId;
use scraper::{ElementRef, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Elements that are never content
static NOISE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["script", "style", "noscript"]
        .iter()
        .map(|s| Selector::parse(s).expect("hardcoded noise selector is valid"))
        .collect()
});

/// Page furniture removed when only the main content is wanted
///
/// Semantic region elements plus the class vocabulary sites use for
/// navigation chrome.
static FURNITURE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "nav",
        "footer",
        "aside",
        "header",
        ".nav",
        ".navigation",
        ".sidebar",
        ".footer",
        ".header",
        ".menu",
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("hardcoded furniture selector is valid"))
    .collect()
});

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("hardcoded selector 'table' is valid"));

static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("hardcoded selector 'img' is valid"));

/// Void elements serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Cleans the content subtree according to policy
///
/// Returns the cleaned HTML of `root`'s children as a new string; `root`
/// itself (typically `<body>` or `<main>`) is not part of the output.
///
/// Removal rules:
/// - `script`/`style`/`noscript` and HTML comments: always
/// - navigation/footer/aside/header and furniture classes: when
///   `policy.only_main_content`
/// - `table`: when `!policy.extract_tables`
/// - `img`: when `!policy.extract_images && policy.remove_images`. Both
///   flags are required on purpose: `extract_images` decides whether images
///   are content, `remove_images` is the presentation-side suppression
///   toggle, and only the two together drop the elements themselves.
pub fn sanitize(root: ElementRef<'_>, policy: &CrawlPolicy) -> String {
    let mut to_remove: HashSet<NodeId> = HashSet::new();

    for selector in NOISE_SELECTORS.iter() {
        for element in root.select(selector) {
            to_remove.insert(element.id());
        }
    }

    if policy.only_main_content {
        for selector in FURNITURE_SELECTORS.iter() {
            for element in root.select(selector) {
                to_remove.insert(element.id());
            }
        }
    }

    if !policy.extract_tables {
        for element in root.select(&TABLE_SELECTOR) {
            to_remove.insert(element.id());
        }
    }

    if !policy.extract_images && policy.remove_images {
        for element in root.select(&IMG_SELECTOR) {
            to_remove.insert(element.id());
        }
    }

    let mut output = String::new();
    serialize_excluding(root, &to_remove, &mut output);
    output
}

/// Serializes an element's children, skipping excluded subtrees
///
/// Text and attribute values are re-escaped so the output parses back to
/// the same content. Comments are dropped.
fn serialize_excluding(element: ElementRef<'_>, to_remove: &HashSet<NodeId>, output: &mut String) {
    use scraper::node::Node;

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                push_escaped_text(text, output);
            }
            Node::Element(_) => {
                let Some(child_elem) = ElementRef::wrap(child) else {
                    continue;
                };

                if to_remove.contains(&child_elem.id()) {
                    continue;
                }

                let name = child_elem.value().name();
                output.push('<');
                output.push_str(name);
                for (attr, value) in child_elem.value().attrs() {
                    output.push(' ');
                    output.push_str(attr);
                    output.push_str("=\"");
                    push_escaped_attr(value, output);
                    output.push('"');
                }
                output.push('>');

                if VOID_ELEMENTS.contains(&name) {
                    continue;
                }

                serialize_excluding(child_elem, to_remove, output);

                output.push_str("</");
                output.push_str(name);
                output.push('>');
            }
            // Comments and other node kinds carry no content
            _ => {}
        }
    }
}

fn push_escaped_text(text: &str, output: &mut String) {
    for ch in text.chars() {
        match ch {
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '&' => output.push_str("&amp;"),
            c => output.push(c),
        }
    }
}

fn push_escaped_attr(value: &str, output: &mut String) {
    for ch in value.chars() {
        match ch {
            '"' => output.push_str("&quot;"),
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            c => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::locator::locate;
    use scraper::Html;

    fn sanitize_doc(html: &str, policy: &CrawlPolicy) -> String {
        let document = Html::parse_document(html);
        let root = locate(&document, policy.only_main_content);
        sanitize(root, policy)
    }

    fn policy() -> CrawlPolicy {
        CrawlPolicy::for_url("https://example.com/")
    }

    #[test]
    fn test_always_removes_scripts_and_styles() {
        let mut p = policy();
        p.only_main_content = false;
        let html = r#"<html><body><script>alert(1)</script><style>p{}</style><noscript>no</noscript><p>Content</p></body></html>"#;
        let cleaned = sanitize_doc(html, &p);
        assert!(!cleaned.contains("alert"));
        assert!(!cleaned.contains("p{}"));
        assert!(!cleaned.contains("no</noscript>"));
        assert!(cleaned.contains("<p>Content</p>"));
    }

    #[test]
    fn test_removes_furniture_when_main_content_only() {
        let html = r#"<html><body><nav>menu</nav><header>top</header><div class="sidebar">side</div><p>Content</p><footer>bottom</footer></body></html>"#;
        let cleaned = sanitize_doc(html, &policy());
        assert!(!cleaned.contains("menu"));
        assert!(!cleaned.contains("top"));
        assert!(!cleaned.contains("side"));
        assert!(!cleaned.contains("bottom"));
        assert!(cleaned.contains("Content"));
    }

    #[test]
    fn test_keeps_furniture_for_full_page() {
        let mut p = policy();
        p.only_main_content = false;
        let html = r#"<html><body><nav>menu</nav><p>Content</p></body></html>"#;
        let cleaned = sanitize_doc(html, &p);
        assert!(cleaned.contains("menu"));
        assert!(cleaned.contains("Content"));
    }

    #[test]
    fn test_removes_tables_when_disabled() {
        let mut p = policy();
        p.extract_tables = false;
        let html =
            r#"<html><body><main><table><tr><td>cell</td></tr></table><p>Text</p></main></body></html>"#;
        let cleaned = sanitize_doc(html, &p);
        assert!(!cleaned.contains("cell"));
        assert!(cleaned.contains("Text"));
    }

    #[test]
    fn test_image_dual_gate_requires_both_flags() {
        let html = r#"<html><body><main><img src="a.png" alt="pic"><p>Text</p></main></body></html>"#;

        // extract off, remove off: kept
        let mut p = policy();
        p.extract_images = false;
        assert!(sanitize_doc(html, &p).contains("<img"));

        // extract on, remove on: kept
        let mut p = policy();
        p.remove_images = true;
        assert!(sanitize_doc(html, &p).contains("<img"));

        // both gates set: dropped
        let mut p = policy();
        p.extract_images = false;
        p.remove_images = true;
        assert!(!sanitize_doc(html, &p).contains("<img"));
    }

    #[test]
    fn test_drops_comments() {
        let mut p = policy();
        p.only_main_content = false;
        let html = r#"<html><body><!-- secret --><p>Content</p></body></html>"#;
        let cleaned = sanitize_doc(html, &p);
        assert!(!cleaned.contains("secret"));
    }

    #[test]
    fn test_preserves_nested_structure_and_attributes() {
        let html = r#"<html><body><main><div class="x"><p>Nested <strong>content</strong></p></div></main></body></html>"#;
        let cleaned = sanitize_doc(html, &policy());
        assert!(cleaned.contains(r#"<div class="x">"#));
        assert!(cleaned.contains("<strong>content</strong>"));
    }

    #[test]
    fn test_escapes_text_roundtrip() {
        let html = r#"<html><body><main><p>5 &lt; 10 &amp; 10 &gt; 5</p></main></body></html>"#;
        let cleaned = sanitize_doc(html, &policy());
        assert!(cleaned.contains("5 &lt; 10 &amp; 10 &gt; 5"));
    }

    #[test]
    fn test_void_elements_not_closed() {
        let html = r#"<html><body><main><p>a<br>b</p><hr></main></body></html>"#;
        let cleaned = sanitize_doc(html, &policy());
        assert!(cleaned.contains("<br>"));
        assert!(!cleaned.contains("</br>"));
        assert!(!cleaned.contains("</hr>"));
    }

    #[test]
    fn test_source_document_unchanged() {
        let source = r#"<html><body><main><script>x</script><p>Content</p></main></body></html>"#;
        let document = Html::parse_document(source);
        let before = document.root_element().html();
        let root = locate(&document, true);
        let _ = sanitize(root, &policy());
        assert_eq!(document.root_element().html(), before);
    }
}
