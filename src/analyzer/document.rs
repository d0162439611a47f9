// src/analyzer/document.rs
// =============================================================================
// This module extracts structural features from an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a tree of nodes (doctype, elements, text, comments...)
// - Never fails: broken markup still produces a best-effort tree
// - Is built on html5ever (Mozilla's HTML parser)
//
// One pre-order walk over the tree collects everything we need:
// - The HTML version (set when a doctype node is seen)
// - The page title (the LAST <title> wins)
// - How many h1..h6 headings there are
// - Whether any <form> holds a password input (a login form)
// - Every non-empty href in document order
//
// Rust concepts:
// - Enums with data: scraper's Node is an enum we match on
// - Iterators: descendants() walks the tree without recursion
// - BTreeMap: A sorted map, so headings print as h1, h2, h3...
// =============================================================================

use scraper::{Html, Node};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// The HTML version marker
//
// html5ever normalizes every doctype (HTML5, HTML 4.01, XHTML...) into the
// same kind of node, so the only thing we can report is "there was one".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HtmlVersion {
    #[serde(rename = "HTML5")]
    Html5,
}

impl fmt::Display for HtmlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HtmlVersion::Html5 => write!(f, "HTML5"),
        }
    }
}

/// Everything the walk learns about a page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructuralFeatures {
    /// Set once a doctype node is observed
    pub html_version: Option<HtmlVersion>,
    /// Text of the last <title> element, whitespace kept verbatim
    pub title: Option<String>,
    /// Heading tag (h1..h6) -> number of occurrences
    pub headings: BTreeMap<String, usize>,
    /// True if any form contains an <input type="password">
    pub has_login_form: bool,
    /// Non-empty href values, in document order
    pub raw_links: Vec<String>,
}

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

// Parses HTML and extracts its structural features
//
// Parameters:
//   html: the page body as text
//
// Returns: StructuralFeatures for the page (never fails)
//
// Example:
//   html = "<title>Home</title><h1>Hi</h1><a href='/docs'>Docs</a>"
//   result.title = Some("Home"), headings = {"h1": 1}, raw_links = ["/docs"]
pub fn extract_features(html: &str) -> StructuralFeatures {
    let document = Html::parse_document(html);
    let mut features = StructuralFeatures::default();

    // descendants() yields the root first, then every node in document
    // (pre-)order: parent before children, children left to right
    for node in document.tree.root().descendants() {
        match node.value() {
            Node::Doctype(_) => {
                features.html_version = Some(HtmlVersion::Html5);
            }
            Node::Element(element) => match element.name() {
                "title" => {
                    // Only a text first child counts as the title
                    if let Some(text) = node
                        .first_child()
                        .and_then(|child| child.value().as_text())
                    {
                        features.title = Some(text.to_string());
                    }
                }
                name if HEADING_TAGS.contains(&name) => {
                    *features.headings.entry(name.to_string()).or_insert(0) += 1;
                }
                "a" => {
                    for (key, value) in element.attrs() {
                        if key == "href" && !value.is_empty() {
                            features.raw_links.push(value.to_string());
                        }
                    }
                }
                "form" => {
                    // Stop scanning forms once one login form has been found
                    if !features.has_login_form {
                        features.has_login_form =
                            contains_password_input(node.descendants().map(|n| n.value()));
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    features
}

// Checks a run of nodes (usually a form's whole subtree) for a password input
//
// The type attribute is compared case-insensitively, so
// <input type="PASSWORD"> counts too.
pub fn contains_password_input<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> bool {
    nodes.into_iter().any(|node| match node {
        Node::Element(element) if element.name() == "input" => element
            .attrs()
            .any(|(key, value)| key == "type" && value.eq_ignore_ascii_case("password")),
        _ => false,
    })
}
