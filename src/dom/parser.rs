// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML parser using html5ever

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use super::document::Document;
use super::node::{NodeData, NodeId};
use crate::error::{Error, Result};

/// Parse HTML string into a Document
pub fn parse_html(html: &str) -> Result<Document> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: false,
            ..Default::default()
        },
        ..Default::default()
    };

    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| Error::html_parse(e.to_string()))?;

    let mut doc = Document::new();
    let converter = DomConverter::new(&mut doc);
    converter.convert(&dom.document);

    Ok(doc)
}

/// Converts html5ever DOM to our DOM
struct DomConverter<'a> {
    doc: &'a mut Document,
}

impl<'a> DomConverter<'a> {
    fn new(doc: &'a mut Document) -> Self {
        Self { doc }
    }

    fn convert(mut self, handle: &Handle) {
        let root_id = self.doc.root().id;

        let mut html_id = None;
        for child in handle.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, root_id) {
                if self.tag_of(id).as_deref() == Some("html") {
                    html_id = Some(id);
                }
            }
        }

        // Locate head and body inside <html>
        let mut head_id = None;
        let mut body_id = None;
        if let Some(html) = html_id {
            let nodes = self.doc.nodes.read();
            if let Some(html_data) = nodes.get(&html) {
                for &child_id in &html_data.children {
                    match nodes.get(&child_id).and_then(|c| c.tag_name.as_deref()) {
                        Some("head") => head_id = Some(child_id),
                        Some("body") => body_id = Some(child_id),
                        _ => {}
                    }
                }
            }
        }

        self.doc.set_elements(head_id, body_id);
    }

    fn tag_of(&self, id: NodeId) -> Option<String> {
        self.doc
            .nodes
            .read()
            .get(&id)
            .and_then(|n| n.tag_name.clone())
    }

    fn convert_node(&mut self, handle: &Handle, parent_id: NodeId) -> Option<NodeId> {
        let node_data = match handle.data {
            RcNodeData::Document => return None,
            RcNodeData::Doctype { .. } => NodeData::doctype(),
            RcNodeData::Text { ref contents } => {
                let text = contents.borrow().to_string();
                if text.trim().is_empty() && text.len() > 1 {
                    // Skip whitespace-only text nodes (but keep single spaces)
                    return None;
                }
                NodeData::text(text)
            }
            RcNodeData::Comment { ref contents } => NodeData::comment(contents.to_string()),
            RcNodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                let mut data = NodeData::element(name.local.to_string());

                // Attributes in document order
                for attr in attrs.borrow().iter() {
                    data.attributes
                        .push((attr.name.local.to_string().to_lowercase(), attr.value.to_string()));
                }

                data
            }
            RcNodeData::ProcessingInstruction { .. } => return None,
        };

        let node_id = NodeId::new();
        {
            let mut nodes = self.doc.nodes.write();
            let mut data = node_data;
            data.parent = Some(parent_id);
            nodes.insert(node_id, data);
            if let Some(parent) = nodes.get_mut(&parent_id) {
                parent.children.push(node_id);
            }
        }

        for child in handle.children.borrow().iter() {
            self.convert_node(child, node_id);
        }

        Some(node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_html() {
        let doc = parse_html("<html><body><p>Hello</p></body></html>").unwrap();
        assert!(doc.body().is_some());
    }

    #[test]
    fn test_parse_with_attributes() {
        let doc = parse_html("<div id=\"test\" class=\"foo bar\">content</div>").unwrap();
        let div = doc.query_selector("div").unwrap();
        assert_eq!(div.get_attribute("id"), Some("test".to_string()));
        assert_eq!(div.get_attribute("class"), Some("foo bar".to_string()));
    }

    #[test]
    fn test_parse_preserves_inline_script_text() {
        let doc = parse_html("<html><body><script>alert(1)</script></body></html>").unwrap();
        let script = doc.query_selector("script").unwrap();
        assert_eq!(script.text_content(), "alert(1)");
    }

    #[test]
    fn test_parse_full_document() {
        let html = r#"
            <!DOCTYPE html>
            <html>
            <head>
                <title>Test Page</title>
                <link rel="stylesheet" href="/assets/index.css">
            </head>
            <body>
                <div id="app"></div>
                <script type="module" src="/assets/index.js"></script>
            </body>
            </html>
        "#;
        let doc = parse_html(html).unwrap();

        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
        assert_eq!(doc.query_selector_all("script").len(), 1);
        assert_eq!(doc.query_selector_all("link[rel=stylesheet]").len(), 1);
    }
}
