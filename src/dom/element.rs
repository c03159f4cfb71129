// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Element-specific DOM operations

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::node::{Node, NodeData, NodeId, NodeType};
use super::selector::Selector;

/// Element node with extended operations
#[derive(Debug, Clone)]
pub struct Element {
    /// Inner node reference
    pub node: Node,
}

impl Element {
    /// Create a new element from a node
    pub fn new(node: Node) -> Option<Self> {
        if node.node_type() == NodeType::Element {
            Some(Self { node })
        } else {
            None
        }
    }

    /// Create element from node ID
    pub(crate) fn from_id(
        id: NodeId,
        nodes: Arc<RwLock<HashMap<NodeId, NodeData>>>,
    ) -> Option<Self> {
        Self::new(Node::new(id, nodes))
    }

    /// Get local name (lowercase)
    pub fn local_name(&self) -> String {
        self.node.local_name().unwrap_or_default()
    }

    /// Get an attribute
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.node.get_attribute(name)
    }

    /// Set an attribute
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        self.node.set_attribute(name, value);
    }

    /// Check if has attribute
    pub fn has_attribute(&self, name: &str) -> bool {
        self.node.has_attribute(name)
    }

    /// Get src for scripts
    pub fn src(&self) -> Option<String> {
        self.get_attribute("src")
    }

    /// Get href for links
    pub fn href(&self) -> Option<String> {
        self.get_attribute("href")
    }

    /// Get text content
    pub fn text_content(&self) -> String {
        self.node.text_content()
    }

    /// Get outer HTML
    pub fn outer_html(&self) -> String {
        self.node.outer_html()
    }

    /// Get child elements (only element nodes)
    pub fn children(&self) -> Vec<Element> {
        self.node
            .children()
            .into_iter()
            .filter_map(Element::new)
            .collect()
    }

    /// Query selector all - find all matching elements in this subtree
    pub fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        match Selector::parse(selector) {
            Ok(sel) => {
                let mut results = Vec::new();
                self.collect_matching(&sel, &mut results);
                results
            }
            Err(_) => Vec::new(),
        }
    }

    fn collect_matching(&self, selector: &Selector, results: &mut Vec<Element>) {
        if selector.matches(&self.node) {
            results.push(self.clone());
        }
        for child in self.children() {
            child.collect_matching(selector, results);
        }
    }
}

impl std::ops::Deref for Element {
    type Target = Node;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::parse_html;

    #[test]
    fn test_element_attributes() {
        let doc = parse_html("<script src=\"/app.js\" defer></script>").unwrap();
        let script = doc.query_selector("script").unwrap();

        assert_eq!(script.src(), Some("/app.js".to_string()));
        assert!(script.has_attribute("defer"));
        assert!(!script.has_attribute("integrity"));
    }

    #[test]
    fn test_element_text_content() {
        let doc = parse_html("<style>body { margin: 0; }</style>").unwrap();
        let style = doc.query_selector("style").unwrap();
        assert_eq!(style.text_content(), "body { margin: 0; }");
    }
}
