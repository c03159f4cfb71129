// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Document representation

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::element::Element;
use super::node::{self, Node, NodeData, NodeId};
use super::selector::Selector;

/// HTML document representation
#[derive(Debug, Clone)]
pub struct Document {
    /// Root node ID
    root_id: NodeId,
    /// Node storage
    pub(crate) nodes: Arc<RwLock<HashMap<NodeId, NodeData>>>,
    /// Head element ID
    head_id: Option<NodeId>,
    /// Body element ID
    body_id: Option<NodeId>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        let root_id = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(root_id, NodeData::document());

        Self {
            root_id,
            nodes: Arc::new(RwLock::new(nodes)),
            head_id: None,
            body_id: None,
        }
    }

    /// Get the root node
    pub fn root(&self) -> Node {
        Node::new(self.root_id, self.nodes.clone())
    }

    /// Get the <head> element
    pub fn head(&self) -> Option<Element> {
        self.head_id
            .and_then(|id| Element::from_id(id, self.nodes.clone()))
    }

    /// Get the <body> element
    pub fn body(&self) -> Option<Element> {
        self.body_id
            .and_then(|id| Element::from_id(id, self.nodes.clone()))
    }

    /// Set head/body element IDs (called during parsing)
    pub(crate) fn set_elements(&mut self, head: Option<NodeId>, body: Option<NodeId>) {
        self.head_id = head;
        self.body_id = body;
    }

    /// Create a detached element in this document
    pub fn create_element(&self, tag: impl Into<String>) -> Element {
        let id = NodeId::new();
        self.nodes.write().insert(id, NodeData::element(tag));
        Element::from_id(id, self.nodes.clone()).expect("created node is an element")
    }

    /// Query selector - find first matching element
    pub fn query_selector(&self, selector: &str) -> Option<Element> {
        self.query_selector_all(selector).into_iter().next()
    }

    /// Query selector all - find all matching elements in document order
    pub fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        let sel = match Selector::parse(selector) {
            Ok(sel) => sel,
            Err(_) => return Vec::new(),
        };

        let mut results = Vec::new();
        for child in self.root().children() {
            collect_matching(&child, &sel, &mut results);
        }
        results
    }

    /// Serialize the whole document back to HTML text
    pub fn to_html(&self) -> String {
        let nodes = self.nodes.read();
        nodes
            .get(&self.root_id)
            .map(|root| {
                root.children
                    .iter()
                    .map(|&id| node::serialize(&nodes, id))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_matching(node: &Node, selector: &Selector, results: &mut Vec<Element>) {
    if selector.matches(node) {
        if let Some(element) = Element::new(node.clone()) {
            results.push(element);
        }
    }
    for child in node.children() {
        collect_matching(&child, selector, results);
    }
}
