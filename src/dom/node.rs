// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! DOM node types

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Unique node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Create a new unique node ID
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Document node
    Document,
    /// Element node
    Element,
    /// Text node
    Text,
    /// Comment node
    Comment,
    /// Document type node (<!DOCTYPE>)
    DocumentType,
}

/// Internal node data
///
/// Attributes are an insertion-ordered list, not a map: the serializer
/// must emit the same byte sequence for the same input document on every
/// build, and rewritten attributes (integrity) append at a stable tail
/// position.
#[derive(Debug)]
pub struct NodeData {
    /// Node type
    pub node_type: NodeType,
    /// Tag name (for elements, lowercase)
    pub tag_name: Option<String>,
    /// Text content (for text/comment nodes)
    pub text_content: Option<String>,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Parent node ID
    pub parent: Option<NodeId>,
    /// Child node IDs
    pub children: Vec<NodeId>,
}

impl NodeData {
    /// Create a new element node data
    pub fn element(tag_name: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Element,
            tag_name: Some(tag_name.into().to_lowercase()),
            text_content: None,
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create a new text node data
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Text,
            tag_name: None,
            text_content: Some(content.into()),
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create a new comment node data
    pub fn comment(content: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Comment,
            tag_name: None,
            text_content: Some(content.into()),
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create a new doctype node data
    pub fn doctype() -> Self {
        Self {
            node_type: NodeType::DocumentType,
            tag_name: None,
            text_content: None,
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create a new document node data
    pub fn document() -> Self {
        Self {
            node_type: NodeType::Document,
            tag_name: None,
            text_content: None,
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// A reference to a node in the DOM tree
#[derive(Debug, Clone)]
pub struct Node {
    /// Node ID
    pub id: NodeId,
    /// Reference to document's node storage
    nodes: Arc<RwLock<HashMap<NodeId, NodeData>>>,
}

impl Node {
    /// Create a new node reference
    pub(crate) fn new(id: NodeId, nodes: Arc<RwLock<HashMap<NodeId, NodeData>>>) -> Self {
        Self { id, nodes }
    }

    /// Get the node type
    pub fn node_type(&self) -> NodeType {
        self.nodes
            .read()
            .get(&self.id)
            .map(|n| n.node_type)
            .unwrap_or(NodeType::Element)
    }

    /// Get the tag name in lowercase
    pub fn local_name(&self) -> Option<String> {
        self.nodes
            .read()
            .get(&self.id)
            .and_then(|n| n.tag_name.clone())
    }

    /// Get text content (recursive over children)
    pub fn text_content(&self) -> String {
        let nodes = self.nodes.read();
        collect_text(&nodes, self.id)
    }

    /// Get an attribute value
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        let name = name.to_lowercase();
        self.nodes.read().get(&self.id).and_then(|n| {
            n.attributes
                .iter()
                .find(|(attr, _)| *attr == name)
                .map(|(_, value)| value.clone())
        })
    }

    /// Set an attribute value
    ///
    /// An existing attribute is updated in place (keeping its position);
    /// a new one is appended after the element's current attributes.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_lowercase();
        let value = value.into();
        if let Some(node) = self.nodes.write().get_mut(&self.id) {
            match node.attributes.iter_mut().find(|(attr, _)| *attr == name) {
                Some((_, existing)) => *existing = value,
                None => node.attributes.push((name, value)),
            }
        }
    }

    /// Check if has an attribute
    pub fn has_attribute(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.nodes
            .read()
            .get(&self.id)
            .map(|n| n.attributes.iter().any(|(attr, _)| *attr == name))
            .unwrap_or(false)
    }

    /// Get all attributes in document order
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.nodes
            .read()
            .get(&self.id)
            .map(|n| n.attributes.clone())
            .unwrap_or_default()
    }

    /// Get parent node
    pub fn parent(&self) -> Option<Node> {
        self.nodes
            .read()
            .get(&self.id)
            .and_then(|n| n.parent)
            .map(|id| Node::new(id, self.nodes.clone()))
    }

    /// Get child nodes
    pub fn children(&self) -> Vec<Node> {
        self.nodes
            .read()
            .get(&self.id)
            .map(|n| {
                n.children
                    .iter()
                    .map(|&id| Node::new(id, self.nodes.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        self.node_type() == NodeType::Text
    }

    /// Append a child node
    pub fn append_child(&self, child: &Node) {
        let mut nodes = self.nodes.write();
        detach(&mut nodes, child.id);
        if let Some(child_data) = nodes.get_mut(&child.id) {
            child_data.parent = Some(self.id);
        }
        if let Some(parent_data) = nodes.get_mut(&self.id) {
            parent_data.children.push(child.id);
        }
    }

    /// Insert a child node before the current first child
    pub fn prepend_child(&self, child: &Node) {
        let mut nodes = self.nodes.write();
        detach(&mut nodes, child.id);
        if let Some(child_data) = nodes.get_mut(&child.id) {
            child_data.parent = Some(self.id);
        }
        if let Some(parent_data) = nodes.get_mut(&self.id) {
            parent_data.children.insert(0, child.id);
        }
    }

    /// Get inner HTML
    pub fn inner_html(&self) -> String {
        let nodes = self.nodes.read();
        nodes
            .get(&self.id)
            .map(|node| {
                node.children
                    .iter()
                    .map(|&id| serialize(&nodes, id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get outer HTML
    pub fn outer_html(&self) -> String {
        let nodes = self.nodes.read();
        serialize(&nodes, self.id)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

/// Remove a node from its current parent, if any
fn detach(nodes: &mut HashMap<NodeId, NodeData>, id: NodeId) {
    let old_parent = nodes.get(&id).and_then(|d| d.parent);
    if let Some(parent_id) = old_parent {
        if let Some(parent) = nodes.get_mut(&parent_id) {
            parent.children.retain(|&child| child != id);
        }
    }
}

/// Recursively collect text content
fn collect_text(nodes: &HashMap<NodeId, NodeData>, node_id: NodeId) -> String {
    match nodes.get(&node_id) {
        Some(node) => match node.node_type {
            NodeType::Text => node.text_content.clone().unwrap_or_default(),
            NodeType::Element | NodeType::Document => node
                .children
                .iter()
                .map(|&child_id| collect_text(nodes, child_id))
                .collect(),
            _ => String::new(),
        },
        None => String::new(),
    }
}

/// Serialize a node to HTML text
///
/// Text content is emitted verbatim (script/style payloads must survive
/// unmodified so their digests stay valid); attribute values are escaped.
pub(crate) fn serialize(nodes: &HashMap<NodeId, NodeData>, node_id: NodeId) -> String {
    let node = match nodes.get(&node_id) {
        Some(node) => node,
        None => return String::new(),
    };

    match node.node_type {
        NodeType::Text => node.text_content.clone().unwrap_or_default(),
        NodeType::Comment => {
            format!("<!--{}-->", node.text_content.as_deref().unwrap_or(""))
        }
        NodeType::Element => {
            let tag = node.tag_name.as_deref().unwrap_or("div");
            let attrs: String = node
                .attributes
                .iter()
                .map(|(k, v)| {
                    if v.is_empty() {
                        format!(" {}", k)
                    } else {
                        format!(" {}=\"{}\"", k, escape_attribute(v))
                    }
                })
                .collect();

            const VOID_ELEMENTS: [&str; 14] = [
                "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
                "param", "source", "track", "wbr",
            ];

            if VOID_ELEMENTS.contains(&tag) {
                format!("<{}{}>", tag, attrs)
            } else {
                let children: String = node
                    .children
                    .iter()
                    .map(|&id| serialize(nodes, id))
                    .collect();
                format!("<{}{}>{}</{}>", tag, attrs, children, tag)
            }
        }
        NodeType::Document => node
            .children
            .iter()
            .map(|&id| serialize(nodes, id))
            .collect(),
        NodeType::DocumentType => "<!DOCTYPE html>".to_string(),
    }
}

/// Escape HTML attribute value characters
fn escape_attribute(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_unique() {
        assert_ne!(NodeId::new(), NodeId::new());
    }

    #[test]
    fn test_attribute_order_is_stable() {
        let mut data = NodeData::element("script");
        data.attributes.push(("src".into(), "/app.js".into()));
        data.attributes.push(("defer".into(), String::new()));

        let id = NodeId::new();
        let mut store = HashMap::new();
        store.insert(id, data);

        let html = serialize(&store, id);
        assert_eq!(html, "<script src=\"/app.js\" defer></script>");
    }

    #[test]
    fn test_set_attribute_updates_in_place() {
        let id = NodeId::new();
        let mut data = NodeData::element("script");
        data.attributes.push(("src".into(), "/old.js".into()));
        data.attributes.push(("defer".into(), String::new()));

        let mut store = HashMap::new();
        store.insert(id, data);
        let node = Node::new(id, Arc::new(RwLock::new(store)));

        node.set_attribute("src", "/new.js");
        assert_eq!(
            node.attributes(),
            vec![
                ("src".to_string(), "/new.js".to_string()),
                ("defer".to_string(), String::new())
            ]
        );
    }

    #[test]
    fn test_attribute_escaping() {
        assert_eq!(
            escape_attribute(r#"a"b<c>&d"#),
            "a&quot;b&lt;c&gt;&amp;d"
        );
    }
}
