// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! DOM engine for HTML scanning and rewriting
//!
//! A small addressable tree over html5ever's parser: enough structure to
//! walk script/style elements, rewrite attributes, prepend the policy meta
//! tag, and re-serialize deterministically. Attribute order survives the
//! round-trip, so unchanged documents serialize byte-identically across
//! builds.

mod document;
mod element;
mod node;
mod parser;
mod selector;

pub use document::Document;
pub use element::Element;
pub use node::{Node, NodeId, NodeType};
pub use parser::parse_html;
pub use selector::Selector;
