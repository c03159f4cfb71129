// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CSS selector parsing and matching
//!
//! Simplified selector implementation for DOM queries: tag, #id, .class,
//! and [attr] / [attr=value] parts, compounded (`link[rel=stylesheet]`).
//! Combinators and pseudo-classes are not supported.

use crate::error::{Error, Result};

use super::node::Node;

/// A parsed CSS selector
#[derive(Debug, Clone)]
pub struct Selector {
    parts: Vec<SelectorPart>,
}

/// A part of a compound selector
#[derive(Debug, Clone)]
enum SelectorPart {
    /// Universal selector (*)
    Universal,
    /// Tag name
    Tag(String),
    /// ID selector (#id)
    Id(String),
    /// Class selector (.class)
    Class(String),
    /// Attribute selector ([attr] or [attr=value])
    Attribute { name: String, value: Option<String> },
}

impl Selector {
    /// Parse a CSS selector string
    pub fn parse(selector: &str) -> Result<Self> {
        let selector = selector.trim();
        if selector.is_empty() {
            return Err(Error::selector(selector, "empty selector"));
        }

        let mut parser = SelectorParser::new(selector);
        parser.parse()
    }

    /// Check if a node matches this selector
    pub fn matches(&self, node: &Node) -> bool {
        if !node.is_element() {
            return false;
        }
        self.parts.iter().all(|part| part_matches(part, node))
    }
}

fn part_matches(part: &SelectorPart, node: &Node) -> bool {
    match part {
        SelectorPart::Universal => true,
        SelectorPart::Tag(tag) => node
            .local_name()
            .map(|name| name.eq_ignore_ascii_case(tag))
            .unwrap_or(false),
        SelectorPart::Id(id) => node
            .get_attribute("id")
            .map(|value| value == *id)
            .unwrap_or(false),
        SelectorPart::Class(class) => node
            .get_attribute("class")
            .map(|value| value.split_whitespace().any(|c| c == class))
            .unwrap_or(false),
        SelectorPart::Attribute { name, value } => match (node.get_attribute(name), value) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == *expected,
            (None, _) => false,
        },
    }
}

/// Simple selector parser
struct SelectorParser {
    input: Vec<char>,
    pos: usize,
}

impl SelectorParser {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    fn parse(&mut self) -> Result<Selector> {
        let mut parts = Vec::new();

        while let Some(c) = self.peek() {
            match c {
                '#' => {
                    self.advance();
                    parts.push(SelectorPart::Id(self.read_identifier()?));
                }
                '.' => {
                    self.advance();
                    parts.push(SelectorPart::Class(self.read_identifier()?));
                }
                '[' => {
                    parts.push(self.parse_attribute()?);
                }
                '*' => {
                    self.advance();
                    parts.push(SelectorPart::Universal);
                }
                c if c.is_alphabetic() || c == '_' || c == '-' => {
                    parts.push(SelectorPart::Tag(self.read_identifier()?.to_lowercase()));
                }
                _ => {
                    return Err(Error::selector(
                        self.input.iter().collect::<String>(),
                        format!("unexpected character '{}'", c),
                    ))
                }
            }
        }

        if parts.is_empty() {
            return Err(Error::selector(
                self.input.iter().collect::<String>(),
                "no selector parts",
            ));
        }

        Ok(Selector { parts })
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        self.pos += 1;
        c
    }

    fn read_identifier(&mut self) -> Result<String> {
        let mut result = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                result.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if result.is_empty() {
            return Err(Error::selector(
                self.input.iter().collect::<String>(),
                "expected identifier",
            ));
        }
        Ok(result)
    }

    fn parse_attribute(&mut self) -> Result<SelectorPart> {
        self.advance(); // consume '['
        let name = self.read_identifier()?.to_lowercase();

        let value = if let Some('=') = self.peek() {
            self.advance();
            Some(self.read_value()?)
        } else {
            None
        };

        match self.advance() {
            Some(']') => Ok(SelectorPart::Attribute { name, value }),
            _ => Err(Error::selector(
                self.input.iter().collect::<String>(),
                "expected ']'",
            )),
        }
    }

    fn read_value(&mut self) -> Result<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.advance();
                let mut result = String::new();
                while let Some(c) = self.advance() {
                    if c == quote {
                        return Ok(result);
                    }
                    result.push(c);
                }
                Err(Error::selector(
                    self.input.iter().collect::<String>(),
                    "unterminated quoted value",
                ))
            }
            _ => self.read_identifier(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn test_selector_parsing() {
        assert!(Selector::parse("script").is_ok());
        assert!(Selector::parse("#app").is_ok());
        assert!(Selector::parse(".btn").is_ok());
        assert!(Selector::parse("[style]").is_ok());
        assert!(Selector::parse("link[rel=stylesheet]").is_ok());
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("a > b").is_err());
    }

    #[test]
    fn test_compound_attribute_match() {
        let doc = parse_html(
            r#"<link rel="stylesheet" href="/a.css"><link rel="icon" href="/i.png">"#,
        )
        .unwrap();

        let sheets = doc.query_selector_all("link[rel=stylesheet]");
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].href(), Some("/a.css".to_string()));
    }

    #[test]
    fn test_attribute_presence_match() {
        let doc = parse_html(r#"<div style="color: red">x</div><div>y</div>"#).unwrap();
        assert_eq!(doc.query_selector_all("[style]").len(), 1);
    }
}
