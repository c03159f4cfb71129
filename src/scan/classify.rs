// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Module classification
//!
//! One classifier produces a closed variant; every downstream decision is
//! a match on it rather than repeated extension sniffing.

/// What kind of source module an identifier names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// A stylesheet (css, scss, sass, less, styl)
    Style,
    /// A script (js, ts and their jsx/module variants)
    Script,
    /// Anything else - ignored by the scanner
    Other,
}

impl ModuleKind {
    /// Check whether this kind participates in hash collection
    pub fn is_scannable(&self) -> bool {
        !matches!(self, ModuleKind::Other)
    }
}

/// Classify a module identifier by file extension
///
/// Pipeline ids may carry query suffixes (`/src/app.css?inline`) and
/// fragment markers; both are stripped before the extension is read.
pub fn classify(id: &str) -> ModuleKind {
    let path = id.split(['?', '#']).next().unwrap_or(id);

    let extension = match path.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return ModuleKind::Other,
    };

    match extension.as_str() {
        "css" | "scss" | "sass" | "less" | "styl" | "stylus" => ModuleKind::Style,
        "js" | "mjs" | "cjs" | "jsx" | "ts" | "mts" | "cts" | "tsx" => ModuleKind::Script,
        _ => ModuleKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_styles() {
        assert_eq!(classify("/src/app.css"), ModuleKind::Style);
        assert_eq!(classify("/src/theme.SCSS"), ModuleKind::Style);
        assert_eq!(classify("/src/button.styl"), ModuleKind::Style);
    }

    #[test]
    fn test_classify_scripts() {
        assert_eq!(classify("/src/main.ts"), ModuleKind::Script);
        assert_eq!(classify("/src/App.tsx"), ModuleKind::Script);
        assert_eq!(classify("/node_modules/lib/index.mjs"), ModuleKind::Script);
    }

    #[test]
    fn test_classify_strips_query_and_fragment() {
        assert_eq!(classify("/src/app.css?inline"), ModuleKind::Style);
        assert_eq!(classify("/src/app.css?used&t=123"), ModuleKind::Style);
        assert_eq!(classify("/src/main.ts#hot"), ModuleKind::Script);
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(classify("/src/logo.svg"), ModuleKind::Other);
        assert_eq!(classify("/src/data.json"), ModuleKind::Other);
        assert_eq!(classify("/src/Makefile"), ModuleKind::Other);
        assert!(!ModuleKind::Other.is_scannable());
    }
}
