//! Regex locators for the markers of an Oryx-generated keymap.
//!
//! Every locator returns byte offsets into the searched text and never
//! inspects anything beyond its own match. A `None` means the marker is
//! absent and the corresponding step should be skipped.

use crate::config::DanceConfig;
use regex::{escape, Regex};
use std::ops::Range;

/// A `{ ... };` initializer or enumeration body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BraceBlock {
    /// Offset of the first byte of the whole match.
    pub start: usize,
    /// End of the body with trailing whitespace removed.
    pub content_end: usize,
    /// Offset of the closing `}`.
    pub close: usize,
}

impl BraceBlock {
    fn from_match(content: &str, start: usize, end: usize) -> Self {
        // Every block pattern ends in `};`
        let close = end - 2;
        let content_end = start + content[start..close].trim_end().len();
        Self {
            start,
            content_end,
            close,
        }
    }

    /// Last non-whitespace character before the closing brace.
    pub fn last_char(&self, content: &str) -> Option<char> {
        content[self.start..self.content_end].chars().next_back()
    }
}

/// Compiled marker patterns for one dance configuration.
#[derive(Debug, Clone)]
pub struct Locator {
    enum_block: Regex,
    state_decl: Regex,
    actions_start: Regex,
    actions_block: Regex,
    layout_block: Regex,
}

impl Locator {
    pub fn new(config: &DanceConfig) -> Result<Self, regex::Error> {
        let actions_head = format!(
            r"tap_dance_action_t\s+{}\[\]\s*=\s*\{{",
            escape(&config.actions_table)
        );
        Ok(Self {
            enum_block: Regex::new(&format!(
                r"enum\s+{}\s*\{{[^}}]*\}};",
                escape(&config.enum_name)
            ))?,
            state_decl: Regex::new(&format!(
                r"static\s+{}\s+{}\[(\d+)\];",
                escape(&config.state_type),
                escape(&config.state_array)
            ))?,
            actions_start: Regex::new(&actions_head)?,
            actions_block: Regex::new(&format!(r"{actions_head}[^}}]*\}};"))?,
            layout_block: Regex::new(&format!(
                r"\[{}\]\s*=\s*{}\([^)]*\)",
                config.layer,
                escape(&config.layout_macro)
            ))?,
        })
    }

    /// `enum <name> { ... };`
    pub fn enum_block(&self, content: &str) -> Option<BraceBlock> {
        self.enum_block
            .find(content)
            .map(|m| BraceBlock::from_match(content, m.start(), m.end()))
    }

    /// Span of the integer literal in `static <type> <name>[N];`, with its value.
    ///
    /// Literals too large for `u64` are treated as absent.
    pub fn state_array_size(&self, content: &str) -> Option<(Range<usize>, u64)> {
        let literal = self.state_decl.captures(content)?.get(1)?;
        let value = literal.as_str().parse().ok()?;
        Some((literal.range(), value))
    }

    /// Start of `tap_dance_action_t <name>[] = {`.
    pub fn actions_table_start(&self, content: &str) -> Option<usize> {
        self.actions_start.find(content).map(|m| m.start())
    }

    /// `tap_dance_action_t <name>[] = { ... };`
    pub fn actions_table(&self, content: &str) -> Option<BraceBlock> {
        self.actions_block
            .find(content)
            .map(|m| BraceBlock::from_match(content, m.start(), m.end()))
    }

    /// `[<layer>] = <macro>(` through the first `)` that follows.
    pub fn layout_block(&self, content: &str) -> Option<Range<usize>> {
        self.layout_block.find(content).map(|m| m.range())
    }
}
