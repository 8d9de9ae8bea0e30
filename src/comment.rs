//! Comment block extraction.
//!
//! A block opens on any line containing `/**` and closes on the next line
//! containing `*/`. The open check runs first, so a one-line `/** ... */`
//! opens a block that the *next* close marker terminates.

use log::debug;

const OPEN_MARKER: &str = "/**";
const CLOSE_MARKER: &str = "*/";

/// The lines between an open and a close marker, tagged with their source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    /// Lines strictly between the markers, verbatim
    pub lines: Vec<String>,
    /// Identifier of the file the block was found in (the route controller)
    pub source: String,
}

impl CommentBlock {
    /// The classification line, or `""` for an empty block
    pub fn first_line(&self) -> &str {
        self.lines.first().map(String::as_str).unwrap_or("")
    }

    /// Every line after the first
    pub fn body(&self) -> &[String] {
        self.lines.get(1..).unwrap_or(&[])
    }
}

/// Lazy iterator over the comment blocks of one file.
///
/// Call [`extract_blocks`] again to restart from the top of the file.
pub struct CommentBlocks<'a> {
    source: &'a str,
    lines: std::str::Lines<'a>,
    current: Vec<String>,
    inside: bool,
}

/// Scan `content` for comment blocks, tagging each with `source`.
pub fn extract_blocks<'a>(source: &'a str, content: &'a str) -> CommentBlocks<'a> {
    CommentBlocks {
        source,
        lines: content.lines(),
        current: Vec::new(),
        inside: false,
    }
}

impl Iterator for CommentBlocks<'_> {
    type Item = CommentBlock;

    fn next(&mut self) -> Option<CommentBlock> {
        for line in self.lines.by_ref() {
            if line.contains(OPEN_MARKER) {
                if self.inside && !self.current.is_empty() {
                    debug!("Dropping unterminated comment block in {}", self.source);
                }
                self.current.clear();
                self.inside = true;
                continue;
            }
            if self.inside && line.contains(CLOSE_MARKER) {
                self.inside = false;
                return Some(CommentBlock {
                    lines: std::mem::take(&mut self.current),
                    source: self.source.to_string(),
                });
            }
            if self.inside {
                self.current.push(line.to_string());
            }
        }
        None
    }
}
