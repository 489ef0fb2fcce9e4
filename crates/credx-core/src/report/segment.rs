//! Section segmentation.
//!
//! Sections are zero-copy views into the document text. Two modes exist:
//! a single section between a start label and the nearest end label, and
//! repeated blocks delimited by every occurrence of an anchor label.

use tracing::debug;

/// A contiguous span of the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub label: &'a str,
    source: &'a str,
    pub start: usize,
    pub end: usize,
}

impl<'a> Section<'a> {
    fn new(label: &'a str, source: &'a str, start: usize, end: usize) -> Self {
        Self {
            label,
            source,
            start,
            end,
        }
    }

    pub fn as_str(&self) -> &'a str {
        &self.source[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Text between the first `start_label` and the nearest following end label.
///
/// With no end labels the section runs to the end of the text. Returns
/// `None` if the start label is missing, or if end labels were given and
/// none of them follows the start label.
pub fn section_between<'a>(
    text: &'a str,
    start_label: &'a str,
    end_labels: &[&str],
) -> Option<Section<'a>> {
    let start = text.find(start_label)? + start_label.len();
    let rest = &text[start..];

    let end = if end_labels.is_empty() {
        text.len()
    } else {
        start
            + end_labels
                .iter()
                .filter(|label| !label.is_empty())
                .filter_map(|label| rest.find(label))
                .min()?
    };

    Some(Section::new(start_label, text, start, end))
}

/// Byte offsets of every occurrence of `anchor`, in order.
pub fn anchor_offsets(text: &str, anchor: &str) -> Vec<usize> {
    if anchor.is_empty() {
        return Vec::new();
    }
    text.match_indices(anchor).map(|(offset, _)| offset).collect()
}

/// How a repeated block was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEnd {
    Terminator,
    NextAnchor,
    EndOfText,
}

/// One repeated block and the boundary that closed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub section: Section<'a>,
    pub end: BlockEnd,
}

impl<'a> Block<'a> {
    pub fn as_str(&self) -> &'a str {
        self.section.as_str()
    }
}

/// Split the text into repeated blocks, one per anchor occurrence.
///
/// Without terminators, block *i* spans from anchor *i* to anchor *i+1*
/// (the last block runs to end of text), so blocks partition the text from
/// the first anchor onward. With terminators, each block ends at the first
/// terminator after its anchor, unless the next anchor comes first; a block
/// with no terminator left runs to end of text.
pub fn repeated_blocks<'a>(
    text: &'a str,
    anchor: &'a str,
    terminators: &[&str],
) -> Vec<Block<'a>> {
    let offsets = anchor_offsets(text, anchor);

    let blocks: Vec<Block<'a>> = offsets
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let next = offsets.get(i + 1).copied();
            let body = start + anchor.len();
            let terminator = terminators
                .iter()
                .filter(|t| !t.is_empty())
                .filter_map(|t| text[body..].find(t).map(|pos| body + pos))
                .min();

            let (end, closed_by) = match (terminator, next) {
                (Some(term), Some(next)) if term <= next => (term, BlockEnd::Terminator),
                (Some(term), None) => (term, BlockEnd::Terminator),
                (_, Some(next)) => (next, BlockEnd::NextAnchor),
                (None, None) => (text.len(), BlockEnd::EndOfText),
            };

            Block {
                section: Section::new(anchor, text, start, end),
                end: closed_by,
            }
        })
        .collect();

    debug!("Found {} '{}' blocks", blocks.len(), anchor);
    blocks
}

/// Trimmed lines strictly between an exact `start_line` and the next exact `end_line`.
pub fn line_section<'a>(text: &'a str, start_line: &str, end_line: &str) -> Option<Vec<&'a str>> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let start = lines.iter().position(|l| *l == start_line)?;
    let end = lines[start + 1..].iter().position(|l| *l == end_line)? + start + 1;
    Some(lines[start + 1..end].to_vec())
}
