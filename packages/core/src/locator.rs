//! Locating a titled section in a flat block list.

use std::ops::Range;

use crate::block::Block;

/// Half-open index range of the blocks that make up one section.
///
/// The first block is always the matching heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    pub start: usize,
    pub end: usize,
}

impl SectionSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Never true for a located span, which holds at least its heading.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, blocks: &'a [Block]) -> &'a [Block] {
        &blocks[self.range()]
    }
}

#[derive(Clone, Copy)]
enum ScanState {
    Searching,
    InSection { start: usize },
}

/// Find the section titled `title`.
///
/// Scans in order: the first heading (any level) whose text equals `title`
/// opens the span, and the next heading of any level or text closes it
/// without being included. Scanning stops once the span closes, so a later
/// section with the same title is never seen.
pub fn locate(blocks: &[Block], title: &str) -> Option<SectionSpan> {
    let mut state = ScanState::Searching;

    for (index, block) in blocks.iter().enumerate() {
        match state {
            ScanState::Searching => {
                if block.is_heading() && block.text == title {
                    state = ScanState::InSection { start: index };
                }
            }
            ScanState::InSection { start } => {
                if block.is_heading() {
                    return Some(SectionSpan { start, end: index });
                }
            }
        }
    }

    match state {
        ScanState::Searching => None,
        ScanState::InSection { start } => Some(SectionSpan {
            start,
            end: blocks.len(),
        }),
    }
}
