//! Line-oriented text to block parser.
//!
//! Each input line is classified on its own, first match wins:
//!
//! | Line                 | Block                           |
//! |----------------------|---------------------------------|
//! | `# t`, `## t`, `### t` | `Heading1`..`Heading3` with `t` |
//! | `1. t`               | `NumberedListItem` (run)        |
//! | `- t` or `* t`       | `BulletedListItem` (run)        |
//! | blank                | nothing                         |
//! | anything else        | `Paragraph` with the whole line |
//!
//! Consecutive plain lines are never merged into one paragraph.

use lazy_static::lazy_static;
use regex::Regex;

use crate::block::{Block, BlockKind};

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"^(#{1,3}) (.+)$").unwrap();
    static ref NUMBERED: Regex = Regex::new(r"^\d+\. (.+)$").unwrap();
    static ref BULLETED: Regex = Regex::new(r"^[-*] (.+)$").unwrap();
}

/// Stateless parser handle, for callers that want to pass a parser around.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextBlockParser;

impl TextBlockParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, text: &str) -> Vec<Block> {
        parse(text)
    }
}

/// Parse raw text into an ordered block sequence.
///
/// Pure and deterministic. No returned block has a remote id.
pub fn parse(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut lines = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .peekable();

    while let Some(line) = lines.next() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(captures) = HEADING.captures(line) {
            // One block per heading line, never grouped.
            if let Some(kind) = BlockKind::heading(captures[1].len()) {
                blocks.push(Block::new(kind, &captures[2]));
                continue;
            }
        }

        if let Some((kind, pattern)) = list_run(line) {
            blocks.push(Block::new(kind.clone(), list_content(pattern, line)));
            while let Some(next) = lines.peek() {
                if !pattern.is_match(next) {
                    break;
                }
                blocks.push(Block::new(kind.clone(), list_content(pattern, next)));
                lines.next();
            }
            continue;
        }

        blocks.push(Block::paragraph(line));
    }

    blocks
}

/// The list kind a line opens, with the pattern its run continues on.
fn list_run(line: &str) -> Option<(BlockKind, &'static Regex)> {
    if NUMBERED.is_match(line) {
        Some((BlockKind::NumberedListItem, &*NUMBERED))
    } else if BULLETED.is_match(line) {
        Some((BlockKind::BulletedListItem, &*BULLETED))
    } else {
        None
    }
}

fn list_content(pattern: &Regex, line: &str) -> String {
    pattern
        .captures(line)
        .map(|captures| captures[1].to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n   \n\t").is_empty());
    }

    #[test]
    fn headings_by_hash_count() {
        assert_eq!(
            parse("# A\n## B\n### C"),
            vec![
                Block::heading1("A"),
                Block::heading2("B"),
                Block::heading3("C")
            ]
        );
    }

    #[test]
    fn four_hashes_is_a_paragraph() {
        assert_eq!(parse("#### deep"), vec![Block::paragraph("#### deep")]);
    }

    #[test]
    fn hash_without_space_is_a_paragraph() {
        assert_eq!(parse("#tag"), vec![Block::paragraph("#tag")]);
        assert_eq!(parse("# "), vec![Block::paragraph("# ")]);
    }

    #[test]
    fn bulleted_run_skips_blank_lines() {
        assert_eq!(
            parse("- a\n- b\n\n- c"),
            vec![
                Block::bulleted("a"),
                Block::bulleted("b"),
                Block::bulleted("c")
            ]
        );
    }

    #[test]
    fn star_bullets() {
        assert_eq!(
            parse("* a\n- b"),
            vec![Block::bulleted("a"), Block::bulleted("b")]
        );
    }

    #[test]
    fn numbered_run_strips_markers() {
        assert_eq!(
            parse("1. first\n2. second\n10. tenth"),
            vec![
                Block::numbered("first"),
                Block::numbered("second"),
                Block::numbered("tenth")
            ]
        );
    }

    #[test]
    fn run_ends_at_different_marker() {
        assert_eq!(
            parse("1. a\n- b"),
            vec![Block::numbered("a"), Block::bulleted("b")]
        );
        assert_eq!(
            parse("- a\n1. b\n- c"),
            vec![
                Block::bulleted("a"),
                Block::numbered("b"),
                Block::bulleted("c")
            ]
        );
    }

    #[test]
    fn paragraphs_are_not_merged() {
        assert_eq!(
            parse("hello\nworld"),
            vec![Block::paragraph("hello"), Block::paragraph("world")]
        );
    }

    #[test]
    fn paragraph_keeps_line_verbatim() {
        assert_eq!(
            parse("  indented - not a list"),
            vec![Block::paragraph("  indented - not a list")]
        );
        assert_eq!(parse("1.no space"), vec![Block::paragraph("1.no space")]);
    }

    #[test]
    fn crlf_input_parses_like_lf() {
        assert_eq!(parse("# A\r\n- b\r\nc\r\n"), parse("# A\n- b\nc\n"));
    }

    #[test]
    fn mixed_document_keeps_line_order() {
        let text = "## Plan\nintro line\n1. step one\n2. step two\n\n- note\n# Next";
        assert_eq!(
            parse(text),
            vec![
                Block::heading2("Plan"),
                Block::paragraph("intro line"),
                Block::numbered("step one"),
                Block::numbered("step two"),
                Block::bulleted("note"),
                Block::heading1("Next"),
            ]
        );
    }

    #[test]
    fn parse_is_deterministic() {
        let text = "# T\n- a\nplain\n3. x";
        assert_eq!(parse(text), parse(text));
    }

    #[test]
    fn parsed_blocks_have_no_remote_id() {
        assert!(parse("# a\n- b\nc\n1. d")
            .iter()
            .all(|block| block.remote_id.is_none()));
    }

    #[test]
    fn parser_handle_delegates() {
        assert_eq!(TextBlockParser::new().parse("x"), vec![Block::paragraph("x")]);
    }
}
