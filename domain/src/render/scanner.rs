//! Fenced code block scanner.

use super::{PLOT_DIRECTIVE, PLOT_LIBRARY};

/// Marker that opens a candidate block.
pub const OPEN_FENCE: &str = "```python";

/// Marker that closes a block.
pub const CLOSE_FENCE: &str = "```";

/// A fenced block located in a text.
///
/// `start..end` spans from the opening marker through the closing fence;
/// `body` is everything between the two markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeBlock<'a> {
    pub start: usize,
    pub end: usize,
    pub body: &'a str,
}

/// Find every closed ```` ```python ```` block, left to right.
///
/// Scanning stops at the first opening marker without a matching closing
/// fence, which is the normal state of a block still being streamed.
pub fn find_code_blocks(text: &str) -> Vec<CodeBlock<'_>> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(OPEN_FENCE) {
        let start = cursor + offset;
        let body_start = start + OPEN_FENCE.len();
        let Some(close) = text[body_start..].find(CLOSE_FENCE) else {
            break;
        };
        let body_end = body_start + close;
        let end = body_end + CLOSE_FENCE.len();

        blocks.push(CodeBlock {
            start,
            end,
            body: &text[body_start..body_end],
        });
        cursor = end;
    }

    blocks
}

/// True if the block enables inline plotting and uses the plotting library.
///
/// The library reference must appear outside the directive line itself.
pub fn is_plot_block(body: &str) -> bool {
    let mut has_directive = false;
    let mut uses_library = false;

    for line in body.lines() {
        if line.trim() == PLOT_DIRECTIVE {
            has_directive = true;
        } else if line.contains(PLOT_LIBRARY) {
            uses_library = true;
        }
    }

    has_directive && uses_library
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLOT: &str = "```python\n%matplotlib inline\nimport matplotlib.pyplot as plt\nplt.plot([1, 2])\n```";

    #[test]
    fn test_finds_single_block() {
        let text = format!("Here:\n{PLOT}\nDone.");
        let blocks = find_code_blocks(&text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(&text[blocks[0].start..blocks[0].end], PLOT);
        assert!(blocks[0].body.contains("plt.plot"));
    }

    #[test]
    fn test_unclosed_block_stops_scan() {
        let text = format!("{PLOT}\n```python\nprint(1)\n");
        assert_eq!(find_code_blocks(&text).len(), 1);
    }

    #[test]
    fn test_other_languages_are_ignored() {
        let text = "```rust\nfn main() {}\n```\n";
        assert!(find_code_blocks(text).is_empty());
    }

    #[test]
    fn test_multiple_blocks_in_order() {
        let text = "```python\na = 1\n```\ntext\n```python\nb = 2\n```";
        let blocks = find_code_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].end <= blocks[1].start);
        assert_eq!(blocks[1].body, "\nb = 2\n");
    }

    #[test]
    fn test_plot_block_requires_directive_and_library() {
        assert!(is_plot_block(
            "\n%matplotlib inline\nimport matplotlib.pyplot as plt\n"
        ));
        assert!(!is_plot_block("\nimport matplotlib.pyplot as plt\n"));
        assert!(!is_plot_block("\n%matplotlib inline\nprint('no plot')\n"));
    }
}
