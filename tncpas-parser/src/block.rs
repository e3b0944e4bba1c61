//! Metadata block extraction.
//!
//! A block opens at a `###METADATA` marker (legacy posts also used
//! `###SCRAPEDATA`) and runs until the next `###` delimiter, or the end of
//! the input when there is none. Within the block, `{- ... -}` comment spans
//! are removed and every `>>>` token starts a new logical record line.

use crate::error::Error;

const BLOCK_MARKERS: [&str; 2] = ["###METADATA", "###SCRAPEDATA"];
const DELIMITER: &str = "###";
const RECORD_SEPARATOR: &str = ">>>";
const COMMENT_OPEN: &str = "{-";
const COMMENT_CLOSE: &str = "-}";

/// Extract the candidate record lines of the first metadata block in `input`.
///
/// Each returned line is trimmed and non-empty, shaped `CODE>>value`,
/// possibly still carrying a leading `>>>`. The block's own marker remnant is
/// not included.
pub(crate) fn extract(input: &str) -> Result<Vec<String>, Error> {
    let start = BLOCK_MARKERS
        .iter()
        .filter_map(|marker| input.find(marker))
        .min()
        .ok_or(Error::NoMetadataBlockFound)?;

    // Content between the opening marker's "###" and the next "###"; the
    // marker word itself stays and is dropped below as the header remnant.
    let block = &input[start + DELIMITER.len()..];
    let content = match block.find(DELIMITER) {
        Some(end) => &block[..end],
        None => block,
    };

    let content = strip_comments(content);
    let broken = content.trim().replace(RECORD_SEPARATOR, "\n>>>");

    let mut lines: Vec<String> = broken
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect();
    if !lines.is_empty() {
        lines.remove(0);
    }
    tracing::trace!(records = lines.len(), "extracted metadata block");
    Ok(lines)
}

// Remove `{- ... -}` spans (non-greedy, may cross record and line
// boundaries), swallowing a single optional whitespace character on either
// side. An unterminated opener is left untouched.
fn strip_comments(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find(COMMENT_OPEN) {
        let Some(close) = rest[open + COMMENT_OPEN.len()..].find(COMMENT_CLOSE) else {
            break;
        };
        let mut head = &rest[..open];
        if let Some(ch) = head.chars().next_back() {
            if ch.is_whitespace() {
                head = &head[..head.len() - ch.len_utf8()];
            }
        }
        output.push_str(head);
        let mut tail = &rest[open + COMMENT_OPEN.len() + close + COMMENT_CLOSE.len()..];
        if let Some(ch) = tail.chars().next() {
            if ch.is_whitespace() {
                tail = &tail[ch.len_utf8()..];
            }
        }
        rest = tail;
    }
    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extracts_records_from_surrounding_text() {
        let input = "hello everyone!\n###METADATA\n>>>THM>>Spring Fest\n>>>MAX>>10\n###\nsee you";
        assert_eq!(
            extract(input).unwrap(),
            vec![">>>THM>>Spring Fest", ">>>MAX>>10"]
        );
    }

    #[test]
    fn test_no_marker_fails() {
        assert_eq!(
            extract("just a regular post").unwrap_err(),
            Error::NoMetadataBlockFound
        );
    }

    #[test]
    fn test_legacy_scrapedata_marker() {
        let input = "###SCRAPEDATA\n>>>THM>>Old Days\n###";
        assert_eq!(extract(input).unwrap(), vec![">>>THM>>Old Days"]);
    }

    #[test]
    fn test_block_without_closing_delimiter_runs_to_end() {
        let input = "intro ###METADATA\n>>>THM>>Open Ended";
        assert_eq!(extract(input).unwrap(), vec![">>>THM>>Open Ended"]);
    }

    #[test]
    fn test_records_on_one_physical_line() {
        let input = "###METADATA >>>THM>>Fest>>>MAX>>10###";
        assert_eq!(extract(input).unwrap(), vec![">>>THM>>Fest", ">>>MAX>>10"]);
    }

    #[test]
    fn test_comments_are_removed() {
        let input = "###METADATA\n>>>THM>>Fest {-the usual-}\n>>>MAX>>10\n###";
        assert_eq!(extract(input).unwrap(), vec![">>>THM>>Fest", ">>>MAX>>10"]);
    }

    #[test]
    fn test_comment_spanning_records_is_atomic() {
        let input = "###METADATA\n>>>THM>>Fest{- scratch that\n>>>MAX>>99 -}\n>>>MAX>>10\n###";
        assert_eq!(extract(input).unwrap(), vec![">>>THM>>Fest", ">>>MAX>>10"]);
    }

    #[test]
    fn test_unterminated_comment_is_left_alone() {
        let input = "###METADATA\n>>>THM>>Fest {-oops\n###";
        assert_eq!(extract(input).unwrap(), vec![">>>THM>>Fest {-oops"]);
    }

    #[test]
    fn test_first_marker_by_position_wins() {
        let input = "###SCRAPEDATA\n>>>THM>>First\n###\n###METADATA\n>>>THM>>Second\n###";
        assert_eq!(extract(input).unwrap(), vec![">>>THM>>First"]);
    }

    #[test]
    fn test_empty_block_yields_no_records() {
        assert_eq!(extract("###METADATA###").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_strip_comments_swallows_one_whitespace_each_side() {
        assert_eq!(strip_comments("a {-x-} b"), "ab");
        assert_eq!(strip_comments("a  {-x-}  b"), "a  b");
    }
}
