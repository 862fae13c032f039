//! Row-level operations on tab content.
//!
//! Every function here takes the current content and returns the new
//! content. None of them can fail: malformed text goes in, best-effort
//! text comes out.

use crate::block::{blocks, join_blocks, BLOCK_SEPARATOR};
use crate::template::{generate_row, FILLER};
use crate::{DeviceClass, Instrument, StringLabel};

/// Detects the string labels of the first block.
///
/// Reads the first `instrument.string_count()` lines and takes everything
/// before the first filler character of each. A line with no filler is
/// its own label. The line count is a policy constant, so content whose
/// first block is shorter yields labels taken from blank lines or from
/// the next block.
pub fn extract_string_labels(content: &str, instrument: Instrument) -> Vec<StringLabel> {
    content
        .split('\n')
        .take(instrument.string_count())
        .map(|line| StringLabel::new(line.split(FILLER).next().unwrap_or(line)))
        .collect()
}

/// Appends one blank row using the labels found in `content`.
///
/// Empty content still receives the leading separator.
pub fn add_row(content: &str, instrument: Instrument, device: DeviceClass) -> String {
    let labels = extract_string_labels(content, instrument);
    let row = generate_row(&labels, device);
    tracing::debug!(%instrument, %device, strings = labels.len(), "appending row");
    format!("{content}{BLOCK_SEPARATOR}{row}")
}

/// Drops the last block and rejoins the rest with canonical separators.
///
/// With fewer than two blocks the content is returned unchanged: the
/// last remaining row cannot be deleted.
pub fn delete_last_row(content: &str) -> String {
    let mut parsed = blocks(content);
    if parsed.len() < 2 {
        tracing::debug!(blocks = parsed.len(), "refusing to delete last row");
        return content.to_string();
    }

    parsed.pop();
    tracing::debug!(remaining = parsed.len(), "deleted last row");
    join_blocks(&parsed)
}

/// A single blank row with the instrument's canonical labels.
pub fn reset_content(instrument: Instrument, device: DeviceClass) -> String {
    generate_row(&instrument.default_labels(), device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::block_count;

    #[test]
    fn test_extract_from_default_guitar() {
        let content = reset_content(Instrument::Guitar, DeviceClass::Narrow);
        let labels = extract_string_labels(&content, Instrument::Guitar);
        assert_eq!(labels, Instrument::Guitar.default_labels());
    }

    #[test]
    fn test_extract_keeps_edited_labels() {
        let content = "d|--0--\nA|--2--\nD|--2--\nG|--0--\n\nd|-----";
        let labels = extract_string_labels(content, Instrument::Bass);
        assert_eq!(labels, StringLabel::list(&["d|", "A|", "D|", "G|"]));
    }

    #[test]
    fn test_extract_line_without_filler() {
        let labels = extract_string_labels("Intro\ne|---", Instrument::Guitar);
        assert_eq!(labels, StringLabel::list(&["Intro", "e|"]));
    }

    #[test]
    fn test_extract_stops_at_first_filler() {
        // Notes between dashes are not part of the label.
        let labels = extract_string_labels("e|--3--5--", Instrument::Bass);
        assert_eq!(labels, StringLabel::list(&["e|"]));
    }

    #[test]
    fn test_extract_short_content_reads_past_block() {
        let content = "G|----\nD|----\n\nA|----";
        let labels = extract_string_labels(content, Instrument::Bass);
        assert_eq!(labels, StringLabel::list(&["G|", "D|", "", "A|"]));
    }

    #[test]
    fn test_add_row_uses_detected_labels() {
        let content = "x|--\ny|--\nz|--\nw|--";
        let grown = add_row(content, Instrument::Bass, DeviceClass::Narrow);

        let dashes = "-".repeat(36);
        let expected = format!("{content}\n\nx|{dashes}\ny|{dashes}\nz|{dashes}\nw|{dashes}");
        assert_eq!(grown, expected);
    }

    #[test]
    fn test_add_row_on_empty_content_keeps_separator() {
        let grown = add_row("", Instrument::Bass, DeviceClass::Wide);
        assert!(grown.starts_with("\n\n"));
        assert_eq!(block_count(&grown), 1);
    }

    #[test]
    fn test_delete_single_block_is_noop() {
        let content = "  e|-----\nB|-----\n\n\n";
        assert_eq!(delete_last_row(content), content);
        assert_eq!(delete_last_row(&delete_last_row(content)), content);
    }

    #[test]
    fn test_delete_normalizes_separators() {
        let content = "a|--\n \n\n\nb|--\n\n\t\nc|--\n";
        assert_eq!(delete_last_row(content), "a|--\n\nb|--");
    }

    #[test]
    fn test_delete_keeps_free_text_edits() {
        let content = "e|--0--  palm mute\nB|--1--\n\ne|-----\nB|-----";
        assert_eq!(delete_last_row(content), "e|--0--  palm mute\nB|--1--");
    }

    #[test]
    fn test_reset_is_idempotent() {
        let once = reset_content(Instrument::Bass, DeviceClass::Wide);
        let twice = reset_content(Instrument::Bass, DeviceClass::Wide);
        assert_eq!(once, twice);
        assert_eq!(block_count(&once), 1);
    }
}
