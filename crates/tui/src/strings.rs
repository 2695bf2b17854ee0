// Centralized UI strings and labels. ASCII-friendly by default.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

// UI block titles (keep surrounding spaces for visual padding)
pub const TITLE_FORM: &str = " Shorten a long URL ";
pub const TITLE_RESULT: &str = " Your Mini URL ";
pub const TITLE_HISTORY: &str = " Recent Mini URLs ";

pub const LABEL_URL: &str = "Long URL";
pub const LABEL_ALIAS: &str = "Alias";
pub const LABEL_TAGS: &str = "Tags";
pub const LABEL_EXPIRES: &str = "Expires at";
pub const LABEL_DESCRIPTION: &str = "Description";

pub const SUBMIT_READY: &str = "[ Enter: Shorten URL ]";
pub const SUBMIT_LOADING: &str = "[ Loading... ]";

pub const NOTICE_COPIED: &str = "Copied to clipboard!";
pub const HISTORY_EMPTY: &str = "Nothing shortened yet.";

pub const HINT_RESULT: &str = "C: copy    N or Enter: shorten another    F2: history";
pub const HINT_HISTORY: &str = "Up/Down: select    Enter or C: copy";

pub fn history_original(url: &str) -> String {
    format!("Original: {}", url)
}

pub fn history_created(ts: &str) -> String {
    format!("Created: {}", ts)
}

// Build the status bar line with width-aware compaction: segments are
// appended in order of importance until the width runs out.
pub fn build_status_line(
    loading: bool,
    history_len: usize,
    notice: Option<&str>,
    max_width: u16,
) -> String {
    let mut segments: Vec<String> = Vec::new();
    if let Some(n) = notice {
        segments.push(n.to_string());
    }
    if loading {
        segments.push("Working...".to_string());
    }
    segments.push(format!("History:{}", history_len));
    let hints: [&str; 4] = [
        "Enter: shorten",
        "Tab: next field",
        "F2: history",
        "Esc: quit",
    ];
    for h in hints {
        segments.push(h.to_string());
    }

    let sep = "  |  ";
    let mut out = String::new();
    let mut used = 0usize;
    for (i, seg) in segments.iter().enumerate() {
        let segw = UnicodeWidthStr::width(seg.as_str());
        let addw = segw
            + if i == 0 {
                0
            } else {
                UnicodeWidthStr::width(sep)
            };
        if used + addw > max_width as usize {
            break;
        }
        if i > 0 {
            out.push_str(sep);
            used += UnicodeWidthStr::width(sep);
        }
        out.push_str(seg);
        used += segw;
    }
    out
}

// Fit a value into `width` columns, marking the cut with an ASCII ellipsis.
pub fn truncate_to_width(s: &str, width: usize) -> String {
    if UnicodeWidthStr::width(s) <= width {
        return s.to_string();
    }
    let budget = width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0usize;
    for g in s.graphemes(true) {
        let w = UnicodeWidthStr::width(g);
        if used + w > budget {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_drops_trailing_segments_when_narrow() {
        let wide = build_status_line(false, 3, None, 200);
        assert!(wide.contains("History:3"));
        assert!(wide.contains("Esc: quit"));

        let narrow = build_status_line(false, 3, None, 12);
        assert_eq!(narrow, "History:3");
    }

    #[test]
    fn notice_leads_the_status_line() {
        let line = build_status_line(true, 0, Some(NOTICE_COPIED), 200);
        assert!(line.starts_with(NOTICE_COPIED));
        assert!(line.contains("Working..."));
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        let cut = truncate_to_width("https://example.com/very/long/path", 12);
        assert!(cut.ends_with("..."));
        assert!(UnicodeWidthStr::width(cut.as_str()) <= 12);
    }
}
