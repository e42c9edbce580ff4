use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Terminal columns occupied by `s` (CJK and emoji count as two).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` so it fits in `max_width` columns, ending with "..." when cut.
///
/// Widths of three or fewer columns have no room for an ellipsis, so the
/// longest fitting prefix is returned as is. Borrows when nothing is cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = if max_width <= ELLIPSIS_WIDTH {
        max_width
    } else {
        max_width - ELLIPSIS_WIDTH
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    if max_width <= ELLIPSIS_WIDTH {
        Cow::Owned(s[..end].to_string())
    } else {
        Cow::Owned(format!("{}{}", &s[..end], ELLIPSIS))
    }
}

/// Collapse every run of whitespace (including newlines) into one space.
///
/// Card rows are single lines, so multi-paragraph descriptions are flattened
/// before truncation.
pub fn single_line(s: &str) -> Cow<'_, str> {
    let clean = !s.contains(|c: char| c.is_whitespace() && c != ' ') && !s.contains("  ");
    if clean {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn is_stripped_control(c: char) -> bool {
    (c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r')) || c == '\u{7f}'
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// Titles and descriptions come straight from a remote API and end up on the
/// user's terminal. CSI sequences (`ESC [` up to a final byte in `@..=~`) and
/// OSC sequences (`ESC ]` up to BEL or `ESC \`) are dropped whole; a bare ESC
/// and other C0 controls plus DEL are dropped individually. Tab, newline and
/// carriage return survive.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    for n in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&n) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(n) = chars.next() {
                        if n == '\u{07}' {
                            break;
                        }
                        if n == '\u{1b}' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
        } else if !is_stripped_control(c) {
            out.push(c);
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width_counts_wide_chars() {
        assert_eq!(display_width("News"), 4);
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn test_truncate_fits_borrows() {
        let result = truncate_to_width("Short headline", 20);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "Short headline");
    }

    #[test]
    fn test_truncate_ascii_adds_ellipsis() {
        assert_eq!(truncate_to_width("Markets rally again", 10), "Markets...");
        assert_eq!(truncate_to_width("12345", 5), "12345");
    }

    #[test]
    fn test_truncate_wide_chars_never_overflow() {
        // 8 columns into 7: budget 4 leaves two wide chars
        assert_eq!(truncate_to_width("日本語版", 7), "日本...");
        assert_eq!(truncate_to_width("日本語版", 6), "日...");
        assert!(display_width(&truncate_to_width("日本語版です", 9)) <= 9);
    }

    #[test]
    fn test_truncate_narrow_widths_skip_ellipsis() {
        assert_eq!(truncate_to_width("Sports", 0), "");
        assert_eq!(truncate_to_width("Sports", 1), "S");
        assert_eq!(truncate_to_width("Sports", 3), "Spo");
        assert_eq!(truncate_to_width("日本", 1), "");
        assert_eq!(truncate_to_width("日本", 3), "日");
    }

    #[test]
    fn test_single_line_collapses_whitespace() {
        assert_eq!(single_line("first line\n\nsecond\tline"), "first line second line");
        assert_eq!(single_line("  padded  "), "padded");
        assert!(matches!(single_line("already clean"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_clean_text_returns_borrowed() {
        let input = "Scientists find water on Mars";
        let result = strip_control_chars(input);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, input);
    }

    #[test]
    fn test_strip_keeps_tab_newline_cr() {
        let input = "a\tb\nc\r\nd";
        assert!(matches!(strip_control_chars(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_removes_c0_and_del() {
        assert_eq!(strip_control_chars("he\x00ll\x07o\x7f!"), "hello!");
    }

    #[test]
    fn test_strip_removes_csi_sequences() {
        assert_eq!(strip_control_chars("\x1b[1;31mBreaking\x1b[0m"), "Breaking");
        assert_eq!(strip_control_chars("up\x1b[2Adown"), "updown");
    }

    #[test]
    fn test_strip_removes_osc_sequences() {
        assert_eq!(strip_control_chars("\x1b]0;pwned\x07title"), "title");
        assert_eq!(strip_control_chars("\x1b]8;;http://x\x1b\\link"), "link");
    }

    #[test]
    fn test_strip_bare_esc_and_unicode() {
        assert_eq!(strip_control_chars("a\x1bb"), "ab");
        assert_eq!(strip_control_chars("日本\x1b[31m語\x1b[0m"), "日本語");
    }
}
