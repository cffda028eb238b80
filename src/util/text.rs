use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns (CJK and emoji are 2 wide,
/// zero-width characters are 0).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncate a string to fit `max_width` terminal columns, appending "..."
/// when text was cut. Unicode-aware; returns `Cow::Borrowed` when the string
/// already fits.
///
/// Widths of 3 or less get as many characters as fit with no ellipsis, since
/// there is no room for "char + ellipsis".
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    if max_width <= ELLIPSIS_WIDTH {
        let mut byte_end = 0;
        let mut current_width = 0;
        for (idx, c) in s.char_indices() {
            let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
            if current_width + char_width > max_width {
                break;
            }
            current_width += char_width;
            byte_end = idx + c.len_utf8();
        }
        if byte_end == s.len() {
            return Cow::Borrowed(s);
        }
        return Cow::Owned(s[..byte_end].to_string());
    }

    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let target_width = max_width - ELLIPSIS_WIDTH;
    let mut byte_end = 0;
    let mut current_width = 0;
    for (idx, c) in s.char_indices() {
        let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
        if current_width + char_width > target_width {
            break;
        }
        current_width += char_width;
        byte_end = idx + c.len_utf8();
    }

    let mut out = String::with_capacity(byte_end + ELLIPSIS.len());
    out.push_str(&s[..byte_end]);
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

/// Abbreviate a view count for the list row: 999 stays as-is, larger counts
/// collapse to one decimal of K/M/B.
pub fn format_views(views: u64) -> String {
    match views {
        0..=999 => views.to_string(),
        1_000..=999_999 => format_scaled(views, 1_000.0, 'K'),
        1_000_000..=999_999_999 => format_scaled(views, 1_000_000.0, 'M'),
        _ => format_scaled(views, 1_000_000_000.0, 'B'),
    }
}

fn format_scaled(views: u64, divisor: f64, suffix: char) -> String {
    let scaled = views as f64 / divisor;
    if scaled >= 100.0 {
        format!("{:.0}{}", scaled, suffix)
    } else {
        // Trim a trailing ".0" so 2000 reads "2K", not "2.0K".
        let s = format!("{:.1}", scaled);
        let s = s.strip_suffix(".0").unwrap_or(&s);
        format!("{}{}", s, suffix)
    }
}
