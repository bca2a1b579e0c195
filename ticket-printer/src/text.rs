//! Column width helpers for plain-text tickets
//!
//! Receipt printers render one character per column in their built-in
//! font, so widths here are counted in characters.

/// Column width of a string
pub fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string to at most `max_width` columns
pub fn truncate(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Pad a string to exactly `width` columns
///
/// If the string is longer than the width, it will be truncated.
pub fn pad(s: &str, width: usize, align_right: bool) -> String {
    let current = text_width(s);
    if current >= width {
        return truncate(s, width);
    }
    let spaces = width - current;
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

/// Center a string within `width` columns (left-biased)
pub fn center(s: &str, width: usize) -> String {
    let current = text_width(s);
    if current >= width {
        return s.to_string();
    }
    let left = (width - current) / 2;
    format!("{}{}", " ".repeat(left), s)
}

/// Break text into lines of at most `width` columns, on spaces where possible
pub fn wrap(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![s.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in s.split_whitespace() {
        let mut word = word.to_string();
        // Hard-split words longer than a whole line
        while text_width(&word) > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let head = truncate(&word, width);
            word = word.chars().skip(width).collect();
            lines.push(head);
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            text_width(&word)
        } else {
            text_width(&current) + 1 + text_width(&word)
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_counts_chars() {
        assert_eq!(text_width("abc"), 3);
        assert_eq!(text_width("فول"), 3);
    }

    #[test]
    fn test_pad_and_truncate() {
        assert_eq!(pad("ab", 4, false), "ab  ");
        assert_eq!(pad("ab", 4, true), "  ab");
        assert_eq!(pad("abcdef", 4, false), "abcd");
    }

    #[test]
    fn test_center() {
        assert_eq!(center("ab", 6), "  ab");
        assert_eq!(center("abcdef", 4), "abcdef");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("ring the bell twice", 9), vec!["ring the", "bell", "twice"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("", 10), vec![""]);
    }
}
