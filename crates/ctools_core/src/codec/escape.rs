//! Backslash escaping for delimiter-joined fields.
//!
//! A backslash only escapes a following backslash or reserved char. Any other
//! backslash is literal, so legacy unescaped values such as `C:\tmp` decode
//! unchanged.

const ESCAPE: char = '\\';

/// Prefixes the escape char, and every char in `reserved`, with a backslash.
pub(crate) fn escape_field(value: &str, reserved: &[char]) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == ESCAPE || reserved.contains(&ch) {
            out.push(ESCAPE);
        }
        out.push(ch);
    }
    out
}

fn is_escapable(next: Option<char>, reserved: &[char]) -> bool {
    next.is_some_and(|ch| ch == ESCAPE || reserved.contains(&ch))
}

/// Splits on `delimiter` occurrences that are not escaped.
///
/// Returned slices are still escaped. Always yields at least one slice.
pub(crate) fn split_unescaped<'a>(
    input: &'a str,
    delimiter: char,
    reserved: &[char],
) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut chars = input.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        if ch == ESCAPE {
            if is_escapable(chars.peek().map(|(_, next)| *next), reserved) {
                chars.next();
            }
        } else if ch == delimiter {
            parts.push(&input[start..index]);
            start = index + ch.len_utf8();
        }
    }
    parts.push(&input[start..]);
    parts
}

pub(crate) fn unescape_field(raw: &str, reserved: &[char]) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == ESCAPE && is_escapable(chars.peek().copied(), reserved) {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{escape_field, split_unescaped, unescape_field};

    #[test]
    fn plain_values_are_untouched() {
        assert_eq!(escape_field("drink water", &[',']), "drink water");
        assert_eq!(split_unescaped("a,b,c", ',', &[',']), ["a", "b", "c"]);
    }

    #[test]
    fn escaped_delimiters_do_not_split() {
        let joined = [escape_field("tea, green", &[',']), escape_field("c:\\x", &[','])]
            .join(",");
        let parts = split_unescaped(&joined, ',', &[',']);
        assert_eq!(parts.len(), 2);
        assert_eq!(unescape_field(parts[0], &[',']), "tea, green");
        assert_eq!(unescape_field(parts[1], &[',']), "c:\\x");
    }

    #[test]
    fn empty_input_yields_one_empty_part() {
        assert_eq!(split_unescaped("", ',', &[',']), [""]);
        assert_eq!(split_unescaped("a,", ',', &[',']), ["a", ""]);
    }

    #[test]
    fn lone_backslashes_stay_literal() {
        assert_eq!(unescape_field("a\\b", &[',']), "a\\b");
        assert_eq!(unescape_field("abc\\", &[',']), "abc\\");
        assert_eq!(
            split_unescaped("C:\\tmp,D:\\x", ',', &[',']),
            ["C:\\tmp", "D:\\x"]
        );
    }

    #[test]
    fn reserved_set_decides_what_is_escaped() {
        // `|` is only reserved in the record format.
        assert_eq!(unescape_field("a\\|b", &[',']), "a\\|b");
        assert_eq!(unescape_field("a\\|b", &['|', '\n']), "a|b");
    }
}
