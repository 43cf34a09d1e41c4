//! String utility functions.
//!
//! Used to derive human-readable labels from field names and to shorten
//! values shown in search chips.

/// Capitalizes the first character of a string.
///
/// # Examples
///
/// ```
/// use viewcraft_core::utils::text::capfirst;
///
/// assert_eq!(capfirst("hello"), "Hello");
/// assert_eq!(capfirst(""), "");
/// assert_eq!(capfirst("HELLO"), "HELLO");
/// ```
pub fn capfirst(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |c| {
        let mut result = c.to_uppercase().to_string();
        result.extend(chars);
        result
    })
}

/// Turns a field name into a label: underscores become spaces and the
/// first letter is capitalized.
///
/// # Examples
///
/// ```
/// use viewcraft_core::utils::text::humanize;
///
/// assert_eq!(humanize("view_count"), "View count");
/// assert_eq!(humanize("author__name"), "Author name");
/// ```
pub fn humanize(field_name: &str) -> String {
    let words: Vec<&str> = field_name
        .split('_')
        .filter(|part| !part.is_empty())
        .collect();
    capfirst(&words.join(" "))
}

/// Truncates a string to at most `n` characters.
///
/// If the string is longer than `n`, it is truncated and "..." is appended.
/// The total length including the ellipsis will be `n` (if `n >= 3`).
///
/// # Examples
///
/// ```
/// use viewcraft_core::utils::text::truncate_chars;
///
/// assert_eq!(truncate_chars("Hello, World!", 5), "He...");
/// assert_eq!(truncate_chars("Hi", 10), "Hi");
/// ```
pub fn truncate_chars(s: &str, n: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= n {
        return s.to_string();
    }
    if n <= 3 {
        return ".".repeat(n);
    }
    let mut result: String = chars[..n - 3].iter().collect();
    result.push_str("...");
    result
}
