//! Query string dictionary for HTTP request parameters.
//!
//! [`QueryDict`] wraps [`MultiValueDict`] to provide an immutable-by-default
//! dictionary for GET and POST parameters. Keys keep the order in which they
//! first appeared, so re-encoding a parsed query string is stable.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use viewcraft_core::utils::MultiValueDict;
use viewcraft_core::{ViewcraftError, ViewcraftResult};

/// Characters escaped in query keys and values: everything except the
/// RFC 3986 unreserved set.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// An immutable-by-default dictionary for query string and form data.
///
/// The [`copy`](QueryDict::copy) method returns a mutable clone.
///
/// # Examples
///
/// ```
/// use viewcraft_http::QueryDict;
///
/// let qd = QueryDict::parse("color=red&color=blue&size=large");
/// assert_eq!(qd.get("color"), Some("blue"));
/// assert_eq!(qd.get_list("color"), Some(&vec!["red".to_string(), "blue".to_string()]));
///
/// let mut mutable = qd.copy();
/// mutable.set("color", "green").unwrap();
/// assert_eq!(mutable.urlencode(), "color=green&size=large");
/// ```
#[derive(Debug, Clone)]
pub struct QueryDict {
    data: MultiValueDict<String, String>,
    mutable: bool,
}

impl Default for QueryDict {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryDict {
    /// Creates a new, empty, immutable `QueryDict`.
    pub fn new() -> Self {
        Self {
            data: MultiValueDict::new(),
            mutable: false,
        }
    }

    /// Creates a new, empty, mutable `QueryDict`.
    pub fn new_mutable() -> Self {
        Self {
            data: MultiValueDict::new(),
            mutable: true,
        }
    }

    /// Parses a URL query string (e.g., `"key1=val1&key2=val2"`) into an
    /// immutable `QueryDict`.
    ///
    /// Handles percent-encoding, `+` as space, and repeated keys.
    pub fn parse(query_string: &str) -> Self {
        let mut data = MultiValueDict::new();

        for pair in query_string.split('&') {
            if pair.is_empty() {
                continue;
            }

            let (key, value) = pair
                .find('=')
                .map_or((pair, ""), |eq_pos| (&pair[..eq_pos], &pair[eq_pos + 1..]));

            data.append(percent_decode(key), percent_decode(value));
        }

        Self {
            data,
            mutable: false,
        }
    }

    /// Builds a mutable `QueryDict` from key/value pairs.
    pub fn from_pairs<K: Into<String>, V: Into<String>>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        let mut data = MultiValueDict::new();
        for (k, v) in pairs {
            data.append(k.into(), v.into());
        }
        Self {
            data,
            mutable: true,
        }
    }

    /// Returns the last value for the given key, or `None` if not present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(&key.to_string()).map(String::as_str)
    }

    /// Returns all values for the given key, or `None` if not present.
    pub fn get_list(&self, key: &str) -> Option<&Vec<String>> {
        self.data.get_list(&key.to_string())
    }

    fn check_mutable(&self) -> ViewcraftResult<()> {
        if self.mutable {
            Ok(())
        } else {
            Err(ViewcraftError::BadRequest(
                "This QueryDict instance is immutable".to_string(),
            ))
        }
    }

    /// Sets a single value for the given key, replacing any existing values.
    ///
    /// # Errors
    ///
    /// Returns [`ViewcraftError::BadRequest`] if this `QueryDict` is immutable.
    pub fn set(&mut self, key: &str, value: &str) -> ViewcraftResult<()> {
        self.check_mutable()?;
        self.data.set(key.to_string(), value.to_string());
        Ok(())
    }

    /// Appends a value to the list for the given key.
    ///
    /// # Errors
    ///
    /// Returns [`ViewcraftError::BadRequest`] if this `QueryDict` is immutable.
    pub fn append(&mut self, key: &str, value: &str) -> ViewcraftResult<()> {
        self.check_mutable()?;
        self.data.append(key.to_string(), value.to_string());
        Ok(())
    }

    /// Removes a key and all its values.
    ///
    /// # Errors
    ///
    /// Returns [`ViewcraftError::BadRequest`] if this `QueryDict` is immutable.
    pub fn remove(&mut self, key: &str) -> ViewcraftResult<Option<Vec<String>>> {
        self.check_mutable()?;
        Ok(self.data.remove(&key.to_string()))
    }

    /// Returns a mutable copy of this `QueryDict`.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            data: self.data.clone(),
            mutable: true,
        }
    }

    /// Encodes this `QueryDict` as a URL query string, keys in insertion order.
    pub fn urlencode(&self) -> String {
        let mut parts = Vec::new();

        for (key, values) in self.data.iter() {
            for value in values {
                parts.push(format!("{}={}", percent_encode(key), percent_encode(value)));
            }
        }

        parts.join("&")
    }

    /// Returns `true` if this `QueryDict` is mutable.
    pub const fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the `QueryDict` contains no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if the specified key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(&key.to_string())
    }

    /// Returns an iterator over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    /// Returns an iterator over `(key, last value)` pairs in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().filter_map(|(k, values)| {
            values.last().map(|v| (k.as_str(), v.as_str()))
        })
    }
}

/// Decodes a percent-encoded query component, treating `+` as a space.
pub fn percent_decode(input: &str) -> String {
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Percent-encodes a query component.
pub fn percent_encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, QUERY_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let qd = QueryDict::parse("key=value");
        assert_eq!(qd.get("key"), Some("value"));
        assert_eq!(qd.len(), 1);
    }

    #[test]
    fn test_parse_multiple_values() {
        let qd = QueryDict::parse("color=red&color=blue&color=green");
        assert_eq!(qd.get("color"), Some("green"));
        assert_eq!(qd.get_list("color").map(Vec::len), Some(3));
    }

    #[test]
    fn test_parse_edge_cases() {
        assert!(QueryDict::parse("").is_empty());
        assert_eq!(QueryDict::parse("key").get("key"), Some(""));
        assert_eq!(QueryDict::parse("key=").get("key"), Some(""));
        assert_eq!(QueryDict::parse("&&a=1&&").len(), 1);
    }

    #[test]
    fn test_parse_value_with_equals() {
        let qd = QueryDict::parse("q=eyJ0In0=&page=2");
        assert_eq!(qd.get("q"), Some("eyJ0In0="));
    }

    #[test]
    fn test_parse_percent_and_plus() {
        let qd = QueryDict::parse("name=hello%20world&city=New+York");
        assert_eq!(qd.get("name"), Some("hello world"));
        assert_eq!(qd.get("city"), Some("New York"));
    }

    #[test]
    fn test_immutable_mutations_fail() {
        let mut qd = QueryDict::parse("key=value");
        assert!(!qd.is_mutable());
        assert!(qd.set("key", "new").is_err());
        assert!(qd.append("key", "extra").is_err());
        assert!(qd.remove("key").is_err());
    }

    #[test]
    fn test_copy_returns_mutable() {
        let qd = QueryDict::parse("key=value");
        let mut mutable = qd.copy();
        assert!(mutable.set("key", "new").is_ok());
        assert_eq!(mutable.get("key"), Some("new"));
        assert_eq!(qd.get("key"), Some("value"));
    }

    #[test]
    fn test_remove() {
        let mut qd = QueryDict::parse("a=1&b=2").copy();
        assert_eq!(qd.remove("a").unwrap(), Some(vec!["1".to_string()]));
        assert_eq!(qd.urlencode(), "b=2");
    }

    #[test]
    fn test_urlencode_keeps_insertion_order() {
        let qd = QueryDict::parse("z=1&a=2&m=3");
        assert_eq!(qd.urlencode(), "z=1&a=2&m=3");
    }

    #[test]
    fn test_urlencode_special_chars() {
        let qd = QueryDict::from_pairs([("name", "hello world"), ("q", "ab-_c=")]);
        assert_eq!(qd.urlencode(), "name=hello%20world&q=ab-_c%3D");
    }

    #[test]
    fn test_items() {
        let qd = QueryDict::parse("a=1&a=2&b=3");
        let items: Vec<_> = qd.items().collect();
        assert_eq!(items, vec![("a", "2"), ("b", "3")]);
    }
}
