//! Ordered header mapping shared by the message model and the frame codec.
//!
//! Names are stored exactly as given and compared case-sensitively for
//! uniqueness. Case-insensitive lookup is layered on top through
//! [`Headers::get_ignore_case`]; the storage itself is never case-folded.

/// Ordered `name -> value` header list with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, overwriting the value of an identical name in place.
    ///
    /// The original position is kept on overwrite, so serialization order
    /// always reflects the first insertion of each name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// ASCII case-insensitive lookup; returns the first match in order.
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl<K, V> Extend<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl IntoIterator for Headers {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut headers = Headers::new();
        headers.insert("path", "audio");
        headers.insert("X-RequestId", "abc");
        headers.insert("content-type", "audio/x-wav");

        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["path", "X-RequestId", "content-type"]);
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut headers = Headers::new();
        headers.insert("a", "1");
        headers.insert("b", "2");
        headers.insert("a", "3");

        assert_eq!(headers.len(), 2);
        let pairs: Vec<(&str, &str)> = headers.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_names_are_case_sensitive_keys() {
        let mut headers = Headers::new();
        headers.insert("Path", "one");
        headers.insert("path", "two");

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Path"), Some("one"));
        assert_eq!(headers.get("path"), Some("two"));
        assert_eq!(headers.get("PATH"), None);
    }

    #[test]
    fn test_get_ignore_case() {
        let headers: Headers = [("X-RequestId", "abc")].into_iter().collect();
        assert_eq!(headers.get_ignore_case("x-requestid"), Some("abc"));
        assert_eq!(headers.get_ignore_case("X-REQUESTID"), Some("abc"));
        assert_eq!(headers.get_ignore_case("x-timestamp"), None);
    }
}
