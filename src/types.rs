use std::ops;

use indexmap::IndexMap;

/// One entry in a `.bib` file
///
/// Field names are case-insensitive: they are stored lowercase and every
/// lookup lowercases its argument first. Fields keep the order in which they
/// were first set, which is the order the [`Writer`](crate::Writer) emits them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawBibEntry"))]
pub struct BibEntry {
    /// entry type, e.g. “article”, case preserved as written
    pub kind: String,
    /// citation key, e.g. “DBLP:books/lib/Knuth97”; empty for keyless entries
    pub key: String,
    /// map of lowercase field names, e.g. “author” mapped to “Donald Ervin Knuth”
    fields: IndexMap<String, String>,
}

/// Deserialized form of a `BibEntry` before its fields are normalized
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawBibEntry {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    key: String,
    #[serde(default)]
    fields: IndexMap<String, String>,
}

#[cfg(feature = "serde")]
impl From<RawBibEntry> for BibEntry {
    fn from(raw: RawBibEntry) -> Self {
        let mut entry = BibEntry::new();
        entry.kind = raw.kind;
        entry.key = raw.key;
        for (name, data) in raw.fields {
            entry.set(&name, data);
        }
        entry
    }
}

impl BibEntry {
    /// Generate a new, empty instance of BibEntry. Can also be called through the `Default` implementation.
    pub fn new() -> BibEntry {
        BibEntry {
            kind: String::new(),
            key: String::new(),
            fields: IndexMap::new(),
        }
    }

    fn normalize(name: &str) -> String {
        name.to_lowercase()
    }

    /// Return the data of field `name`, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(&Self::normalize(name)).map(String::as_str)
    }

    /// Store `value` under field `name` and return the previous value.
    /// An empty `value` removes the field instead.
    pub fn set<V: Into<String>>(&mut self, name: &str, value: V) -> Option<String> {
        let value = value.into();
        if value.is_empty() {
            return self.remove(name);
        }
        self.fields.insert(Self::normalize(name), value)
    }

    /// Remove field `name`. The remaining fields keep their order.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.shift_remove(&Self::normalize(name))
    }

    /// Whether field `name` is present, ignoring case
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(&Self::normalize(name))
    }

    /// Iterate over `(name, data)` pairs in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, d)| (n.as_str(), d.as_str()))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the entry has no fields at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl ops::Index<&str> for BibEntry {
    type Output = str;

    /// Missing fields read as the empty string.
    fn index(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let mut entry = BibEntry::new();
        entry.set("Title", "Mapreduce");
        assert_eq!(entry.get("title"), Some("Mapreduce"));
        assert_eq!(entry.get("TITLE"), Some("Mapreduce"));
        assert_eq!(&entry["TitlE"], "Mapreduce");
        assert!(entry.has_field("tItLe"));
        assert_eq!(entry.len(), 1);
    }

    #[test]
    fn test_same_field_different_case() {
        let mut entry = BibEntry::new();
        assert_eq!(entry.set("year", "2012"), None);
        assert_eq!(entry.set("YEAR", "2014"), Some("2012".to_string()));
        assert_eq!(entry.len(), 1);
        assert_eq!(&entry["Year"], "2014");
    }

    #[test]
    fn test_empty_value_removes_field() {
        let mut entry = BibEntry::new();
        entry.set("publisher", "nobody");
        assert!(entry.has_field("publisher"));
        assert_eq!(entry.set("Publisher", ""), Some("nobody".to_string()));
        assert!(!entry.has_field("publisher"));
        assert!(entry.is_empty());
        assert_eq!(&entry["publisher"], "");
    }

    #[test]
    fn test_fresh_entry() {
        let entry = BibEntry::default();
        assert_eq!(entry.kind, "");
        assert_eq!(entry.key, "");
        assert!(entry.is_empty());
        assert_eq!(entry.get("anything"), None);
    }

    #[test]
    fn test_insertion_order_survives_removal() {
        let mut entry = BibEntry::new();
        entry.set("author", "a");
        entry.set("title", "t");
        entry.set("year", "y");
        entry.remove("TITLE");
        let names: Vec<&str> = entry.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["author", "year"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_normalizes_fields() -> Result<(), serde_json::Error> {
        let entry: BibEntry = serde_json::from_str(
            r#"{"kind":"article","key":"k","fields":{"Title":"x","note":"","YEAR":"2012"}}"#,
        )?;
        assert_eq!(entry.get("title"), Some("x"));
        assert!(!entry.has_field("note"));
        assert_eq!(entry.len(), 2);
        assert_eq!(entry.fields().collect::<Vec<_>>(), vec![("title", "x"), ("year", "2012")]);

        let back: BibEntry = serde_json::from_str(&serde_json::to_string(&entry)?)?;
        assert_eq!(back, entry);
        Ok(())
    }
}
