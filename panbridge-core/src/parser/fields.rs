//! Named string fields shared by the table and key-value strategies

/// Ordered label → value pairs from one table row or one key-value block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(String, String)>,
}

impl Fields {
    /// Creates an empty set
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets a field, replacing an existing value under the same label
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(l, _)| *l == label) {
            entry.1 = value;
        } else {
            self.entries.push((label, value));
        }
    }

    /// Returns the value stored under exactly this label
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the first non-empty value among candidate labels
    ///
    /// Exact labels are tried first, in order, then the same candidates
    /// case-insensitively.
    #[must_use]
    pub fn lookup(&self, candidates: &[&str]) -> Option<&str> {
        let non_empty = |v: &&str| !v.is_empty();
        candidates
            .iter()
            .find_map(|c| self.get(c).filter(non_empty))
            .or_else(|| {
                candidates.iter().find_map(|c| {
                    self.entries
                        .iter()
                        .find(|(l, _)| l.eq_ignore_ascii_case(c))
                        .map(|(_, v)| v.as_str())
                        .filter(non_empty)
                })
            })
    }

    /// Like [`Self::lookup`] but returns an empty string when nothing matches
    #[must_use]
    pub fn lookup_or_empty(&self, candidates: &[&str]) -> &str {
        self.lookup(candidates).unwrap_or("")
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over label/value pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_prefers_exact_then_case_insensitive() {
        let fields: Fields = [("read iops", "5"), ("Read IOPS", "7"), ("Model", "")]
            .into_iter()
            .collect();
        assert_eq!(fields.lookup(&["Read IOPS"]), Some("7"));
        assert_eq!(fields.lookup(&["READ IOPS"]), Some("5"));
        assert_eq!(fields.lookup(&["Model", "Product Name"]), None);
        assert_eq!(fields.lookup_or_empty(&["Missing"]), "");
    }

    #[test]
    fn test_insert_replaces() {
        let mut fields = Fields::new();
        fields.insert("Status", "Online");
        fields.insert("Status", "Offline");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("Status"), Some("Offline"));
    }
}
