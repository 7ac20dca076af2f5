use indexmap::IndexMap;

/// Requested block names and what was captured for each.
///
/// Every name starts out pending and is resolved at most once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureSet {
    entries: IndexMap<String, Option<String>>,
}

impl CaptureSet {
    /// Creates a set with one pending entry per non-empty name.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| !name.is_empty())
            .map(|name| (name, None))
            .collect();
        Self { entries }
    }

    pub fn is_pending(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(None))
    }

    /// Records `rendered` for `name` if it is pending. Returns whether the
    /// entry changed.
    pub fn record(&mut self, name: &str, rendered: &str) -> bool {
        match self.entries.get_mut(name) {
            Some(slot @ None) => {
                *slot = Some(rendered.to_string());
                true
            }
            _ => false,
        }
    }

    /// True once no entry is pending.
    pub fn is_complete(&self) -> bool {
        self.entries.values().all(Option::is_some)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(|v| v.as_deref())
    }

    /// Names still pending, in request order.
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter(|(_, v)| v.is_none()).map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_once() {
        let mut set = CaptureSet::new(["main", "title"]);
        assert!(set.is_pending("main"));
        assert!(set.record("main", "first"));
        assert!(!set.record("main", "second"));
        assert_eq!(set.get("main"), Some("first"));
        assert!(!set.is_complete());
        assert_eq!(set.pending().collect::<Vec<_>>(), vec!["title"]);
    }

    #[test]
    fn test_unknown_name_ignored() {
        let mut set = CaptureSet::new(["main"]);
        assert!(!set.record("other", "x"));
        assert!(!set.is_pending("other"));
        assert_eq!(set.get("other"), None);
    }

    #[test]
    fn test_empty_names_dropped() {
        let set = CaptureSet::new(["main", ""]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_complete() {
        let mut set = CaptureSet::new(["a"]);
        set.record("a", "");
        assert!(set.is_complete());
        assert_eq!(set.get("a"), Some(""));
    }
}
