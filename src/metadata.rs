use indexmap::IndexMap;

use crate::types::{AttrName, AttrValue, LineIndex, RawLine};

/// One parsed metadata attribute occurrence.
///
/// Immutable once created; equality covers the value, the original line
/// text, and the line number, so the same attribute re-stated on a later
/// line counts as a change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataSnapshot {
    /// Parsed attribute value, absent for value-less attributes
    /// (e.g. `# newpar`).
    pub value: Option<AttrValue>,
    /// Original line text, reproduced verbatim on re-emission.
    pub text: RawLine,
    /// 0-based line position across all input files.
    pub line_no: LineIndex,
}

/// Insertion-ordered mapping from attribute name to its most recent
/// snapshot as of a point in the corpus.
///
/// One instance tracks the global state accumulated over the whole corpus;
/// each (fold, destination) pair owns an independent instance that lags
/// behind the global state until [`diff_and_update`](Self::diff_and_update)
/// syncs it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataState {
    entries: IndexMap<AttrName, MetadataSnapshot>,
}

impl MetadataState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `snapshot` under `name`, overwriting any prior snapshot while
    /// keeping the name's original insertion position.
    pub fn insert(&mut self, name: AttrName, snapshot: MetadataSnapshot) {
        self.entries.insert(name, snapshot);
    }

    /// Snapshot currently recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&MetadataSnapshot> {
        self.entries.get(name)
    }

    /// Number of tracked attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no attributes are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&AttrName, &MetadataSnapshot)> {
        self.entries.iter()
    }

    /// Overlay every entry of `other` onto `self`, preserving the insertion
    /// position of names already present.
    pub fn merge(&mut self, other: &MetadataState) {
        for (name, snapshot) in other.iter() {
            self.entries.insert(name.clone(), snapshot.clone());
        }
    }

    /// Entries of `global` that `self` has not seen in their current form,
    /// ordered ascending by original line number; afterwards `self` is a
    /// copy of `global`.
    ///
    /// The diff ordering is an explicit sort on `line_no`, so re-emitted
    /// metadata lines preserve original corpus ordering regardless of map
    /// insertion order.
    pub fn diff_and_update(&mut self, global: &MetadataState) -> MetadataState {
        let mut changed: Vec<(&AttrName, &MetadataSnapshot)> = global
            .iter()
            .filter(|(name, snapshot)| self.entries.get(*name) != Some(*snapshot))
            .collect();
        changed.sort_by_key(|(_, snapshot)| snapshot.line_no);

        let mut diff = MetadataState::new();
        for (name, snapshot) in changed {
            diff.insert(name.clone(), snapshot.clone());
        }
        self.entries = global.entries.clone();
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(value: Option<&str>, text: &str, line_no: usize) -> MetadataSnapshot {
        MetadataSnapshot {
            value: value.map(|v| v.to_string()),
            text: text.to_string(),
            line_no,
        }
    }

    #[test]
    fn insert_overwrites_in_place() {
        let mut state = MetadataState::new();
        state.insert("doc_id".into(), snapshot(Some("A"), "# doc_id = A", 0));
        state.insert("newpar".into(), snapshot(None, "# newpar", 1));
        state.insert("doc_id".into(), snapshot(Some("B"), "# doc_id = B", 5));

        let names: Vec<&AttrName> = state.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["doc_id", "newpar"]);
        assert_eq!(state.get("doc_id").unwrap().value.as_deref(), Some("B"));
    }

    #[test]
    fn diff_returns_new_and_changed_entries_in_line_order() {
        let mut global = MetadataState::new();
        global.insert("newpar".into(), snapshot(None, "# newpar", 7));
        global.insert("doc_id".into(), snapshot(Some("A"), "# doc_id = A", 3));

        let mut local = MetadataState::new();
        let diff = local.diff_and_update(&global);

        // Sorted by line number, not by global insertion order.
        let lines: Vec<usize> = diff.iter().map(|(_, s)| s.line_no).collect();
        assert_eq!(lines, [3, 7]);
        assert_eq!(local, global);
    }

    #[test]
    fn diff_is_empty_when_local_matches_global() {
        let mut global = MetadataState::new();
        global.insert("doc_id".into(), snapshot(Some("A"), "# doc_id = A", 0));

        let mut local = MetadataState::new();
        local.diff_and_update(&global);
        let second = local.diff_and_update(&global);
        assert!(second.is_empty());
    }

    #[test]
    fn restated_attribute_on_a_later_line_counts_as_changed() {
        let mut global = MetadataState::new();
        global.insert("doc_id".into(), snapshot(Some("A"), "# doc_id = A", 0));

        let mut local = MetadataState::new();
        local.diff_and_update(&global);

        // Same value, different source line.
        global.insert("doc_id".into(), snapshot(Some("A"), "# doc_id = A", 12));
        let diff = local.diff_and_update(&global);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff.get("doc_id").unwrap().line_no, 12);
    }

    #[test]
    fn merge_keeps_first_seen_positions() {
        let mut state = MetadataState::new();
        state.insert("a".into(), snapshot(Some("1"), "# a = 1", 0));
        state.insert("b".into(), snapshot(Some("2"), "# b = 2", 1));

        let mut incoming = MetadataState::new();
        incoming.insert("b".into(), snapshot(Some("3"), "# b = 3", 4));
        incoming.insert("c".into(), snapshot(Some("4"), "# c = 4", 5));
        state.merge(&incoming);

        let names: Vec<&AttrName> = state.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(state.get("b").unwrap().line_no, 4);
    }
}
