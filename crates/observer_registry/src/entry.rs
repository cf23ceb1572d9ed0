//! Observe filters and the per-dispatch entry accessor

use serde::{Deserialize, Serialize};

use contracts::{InteractionRecord, SCROLL_ENTRY_TYPE};

/// Which entry types a subscriber wants.
///
/// The single-type and list forms of registration both normalize to
/// `entry_types`. `buffered` is accepted for compatibility; nothing is replayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObserveFilter {
    pub entry_types: Vec<String>,
    #[serde(default)]
    pub buffered: bool,
}

impl ObserveFilter {
    /// Filter for a single entry type
    pub fn of_type(entry_type: impl Into<String>) -> Self {
        Self {
            entry_types: vec![entry_type.into()],
            buffered: false,
        }
    }

    pub fn of_types<I, S>(entry_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entry_types: entry_types.into_iter().map(Into::into).collect(),
            buffered: false,
        }
    }

    /// Filter for `scroll` entries only
    pub fn scroll() -> Self {
        Self::of_type(SCROLL_ENTRY_TYPE)
    }

    pub fn buffered(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }

    pub fn matches(&self, entry_type: &str) -> bool {
        self.entry_types.iter().any(|ty| ty == entry_type)
    }

    pub fn is_empty(&self) -> bool {
        self.entry_types.is_empty()
    }

    /// Same filter restricted to `entry_type`
    pub fn only(&self, entry_type: &str) -> Self {
        Self {
            entry_types: self
                .entry_types
                .iter()
                .filter(|ty| *ty == entry_type)
                .cloned()
                .collect(),
            buffered: self.buffered,
        }
    }

    /// Same filter with `entry_type` removed
    pub fn without(&self, entry_type: &str) -> Self {
        Self {
            entry_types: self
                .entry_types
                .iter()
                .filter(|ty| *ty != entry_type)
                .cloned()
                .collect(),
            buffered: self.buffered,
        }
    }
}

/// Entries handed to a subscriber for one dispatch.
///
/// Always holds exactly the record being emitted.
#[derive(Debug, Clone)]
pub struct EntryList {
    entries: [InteractionRecord; 1],
}

impl EntryList {
    pub fn new(record: InteractionRecord) -> Self {
        Self { entries: [record] }
    }

    pub fn entries(&self) -> &[InteractionRecord] {
        &self.entries
    }

    pub fn entries_by_type(&self, entry_type: &str) -> Vec<&InteractionRecord> {
        self.entries
            .iter()
            .filter(|record| record.entry_type() == entry_type)
            .collect()
    }

    pub fn entries_by_name(&self, name: &str) -> Vec<&InteractionRecord> {
        self.entries
            .iter()
            .filter(|record| record.name() == name)
            .collect()
    }

    pub fn into_record(self) -> InteractionRecord {
        let [record] = self.entries;
        record
    }
}
