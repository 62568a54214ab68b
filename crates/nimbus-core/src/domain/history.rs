use serde::{Deserialize, Serialize};

/// Maximum number of remembered searches.
pub const MAX_HISTORY: usize = 5;

/// Recently searched city names, most recent first.
///
/// Serializes as a plain JSON array of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SearchHistory {
    entries: Vec<String>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a search. Blank terms are ignored; returns whether the list changed.
    pub fn record(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return false;
        }

        self.entries.retain(|existing| existing != term);
        self.entries.insert(0, term.to_string());
        self.entries.truncate(MAX_HISTORY);
        true
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl From<Vec<String>> for SearchHistory {
    // Stored lists may have been edited by hand; keep the first occurrence
    // of each term and the cap.
    fn from(raw: Vec<String>) -> Self {
        let mut entries: Vec<String> = Vec::with_capacity(MAX_HISTORY);
        for term in raw {
            if entries.len() == MAX_HISTORY {
                break;
            }
            if !term.trim().is_empty() && !entries.contains(&term) {
                entries.push(term);
            }
        }
        Self { entries }
    }
}

impl From<SearchHistory> for Vec<String> {
    fn from(history: SearchHistory) -> Self {
        history.entries
    }
}
