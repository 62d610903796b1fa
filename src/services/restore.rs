use std::fmt;

use serde::{Serialize, Serializer};

use crate::services::patterns::reverse_entries;

/// Occurrences per representative term, in reverse-registry order.
/// Zero counts are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTally {
    counts: Vec<(&'static str, usize)>,
}

impl FrequencyTally {
    fn add(&mut self, term: &'static str, occurrences: usize) {
        if occurrences == 0 {
            return;
        }
        match self.counts.iter_mut().find(|(existing, _)| *existing == term) {
            Some((_, count)) => *count += occurrences,
            None => self.counts.push((term, occurrences)),
        }
    }

    pub fn get(&self, term: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|(existing, _)| *existing == term)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.counts.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl Serialize for FrequencyTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl fmt::Display for FrequencyTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (term, count)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "\"{term}\": {count}")?;
        }
        f.write_str("}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Restoration {
    pub restored: String,
    pub counts: FrequencyTally,
}

/// Rewrites each fruit back to its representative term and tallies how often
/// each one appeared. Occurrences are counted left to right without overlap.
pub fn restore_swears(censored_text: &str) -> Restoration {
    let mut restored = censored_text.to_string();
    let mut counts = FrequencyTally::default();

    for entry in reverse_entries() {
        let token = entry.token.as_str();
        if !restored.contains(token) {
            continue;
        }
        counts.add(entry.representative, censored_text.matches(token).count());
        restored = restored.replace(token, entry.representative);
    }

    Restoration { restored, counts }
}
