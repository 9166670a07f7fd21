use crate::{BackgroundStyle, DecorationStyle, ThemeName, DEFAULT_HISTORY_SIZE};
use sha2::{Digest, Sha256};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: String,
    pub quote: String,
    pub author: String,
    pub image: Vec<u8>,
    pub theme: ThemeName,
    pub background: BackgroundStyle,
    pub decoration: DecorationStyle,
}

/// Bounded list of recent generations, newest first. Lives for one session.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    sequence: u64,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            sequence: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a generation and returns its id. The oldest entry is dropped
    /// once the list is full.
    pub fn push(
        &mut self,
        quote: &str,
        author: &str,
        image: Vec<u8>,
        theme: ThemeName,
        background: BackgroundStyle,
        decoration: DecorationStyle,
    ) -> String {
        self.sequence += 1;
        let id = entry_id(self.sequence, &image);
        self.entries.push_front(HistoryEntry {
            id: id.clone(),
            quote: quote.to_string(),
            author: author.to_string(),
            image,
            theme,
            background,
            decoration,
        });
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                log::debug!("history full, dropping {}", evicted.id);
            }
        }
        id
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn entry_id(sequence: u64, image: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sequence.to_le_bytes());
    hasher.update(image);
    let digest = hasher.finalize();
    let hex: String = digest[..6].iter().map(|b| format!("{b:02x}")).collect();
    format!("{sequence}-{hex}")
}
