//! Short-term memory of recent descriptions and inventories, used to spot
//! an agent that keeps revisiting the same situation.

use serde::{Deserialize, Serialize};

use crate::game::GameState;

/// Number of recent turns remembered per channel.
pub const HISTORY_LEN: usize = 10;

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Stable 64-bit FNV-1a digest of a text blob. Identical across runs and
/// processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    pub fn of(text: &str) -> Self {
        let mut h = FNV_OFFSET;
        for &b in text.as_bytes() {
            h ^= b as u64;
            h = h.wrapping_mul(FNV_PRIME);
        }
        Fingerprint(h)
    }
}

/// Fixed-capacity FIFO of fingerprints. Unfilled slots are empty and never
/// compare equal to a real fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintRing {
    slots: [Option<Fingerprint>; HISTORY_LEN],
    // index of the next slot to overwrite, i.e. the oldest entry
    head: usize,
}

impl Default for FingerprintRing {
    fn default() -> Self {
        Self::new()
    }
}

impl FingerprintRing {
    pub fn new() -> Self {
        Self {
            slots: [None; HISTORY_LEN],
            head: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        HISTORY_LEN
    }

    /// Number of filled slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.latest().is_none()
    }

    /// Append `fp`, evicting the oldest entry.
    pub fn push(&mut self, fp: Fingerprint) {
        self.slots[self.head] = Some(fp);
        self.head = (self.head + 1) % HISTORY_LEN;
    }

    pub fn latest(&self) -> Option<Fingerprint> {
        self.slots[(self.head + HISTORY_LEN - 1) % HISTORY_LEN]
    }

    pub fn contains(&self, fp: Fingerprint) -> bool {
        self.slots.contains(&Some(fp))
    }

    /// How many slots hold the newest fingerprint, itself included.
    /// Zero only when nothing has been pushed yet.
    pub fn count_latest(&self) -> usize {
        match self.latest() {
            Some(fp) => self.slots.iter().filter(|s| **s == Some(fp)).count(),
            None => 0,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

/// Repeat counts for the newest description and inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatCounts {
    pub description: usize,
    pub inventory: usize,
}

/// The description and inventory rings of one environment instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentHistory {
    description: FingerprintRing,
    inventory: FingerprintRing,
}

impl RecentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the fingerprints of `state` and report how often each newest
    /// value now appears in its ring.
    pub fn record(&mut self, state: &GameState) -> RepeatCounts {
        self.description.push(Fingerprint::of(&state.description));
        self.inventory.push(Fingerprint::of(&state.inventory));
        RepeatCounts {
            description: self.description.count_latest(),
            inventory: self.inventory.count_latest(),
        }
    }

    pub fn description(&self) -> &FingerprintRing {
        &self.description
    }

    pub fn inventory(&self) -> &FingerprintRing {
        &self.inventory
    }

    pub fn clear(&mut self) {
        self.description.clear();
        self.inventory.clear();
    }
}
