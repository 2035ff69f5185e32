//! Cluster topology snapshot.
//!
//! A [`SlotMap`] is an immutable view of which endpoints serve which hash
//! slots. A topology change produces a whole new map; the router never
//! mutates one in place, so readers need no synchronization.

use std::collections::BTreeSet;

use rand::Rng;

use super::slot::SLOT_COUNT;

/// A contiguous range of hash slots and the endpoints serving it.
///
/// The endpoint list is ordered: index 0 is the master, any further entries
/// are replicas. The same endpoint may serve many ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRange {
    start: u16,
    end: u16,
    endpoints: Vec<String>,
}

impl SlotRange {
    /// Creates a range covering `start..=end` served by `endpoints`
    /// (master first).
    pub fn new(start: u16, end: u16, endpoints: Vec<String>) -> Self {
        debug_assert!(start <= end && end < SLOT_COUNT);
        debug_assert!(!endpoints.is_empty());
        Self {
            start,
            end,
            endpoints,
        }
    }

    /// Returns true if the given slot falls inside this range.
    #[inline]
    pub fn contains(&self, slot: u16) -> bool {
        slot >= self.start && slot <= self.end
    }

    /// The ordered endpoint list, master first.
    #[inline]
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// The master endpoint of this range.
    #[inline]
    pub fn master(&self) -> &str {
        &self.endpoints[0]
    }
}

/// Immutable snapshot of the cluster's slot-to-endpoint assignment.
///
/// Slots not covered by any range are unassigned; lookups for them return
/// `None` and the router falls back to its configured default endpoint.
#[derive(Debug, Clone, Default)]
pub struct SlotMap {
    ranges: Vec<SlotRange>,
}

impl SlotMap {
    /// Builds a map from explicit ranges, kept sorted by starting slot so
    /// grouping order (and with it scatter issue order) is deterministic.
    pub fn new(mut ranges: Vec<SlotRange>) -> Self {
        ranges.sort_by_key(|range| range.start);
        Self { ranges }
    }

    /// Endpoints serving the given slot number, or `None` if unassigned.
    pub fn endpoints_for_key(&self, slot: u16) -> Option<&[String]> {
        self.ranges
            .iter()
            .find(|range| range.contains(slot))
            .map(SlotRange::endpoints)
    }

    /// Endpoints of the `index`-th slot grouping.
    ///
    /// Groupings are the distinct ranges of the map; the keyless fan-out
    /// issues one sub-request per grouping.
    pub fn endpoints_for_slot(&self, index: usize) -> Option<&[String]> {
        self.ranges.get(index).map(SlotRange::endpoints)
    }

    /// Number of distinct slot groupings.
    #[inline]
    pub fn size(&self) -> usize {
        self.ranges.len()
    }

    /// The set union of all endpoints in the map.
    pub fn endpoints(&self) -> BTreeSet<&str> {
        self.ranges
            .iter()
            .flat_map(|range| range.endpoints.iter().map(String::as_str))
            .collect()
    }

    /// A uniformly chosen representative endpoint: the master of a random
    /// grouping. Returns `None` on an empty map.
    pub fn random_endpoint(&self) -> Option<&str> {
        if self.ranges.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..self.ranges.len());
        Some(self.ranges[index].master())
    }
}
