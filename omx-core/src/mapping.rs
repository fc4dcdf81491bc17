//! Mapping reverse lookups
//!
//! A mapping is an ordered list of external keys (e.g. zone numbers), one per
//! row or column. The reverse lookup turns a key back into its zero-based
//! offset.

use hashbrown::HashMap;

/// Key → zero-based offset
pub type ReverseLookup = HashMap<u32, usize>;

/// Build the key → offset table for a mapping
///
/// Duplicate keys are not rejected: the offset of the last occurrence wins.
/// A mapping with repeated keys is most likely malformed, so callers that care
/// should check [`first_duplicate`] first.
pub fn reverse_lookup(entries: &[u32]) -> ReverseLookup {
    let mut lookup = HashMap::with_capacity(entries.len());
    for (offset, &key) in entries.iter().enumerate() {
        lookup.insert(key, offset);
    }
    lookup
}

/// The first key that appears more than once, if any
pub fn first_duplicate(entries: &[u32]) -> Option<u32> {
    let mut seen = hashbrown::HashSet::with_capacity(entries.len());
    entries.iter().copied().find(|key| !seen.insert(*key))
}
