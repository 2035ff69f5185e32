//! Endpoint selection between masters and replicas.

use rand::Rng;

use super::topology::SlotMap;

/// Policy for spreading read-only commands across a shard's nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadPreference {
    /// Every command goes to the master.
    #[default]
    MasterOnly,
    /// Read-only commands go to a replica when one exists.
    ReplicaOnly,
    /// Read-only commands are shared across master and replicas.
    Share,
}

/// Picks an endpoint from an ordered list (master first, replicas after).
///
/// Write commands, a `MasterOnly` preference, or a list without replicas
/// all resolve to the master. Returns `None` for an empty list. The
/// randomness only spreads load; it need not be cryptographic.
pub(crate) fn master_or_replica<'a>(
    preference: ReadPreference,
    read_only: bool,
    endpoints: &'a [String],
) -> Option<&'a str> {
    if endpoints.is_empty() {
        return None;
    }
    let mut index = 0;
    if read_only && preference != ReadPreference::MasterOnly && endpoints.len() > 1 {
        let mut rng = rand::thread_rng();
        index = match preference {
            ReadPreference::ReplicaOnly => rng.gen_range(1..endpoints.len()),
            ReadPreference::Share => rng.gen_range(0..endpoints.len()),
            ReadPreference::MasterOnly => 0,
        };
    }
    Some(&endpoints[index])
}

/// Resolves the endpoint for a slot, or any endpoint when the command is
/// keyless (`slot == None`).
///
/// Keyless commands land on a random representative, which may be a
/// replica regardless of the preference. A slot with no assignment falls
/// back to `default_endpoint`, the bootstrap address; whether that address
/// is actually connected is checked at dispatch time.
pub(crate) fn select_endpoint<'a>(
    slots: &'a SlotMap,
    default_endpoint: &'a str,
    preference: ReadPreference,
    slot: Option<u16>,
    read_only: bool,
) -> &'a str {
    match slot {
        None => slots.random_endpoint().unwrap_or(default_endpoint),
        Some(slot) => slots
            .endpoints_for_key(slot)
            .and_then(|endpoints| master_or_replica(preference, read_only, endpoints))
            .unwrap_or(default_endpoint),
    }
}
