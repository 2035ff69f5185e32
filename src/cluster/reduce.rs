//! Reducers combining scattered partial replies into one logical reply.
//!
//! When a multi-key command is split across slots, or a keyless command
//! fans out to every slot grouping, each shard answers for its share of
//! the work. The registered reducer for the command folds those partials
//! (in issue order) back into the single reply the caller expects. A
//! reducer only runs once every partial has succeeded.

use std::collections::HashMap;
use std::sync::Arc;

use crate::command::commands;
use crate::proto::frame::Frame;

/// A function reducing an ordered list of partial replies to one reply.
pub type Reducer = Arc<dyn Fn(Vec<Frame>) -> Frame + Send + Sync>;

/// Builds the default reducer table.
pub(crate) fn built_in() -> HashMap<&'static str, Reducer> {
    let mut reducers: HashMap<&'static str, Reducer> = HashMap::new();
    // MSET and FLUSHDB cannot partially fail once every shard acked.
    reducers.insert(commands::MSET.name(), Arc::new(|_| Frame::ok()));
    reducers.insert(commands::FLUSHDB.name(), Arc::new(|_| Frame::ok()));
    reducers.insert(commands::DEL.name(), Arc::new(sum_integers));
    reducers.insert(commands::DBSIZE.name(), Arc::new(sum_integers));
    reducers.insert(commands::MGET.name(), Arc::new(concat_arrays));
    reducers.insert(commands::KEYS.name(), Arc::new(concat_arrays));
    reducers
}

/// Sums integer partials: `DEL` and `DBSIZE` report per-shard counts.
fn sum_integers(parts: Vec<Frame>) -> Frame {
    Frame::Integer(parts.iter().filter_map(Frame::as_integer).sum())
}

/// Flattens array partials in input order: `MGET` and `KEYS` return one
/// array per shard.
fn concat_arrays(parts: Vec<Frame>) -> Frame {
    let mut items = Vec::new();
    for part in parts {
        if let Some(elements) = part.into_array() {
            items.extend(elements);
        }
    }
    Frame::Array(items)
}
