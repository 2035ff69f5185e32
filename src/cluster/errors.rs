//! Parsing of cluster error replies.
//!
//! Redis Cluster signals sharding conditions through error replies:
//! - `MOVED <slot> <host>:<port>` - permanent redirect
//! - `ASK <slot> <host>:<port>` - one-off redirect during migration
//! - `TRYAGAIN` - multi-key command interrupted by a migration
//! - `CLUSTERDOWN` - the cluster is not serving requests

use crate::proto::error::Error;

/// Parses a raw error reply into a typed error.
///
/// Connection implementations call this on every `-ERR` style reply so the
/// router sees redirections as distinguishable error kinds while the
/// original text stays recoverable through `Display`.
///
/// # Arguments
///
/// * `error_msg` - The error line from the server, without the `-` marker
///   (e.g. `b"MOVED 3999 127.0.0.1:7000"`)
pub fn parse_redis_error(error_msg: &[u8]) -> Error {
    let msg = String::from_utf8_lossy(error_msg);
    let msg = msg.trim();

    if let Some(stripped) = msg.strip_prefix("MOVED ") {
        if let Some((slot, address)) = parse_redirect(stripped) {
            return Error::Moved { slot, address };
        }
    }

    if let Some(stripped) = msg.strip_prefix("ASK ") {
        if let Some((slot, address)) = parse_redirect(stripped) {
            return Error::Ask { slot, address };
        }
    }

    if msg.starts_with("TRYAGAIN") {
        return Error::TryAgain;
    }

    if msg.starts_with("CLUSTERDOWN") {
        return Error::ClusterDown;
    }

    if msg.starts_with("CROSSSLOT") {
        return Error::CrossSlot;
    }

    Error::Server {
        message: msg.to_string(),
    }
}

/// Parses redirect arguments: `<slot> <host>:<port>`.
///
/// The address is the second whitespace-delimited token (the third of the
/// full error line). A missing or malformed token yields `None`, which
/// leaves the reply a plain server error for the router to surface.
fn parse_redirect(args: &str) -> Option<(u16, String)> {
    let mut parts = args.split_whitespace();
    let slot: u16 = parts.next()?.parse().ok()?;
    let address = parts.next()?.to_string();
    Some((slot, address))
}
