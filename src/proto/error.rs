use std::io;

use thiserror::Error;

/// Result type alias for shardis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while routing commands through a cluster.
///
/// The redirection variants ([`Error::Moved`], [`Error::Ask`],
/// [`Error::TryAgain`], [`Error::ClusterDown`]) render through `Display`
/// with the same leading token the server put on the wire, so a caller that
/// receives a surfaced redirection sees the original error text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An IO error occurred.
    #[error("IO error: {source}")]
    Io {
        /// The underlying IO error.
        #[from]
        source: io::Error,
    },

    /// A protocol error occurred.
    #[error("protocol error: {message}")]
    Protocol {
        /// Description of the error.
        message: String,
    },

    /// The server returned an error that carries no cluster semantics.
    #[error("{message}")]
    Server {
        /// Error message from server.
        message: String,
    },

    /// Invalid argument provided.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of invalid argument.
        message: String,
    },

    /// The slot for the requested key has been permanently reassigned.
    ///
    /// The router surfaces this unchanged; the caller is expected to
    /// rebuild the client against the new topology.
    #[error("MOVED {slot} {address}")]
    Moved {
        /// The slot number (0-16383).
        slot: u16,
        /// The address of the node owning this slot (e.g., "127.0.0.1:7001").
        address: String,
    },

    /// One-off redirection while the slot is being migrated.
    ///
    /// Recovered in-band: the router issues `ASKING` on the current
    /// connection and re-dispatches to the target node.
    #[error("ASK {slot} {address}")]
    Ask {
        /// The slot number (0-16383).
        slot: u16,
        /// The address of the node temporarily handling this slot.
        address: String,
    },

    /// Transient multi-key failure during resharding; retried with backoff.
    #[error("TRYAGAIN multi-key command interrupted by slot migration")]
    TryAgain,

    /// The cluster is not currently serving requests; retried with backoff.
    #[error("CLUSTERDOWN the cluster is down")]
    ClusterDown,

    /// The server rejected a multi-key operation spanning slots.
    #[error("CROSSSLOT keys in request don't hash to the same slot")]
    CrossSlot,

    /// The command is not handled by the cluster client.
    #[error("{message}")]
    Unsupported {
        /// The configured rejection reason.
        message: String,
    },

    /// Commands whose key positions are only known server-side.
    #[error("movable-keys commands are not supported in cluster mode")]
    MovableKeys,

    /// A cross-slot multi-key command with no registered reducer.
    #[error("no reducer available for {command}")]
    NoReducer {
        /// Name of the command that could not be reduced.
        command: &'static str,
    },

    /// A pipelined batch whose requests hash to more than one slot.
    #[error("cannot batch commands with keys across different slots")]
    CrossSlotBatch,

    /// An endpoint required for routing has no entry in the connection table.
    #[error("missing connection to {endpoint}")]
    MissingConnection {
        /// The endpoint that was not connected.
        endpoint: String,
    },
}
