//! The connection seam and the endpoint-to-connection table.
//!
//! The router never opens sockets. It borrows long-lived multiplexed
//! connections from a [`ConnectionTable`] populated at cluster-connect
//! time, through the [`NodeConnection`] interface the single-node layer
//! implements.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::command::Request;
use crate::proto::error::{Error, Result};
use crate::proto::frame::Frame;

/// Handler invoked with connection-level failures.
pub type ExceptionHandler = Arc<dyn Fn(&Error) + Send + Sync>;
/// Handler invoked with out-of-band replies (server pushes).
pub type ReplyHandler = Arc<dyn Fn(&Frame) + Send + Sync>;
/// Handler invoked when a connection reaches end-of-stream.
pub type EndHandler = Arc<dyn Fn() + Send + Sync>;

/// A single-node pipelined connection as the router sees it.
///
/// Implementations must deliver replies in send order (the connection is a
/// FIFO) and surface RESP error replies as `Err` values produced by
/// [`crate::cluster::errors::parse_redis_error`], so redirections arrive
/// as typed errors that still carry the raw error text. A panicking
/// caller-supplied handler must not poison the connection's reply queue.
#[async_trait]
pub trait NodeConnection: Send + Sync {
    /// Enqueues one command and resolves with its reply.
    async fn send(&self, request: &Request) -> Result<Frame>;

    /// Enqueues the requests back-to-back and resolves with their replies
    /// in order.
    async fn batch(&self, requests: &[Request]) -> Result<Vec<Frame>>;

    /// Stops reading replies from the socket.
    fn pause(&self);

    /// Resumes reading replies from the socket.
    fn resume(&self);

    /// Requests `amount` more replies in demand-driven mode.
    fn fetch(&self, amount: usize);

    /// Installs the failure handler.
    fn set_exception_handler(&self, handler: ExceptionHandler);

    /// Installs the out-of-band reply handler.
    fn set_reply_handler(&self, handler: ReplyHandler);

    /// Installs the end-of-stream handler.
    fn set_end_handler(&self, handler: EndHandler);

    /// Returns true if the waiting queue cannot take another command.
    fn pending_queue_full(&self) -> bool;

    /// Closes the connection. Must be safe to call more than once.
    fn close(&self);
}

/// Mapping from endpoint to its live connection.
///
/// Populated once when the cluster client connects and read-only
/// afterwards: the router borrows handles but never adds or removes them.
/// An endpoint surfaced by a redirect that has no entry here is a routing
/// error, not a trigger to reconnect.
#[derive(Debug, Default)]
pub struct ConnectionTable<C> {
    connections: HashMap<String, C>,
}

impl<C: NodeConnection> ConnectionTable<C> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    /// Adds a connection for an endpoint, replacing any previous entry.
    pub fn insert(&mut self, endpoint: impl Into<String>, connection: C) {
        self.connections.insert(endpoint.into(), connection);
    }

    /// Looks up the connection for an endpoint.
    pub fn get(&self, endpoint: &str) -> Option<&C> {
        self.connections.get(endpoint)
    }

    /// Iterates all connections.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &C)> {
        self.connections
            .iter()
            .map(|(endpoint, connection)| (endpoint.as_str(), connection))
    }

    /// Number of connected endpoints.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Returns true if the table holds no connections.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl<C: NodeConnection> FromIterator<(String, C)> for ConnectionTable<C> {
    fn from_iter<I: IntoIterator<Item = (String, C)>>(iter: I) -> Self {
        Self {
            connections: iter.into_iter().collect(),
        }
    }
}
