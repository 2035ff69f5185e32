//! The cluster dispatch engine.
//!
//! [`ClusterRouter`] classifies each request, picks the endpoint(s) that
//! must serve it, and drives the redirection state machine: `MOVED` is
//! surfaced for the caller to rebuild against the new topology, `ASK` is
//! recovered in-band through `ASKING`, and `TRYAGAIN`/`CLUSTERDOWN` are
//! retried with exponential backoff until the budget runs out.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::future::try_join_all;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::command::{commands, Request};
use crate::proto::error::{Error, Result};
use crate::proto::frame::Frame;

use super::connections::{
    ConnectionTable, EndHandler, ExceptionHandler, NodeConnection, ReplyHandler,
};
use super::reduce::Reducer;
use super::select::{master_or_replica, select_endpoint, ReadPreference};
use super::slot::key_slot;
use super::split::split_request;
use super::topology::SlotMap;

/// Default number of recovery attempts (redirects and transient retries)
/// per dispatch chain.
pub(crate) const RETRIES: u32 = 16;

/// Routes requests over a fixed set of cluster connections.
///
/// Built through [`super::builder::RouterBuilder`] from a populated
/// [`SlotMap`] and [`ConnectionTable`]; the router mutates neither.
/// Closing the router closes every connection in the table.
pub struct ClusterRouter<C: NodeConnection> {
    pub(crate) slots: SlotMap,
    pub(crate) connections: ConnectionTable<C>,
    pub(crate) read_preference: ReadPreference,
    pub(crate) default_endpoint: String,
    pub(crate) retries: u32,
    pub(crate) reducers: HashMap<&'static str, Reducer>,
    pub(crate) unsupported: HashMap<&'static str, String>,
    pub(crate) closed: AtomicBool,
}

impl<C: NodeConnection> ClusterRouter<C> {
    /// Routes one request and resolves with its reply.
    ///
    /// Single-key and single-slot requests go out as one command; keyless
    /// and cross-slot multi-key commands with a registered reducer fan out
    /// and come back reduced. Unsupported and movable-keys commands fail
    /// before any I/O.
    pub async fn send(&self, request: Request) -> Result<Frame> {
        let cmd = request.command();

        if let Some(reason) = self.unsupported.get(cmd.name()) {
            return Err(Error::Unsupported {
                message: reason.clone(),
            });
        }

        if cmd.is_movable() {
            return Err(Error::MovableKeys);
        }

        if cmd.is_keyless() {
            if let Some(reducer) = self.reducers.get(cmd.name()) {
                // fan out to every slot grouping and fold the replies
                let dispatches = (0..self.slots.size()).map(|group| {
                    let endpoint = self
                        .slots
                        .endpoints_for_slot(group)
                        .and_then(|endpoints| {
                            master_or_replica(
                                self.read_preference,
                                cmd.is_read_only(),
                                endpoints,
                            )
                        })
                        .unwrap_or(&self.default_endpoint);
                    self.dispatch(endpoint, self.retries, &request)
                });
                let parts = try_join_all(dispatches).await?;
                return Ok(reducer(parts));
            }
            // no reducer: any node will do
            let endpoint = self.select(None, cmd.is_read_only());
            return self.dispatch(endpoint, self.retries, &request).await;
        }

        let args = request.args();

        if cmd.is_multi_key() {
            let span = cmd.key_span(args.len());
            let mut batch_slot = None;
            for i in span.keys() {
                let slot = key_slot(&args[i]);
                match batch_slot {
                    None => batch_slot = Some(slot),
                    Some(current) if current != slot => {
                        // keys span slots: only reducible commands can fan out
                        let Some(reducer) = self.reducers.get(cmd.name()) else {
                            return Err(Error::NoReducer {
                                command: cmd.name(),
                            });
                        };
                        let sub_requests = split_request(cmd, args, span);
                        let dispatches = sub_requests.iter().map(|(slot, sub_request)| {
                            let endpoint = self.select(Some(*slot), cmd.is_read_only());
                            self.dispatch(endpoint, self.retries, sub_request)
                        });
                        let parts = try_join_all(dispatches).await?;
                        return Ok(reducer(parts));
                    }
                    Some(_) => {}
                }
            }
            // all keys share one slot: a reducer is not involved
            let endpoint = self.select(batch_slot, cmd.is_read_only());
            return self.dispatch(endpoint, self.retries, &request).await;
        }

        let span = cmd.key_span(args.len());
        let key = args.get(span.start).ok_or_else(|| Error::InvalidArgument {
            message: format!("{} requires a key argument", cmd.name()),
        })?;
        let endpoint = self.select(Some(key_slot(key)), cmd.is_read_only());
        self.dispatch(endpoint, self.retries, &request).await
    }

    /// Routes a pipelined batch that must resolve to a single endpoint.
    ///
    /// The batch is read-only if every member is; the slot is the first one
    /// observed across non-keyless members, and any member hashing
    /// elsewhere fails the batch before any I/O.
    pub async fn batch(&self, requests: Vec<Request>) -> Result<Vec<Frame>> {
        let mut batch_slot = None;
        let mut read_only = false;

        for request in &requests {
            let cmd = request.command();

            if let Some(reason) = self.unsupported.get(cmd.name()) {
                return Err(Error::Unsupported {
                    message: reason.clone(),
                });
            }

            read_only |= cmd.is_read_only();

            if cmd.is_keyless() {
                // runs anywhere; does not constrain the batch slot
                continue;
            }

            if cmd.is_movable() {
                return Err(Error::MovableKeys);
            }

            let args = request.args();
            let span = cmd.key_span(args.len());

            if cmd.is_multi_key() {
                for i in span.keys() {
                    let slot = key_slot(&args[i]);
                    match batch_slot {
                        None => batch_slot = Some(slot),
                        Some(current) if current != slot => {
                            return Err(Error::CrossSlotBatch);
                        }
                        Some(_) => {}
                    }
                }
                continue;
            }

            let key = args.get(span.start).ok_or_else(|| Error::InvalidArgument {
                message: format!("{} requires a key argument", cmd.name()),
            })?;
            let slot = key_slot(key);
            match batch_slot {
                None => batch_slot = Some(slot),
                Some(current) if current != slot => return Err(Error::CrossSlotBatch),
                Some(_) => {}
            }
        }

        let endpoint = self.select(batch_slot, read_only);
        self.dispatch_batch(endpoint, self.retries, &requests).await
    }

    /// The reason a command is refused by this router, if it is.
    pub fn unsupported_reason(&self, command: &crate::command::Command) -> Option<&str> {
        self.unsupported.get(command.name()).map(String::as_str)
    }

    fn select(&self, slot: Option<u16>, read_only: bool) -> &str {
        select_endpoint(
            &self.slots,
            &self.default_endpoint,
            self.read_preference,
            slot,
            read_only,
        )
    }

    /// Sends one request to `endpoint`, following the redirection state
    /// machine while `retries` attempts remain.
    ///
    /// The budget is shared by the whole chain: an `ASKING` hop and a
    /// backoff retry both consume from the same counter.
    async fn dispatch(&self, endpoint: &str, mut retries: u32, request: &Request) -> Result<Frame> {
        let mut endpoint = endpoint.to_string();
        loop {
            let connection = self.connections.get(&endpoint).ok_or_else(|| {
                warn!(%endpoint, "no connection for routed endpoint");
                Error::MissingConnection {
                    endpoint: endpoint.clone(),
                }
            })?;

            let error = match connection.send(request).await {
                Ok(reply) => return Ok(reply),
                Err(error) => error,
            };

            if retries == 0 {
                return Err(error);
            }

            match error {
                // the slot has permanently moved; the caller rebuilds
                Error::Moved { .. } => return Err(error),
                Error::Ask { ref address, .. } => {
                    connection.send(&Request::cmd(&commands::ASKING)).await?;
                    debug!(%address, command = request.command().name(), "following ASK redirect");
                    endpoint = format!("redis://{}", address);
                    retries -= 1;
                }
                Error::TryAgain | Error::ClusterDown => {
                    let delay = backoff(retries);
                    debug!(%error, ?delay, "transient cluster error, backing off");
                    sleep(delay).await;
                    retries -= 1;
                }
                other => return Err(other),
            }
        }
    }

    /// [`Self::dispatch`] for a pipelined batch: the recovery actions apply
    /// to the batch as a whole, with `ASKING` still preceding a retried one.
    async fn dispatch_batch(
        &self,
        endpoint: &str,
        mut retries: u32,
        requests: &[Request],
    ) -> Result<Vec<Frame>> {
        let mut endpoint = endpoint.to_string();
        loop {
            let connection = self.connections.get(&endpoint).ok_or_else(|| {
                warn!(%endpoint, "no connection for routed endpoint");
                Error::MissingConnection {
                    endpoint: endpoint.clone(),
                }
            })?;

            let error = match connection.batch(requests).await {
                Ok(replies) => return Ok(replies),
                Err(error) => error,
            };

            if retries == 0 {
                return Err(error);
            }

            match error {
                Error::Moved { .. } => return Err(error),
                Error::Ask { ref address, .. } => {
                    connection.send(&Request::cmd(&commands::ASKING)).await?;
                    debug!(%address, "following ASK redirect for batch");
                    endpoint = format!("redis://{}", address);
                    retries -= 1;
                }
                Error::TryAgain | Error::ClusterDown => {
                    let delay = backoff(retries);
                    debug!(%error, ?delay, "transient cluster error, backing off batch");
                    sleep(delay).await;
                    retries -= 1;
                }
                other => return Err(other),
            }
        }
    }

    /// Stops reply reads on every connection.
    pub fn pause(&self) {
        for (_, connection) in self.connections.iter() {
            connection.pause();
        }
    }

    /// Resumes reply reads on every connection.
    pub fn resume(&self) {
        for (_, connection) in self.connections.iter() {
            connection.resume();
        }
    }

    /// Requests `amount` more replies from every connection.
    pub fn fetch(&self, amount: usize) {
        for (_, connection) in self.connections.iter() {
            connection.fetch(amount);
        }
    }

    /// Installs a failure handler on every connection.
    pub fn set_exception_handler(&self, handler: ExceptionHandler) {
        for (_, connection) in self.connections.iter() {
            connection.set_exception_handler(handler.clone());
        }
    }

    /// Installs an out-of-band reply handler on every connection.
    pub fn set_reply_handler(&self, handler: ReplyHandler) {
        for (_, connection) in self.connections.iter() {
            connection.set_reply_handler(handler.clone());
        }
    }

    /// Installs an end-of-stream handler on every connection.
    pub fn set_end_handler(&self, handler: EndHandler) {
        for (_, connection) in self.connections.iter() {
            connection.set_end_handler(handler.clone());
        }
    }

    /// Returns true if any connection reports a full waiting queue.
    pub fn pending_queue_full(&self) -> bool {
        self.connections
            .iter()
            .any(|(_, connection)| connection.pending_queue_full())
    }

    /// Closes every connection in the table, once.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        for (_, connection) in self.connections.iter() {
            connection.close();
        }
    }
}

impl<C: NodeConnection> Drop for ClusterRouter<C> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Delay before retrying after `TRYAGAIN`/`CLUSTERDOWN`: doubles as the
/// budget drains and is clamped at 1280 ms once 9 or fewer attempts remain.
fn backoff(retries: u32) -> Duration {
    let exponent = 16u32.saturating_sub(retries.max(9));
    Duration::from_millis((1u64 << exponent) * 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_from_ten_millis() {
        assert_eq!(backoff(16), Duration::from_millis(10));
        assert_eq!(backoff(15), Duration::from_millis(20));
        assert_eq!(backoff(14), Duration::from_millis(40));
        assert_eq!(backoff(10), Duration::from_millis(640));
    }

    #[test]
    fn test_backoff_is_clamped_at_1280_millis() {
        for retries in 0..=9 {
            assert_eq!(backoff(retries), Duration::from_millis(1280));
        }
    }

    #[test]
    fn test_backoff_with_oversized_budget() {
        assert_eq!(backoff(32), Duration::from_millis(10));
    }
}
