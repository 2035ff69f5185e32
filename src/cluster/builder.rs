//! Builder assembling a [`ClusterRouter`].
//!
//! The reducer and unsupported-command registries are captured here, at
//! construction, instead of living in process-wide mutable state: once the
//! router exists the tables are read-only and safe to share.

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::command::{commands, Command};
use crate::proto::frame::Frame;

use super::connections::{ConnectionTable, NodeConnection};
use super::reduce::{self, Reducer};
use super::router::{ClusterRouter, RETRIES};
use super::select::ReadPreference;
use super::topology::SlotMap;

/// Builder for configuring and creating a [`ClusterRouter`].
///
/// # Example
///
/// ```
/// use shardis::{
///     ClusterRouter, ConnectionTable, NodeConnection, ReadPreference, RouterBuilder,
///     SlotMap, SlotRange,
/// };
///
/// fn build<C: NodeConnection>(connections: ConnectionTable<C>) -> ClusterRouter<C> {
///     let slots = SlotMap::new(vec![SlotRange::new(
///         0,
///         16383,
///         vec!["redis://127.0.0.1:7000".to_string()],
///     )]);
///     RouterBuilder::new(slots, connections)
///         .read_preference(ReadPreference::Share)
///         .default_endpoint("redis://127.0.0.1:7000")
///         .build()
/// }
/// ```
pub struct RouterBuilder<C: NodeConnection> {
    slots: SlotMap,
    connections: ConnectionTable<C>,
    read_preference: ReadPreference,
    default_endpoint: Option<String>,
    retries: u32,
    reducers: HashMap<&'static str, Reducer>,
    unsupported: HashMap<&'static str, String>,
}

impl<C: NodeConnection> RouterBuilder<C> {
    /// Starts a builder from a populated slot map and connection table,
    /// with the built-in reducers and unsupported set preloaded.
    pub fn new(slots: SlotMap, connections: ConnectionTable<C>) -> Self {
        Self {
            slots,
            connections,
            read_preference: ReadPreference::default(),
            default_endpoint: None,
            retries: RETRIES,
            reducers: reduce::built_in(),
            unsupported: commands::default_unsupported(),
        }
    }

    /// Sets the read-preference policy for read-only commands.
    pub fn read_preference(mut self, preference: ReadPreference) -> Self {
        self.read_preference = preference;
        self
    }

    /// Sets the fallback endpoint used when a slot has no assignment
    /// (normally the bootstrap address).
    pub fn default_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.default_endpoint = Some(endpoint.into());
        self
    }

    /// Overrides the per-dispatch recovery budget (default 16).
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Registers (or replaces) the reducer for a command, enabling it to
    /// fan out across slots.
    pub fn reducer(
        mut self,
        command: &'static Command,
        reducer: impl Fn(Vec<Frame>) -> Frame + Send + Sync + 'static,
    ) -> Self {
        self.reducers.insert(command.name(), Arc::new(reducer));
        self
    }

    /// Marks a command unsupported with the default rejection message.
    pub fn unsupported(mut self, command: &'static Command) -> Self {
        self.unsupported
            .insert(command.name(), commands::default_unsupported_message(command));
        self
    }

    /// Marks a command unsupported with an explicit rejection message.
    pub fn unsupported_reason(
        mut self,
        command: &'static Command,
        reason: impl Into<String>,
    ) -> Self {
        self.unsupported.insert(command.name(), reason.into());
        self
    }

    /// Builds the router.
    ///
    /// If no default endpoint was configured, the master of the first slot
    /// grouping stands in for it.
    pub fn build(self) -> ClusterRouter<C> {
        let default_endpoint = self.default_endpoint.unwrap_or_else(|| {
            self.slots
                .endpoints_for_slot(0)
                .map(|endpoints| endpoints[0].clone())
                .unwrap_or_default()
        });
        ClusterRouter {
            slots: self.slots,
            connections: self.connections,
            read_preference: self.read_preference,
            default_endpoint,
            retries: self.retries,
            reducers: self.reducers,
            unsupported: self.unsupported,
            closed: AtomicBool::new(false),
        }
    }
}
