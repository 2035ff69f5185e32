//! # Shardis
//!
//! The cluster-aware routing core of a Redis client: given a command or a
//! pipeline, shardis decides which node of a sharded deployment must serve
//! it, dispatches over a pooled connection, interprets MOVED/ASK/TRYAGAIN/
//! CLUSTERDOWN, and fans multi-key commands out across shards with
//! per-command reply reduction.
//!
//! Shardis does not open sockets or speak RESP itself; the single-node
//! connection layer plugs in through the [`NodeConnection`] trait, and the
//! topology arrives as an already-populated [`SlotMap`].
//!
//! ## Example
//!
//! ```no_run
//! # async fn example(
//! #     connections: shardis::ConnectionTable<impl shardis::NodeConnection>,
//! # ) -> shardis::Result<()> {
//! use shardis::command::{commands, Request};
//! use shardis::{ReadPreference, RouterBuilder, SlotMap, SlotRange};
//!
//! let slots = SlotMap::new(vec![
//!     SlotRange::new(0, 8191, vec!["redis://127.0.0.1:7000".to_string()]),
//!     SlotRange::new(8192, 16383, vec!["redis://127.0.0.1:7001".to_string()]),
//! ]);
//!
//! let router = RouterBuilder::new(slots, connections)
//!     .read_preference(ReadPreference::Share)
//!     .default_endpoint("redis://127.0.0.1:7000")
//!     .build();
//!
//! // MSET fans out per slot and reduces the replies back to one OK
//! let reply = router
//!     .send(Request::cmd(&commands::MSET).arg("a").arg("1").arg("b").arg("2"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod cluster;
pub mod command;
pub(crate) mod proto;

pub use crate::cluster::builder::RouterBuilder;
pub use crate::cluster::connections::{
    ConnectionTable, EndHandler, ExceptionHandler, NodeConnection, ReplyHandler,
};
pub use crate::cluster::errors::parse_redis_error;
pub use crate::cluster::reduce::Reducer;
pub use crate::cluster::router::ClusterRouter;
pub use crate::cluster::select::ReadPreference;
pub use crate::cluster::slot::{key_slot, SLOT_COUNT};
pub use crate::cluster::topology::{SlotMap, SlotRange};
pub use crate::command::{Command, Request};
pub use crate::proto::error::{Error, Result};
pub use crate::proto::frame::Frame;
