//! Cluster routing: slot hashing, topology lookup, endpoint selection,
//! request splitting, redirect handling, and scatter/gather reduction.
//!
//! The entry point is [`router::ClusterRouter`], built by
//! [`builder::RouterBuilder`] over a populated [`topology::SlotMap`] and
//! [`connections::ConnectionTable`].
//!
//! ## Example
//!
//! ```no_run
//! # async fn example(
//! #     connections: shardis::ConnectionTable<impl shardis::NodeConnection>,
//! # ) -> shardis::Result<()> {
//! use shardis::command::{commands, Request};
//! use shardis::{RouterBuilder, SlotMap, SlotRange};
//!
//! let slots = SlotMap::new(vec![SlotRange::new(
//!     0,
//!     16383,
//!     vec!["redis://127.0.0.1:7000".to_string()],
//! )]);
//! let router = RouterBuilder::new(slots, connections).build();
//!
//! // routed by the slot of "user:1000"
//! let reply = router
//!     .send(Request::cmd(&commands::GET).arg("user:1000"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod connections;
pub mod errors;
pub mod reduce;
pub mod router;
pub mod select;
pub mod slot;
pub mod split;
pub mod topology;
