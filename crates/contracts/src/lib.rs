//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Data Model
//! - `DataItem` is one queued unit: a `QueryId` plus a text payload
//! - The payload `"begin"` marks the start of a query's stream
//! - `Subscription` binds a `QueryId` to a `Subscriber` callback

mod blueprint;
mod data_item;
mod error;
mod query_id;
mod subscriber;

pub use blueprint::*;
pub use data_item::{DataItem, BEGIN_MARKER};
pub use error::*;
pub use query_id::QueryId;
pub use subscriber::{Subscriber, Subscription};
