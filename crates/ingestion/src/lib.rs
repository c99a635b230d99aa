//! # Ingestion
//!
//! Producer side of the dispatch queue.
//!
//! Responsibilities:
//! - Generate or replay `DataItem`s
//! - Push them into the shared `DataQueue` (waiting when bounded and full)
//! - Complete the queue when the feed is exhausted or cancelled
//!
//! ## Usage Example
//!
//! ```ignore
//! use dispatcher::{CancellationToken, DataQueue};
//! use ingestion::Feed;
//!
//! let (producer, consumer) = DataQueue::bounded(128);
//! let cancel = CancellationToken::new();
//! let handle = Feed::from_config(&blueprint.feed).start(producer, cancel.clone());
//! // ... run a Dispatcher over `consumer` ...
//! let report = handle.await??;
//! ```

mod error;
mod feed;
mod mock;
mod replay;

pub use error::{IngestionError, Result};
pub use feed::{Feed, FeedReport};
pub use mock::{MockFeed, MockFeedConfig};
pub use replay::{parse_line, ReplayFeed};
