//! DataItem - one unit of streamed data

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::QueryId;

/// Payload that marks the start of a query's stream.
pub const BEGIN_MARKER: &str = "begin";

/// One unit of streamed data
///
/// Created by the producer, consumed exactly once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataItem {
    /// Query that originated this item
    pub query_id: QueryId,

    /// Text payload; `"begin"` marks stream start, anything else is a message body
    pub value: String,
}

impl DataItem {
    /// Create a new item
    pub fn new(query_id: impl Into<QueryId>, value: impl Into<String>) -> Self {
        Self {
            query_id: query_id.into(),
            value: value.into(),
        }
    }

    /// Create a stream-start marker for `query_id`
    pub fn begin(query_id: impl Into<QueryId>) -> Self {
        Self::new(query_id, BEGIN_MARKER)
    }

    /// Whether this item is the stream-start marker (exact match)
    pub fn is_begin(&self) -> bool {
        self.value == BEGIN_MARKER
    }
}

impl fmt::Display for DataItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DataItem(query_id={}, value={:?})",
            self.query_id, self.value
        )
    }
}
