//! QueryId - identifier of the query a streamed item belongs to

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of an active query subscription.
///
/// The producer stamps every `DataItem` with the id of the query that
/// originated it; the dispatcher uses it as the registry lookup key.
///
/// # Examples
/// ```
/// use contracts::QueryId;
///
/// let id: QueryId = "42".parse().unwrap();
/// assert_eq!(id, QueryId::new(42));
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryId(i32);

impl QueryId {
    /// Create a new QueryId.
    #[inline]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Get the raw integer value.
    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for QueryId {
    #[inline]
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<QueryId> for i32 {
    #[inline]
    fn from(id: QueryId) -> Self {
        id.0
    }
}

impl FromStr for QueryId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i32>().map(Self)
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QueryId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse() {
        assert_eq!("7".parse::<QueryId>().unwrap(), QueryId::new(7));
        assert_eq!(" -3 ".parse::<QueryId>().unwrap(), QueryId::new(-3));
        assert!("abc".parse::<QueryId>().is_err());
    }

    #[test]
    fn test_hashmap_key() {
        let mut map: HashMap<QueryId, &str> = HashMap::new();
        map.insert(1.into(), "one");
        map.insert(2.into(), "two");

        assert_eq!(map.get(&QueryId::new(1)), Some(&"one"));
        assert_eq!(map.get(&QueryId::new(3)), None);
    }

    #[test]
    fn test_serde_transparent() {
        let id = QueryId::new(12);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "12");

        let parsed: QueryId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
