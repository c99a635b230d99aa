//! Ingestion 错误类型

use std::path::PathBuf;

use contracts::QueryId;
use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 回放文件读取失败
    #[error("failed to read feed file {}: {source}", .path.display())]
    ReadFailed {
        /// 文件路径
        path: PathBuf,
        /// 底层错误
        #[source]
        source: std::io::Error,
    },

    /// 队列已被外部关闭
    #[error("queue completed before feed finished (pending item for query {query_id})")]
    QueueClosed {
        /// 被拒绝数据的 query id
        query_id: QueryId,
    },
}

impl From<dispatcher::QueueClosed> for IngestionError {
    fn from(err: dispatcher::QueueClosed) -> Self {
        Self::QueueClosed {
            query_id: err.0.query_id,
        }
    }
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
