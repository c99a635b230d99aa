//! StreamBlueprint - Config Loader 输出
//!
//! 描述完整的分发配置：队列、数据源 (feed)、订阅列表。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::QueryId;

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的分发配置蓝图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 队列设置
    #[serde(default)]
    pub queue: QueueConfig,

    /// 数据源
    pub feed: FeedConfig,

    /// 订阅列表
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionConfig>,
}

/// 队列配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueConfig {
    /// 队列容量 (None = 无界)
    #[serde(default)]
    pub capacity: Option<usize>,
}

/// 数据源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedConfig {
    /// 模拟数据源：每个 query 先发 "begin"，再发若干消息
    Mock {
        /// 生成数据的 query id 列表
        query_ids: Vec<QueryId>,

        /// 每个 query 的消息数 (不含 begin)
        #[serde(default = "default_messages_per_query")]
        messages_per_query: u32,

        /// 相邻两条数据的间隔 (毫秒)
        #[serde(default)]
        interval_ms: u64,
    },

    /// 回放文件：每行 `<query_id> <value>`
    Replay {
        /// 文件路径
        path: PathBuf,

        /// 相邻两条数据的间隔 (毫秒)
        #[serde(default)]
        interval_ms: u64,
    },
}

fn default_messages_per_query() -> u32 {
    10
}

impl FeedConfig {
    /// 数据源类型名称 (用于日志)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Mock { .. } => "mock",
            Self::Replay { .. } => "replay",
        }
    }
}

/// 订阅配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    /// 订阅的 query id (唯一)
    pub query_id: QueryId,

    /// 订阅名称
    pub name: String,

    /// 订阅者类型
    pub subscriber_type: SubscriberType,

    /// 类型特定参数
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// 订阅者类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriberType {
    /// 日志输出
    Log,
    /// 文件输出
    File,
}
