//! Mock 数据源
//!
//! 无真实上游时用于测试：每个 query 先发送 "begin"，再轮询发送消息。

use std::time::Duration;

use contracts::{DataItem, QueryId};
use dispatcher::QueueProducer;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::Result;
use crate::feed::{pace, push_or_cancel, FeedReport};

/// Mock 数据源配置
#[derive(Debug, Clone)]
pub struct MockFeedConfig {
    /// 生成数据的 query id
    pub query_ids: Vec<QueryId>,

    /// 每个 query 的消息数 (不含 begin)
    pub messages_per_query: u32,

    /// 相邻两条数据的间隔
    pub interval: Duration,
}

impl Default for MockFeedConfig {
    fn default() -> Self {
        Self {
            query_ids: vec![QueryId::new(1)],
            messages_per_query: 10,
            interval: Duration::ZERO,
        }
    }
}

/// Mock 数据源
#[derive(Debug, Clone)]
pub struct MockFeed {
    config: MockFeedConfig,
}

impl MockFeed {
    /// 创建新的 Mock 数据源
    pub fn new(config: MockFeedConfig) -> Self {
        Self { config }
    }

    /// 为给定 query 生成 `messages` 条消息
    pub fn for_queries(query_ids: impl IntoIterator<Item = QueryId>, messages: u32) -> Self {
        Self::new(MockFeedConfig {
            query_ids: query_ids.into_iter().collect(),
            messages_per_query: messages,
            ..Default::default()
        })
    }

    /// 生成的数据序列
    ///
    /// 先为每个 query 发 begin，然后按轮次发送 `message-<n>`。
    pub fn items(&self) -> impl Iterator<Item = DataItem> + '_ {
        let ids = &self.config.query_ids;
        let begins = ids.iter().map(|&id| DataItem::begin(id));
        let messages = (1..=self.config.messages_per_query).flat_map(move |n| {
            ids.iter()
                .map(move |&id| DataItem::new(id, format!("message-{n}")))
        });
        begins.chain(messages)
    }

    pub(crate) async fn run(
        &self,
        producer: &QueueProducer,
        cancel: &CancellationToken,
    ) -> Result<FeedReport> {
        let mut report = FeedReport::default();

        debug!(
            queries = self.config.query_ids.len(),
            messages_per_query = self.config.messages_per_query,
            "mock feed started"
        );

        for item in self.items() {
            trace!(item = %item, "mock item");
            if !push_or_cancel(producer, cancel, item).await? {
                report.cancelled = true;
                break;
            }
            report.produced += 1;
            observability::record_item_produced("mock");

            if !pace(self.config.interval, cancel).await {
                report.cancelled = true;
                break;
            }
        }

        debug!(produced = report.produced, cancelled = report.cancelled, "mock feed stopped");
        Ok(report)
    }
}
