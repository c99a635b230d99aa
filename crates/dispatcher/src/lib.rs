//! # Dispatcher
//!
//! 数据分发模块。
//!
//! 负责：
//! - 从阻塞队列消费 `DataItem`
//! - 按 `query_id` 路由到已注册的订阅者回调
//! - 隔离单条数据的失败（未知 id / 回调出错），不中断数据流

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod queue;
pub mod registry;
pub mod subscribers;

pub use contracts::{DataItem, QueryId, Subscriber, Subscription};
pub use dispatcher::{create_dispatcher, create_registry, Dispatcher, StopReason};
pub use error::{DispatcherError, QueueClosed, TryPushError};
pub use metrics::{DispatchMetrics, DispatchSnapshot};
pub use queue::{DataQueue, ItemQueue, QueueConsumer, QueueProducer, Take};
pub use registry::SubscriptionRegistry;
pub use subscribers::{create_subscriber, FileSubscriber, FnSubscriber, LogSubscriber};
pub use tokio_util::sync::CancellationToken;
