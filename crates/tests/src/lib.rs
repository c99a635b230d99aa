//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 分发器日志行为（通过捕获 tracing 事件验证）
//! - 数据源 -> 队列 -> 分发器 的端到端流程
//! - 配置加载到运行的完整链路

pub mod capture;

#[cfg(test)]
mod contract_tests {
    use contracts::{DataItem, QueryId, BEGIN_MARKER};

    #[test]
    fn test_begin_marker_is_exact() {
        assert!(DataItem::begin(1).is_begin());
        assert_eq!(DataItem::begin(1).value, BEGIN_MARKER);
        assert!(!DataItem::new(1, "Begin").is_begin());
        assert!(!DataItem::new(1, " begin").is_begin());
        assert_eq!(DataItem::new(QueryId::new(4), "x").query_id.get(), 4);
    }
}

#[cfg(test)]
mod dispatch_log_tests {
    use std::sync::{Arc, Mutex};

    use contracts::{DataItem, SubscriberError};
    use dispatcher::{
        CancellationToken, DataQueue, Dispatcher, FnSubscriber, StopReason, Subscription,
        SubscriptionRegistry,
    };
    use tracing::Level;

    use crate::capture::CapturedLogs;

    fn recording_subscription(
        query_id: i32,
        name: &str,
        calls: Arc<Mutex<Vec<String>>>,
    ) -> Subscription {
        let begin_calls = Arc::clone(&calls);
        let subscriber = FnSubscriber::new(
            move || {
                begin_calls.lock().unwrap().push("begin".to_string());
                Ok(())
            },
            move |text: &str| {
                calls.lock().unwrap().push(format!("message:{text}"));
                Ok(())
            },
        );
        Subscription::new(query_id, name, Arc::new(subscriber))
    }

    /// Known ids reach their subscriber; the unknown id only produces a warning.
    #[tokio::test]
    async fn test_routes_known_and_warns_on_unknown() {
        let logs = CapturedLogs::new();
        let _guard = logs.set_default();

        let calls = Arc::new(Mutex::new(Vec::new()));
        let registry = SubscriptionRegistry::new();
        registry.register(recording_subscription(1, "subA", Arc::clone(&calls)));

        let (producer, consumer) = DataQueue::unbounded();
        producer.try_push(DataItem::begin(1)).unwrap();
        producer.try_push(DataItem::new(1, "hello")).unwrap();
        producer.try_push(DataItem::new(2, "x")).unwrap();
        producer.complete();

        let dispatcher = Dispatcher::new(Arc::new(registry), consumer, CancellationToken::new());
        let metrics = dispatcher.metrics();
        let reason = dispatcher.process().await;

        assert_eq!(reason, StopReason::Completed);
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["begin".to_string(), "message:hello".to_string()]
        );

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.taken, 3);
        assert_eq!(snapshot.dispatched, 2);
        assert_eq!(snapshot.unknown, 1);

        assert_eq!(logs.count(Level::WARN, "Unexpected subscription id"), 1);
        assert_eq!(logs.count_level(Level::ERROR), 0);
        assert_eq!(logs.count(Level::INFO, "Start dispatching"), 1);
        assert_eq!(
            logs.count(Level::INFO, "Data queue completed, stop processing"),
            1
        );
    }

    /// A subscriber that fails on every message yields one error per item.
    #[tokio::test]
    async fn test_failing_subscriber_logs_each_item() {
        let logs = CapturedLogs::new();
        let _guard = logs.set_default();

        let registry = SubscriptionRegistry::new();
        registry.register(Subscription::new(
            5,
            "broken",
            Arc::new(FnSubscriber::messages_only(|_: &str| {
                Err(SubscriberError::rejected("boom"))
            })),
        ));

        let (producer, consumer) = DataQueue::bounded(4);
        producer.push(DataItem::new(5, "a")).await.unwrap();
        producer.push(DataItem::new(5, "b")).await.unwrap();
        producer.complete();

        let dispatcher = Dispatcher::new(Arc::new(registry), consumer, CancellationToken::new());
        let metrics = dispatcher.metrics();
        let reason = dispatcher.process().await;

        assert_eq!(reason, StopReason::Completed);
        assert_eq!(metrics.snapshot().faults, 2);

        let errors = logs.events_with(Level::ERROR, "Subscriber failed while dispatching data");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field("subscription"), Some("broken"));
        assert!(errors[0]
            .field("item")
            .is_some_and(|item| item.contains("value=\"a\"")));
        assert!(errors[1]
            .field("item")
            .is_some_and(|item| item.contains("value=\"b\"")));
        assert!(errors[0].field("error").is_some_and(|e| e.contains("boom")));
    }

    /// With the tracing panic hook installed, a panicking callback is
    /// reported only through log events.
    #[tokio::test]
    async fn test_panicking_subscriber_reported_through_tracing() {
        observability::install_panic_hook();

        let logs = CapturedLogs::new();
        let _guard = logs.set_default();

        let registry = SubscriptionRegistry::new();
        registry.register(Subscription::new(
            3,
            "explosive",
            Arc::new(FnSubscriber::messages_only(|text: &str| -> Result<(), SubscriberError> {
                panic!("cannot handle {text}")
            })),
        ));

        let (producer, consumer) = DataQueue::unbounded();
        producer.try_push(DataItem::new(3, "x")).unwrap();
        producer.try_push(DataItem::begin(3)).unwrap();
        producer.complete();

        let dispatcher = Dispatcher::new(Arc::new(registry), consumer, CancellationToken::new());
        let metrics = dispatcher.metrics();
        let reason = dispatcher.process().await;

        assert_eq!(reason, StopReason::Completed);
        assert_eq!(metrics.snapshot().faults, 1);
        assert_eq!(metrics.snapshot().dispatched, 1);

        let panics = logs.events_with(Level::ERROR, "Thread panicked");
        assert_eq!(panics.len(), 1);
        assert_eq!(panics[0].field("panic"), Some("cannot handle x"));
        assert!(panics[0]
            .field("location")
            .is_some_and(|l| l.contains("lib.rs")));

        let faults = logs.events_with(Level::ERROR, "Subscriber failed while dispatching data");
        assert_eq!(faults.len(), 1);
        assert!(faults[0]
            .field("error")
            .is_some_and(|e| e.contains("cannot handle x")));
    }

    /// Cancelling a take on an empty, open queue stops the loop.
    #[tokio::test]
    async fn test_cancel_logs_stop() {
        let logs = CapturedLogs::new();
        let _guard = logs.set_default();

        let (_producer, consumer) = DataQueue::unbounded();
        let cancel = CancellationToken::new();
        let dispatcher = Dispatcher::new(
            Arc::new(SubscriptionRegistry::new()),
            consumer,
            cancel.clone(),
        );

        let trigger = cancel.clone();
        let (reason, ()) = tokio::join!(dispatcher.process(), async move {
            tokio::task::yield_now().await;
            trigger.cancel();
        });

        assert_eq!(reason, StopReason::Cancelled);
        assert_eq!(
            logs.count(Level::INFO, "Taking data cancelled, stop processing"),
            1
        );
        assert_eq!(
            logs.count(Level::INFO, "Data queue completed, stop processing"),
            0
        );
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{FeedConfig, QueryId, SubscriberType, SubscriptionConfig};
    use dispatcher::{
        create_dispatcher, create_registry, CancellationToken, DataQueue, Dispatcher,
        FnSubscriber, StopReason, Subscription,
    };
    use ingestion::{Feed, MockFeed, ReplayFeed};
    use tracing::Level;

    use crate::capture::CapturedLogs;

    /// End-to-end test: MockFeed -> DataQueue -> Dispatcher
    #[tokio::test]
    async fn test_e2e_mock_pipeline() {
        let begins = Arc::new(AtomicU64::new(0));
        let messages = Arc::new(AtomicU64::new(0));

        let registry = create_registry(&[]).unwrap();
        for id in [1, 2] {
            let b = Arc::clone(&begins);
            let m = Arc::clone(&messages);
            registry.register(Subscription::new(
                id,
                format!("sub-{id}"),
                Arc::new(FnSubscriber::new(
                    move || {
                        b.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    },
                    move |_: &str| {
                        m.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    },
                )),
            ));
        }

        let (producer, consumer) = DataQueue::bounded(2);
        let cancel = CancellationToken::new();
        let dispatcher = Dispatcher::new(registry, consumer, cancel.clone());
        let metrics = dispatcher.metrics();
        let dispatcher_handle = dispatcher.spawn();

        let feed = Feed::Mock(MockFeed::for_queries([QueryId::new(1), QueryId::new(2)], 25));
        let report = feed.start(producer, cancel).await.unwrap().unwrap();

        let reason = tokio::time::timeout(Duration::from_secs(5), dispatcher_handle)
            .await
            .expect("dispatcher should drain the queue")
            .unwrap();

        assert_eq!(reason, StopReason::Completed);
        assert_eq!(report.produced, 52);
        assert!(!report.cancelled);
        assert_eq!(begins.load(Ordering::SeqCst), 2);
        assert_eq!(messages.load(Ordering::SeqCst), 50);
        assert_eq!(metrics.snapshot().dispatched, 52);
    }

    /// End-to-end test: replay file -> DataQueue -> file subscriber
    #[tokio::test]
    async fn test_e2e_replay_to_file_subscriber() {
        let dir = tempfile::tempdir().unwrap();
        let feed_path = dir.path().join("feed.txt");
        let out_path = dir.path().join("out.txt");

        {
            let mut f = std::fs::File::create(&feed_path).unwrap();
            writeln!(f, "# recorded stream").unwrap();
            writeln!(f, "3 begin").unwrap();
            writeln!(f, "3 first row").unwrap();
            writeln!(f, "not-a-number oops").unwrap();
            writeln!(f, "4 ignored").unwrap();
            writeln!(f).unwrap();
            writeln!(f, "3 second row").unwrap();
        }

        let mut params = HashMap::new();
        params.insert("path".to_string(), out_path.display().to_string());
        let configs = vec![SubscriptionConfig {
            query_id: QueryId::new(3),
            name: "writer".to_string(),
            subscriber_type: SubscriberType::File,
            params,
        }];

        let (producer, consumer) = DataQueue::unbounded();
        let cancel = CancellationToken::new();
        let dispatcher = create_dispatcher(&configs, consumer, cancel.clone()).unwrap();
        let metrics = dispatcher.metrics();
        let dispatcher_handle = dispatcher.spawn();

        let feed = Feed::Replay(ReplayFeed::new(&feed_path, Duration::ZERO));
        let report = feed.start(producer, cancel).await.unwrap().unwrap();
        let reason = dispatcher_handle.await.unwrap();

        assert_eq!(reason, StopReason::Completed);
        assert_eq!(report.produced, 4);
        assert_eq!(report.skipped, 1);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.dispatched, 3);
        assert_eq!(snapshot.unknown, 1);

        let written = std::fs::read_to_string(&out_path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("# begin "));
        assert_eq!(&lines[1..], ["first row", "second row"]);
    }

    /// Configuration file -> feed + dispatcher, with the unknown id logged.
    #[tokio::test]
    async fn test_e2e_from_config_file() {
        let logs = CapturedLogs::new();
        let _guard = logs.set_default();

        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("stream.toml");
        std::fs::write(
            &config_path,
            r#"
            [queue]
            capacity = 1

            [feed]
            kind = "mock"
            query_ids = [1, 2]
            messages_per_query = 3

            [[subscriptions]]
            query_id = 1
            name = "subA"
            subscriber_type = "log"
            "#,
        )
        .unwrap();

        let blueprint = config_loader::ConfigLoader::load_from_path(&config_path).unwrap();
        assert!(matches!(blueprint.feed, FeedConfig::Mock { .. }));

        let (producer, consumer) = DataQueue::with_capacity(blueprint.queue.capacity);
        let cancel = CancellationToken::new();
        let dispatcher =
            create_dispatcher(&blueprint.subscriptions, consumer, cancel.clone()).unwrap();
        let metrics = dispatcher.metrics();

        let feed_handle = Feed::from_config(&blueprint.feed).start(producer, cancel);
        let reason = dispatcher.process().await;
        let report = feed_handle.await.unwrap().unwrap();

        assert_eq!(reason, StopReason::Completed);
        assert_eq!(report.produced, 8);
        assert_eq!(metrics.snapshot().dispatched, 4);
        assert_eq!(logs.count(Level::WARN, "Unexpected subscription id"), 4);
        assert_eq!(logs.count_level(Level::ERROR), 0);
    }

    /// Cancelling mid-stream stops both sides without draining the queue.
    #[tokio::test]
    async fn test_e2e_cancel_mid_stream() {
        let registry = create_registry(&[SubscriptionConfig {
            query_id: QueryId::new(1),
            name: "log".to_string(),
            subscriber_type: SubscriberType::Log,
            params: HashMap::new(),
        }])
        .unwrap();

        let (producer, consumer) = DataQueue::bounded(8);
        let cancel = CancellationToken::new();
        let dispatcher = Dispatcher::new(registry, consumer, cancel.clone());
        let dispatcher_handle = dispatcher.spawn();

        let feed = Feed::from_config(&FeedConfig::Mock {
            query_ids: vec![QueryId::new(1)],
            messages_per_query: 1_000_000,
            interval_ms: 1,
        });
        let feed_handle = feed.start(producer, cancel.clone());

        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let reason = tokio::time::timeout(Duration::from_secs(5), dispatcher_handle)
            .await
            .expect("dispatcher should stop on cancel")
            .unwrap();
        let report = tokio::time::timeout(Duration::from_secs(5), feed_handle)
            .await
            .expect("feed should stop on cancel")
            .unwrap()
            .unwrap();

        assert_eq!(reason, StopReason::Cancelled);
        assert!(report.cancelled);
        assert!(report.produced < 1_000_001);
    }
}
