//! 分发指标收集模块
//!
//! 通过 `metrics` facade 上报计数器与直方图；未安装 recorder 时为空操作。

use metrics::{counter, histogram};

/// 单条数据的分发结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 回调成功执行
    Dispatched,
    /// query id 未注册，数据被丢弃
    Unknown,
    /// 回调返回错误或 panic
    Fault,
}

impl DispatchOutcome {
    /// 指标标签值
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dispatched => "dispatched",
            Self::Unknown => "unknown",
            Self::Fault => "fault",
        }
    }
}

/// 记录从队列取出一条数据
pub fn record_item_taken() {
    counter!("stream_dispatch_items_taken_total").increment(1);
}

/// 记录分发结果
pub fn record_dispatch_outcome(outcome: DispatchOutcome) {
    counter!(
        "stream_dispatch_items_total",
        "status" => outcome.as_str()
    )
    .increment(1);
}

/// 记录回调耗时
pub fn record_callback_latency_ms(latency_ms: f64) {
    histogram!("stream_dispatch_callback_latency_ms").record(latency_ms);
}

/// 记录数据源产出
pub fn record_item_produced(feed: &'static str) {
    counter!("stream_feed_items_produced_total", "feed" => feed).increment(1);
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 摘要
    pub fn summary(&self) -> StatsSummary {
        StatsSummary::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            stats.push(v);
        }

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);

        let summary = stats.summary();
        assert!((summary.min - 1.0).abs() < 1e-10);
        assert!((summary.max - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_summary_display() {
        let summary = RunningStats::default().summary();
        assert_eq!(summary.to_string(), "N/A");
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(DispatchOutcome::Dispatched.as_str(), "dispatched");
        assert_eq!(DispatchOutcome::Unknown.as_str(), "unknown");
        assert_eq!(DispatchOutcome::Fault.as_str(), "fault");
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        record_item_taken();
        record_dispatch_outcome(DispatchOutcome::Fault);
        record_callback_latency_ms(0.5);
        record_item_produced("mock");
    }
}
