//! 滚动交互指标收集模块
//!
//! 基于 InteractionRecord 收集和统计引擎的运行指标。

use std::collections::BTreeMap;

use contracts::InteractionRecord;
use metrics::{counter, gauge, histogram};

/// 从 InteractionRecord 记录指标
///
/// 每产生一条记录时调用。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_interaction;
///
/// if let Some(record) = engine.dispatch(&mut host, wakeup) {
///     record_interaction(&record);
/// }
/// ```
pub fn record_interaction(record: &InteractionRecord) {
    let source = record.scroll_source().as_str();

    // 交互计数
    counter!("scroll_timing_interactions_total", "source" => source).increment(1);

    // 时长
    histogram!("scroll_timing_duration_ms", "source" => source).record(record.duration());
    histogram!("scroll_timing_first_frame_delay_ms")
        .record(record.first_frame_time() - record.start_time());

    // 帧统计
    histogram!("scroll_timing_frames_expected").record(record.frames_expected() as f64);
    histogram!("scroll_timing_frames_produced").record(record.frames_produced() as f64);
    if record.frames_dropped() > 0 {
        counter!("scroll_timing_frames_dropped_total").increment(record.frames_dropped() as u64);
    }
    histogram!("scroll_timing_smoothness").record(record.smoothness());

    // 位移
    let distance = record.total_distance();
    histogram!("scroll_timing_distance_px").record(distance);
    histogram!("scroll_timing_velocity_px_per_ms").record(record.velocity());
    if distance == 0.0 {
        counter!("scroll_timing_zero_distance_total").increment(1);
    }
}

/// 记录刷新率估计
pub fn record_refresh_rate(hz: f64) {
    gauge!("scroll_timing_refresh_rate_hz").set(hz);
}

/// 记录当前活跃交互数
pub fn record_active_interactions(count: usize) {
    gauge!("scroll_timing_active_interactions").set(count as f64);
}

/// 滚动交互聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct InteractionAggregator {
    /// 交互总数
    pub total_interactions: u64,

    /// 各输入来源的交互数
    pub source_counts: BTreeMap<&'static str, u64>,

    /// 期望帧总数
    pub frames_expected: u64,

    /// 实际帧总数
    pub frames_produced: u64,

    /// 丢帧总数
    pub frames_dropped: u64,

    /// 位移为零的交互数
    pub zero_distance: u64,

    /// 时长统计 (ms)
    pub duration_stats: RunningStats,

    /// 平滑度统计
    pub smoothness_stats: RunningStats,

    /// 速度统计 (px/ms)
    pub velocity_stats: RunningStats,

    /// 位移统计 (px)
    pub distance_stats: RunningStats,
}

impl InteractionAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, record: &InteractionRecord) {
        self.total_interactions += 1;
        *self
            .source_counts
            .entry(record.scroll_source().as_str())
            .or_insert(0) += 1;

        self.frames_expected += record.frames_expected() as u64;
        self.frames_produced += record.frames_produced() as u64;
        self.frames_dropped += record.frames_dropped() as u64;

        let distance = record.total_distance();
        if distance == 0.0 {
            self.zero_distance += 1;
        }

        self.duration_stats.push(record.duration());
        self.smoothness_stats.push(record.smoothness());
        self.velocity_stats.push(record.velocity());
        self.distance_stats.push(distance);
    }

    /// 生成摘要报告
    pub fn summary(&self) -> InteractionSummary {
        InteractionSummary {
            total_interactions: self.total_interactions,
            source_counts: self.source_counts.clone(),
            frames_expected: self.frames_expected,
            frames_produced: self.frames_produced,
            frames_dropped: self.frames_dropped,
            drop_rate: if self.frames_expected > 0 {
                self.frames_dropped as f64 / self.frames_expected as f64 * 100.0
            } else {
                0.0
            },
            zero_distance: self.zero_distance,
            duration_ms: StatsSummary::from(&self.duration_stats),
            smoothness: StatsSummary::from(&self.smoothness_stats),
            velocity: StatsSummary::from(&self.velocity_stats),
            distance_px: StatsSummary::from(&self.distance_stats),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct InteractionSummary {
    pub total_interactions: u64,
    pub source_counts: BTreeMap<&'static str, u64>,
    pub frames_expected: u64,
    pub frames_produced: u64,
    pub frames_dropped: u64,
    pub drop_rate: f64,
    pub zero_distance: u64,
    pub duration_ms: StatsSummary,
    pub smoothness: StatsSummary,
    pub velocity: StatsSummary,
    pub distance_px: StatsSummary,
}

impl std::fmt::Display for InteractionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Scroll Interaction Summary ===")?;
        writeln!(f, "Interactions: {}", self.total_interactions)?;
        if !self.source_counts.is_empty() {
            let by_source: Vec<String> = self
                .source_counts
                .iter()
                .map(|(source, count)| format!("{source}={count}"))
                .collect();
            writeln!(f, "By source: {}", by_source.join(", "))?;
        }
        writeln!(
            f,
            "Frames: expected={}, produced={}, dropped={} ({:.2}%)",
            self.frames_expected, self.frames_produced, self.frames_dropped, self.drop_rate
        )?;
        writeln!(f, "Zero-distance interactions: {}", self.zero_distance)?;
        writeln!(f, "Duration (ms): {}", self.duration_ms)?;
        writeln!(f, "Smoothness: {}", self.smoothness)?;
        writeln!(f, "Velocity (px/ms): {}", self.velocity)?;
        writeln!(f, "Distance (px): {}", self.distance_px)?;
        Ok(())
    }
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

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
