// 設定管理の具象実装

use crate::core::ProcessingConfig;
use std::time::Duration;

/// 分単位の時間予算を秒へ変換（端数の秒は切り捨て）
pub fn budget_from_minutes(minutes: f64) -> Duration {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_secs((minutes * 60.0) as u64)
}

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultProcessingConfig {
    worker_count: usize,
    buffer_size: usize,
    time_budget: Duration,
    enable_progress: bool,
    write_json: bool,
}

impl DefaultProcessingConfig {
    pub fn new(cpu_count: usize) -> Self {
        Self {
            worker_count: cpu_count.max(1),
            buffer_size: 100,
            time_budget: Duration::MAX,
            enable_progress: true,
            write_json: false,
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    pub fn with_time_budget_minutes(self, minutes: f64) -> Self {
        self.with_time_budget(budget_from_minutes(minutes))
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }

    pub fn with_json_report(mut self, enable: bool) -> Self {
        self.write_json = enable;
        self
    }
}

impl Default for DefaultProcessingConfig {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

impl ProcessingConfig for DefaultProcessingConfig {
    fn worker_count(&self) -> usize {
        self.worker_count
    }

    fn channel_buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn time_budget(&self) -> Duration {
        self.time_budget
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }

    fn write_json_report(&self) -> bool {
        self.write_json
    }
}
