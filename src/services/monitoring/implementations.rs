// 進捗監視の具象実装

use crate::core::{OutcomeCounts, ProgressReporter};
use async_trait::async_trait;

/// コンソール出力による進捗報告実装
#[derive(Debug, Default, Clone)]
pub struct ConsoleProgressReporter {
    quiet: bool,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_started(&self, total_files: usize, worker_count: usize) {
        if !self.quiet {
            println!("🚀 Enhancing {total_files} entries with {worker_count} workers...");
        }
    }

    async fn report_progress(&self, completed: usize, total: usize) {
        if !self.quiet && total > 0 && (completed % 10 == 0 || completed == total) {
            let percentage = (completed as f64 / total as f64) * 100.0;
            println!("📊 Progress: {completed}/{total} ({percentage:.1}%)");
        }
    }

    async fn report_error(&self, filename: &str, error: &str) {
        if !self.quiet {
            eprintln!("❌ Error processing {filename}: {error}");
        }
    }

    async fn report_completed(&self, counts: OutcomeCounts) {
        if !self.quiet {
            println!(
                "✅ Completed! Enhanced: {}, Skipped: {}, Failed: {}",
                counts.enhanced,
                counts.skipped_not_an_image
                    + counts.skipped_deadline_exceeded
                    + counts.skipped_duplicate,
                counts.failed
            );
            if counts.skipped_deadline_exceeded > 0 {
                println!(
                    "⏱️  {} files were skipped because the time budget ran out",
                    counts.skipped_deadline_exceeded
                );
            }
        }
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _total_files: usize, _worker_count: usize) {}

    async fn report_progress(&self, _completed: usize, _total: usize) {}

    async fn report_error(&self, _filename: &str, _error: &str) {}

    async fn report_completed(&self, _counts: OutcomeCounts) {}
}
