// 一括補正システムのトレイト定義

use super::types::{OutcomeCounts, RunReport};
use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::time::Duration;

/// 実行設定を抽象化するトレイト
#[automock]
pub trait ProcessingConfig: Send + Sync {
    /// 同時に動かすワーカー数
    fn worker_count(&self) -> usize;

    /// チャンネルバッファサイズ
    fn channel_buffer_size(&self) -> usize;

    /// 実行全体の時間予算
    fn time_budget(&self) -> Duration;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;

    /// stats.json も書き出すかどうか
    fn write_json_report(&self) -> bool;
}

impl ProcessingConfig for Box<dyn ProcessingConfig> {
    fn worker_count(&self) -> usize {
        self.as_ref().worker_count()
    }

    fn channel_buffer_size(&self) -> usize {
        self.as_ref().channel_buffer_size()
    }

    fn time_budget(&self) -> Duration {
        self.as_ref().time_budget()
    }

    fn enable_progress_reporting(&self) -> bool {
        self.as_ref().enable_progress_reporting()
    }

    fn write_json_report(&self) -> bool {
        self.as_ref().write_json_report()
    }
}

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 処理開始時の報告
    async fn report_started(&self, total_files: usize, worker_count: usize);

    /// 進捗更新の報告
    async fn report_progress(&self, completed: usize, total: usize);

    /// ファイル単位の失敗の報告
    async fn report_error(&self, filename: &str, error: &str);

    /// 処理完了時の報告
    async fn report_completed(&self, counts: OutcomeCounts);
}

#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_started(&self, total_files: usize, worker_count: usize) {
        self.as_ref().report_started(total_files, worker_count).await
    }

    async fn report_progress(&self, completed: usize, total: usize) {
        self.as_ref().report_progress(completed, total).await
    }

    async fn report_error(&self, filename: &str, error: &str) {
        self.as_ref().report_error(filename, error).await
    }

    async fn report_completed(&self, counts: OutcomeCounts) {
        self.as_ref().report_completed(counts).await
    }
}

/// 実行レポートの永続化トレイト
#[automock]
#[async_trait]
pub trait ReportPersistence: Send + Sync {
    /// レポートを保存
    async fn persist(&self, report: &RunReport) -> Result<()>;

    /// 保存形式の名前
    fn format_name(&self) -> &'static str;
}

#[async_trait]
impl ReportPersistence for Box<dyn ReportPersistence> {
    async fn persist(&self, report: &RunReport) -> Result<()> {
        self.as_ref().persist(report).await
    }

    fn format_name(&self) -> &'static str {
        self.as_ref().format_name()
    }
}
