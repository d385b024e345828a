// レポート永続化の具象実装

use crate::core::{ReportPersistence, RunReport, TaskOutcome};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub const TEXT_REPORT_FILENAME: &str = "stats.txt";
pub const JSON_REPORT_FILENAME: &str = "stats.json";

/// 人が読むためのテキストレポートを生成
///
/// 先頭8行は集計値（1行1項目）、その後に結果種別ごとの件数と
/// ファイル単位の結果が続く。
pub fn render_text_report(report: &RunReport) -> String {
    let factors = &report.factors;
    let counts = &report.counts;

    let mut lines = vec![
        format!("Number of images enhanced: {}", report.matched_count),
        format!("Number of raw images: {}", report.total_input_count),
        format!("Output folder: {}", report.output_dir.display()),
        format!("Elapsed time: {:.2}", report.elapsed_seconds),
        format!("Number of pool workers: {}", report.worker_count),
        format!("Brightness factor: {:?}", factors.brightness),
        format!("Sharpness factor: {:?}", factors.sharpness),
        format!("Contrast factor: {:?}", factors.contrast),
        String::new(),
        format!("Enhanced: {}", counts.enhanced),
        format!("Skipped (not an image): {}", counts.skipped_not_an_image),
        format!(
            "Skipped (time budget exceeded): {}",
            counts.skipped_deadline_exceeded
        ),
        format!("Skipped (duplicate name): {}", counts.skipped_duplicate),
        format!("Failed: {}", counts.failed),
    ];

    if !report.outcomes.is_empty() {
        lines.push(String::new());
        lines.push("Files:".to_string());
        lines.extend(report.outcomes.iter().map(|result| match &result.outcome {
            TaskOutcome::Failed { stage, reason } => format!(
                "  {}: failed ({}: {})",
                result.filename,
                stage.as_str(),
                reason
            ),
            outcome => format!("  {}: {}", result.filename, outcome.label()),
        }));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// 出力ディレクトリに stats.txt を書き出す永続化実装
#[derive(Debug, Clone, Default)]
pub struct TextReportPersistence;

impl TextReportPersistence {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReportPersistence for TextReportPersistence {
    async fn persist(&self, report: &RunReport) -> Result<()> {
        let path = report.output_dir.join(TEXT_REPORT_FILENAME);
        tokio::fs::write(&path, render_text_report(report))
            .await
            .with_context(|| format!("Failed to write report: {}", path.display()))
    }

    fn format_name(&self) -> &'static str {
        "text"
    }
}

/// 出力ディレクトリに stats.json を書き出す永続化実装
#[derive(Debug, Clone, Default)]
pub struct JsonReportPersistence;

impl JsonReportPersistence {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReportPersistence for JsonReportPersistence {
    async fn persist(&self, report: &RunReport) -> Result<()> {
        let path = report.output_dir.join(JSON_REPORT_FILENAME);
        let mut json = serde_json::to_value(report).context("Failed to serialize report")?;
        json["generated_at"] = serde_json::Value::String(chrono::Utc::now().to_rfc3339());
        json["elapsed_seconds"] = serde_json::json!(report.elapsed_rounded());

        let content = serde_json::to_string_pretty(&json).context("Failed to serialize report")?;
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write report: {}", path.display()))
    }

    fn format_name(&self) -> &'static str {
        "json"
    }
}

/// 複数の永続化先へ順に書き出す実装
#[derive(Default)]
pub struct FanOutReportPersistence {
    targets: Vec<Box<dyn ReportPersistence>>,
}

impl FanOutReportPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: impl ReportPersistence + 'static) -> Self {
        self.targets.push(Box::new(target));
        self
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[async_trait]
impl ReportPersistence for FanOutReportPersistence {
    async fn persist(&self, report: &RunReport) -> Result<()> {
        for target in &self.targets {
            target
                .persist(report)
                .await
                .with_context(|| format!("Failed to persist {} report", target.format_name()))?;
        }
        Ok(())
    }

    fn format_name(&self) -> &'static str {
        "fan-out"
    }
}

/// メモリ内保存の永続化実装（テスト用）
#[derive(Debug, Clone, Default)]
pub struct MemoryReportPersistence {
    reports: Arc<Mutex<Vec<RunReport>>>,
}

impl MemoryReportPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存されたレポートを取得
    pub fn stored_reports(&self) -> Vec<RunReport> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }

    /// 最後に保存されたレポート
    pub fn last_report(&self) -> Option<RunReport> {
        self.stored_reports().pop()
    }
}

#[async_trait]
impl ReportPersistence for MemoryReportPersistence {
    async fn persist(&self, report: &RunReport) -> Result<()> {
        self.reports
            .lock()
            .map_err(|_| anyhow::anyhow!("Report store lock poisoned"))?
            .push(report.clone());
        Ok(())
    }

    fn format_name(&self) -> &'static str {
        "memory"
    }
}

/// レポートの出力パス一覧（表示用）
pub fn report_paths(report: &RunReport, include_json: bool) -> Vec<PathBuf> {
    let mut paths = vec![report.output_dir.join(TEXT_REPORT_FILENAME)];
    if include_json {
        paths.push(report.output_dir.join(JSON_REPORT_FILENAME));
    }
    paths
}
