// Collector - タスク結果の集約

use crate::core::{ProgressReporter, TaskOutcome, TaskResult};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Collector: 全タスク結果を受信して集約する
///
/// 結果チャンネルの送信側が全て閉じられると終了し、
/// ファイル名順に整列した結果一覧を返す。
pub fn spawn_result_collector<R>(
    mut result_rx: mpsc::Receiver<TaskResult>,
    total_tasks: usize,
    reporter: Arc<R>,
) -> tokio::task::JoinHandle<Result<Vec<TaskResult>>>
where
    R: ProgressReporter + 'static,
{
    tokio::spawn(async move {
        let mut results = Vec::with_capacity(total_tasks);

        while let Some(result) = result_rx.recv().await {
            if let TaskOutcome::Failed { stage, reason } = &result.outcome {
                reporter
                    .report_error(&result.filename, &format!("{}: {reason}", stage.as_str()))
                    .await;
            }
            results.push(result);
            reporter.report_progress(results.len(), total_tasks).await;
        }

        // 完了順に依存しないよう整列
        results.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(results)
    })
}
