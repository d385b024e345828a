// Pipeline - Producer-Consumer パイプライン
// ワーカープールの起動と結果の回収

use super::{consumer::spawn_consumers, producer::spawn_producer};
use crate::{
    core::{EnhanceTask, OutcomeCounts, ProcessingConfig, ProgressReporter, RunClock, TaskResult},
    enhancer::EnhancementBackend,
    image_loader::ImageLoaderBackend,
    services::persistence::spawn_result_collector,
};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// 読み込みと補正の実装を保持するパイプライン
pub struct EnhancementPipeline<L, E> {
    loader: Arc<L>,
    enhancer: Arc<E>,
}

impl<L, E> EnhancementPipeline<L, E>
where
    L: ImageLoaderBackend + 'static,
    E: EnhancementBackend + 'static,
{
    pub fn new(loader: Arc<L>, enhancer: Arc<E>) -> Self {
        Self { loader, enhancer }
    }

    /// タスク一覧を処理し、ファイル名順の結果を返す
    ///
    /// 全タスクの結果が揃うまで戻らない。時間予算を過ぎたタスクも
    /// スキップ結果として必ず1件ずつ返る。
    pub async fn execute<C, R>(
        &self,
        tasks: Vec<EnhanceTask>,
        clock: RunClock,
        config: &C,
        reporter: Arc<R>,
    ) -> Result<Vec<TaskResult>>
    where
        C: ProcessingConfig,
        R: ProgressReporter + 'static,
    {
        let total_tasks = tasks.len();
        let worker_count = config.worker_count();
        reporter.report_started(total_tasks, worker_count).await;

        if tasks.is_empty() {
            reporter.report_completed(OutcomeCounts::default()).await;
            return Ok(Vec::new());
        }

        // Producer-Consumerチャンネル構築
        let (work_tx, work_rx) = mpsc::channel::<EnhanceTask>(config.channel_buffer_size());
        let (result_tx, result_rx) = mpsc::channel::<TaskResult>(config.channel_buffer_size());

        let semaphore = Arc::new(tokio::sync::Semaphore::new(worker_count));

        debug!(total_tasks, worker_count, "パイプライン開始");

        // Producer起動
        let producer_handle = spawn_producer(tasks, work_tx);

        // Consumer Pool起動
        let consumer_handles = spawn_consumers(
            Arc::clone(&self.loader),
            Arc::clone(&self.enhancer),
            work_rx,
            result_tx.clone(),
            semaphore,
            worker_count,
            clock,
        );

        // Result Collector起動
        let collector_handle = spawn_result_collector(result_rx, total_tasks, reporter.clone());

        // Producer完了を待機
        producer_handle.await??;

        // Consumer完了を待機
        for handle in consumer_handles {
            handle.await??;
        }

        // result_txを閉じてCollectorに完了を通知
        drop(result_tx);

        let results = collector_handle.await??;

        reporter
            .report_completed(OutcomeCounts::tally(&results))
            .await;

        Ok(results)
    }
}
