// Worker - 時間予算付きの単一ファイル処理

use crate::core::{
    has_accepted_extension, EnhanceTask, FailureStage, RunClock, TaskOutcome, TaskResult,
};
use crate::enhancer::EnhancementBackend;
use crate::image_loader::ImageLoaderBackend;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// 単一タスクの処理
///
/// 実行開始時点で予算を使い切っていればファイルに触れずにスキップする。
/// 変換中に予算を超えても中断はしない。
pub async fn process_single_task<L, E>(
    loader: &L,
    enhancer: Arc<E>,
    task: EnhanceTask,
    clock: RunClock,
    worker_id: usize,
) -> TaskResult
where
    L: ImageLoaderBackend,
    E: EnhancementBackend + 'static,
{
    let start_time = Instant::now();
    let outcome = run_budgeted(loader, enhancer, &task, clock).await;
    debug!(
        worker_id,
        filename = %task.filename,
        outcome = outcome.label(),
        "task finished"
    );
    TaskResult::new(task.filename, outcome, start_time.elapsed().as_millis() as u64)
}

async fn run_budgeted<L, E>(
    loader: &L,
    enhancer: Arc<E>,
    task: &EnhanceTask,
    clock: RunClock,
) -> TaskOutcome
where
    L: ImageLoaderBackend,
    E: EnhancementBackend + 'static,
{
    if clock.is_expired() {
        return TaskOutcome::SkippedDeadlineExceeded;
    }

    if !has_accepted_extension(&task.filename) {
        return TaskOutcome::SkippedNotAnImage;
    }

    // 画像読み込み
    let loaded = match loader.load_from_path(&task.source_path).await {
        Ok(loaded) => loaded,
        Err(error) => return TaskOutcome::failed(FailureStage::Decode, format!("{error:#}")),
    };
    debug!(
        filename = %task.filename,
        dimensions = ?loaded.dimensions,
        load_time_ms = loaded.load_time_ms,
        "decoded"
    );

    // 補正はCPU負荷が高いためブロッキングプールで実行
    let factors = task.factors;
    let enhanced = tokio::task::spawn_blocking(move || enhancer.apply(loaded.image, &factors)).await;
    let enhanced = match enhanced {
        Ok(Ok(image)) => image,
        Ok(Err(error)) => return TaskOutcome::failed(FailureStage::Enhance, format!("{error:#}")),
        Err(join_error) => return TaskOutcome::failed(FailureStage::Enhance, join_error.to_string()),
    };

    // 書き込み
    match loader.save_to_path(enhanced, &task.output_path).await {
        Ok(()) => TaskOutcome::Enhanced,
        Err(error) => TaskOutcome::failed(FailureStage::EncodeOrWrite, format!("{error:#}")),
    }
}
