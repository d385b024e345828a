// Consumer - 並列ワーカー機能

use crate::{
    core::{EnhanceTask, RunClock, TaskResult},
    enhancer::EnhancementBackend,
    image_loader::ImageLoaderBackend,
    services::processing::process_single_task,
};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

/// 単一Consumerワーカー
pub fn spawn_single_consumer<L, E>(
    worker_id: usize,
    loader: Arc<L>,
    enhancer: Arc<E>,
    work_rx: Arc<tokio::sync::Mutex<mpsc::Receiver<EnhanceTask>>>,
    result_tx: mpsc::Sender<TaskResult>,
    semaphore: Arc<tokio::sync::Semaphore>,
    clock: RunClock,
) -> tokio::task::JoinHandle<Result<()>>
where
    L: ImageLoaderBackend + 'static,
    E: EnhancementBackend + 'static,
{
    tokio::spawn(async move {
        loop {
            // 次の作業を取得
            let task = {
                let mut rx = work_rx.lock().await;
                match rx.recv().await {
                    Some(task) => task,
                    None => break, // チャンネル終了
                }
            };

            // セマフォで同時実行数制御
            let _permit = semaphore
                .acquire()
                .await
                .map_err(|e| anyhow::anyhow!("Semaphore error: {}", e))?;

            let result = process_single_task(
                loader.as_ref(),
                Arc::clone(&enhancer),
                task,
                clock,
                worker_id,
            )
            .await;

            if (result_tx.send(result).await).is_err() {
                // 結果チャンネルが閉じられた場合は終了
                break;
            }
        }
        Ok(())
    })
}

/// Consumers: 固定サイズのワーカープール
pub fn spawn_consumers<L, E>(
    loader: Arc<L>,
    enhancer: Arc<E>,
    work_rx: mpsc::Receiver<EnhanceTask>,
    result_tx: mpsc::Sender<TaskResult>,
    semaphore: Arc<tokio::sync::Semaphore>,
    worker_count: usize,
    clock: RunClock,
) -> Vec<tokio::task::JoinHandle<Result<()>>>
where
    L: ImageLoaderBackend + 'static,
    E: EnhancementBackend + 'static,
{
    let work_rx = Arc::new(tokio::sync::Mutex::new(work_rx));

    (0..worker_count)
        .map(|worker_id| {
            spawn_single_consumer(
                worker_id,
                Arc::clone(&loader),
                Arc::clone(&enhancer),
                Arc::clone(&work_rx),
                result_tx.clone(),
                Arc::clone(&semaphore),
                clock,
            )
        })
        .collect()
}
