// Producer - タスク配信機能

use crate::core::EnhanceTask;
use anyhow::Result;
use tokio::sync::mpsc;

/// Producer: タスクを1件ずつ配信する
///
/// 各タスクの完了は待たない。全件送信後に送信側を閉じて終了を通知する。
pub fn spawn_producer(
    tasks: Vec<EnhanceTask>,
    work_tx: mpsc::Sender<EnhanceTask>,
) -> tokio::task::JoinHandle<Result<()>> {
    tokio::spawn(async move {
        for task in tasks {
            if (work_tx.send(task).await).is_err() {
                // チャンネルが閉じられた場合は正常終了
                break;
            }
        }
        Ok(())
    })
}
