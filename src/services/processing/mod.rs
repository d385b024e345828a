// 画像処理機能
// 時間予算の確認、拡張子フィルタ、読み込み・補正・書き込み

pub mod worker;

// 公開API
pub use worker::process_single_task;
