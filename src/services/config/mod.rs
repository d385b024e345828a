// 設定管理機能
// 処理設定（ワーカー数・時間予算）と実行パラメータの読み込み

pub mod implementations;
pub mod settings;

// 公開API
pub use implementations::{budget_from_minutes, DefaultProcessingConfig};
pub use settings::{ResolvedSettings, RunSettings};
