// エンジン層 - 並列処理とオーケストレーション
// サービス層を組み合わせて一括補正を実行する

pub mod api;
pub mod consumer;
mod pipeline;
pub mod processing_engine;
pub mod producer;
pub mod reconcile;

// 公開API
pub use api::{
    create_default_enhancement_engine, create_quiet_enhancement_engine,
    create_report_persistence, enhance_directory, StandardEngine,
};
pub use pipeline::EnhancementPipeline;
pub use processing_engine::EnhancementEngine;
pub use reconcile::count_matches;
