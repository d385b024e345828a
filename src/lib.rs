// 画像一括補正ライブラリ
// 明るさ・シャープネス・コントラストをディレクトリ単位で並列に適用する

pub mod cli;
pub mod core;
pub mod engine;
pub mod enhancer;
pub mod image_loader;
pub mod services;
pub mod storage;

pub use crate::core::{
    EnhanceError, EnhanceJob, EnhanceResult, EnhancementFactors, RunReport, TaskOutcome,
    TaskResult,
};
pub use crate::engine::{enhance_directory, EnhancementEngine};
