// コアレイヤー - 基盤となるトレイト、型、エラー定義
// 他のレイヤーから参照される基本的な抽象化を提供

pub mod error;
pub mod traits;
pub mod types;

pub use error::{EnhanceError, EnhanceResult, ErrorContext, ErrorSeverity, ValidationError};
pub use traits::{ProcessingConfig, ProgressReporter, ReportPersistence};
pub use types::{
    has_accepted_extension, EnhanceJob, EnhanceTask, EnhancementFactors, FailureStage, OutcomeCounts,
    RunClock, RunReport, TaskOutcome, TaskResult, ACCEPTED_EXTENSIONS,
};
