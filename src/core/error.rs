// 一括補正処理のカスタムエラー型定義

use thiserror::Error;

/// 実行全体を中断させるエラー型
///
/// ファイル単位の失敗は `TaskOutcome::Failed` として結果に含まれ、
/// ここには現れない。
#[derive(Error, Debug)]
pub enum EnhanceError {
    #[error("入力ディレクトリ読み込みエラー: {path} - {source}")]
    SourceUnreadable {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("出力ディレクトリ作成エラー: {path} - {source}")]
    OutputUnwritable {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("レポート保存エラー: {source}")]
    ReportPersistenceError {
        #[source]
        source: anyhow::Error,
    },

    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("並列処理エラー: {message}")]
    ParallelExecutionError { message: String },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("バリデーションエラー: {field} - {reason}")]
    ValidationError { field: String, reason: String },

    #[error("内部エラー: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl EnhanceError {
    pub fn source_unreadable(path: impl Into<String>, source: anyhow::Error) -> Self {
        Self::SourceUnreadable {
            path: path.into(),
            source,
        }
    }

    pub fn output_unwritable(path: impl Into<String>, source: anyhow::Error) -> Self {
        Self::OutputUnwritable {
            path: path.into(),
            source,
        }
    }

    pub fn report_persistence(source: anyhow::Error) -> Self {
        Self::ReportPersistenceError { source }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    pub fn parallel_execution(message: impl Into<String>) -> Self {
        Self::ParallelExecutionError {
            message: message.into(),
        }
    }

    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(source: anyhow::Error) -> Self {
        Self::InternalError { source }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SourceUnreadable { .. } | Self::OutputUnwritable { .. } => ErrorSeverity::High,
            Self::ValidationError { .. } | Self::ConfigurationError { .. } => ErrorSeverity::High,
            Self::ReportPersistenceError { .. } => ErrorSeverity::Medium,
            Self::ParallelExecutionError { .. } | Self::TaskError { .. } => ErrorSeverity::High,
            Self::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// 入力を直して再実行すれば回復できるかどうか
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::SourceUnreadable { .. } => true,
            Self::OutputUnwritable { .. } => true,
            Self::ReportPersistenceError { .. } => true,
            Self::ConfigurationError { .. } | Self::ValidationError { .. } => true,
            Self::ParallelExecutionError { .. } | Self::TaskError { .. } => false,
            Self::InternalError { .. } => false,
        }
    }

    /// エラーコンテキストを取得
    pub fn context(&self) -> ErrorContext {
        match self {
            Self::SourceUnreadable { path, .. } => ErrorContext::new("list_source")
                .with_resource(path.clone())
                .with_suggestion("入力ディレクトリの存在とアクセス権限を確認してください"),
            Self::OutputUnwritable { path, .. } => ErrorContext::new("prepare_output")
                .with_resource(path.clone())
                .with_suggestion("出力ディレクトリへの書き込み権限を確認してください"),
            Self::ValidationError { field, .. } => ErrorContext::new("validation")
                .with_resource(field.clone())
                .with_suggestion("補正係数は0以上の有限値を指定してください"),
            Self::ConfigurationError { message } => ErrorContext::new("configuration")
                .with_suggestion(format!("設定を確認してください: {message}")),
            Self::ReportPersistenceError { .. } => ErrorContext::new("write_report"),
            _ => ErrorContext::new("unknown"),
        }
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// エラーコンテキスト情報
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// 実行していた操作
    pub operation: String,
    /// 関連するリソース（ファイルパス等）
    pub resource: Option<String>,
    /// エラー解決のための提案
    pub suggestion: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            resource: None,
            suggestion: None,
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// 一括補正処理の結果型
pub type EnhanceResult<T> = std::result::Result<T, EnhanceError>;

/// バリデーション専用エラー型
#[derive(Error, Debug, Clone, PartialEq)]
#[error("バリデーションエラー: {field} - {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<ValidationError> for EnhanceError {
    fn from(error: ValidationError) -> Self {
        EnhanceError::validation(error.field, error.reason)
    }
}

impl From<anyhow::Error> for EnhanceError {
    fn from(error: anyhow::Error) -> Self {
        EnhanceError::InternalError { source: error }
    }
}

impl From<tokio::task::JoinError> for EnhanceError {
    fn from(error: tokio::task::JoinError) -> Self {
        EnhanceError::TaskError { source: error }
    }
}
