// 処理に関連するデータ型定義

use super::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// 受け付ける画像拡張子（小文字、ドットなし）
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "gif", "png"];

/// 拡張子が受付対象かどうか（大文字小文字を区別しない）
pub fn has_accepted_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ACCEPTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// 補正係数
///
/// 1.0 が恒等変換。brightness → sharpness → contrast の順に、
/// 前段の出力へ順番に適用される。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnhancementFactors {
    pub brightness: f32,
    pub sharpness: f32,
    pub contrast: f32,
}

impl EnhancementFactors {
    /// 検証付きで係数を作成
    pub fn new(brightness: f32, sharpness: f32, contrast: f32) -> Result<Self, ValidationError> {
        let factors = Self {
            brightness,
            sharpness,
            contrast,
        };
        factors.validate()?;
        Ok(factors)
    }

    /// 全て 1.0 の恒等係数
    pub const fn identity() -> Self {
        Self {
            brightness: 1.0,
            sharpness: 1.0,
            contrast: 1.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.brightness == 1.0 && self.sharpness == 1.0 && self.contrast == 1.0
    }

    /// 各係数が有限かつ非負であることを確認
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("brightness", self.brightness),
            ("sharpness", self.sharpness),
            ("contrast", self.contrast),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::new(field, format!("有限の値が必要です: {value}")));
            }
            if value < 0.0 {
                return Err(ValidationError::new(field, format!("負の値は指定できません: {value}")));
            }
        }
        Ok(())
    }
}

impl Default for EnhancementFactors {
    fn default() -> Self {
        Self::identity()
    }
}

/// 実行全体で共有される時間予算
///
/// ディスパッチ時に一度だけ取得し、各タスクへ値渡しする。
#[derive(Debug, Clone, Copy)]
pub struct RunClock {
    started: Instant,
    budget: Duration,
}

impl RunClock {
    /// 現在時刻を開始点とするクロックを作成
    pub fn start(budget: Duration) -> Self {
        Self::starting_at(Instant::now(), budget)
    }

    pub fn starting_at(started: Instant, budget: Duration) -> Self {
        Self { started, budget }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// 経過時間が予算を超えたかどうか
    pub fn is_expired(&self) -> bool {
        self.elapsed() > self.budget
    }
}

/// 1ファイル分の処理単位。ワーカーが一度だけ消費する。
///
/// パスは実際のファイル名（OsStr）から組み立てる。
/// `filename` は表示とレポート用で、UTF-8 でない名前は置換文字を含む。
#[derive(Debug, Clone, PartialEq)]
pub struct EnhanceTask {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub filename: String,
    pub factors: EnhancementFactors,
}

impl EnhanceTask {
    pub fn new(
        source_dir: &Path,
        output_dir: &Path,
        file_name: impl AsRef<OsStr>,
        factors: EnhancementFactors,
    ) -> Self {
        let file_name = file_name.as_ref();
        Self {
            source_path: source_dir.join(file_name),
            output_path: output_dir.join(file_name),
            filename: file_name.to_string_lossy().into_owned(),
            factors,
        }
    }
}

/// 一回の実行で処理するディレクトリと係数
#[derive(Debug, Clone, PartialEq)]
pub struct EnhanceJob {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub factors: EnhancementFactors,
}

impl EnhanceJob {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        factors: EnhancementFactors,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            factors,
        }
    }

    /// 指定ファイル名のタスクを作成
    pub fn task_for(&self, file_name: impl AsRef<OsStr>) -> EnhanceTask {
        EnhanceTask::new(&self.source_dir, &self.output_dir, file_name, self.factors)
    }
}

/// 失敗した処理段階
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Decode,
    Enhance,
    EncodeOrWrite,
}

impl FailureStage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Decode => "decode",
            Self::Enhance => "enhance",
            Self::EncodeOrWrite => "encode_or_write",
        }
    }
}

/// 個別タスクの結果種別
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskOutcome {
    Enhanced,
    SkippedNotAnImage,
    SkippedDeadlineExceeded,
    /// 大文字小文字違いで出力名が衝突したため処理しなかった
    SkippedDuplicate,
    Failed { stage: FailureStage, reason: String },
}

impl TaskOutcome {
    pub fn failed(stage: FailureStage, reason: impl Into<String>) -> Self {
        Self::Failed {
            stage,
            reason: reason.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Enhanced => "enhanced",
            Self::SkippedNotAnImage => "skipped_not_an_image",
            Self::SkippedDeadlineExceeded => "skipped_deadline_exceeded",
            Self::SkippedDuplicate => "skipped_duplicate",
            Self::Failed { .. } => "failed",
        }
    }
}

/// 個別タスクの結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub filename: String,
    pub outcome: TaskOutcome,
    pub duration_ms: u64,
}

impl TaskResult {
    pub fn new(filename: impl Into<String>, outcome: TaskOutcome, duration_ms: u64) -> Self {
        Self {
            filename: filename.into(),
            outcome,
            duration_ms,
        }
    }
}

/// 結果種別ごとの件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub enhanced: usize,
    pub skipped_not_an_image: usize,
    pub skipped_deadline_exceeded: usize,
    pub skipped_duplicate: usize,
    pub failed: usize,
}

impl OutcomeCounts {
    pub fn tally<'a>(results: impl IntoIterator<Item = &'a TaskResult>) -> Self {
        results
            .into_iter()
            .fold(Self::default(), |mut counts, result| {
                counts.record(&result.outcome);
                counts
            })
    }

    pub fn record(&mut self, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::Enhanced => self.enhanced += 1,
            TaskOutcome::SkippedNotAnImage => self.skipped_not_an_image += 1,
            TaskOutcome::SkippedDeadlineExceeded => self.skipped_deadline_exceeded += 1,
            TaskOutcome::SkippedDuplicate => self.skipped_duplicate += 1,
            TaskOutcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.enhanced
            + self.skipped_not_an_image
            + self.skipped_deadline_exceeded
            + self.skipped_duplicate
            + self.failed
    }
}

/// 実行レポート（最終成果物）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub matched_count: usize,
    pub total_input_count: usize,
    pub output_dir: PathBuf,
    pub elapsed_seconds: f64,
    pub worker_count: usize,
    pub factors: EnhancementFactors,
    pub counts: OutcomeCounts,
    /// ファイル名順に整列済み
    pub outcomes: Vec<TaskResult>,
}

impl RunReport {
    /// 小数点以下2桁に丸めた経過秒数
    pub fn elapsed_rounded(&self) -> f64 {
        (self.elapsed_seconds * 100.0).round() / 100.0
    }
}
