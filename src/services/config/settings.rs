// 実行パラメータ（設定ファイル + CLI 引数）

use super::implementations::DefaultProcessingConfig;
use crate::core::{EnhancementFactors, ValidationError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 部分的に指定された実行パラメータ
///
/// JSON設定ファイルとCLI引数の両方から作られ、`merge` で重ね合わせる。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSettings {
    pub source_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub brightness: Option<f32>,
    pub sharpness: Option<f32>,
    pub contrast: Option<f32>,
    pub minutes: Option<f64>,
    pub workers: Option<usize>,
    pub json_report: Option<bool>,
}

/// 全項目が揃い検証済みの実行パラメータ
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub factors: EnhancementFactors,
    pub minutes: f64,
    pub workers: Option<usize>,
    pub json_report: bool,
}

impl RunSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse settings JSON")
    }

    /// JSON設定ファイルを読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid settings file: {}", path.display()))
    }

    /// `overrides` 側で指定された項目を優先して重ね合わせる
    pub fn merge(self, overrides: RunSettings) -> RunSettings {
        RunSettings {
            source_dir: overrides.source_dir.or(self.source_dir),
            output_dir: overrides.output_dir.or(self.output_dir),
            brightness: overrides.brightness.or(self.brightness),
            sharpness: overrides.sharpness.or(self.sharpness),
            contrast: overrides.contrast.or(self.contrast),
            minutes: overrides.minutes.or(self.minutes),
            workers: overrides.workers.or(self.workers),
            json_report: overrides.json_report.or(self.json_report),
        }
    }

    /// 未指定の必須項目名
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.source_dir.is_none() {
            missing.push("source_dir");
        }
        if self.output_dir.is_none() {
            missing.push("output_dir");
        }
        if self.brightness.is_none() {
            missing.push("brightness");
        }
        if self.sharpness.is_none() {
            missing.push("sharpness");
        }
        if self.contrast.is_none() {
            missing.push("contrast");
        }
        if self.minutes.is_none() {
            missing.push("minutes");
        }
        missing
    }

    /// 必須項目の存在と値の妥当性を検証
    pub fn resolve(&self) -> Result<ResolvedSettings, ValidationError> {
        if let Some(field) = self.missing_fields().first() {
            return Err(ValidationError::new(*field, "値が指定されていません"));
        }

        let factors = EnhancementFactors::new(
            self.brightness.unwrap_or(1.0),
            self.sharpness.unwrap_or(1.0),
            self.contrast.unwrap_or(1.0),
        )?;

        let minutes = self.minutes.unwrap_or(0.0);
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(ValidationError::new(
                "minutes",
                format!("0以上の有限値が必要です: {minutes}"),
            ));
        }

        if self.workers == Some(0) {
            return Err(ValidationError::new("workers", "1以上である必要があります"));
        }

        Ok(ResolvedSettings {
            source_dir: self.source_dir.clone().unwrap_or_default(),
            output_dir: self.output_dir.clone().unwrap_or_default(),
            factors,
            minutes,
            workers: self.workers,
            json_report: self.json_report.unwrap_or(false),
        })
    }
}

impl ResolvedSettings {
    /// エンジン用の処理設定を作成
    pub fn processing_config(&self) -> DefaultProcessingConfig {
        let config = DefaultProcessingConfig::default()
            .with_time_budget_minutes(self.minutes)
            .with_json_report(self.json_report);
        match self.workers {
            Some(workers) => config.with_worker_count(workers),
            None => config,
        }
    }
}
