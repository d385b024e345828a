use crate::services::RunSettings;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "image_enhancer")]
#[command(about = "Bulk brightness / sharpness / contrast enhancement for a directory of images")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enhance every image in a directory and write stats.txt
    Enhance {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Do not print progress lines
        #[arg(short, long)]
        quiet: bool,

        /// Fail instead of prompting for missing values
        #[arg(long)]
        no_prompt: bool,
    },

    /// Validate settings and print the effective configuration
    CheckConfig {
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

/// 実行パラメータに対応する引数（設定ファイルより優先される）
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Directory containing the source images
    pub source_dir: Option<PathBuf>,

    /// Directory the enhanced images are written to
    pub output_dir: Option<PathBuf>,

    /// Brightness factor (1.0 leaves brightness unchanged)
    #[arg(short, long)]
    pub brightness: Option<f32>,

    /// Sharpness factor (1.0 leaves sharpness unchanged)
    #[arg(short, long)]
    pub sharpness: Option<f32>,

    /// Contrast factor (1.0 leaves contrast unchanged)
    #[arg(short, long)]
    pub contrast: Option<f32>,

    /// Time budget in minutes; files not started in time are skipped
    #[arg(short, long)]
    pub minutes: Option<f64>,

    /// Number of parallel workers (defaults to the CPU count)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// JSON settings file; command-line values take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write stats.json next to stats.txt
    #[arg(long, conflicts_with = "no_json")]
    pub json: bool,

    /// Do not write stats.json, even if the settings file enables it
    #[arg(long)]
    pub no_json: bool,
}

impl SettingsArgs {
    /// 引数で指定された値だけを持つ設定
    pub fn to_overrides(&self) -> RunSettings {
        RunSettings {
            source_dir: self.source_dir.clone(),
            output_dir: self.output_dir.clone(),
            brightness: self.brightness,
            sharpness: self.sharpness,
            contrast: self.contrast,
            minutes: self.minutes,
            workers: self.workers,
            json_report: match (self.json, self.no_json) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
        }
    }

    /// 設定ファイルと引数を重ね合わせる
    pub fn load_settings(&self) -> anyhow::Result<RunSettings> {
        let base = match &self.config {
            Some(path) => RunSettings::load(path)?,
            None => RunSettings::default(),
        };
        Ok(base.merge(self.to_overrides()))
    }
}
