// 高レベル公開API
// EnhancementEngine を簡単に組み立てるための便利な関数

use super::EnhancementEngine;
use crate::{
    core::{EnhanceJob, EnhanceResult, ProcessingConfig, RunReport},
    enhancer::standard::StandardEnhancer,
    image_loader::standard::StandardImageLoader,
    services::{
        ConsoleProgressReporter, DefaultProcessingConfig, FanOutReportPersistence,
        JsonReportPersistence, NoOpProgressReporter, TextReportPersistence,
    },
    storage::local::LocalStorageBackend,
};

/// ローカルファイルシステム上の標準構成エンジン
pub type StandardEngine<R> = EnhancementEngine<
    StandardImageLoader,
    StandardEnhancer,
    LocalStorageBackend,
    DefaultProcessingConfig,
    R,
    FanOutReportPersistence,
>;

/// 設定に従って stats.txt（必要なら stats.json も）を書き出す永続化を作成
pub fn create_report_persistence<C: ProcessingConfig>(config: &C) -> FanOutReportPersistence {
    let persistence = FanOutReportPersistence::new().with_target(TextReportPersistence::new());
    if config.write_json_report() {
        persistence.with_target(JsonReportPersistence::new())
    } else {
        persistence
    }
}

/// コンソールに進捗を表示する標準エンジンを作成
pub fn create_default_enhancement_engine(
    config: DefaultProcessingConfig,
) -> StandardEngine<ConsoleProgressReporter> {
    let reporter = if config.enable_progress_reporting() {
        ConsoleProgressReporter::new()
    } else {
        ConsoleProgressReporter::quiet()
    };
    let persistence = create_report_persistence(&config);

    EnhancementEngine::new(
        StandardImageLoader::new(),
        StandardEnhancer::new(),
        LocalStorageBackend::new(),
        config,
        reporter,
        persistence,
    )
}

/// 進捗を表示しない標準エンジンを作成
///
/// テストやバックグラウンド処理用
pub fn create_quiet_enhancement_engine(
    config: DefaultProcessingConfig,
) -> StandardEngine<NoOpProgressReporter> {
    let persistence = create_report_persistence(&config);

    EnhancementEngine::new(
        StandardImageLoader::new(),
        StandardEnhancer::new(),
        LocalStorageBackend::new(),
        config,
        NoOpProgressReporter::new(),
        persistence,
    )
}

/// 標準構成（静音）でディレクトリを一括補正する
pub async fn enhance_directory(
    job: &EnhanceJob,
    config: DefaultProcessingConfig,
) -> EnhanceResult<RunReport> {
    create_quiet_enhancement_engine(config).run(job).await
}
