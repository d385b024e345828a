// エンドツーエンド統合テスト
use crate::fixtures::{file_names, setup_mixed_directory, write_corrupted, write_image};
use image::ImageFormat;
use image_enhancer::{
    cli::{execute_enhance, SettingsArgs},
    core::{EnhanceJob, EnhancementFactors, TaskOutcome},
    engine::{create_quiet_enhancement_engine, enhance_directory},
    services::DefaultProcessingConfig,
};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn factors(brightness: f32, sharpness: f32, contrast: f32) -> EnhancementFactors {
    EnhancementFactors::new(brightness, sharpness, contrast).unwrap()
}

#[tokio::test]
async fn test_mixed_directory_workflow() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    setup_mixed_directory(source.path());

    let job = EnhanceJob::new(source.path(), output.path(), factors(1.2, 1.0, 1.1));
    let report = enhance_directory(&job, DefaultProcessingConfig::new(2))
        .await
        .unwrap();

    assert_eq!(report.matched_count, 3);
    assert_eq!(report.total_input_count, 4);
    assert_eq!(report.counts.enhanced, 3);
    assert_eq!(report.counts.skipped_not_an_image, 1);
    assert_eq!(report.counts.failed, 0);

    let outcome_of = |name: &str| {
        report
            .outcomes
            .iter()
            .find(|r| r.filename == name)
            .map(|r| r.outcome.clone())
            .unwrap()
    };
    assert_eq!(outcome_of("c.txt"), TaskOutcome::SkippedNotAnImage);
    assert_eq!(outcome_of("d.GIF"), TaskOutcome::Enhanced);

    // 出力は元のファイル名のまま、画像以外は書き出されない
    assert_eq!(
        file_names(output.path()),
        vec!["a.jpg", "b.png", "d.GIF", "stats.txt"]
    );

    // 出力画像は元の形式で読み込める
    for name in ["a.jpg", "b.png", "d.GIF"] {
        let decoded = image::ImageReader::open(output.path().join(name))
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 12));
    }

    let stats = fs::read_to_string(output.path().join("stats.txt")).unwrap();
    let lines: Vec<&str> = stats.lines().collect();
    assert_eq!(lines[0], "Number of images enhanced: 3");
    assert_eq!(lines[1], "Number of raw images: 4");
    assert_eq!(
        lines[2],
        format!("Output folder: {}", output.path().display())
    );
    assert!(lines[3].starts_with("Elapsed time: "));
    assert_eq!(lines[4], "Number of pool workers: 2");
    assert_eq!(lines[5], "Brightness factor: 1.2");
    assert_eq!(lines[6], "Sharpness factor: 1.0");
    assert_eq!(lines[7], "Contrast factor: 1.1");
}

#[tokio::test]
async fn test_empty_directory() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let job = EnhanceJob::new(source.path(), output.path(), factors(1.0, 1.0, 1.0));
    let report = enhance_directory(&job, DefaultProcessingConfig::new(4))
        .await
        .unwrap();

    assert_eq!(report.matched_count, 0);
    assert_eq!(report.total_input_count, 0);
    assert!(report.outcomes.is_empty());

    let stats = fs::read_to_string(output.path().join("stats.txt")).unwrap();
    assert!(stats.starts_with("Number of images enhanced: 0\nNumber of raw images: 0\n"));
}

#[tokio::test]
async fn test_zero_budget_skips_everything() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    setup_mixed_directory(source.path());

    let job = EnhanceJob::new(source.path(), output.path(), factors(1.2, 1.0, 1.1));
    let config = DefaultProcessingConfig::new(2).with_time_budget(Duration::ZERO);
    let report = enhance_directory(&job, config).await.unwrap();

    assert_eq!(report.matched_count, 0);
    assert_eq!(report.total_input_count, 4);
    assert_eq!(report.counts.skipped_deadline_exceeded, 4);
    assert!(report
        .outcomes
        .iter()
        .all(|r| r.outcome == TaskOutcome::SkippedDeadlineExceeded));

    // レポート以外は何も書き出されない
    assert_eq!(file_names(output.path()), vec!["stats.txt"]);
}

#[tokio::test]
async fn test_identity_factors_preserve_pixels() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_image(source.path(), "b.png", ImageFormat::Png);

    let job = EnhanceJob::new(source.path(), output.path(), EnhancementFactors::identity());
    let report = enhance_directory(&job, DefaultProcessingConfig::new(1))
        .await
        .unwrap();
    assert_eq!(report.counts.enhanced, 1);

    let original = image::open(source.path().join("b.png")).unwrap();
    let enhanced = image::open(output.path().join("b.png")).unwrap();
    assert_eq!(original.color(), enhanced.color());
    assert_eq!(original.as_bytes(), enhanced.as_bytes());
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let source = TempDir::new().unwrap();
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    setup_mixed_directory(source.path());

    let engine = create_quiet_enhancement_engine(DefaultProcessingConfig::new(3));
    let f = factors(0.8, 1.6, 1.3);
    engine
        .run(&EnhanceJob::new(source.path(), first.path(), f))
        .await
        .unwrap();
    engine
        .run(&EnhanceJob::new(source.path(), second.path(), f))
        .await
        .unwrap();

    for name in ["a.jpg", "b.png", "d.GIF"] {
        let a = fs::read(first.path().join(name)).unwrap();
        let b = fs::read(second.path().join(name)).unwrap();
        assert_eq!(a, b, "{name} differs between runs");
    }
}

#[tokio::test]
async fn test_corrupted_image_is_counted_as_failure() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_image(source.path(), "good.png", ImageFormat::Png);
    write_corrupted(source.path(), "broken.jpg");

    let job = EnhanceJob::new(source.path(), output.path(), factors(1.1, 1.0, 1.0));
    let report = enhance_directory(&job, DefaultProcessingConfig::new(2))
        .await
        .unwrap();

    assert_eq!(report.total_input_count, 2);
    assert_eq!(report.matched_count, 1);
    assert_eq!(report.counts.failed, 1);
    assert!(report.outcomes[0].outcome.is_failure());
    assert_eq!(report.outcomes[0].filename, "broken.jpg");

    let stats = fs::read_to_string(output.path().join("stats.txt")).unwrap();
    assert!(stats.contains("broken.jpg: failed (decode:"));
}

#[tokio::test]
async fn test_case_insensitive_duplicates_are_skipped() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_image(source.path(), "Photo.png", ImageFormat::Png);
    write_image(source.path(), "photo.PNG", ImageFormat::Png);

    // 大文字小文字を区別しないファイルシステムでは1ファイルしか作れない
    if file_names(source.path()).len() < 2 {
        return;
    }

    let job = EnhanceJob::new(source.path(), output.path(), factors(1.0, 1.0, 0.9));
    let report = enhance_directory(&job, DefaultProcessingConfig::new(2))
        .await
        .unwrap();

    assert_eq!(report.total_input_count, 2);
    assert_eq!(report.counts.enhanced, 1);
    assert_eq!(report.counts.skipped_duplicate, 1);
    assert_eq!(report.matched_count, 1);
}

#[tokio::test]
async fn test_cli_enhance_command_without_prompt() {
    let source = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let output = root.path().join("enhanced");
    setup_mixed_directory(source.path());

    let settings = SettingsArgs {
        source_dir: Some(source.path().to_path_buf()),
        output_dir: Some(output.clone()),
        brightness: Some(1.2),
        sharpness: Some(1.0),
        contrast: Some(1.1),
        minutes: Some(5.0),
        workers: Some(2),
        json: true,
        ..Default::default()
    };

    execute_enhance(settings, true, true).await.unwrap();

    assert!(output.join("stats.txt").exists());
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output.join("stats.json")).unwrap()).unwrap();
    assert_eq!(json["matched_count"], 3);
    assert_eq!(json["total_input_count"], 4);
    assert_eq!(json["worker_count"], 2);
}
