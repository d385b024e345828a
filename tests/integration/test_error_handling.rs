// エラーハンドリングの統合テスト
use crate::fixtures::{file_names, write_corrupted, write_image};
use anyhow::Result;
use image::ImageFormat;
use image_enhancer::{
    core::{EnhanceError, EnhanceJob, EnhancementFactors, ErrorSeverity, FailureStage, TaskOutcome},
    engine::{create_quiet_enhancement_engine, enhance_directory, EnhancementEngine},
    enhancer::standard::StandardEnhancer,
    image_loader::standard::StandardImageLoader,
    services::{DefaultProcessingConfig, MemoryReportPersistence, NoOpProgressReporter},
    storage::local::LocalStorageBackend,
};
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_nonexistent_source_directory_error() -> Result<()> {
    let root = TempDir::new()?;
    let missing = root.path().join("nonexistent_directory");
    let output = root.path().join("out");

    let job = EnhanceJob::new(&missing, &output, EnhancementFactors::identity());
    let error = enhance_directory(&job, DefaultProcessingConfig::new(1))
        .await
        .unwrap_err();

    assert!(matches!(error, EnhanceError::SourceUnreadable { .. }));
    assert!(error.to_string().contains("nonexistent_directory"));
    assert!(error.is_recoverable());
    assert!(error.context().suggestion.is_some());

    // 何もディスパッチされず、出力ディレクトリも作られない
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_source_is_a_file_error() -> Result<()> {
    let root = TempDir::new()?;
    let file = root.path().join("single.png");
    fs::write(&file, b"data")?;

    let job = EnhanceJob::new(&file, root.path().join("out"), EnhancementFactors::identity());
    let error = enhance_directory(&job, DefaultProcessingConfig::new(1))
        .await
        .unwrap_err();

    assert!(matches!(error, EnhanceError::SourceUnreadable { .. }));
    assert_eq!(error.severity(), ErrorSeverity::High);
    Ok(())
}

#[tokio::test]
async fn test_output_path_is_a_file_error() -> Result<()> {
    let source = TempDir::new()?;
    let root = TempDir::new()?;
    write_image(source.path(), "a.png", ImageFormat::Png);
    let blocker = root.path().join("blocker");
    fs::write(&blocker, b"occupied")?;

    let job = EnhanceJob::new(
        source.path(),
        blocker.join("out"),
        EnhancementFactors::identity(),
    );
    let error = enhance_directory(&job, DefaultProcessingConfig::new(1))
        .await
        .unwrap_err();

    assert!(matches!(error, EnhanceError::OutputUnwritable { .. }));
    Ok(())
}

#[tokio::test]
async fn test_invalid_factors_rejected_before_listing() -> Result<()> {
    let root = TempDir::new()?;
    let job = EnhanceJob::new(
        root.path().join("does_not_matter"),
        root.path().join("out"),
        EnhancementFactors {
            brightness: 1.0,
            sharpness: f32::NAN,
            contrast: 1.0,
        },
    );

    let error = enhance_directory(&job, DefaultProcessingConfig::new(1))
        .await
        .unwrap_err();

    match error {
        EnhanceError::ValidationError { field, .. } => assert_eq!(field, "sharpness"),
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_failures_do_not_stop_other_files() -> Result<()> {
    let source = TempDir::new()?;
    let output = TempDir::new()?;
    for i in 0..6 {
        write_image(source.path(), &format!("ok{i}.png"), ImageFormat::Png);
    }
    write_corrupted(source.path(), "bad1.png");
    write_corrupted(source.path(), "bad2.gif");
    fs::create_dir(source.path().join("nested"))?;

    let engine = EnhancementEngine::new(
        StandardImageLoader::new(),
        StandardEnhancer::new(),
        LocalStorageBackend::new(),
        DefaultProcessingConfig::new(3),
        NoOpProgressReporter::new(),
        MemoryReportPersistence::new(),
    );

    let report = engine
        .run(&EnhanceJob::new(
            source.path(),
            output.path(),
            EnhancementFactors::new(1.1, 1.2, 0.9)?,
        ))
        .await?;

    assert_eq!(report.total_input_count, 9);
    assert_eq!(report.counts.enhanced, 6);
    assert_eq!(report.counts.failed, 2);
    assert_eq!(report.counts.skipped_not_an_image, 1);
    assert_eq!(report.matched_count, 6);

    for result in report.outcomes.iter().filter(|r| r.outcome.is_failure()) {
        assert!(matches!(
            result.outcome,
            TaskOutcome::Failed {
                stage: FailureStage::Decode,
                ..
            }
        ));
    }

    // メモリ永続化ではファイルは書かれない
    assert!(!file_names(output.path()).contains(&"stats.txt".to_string()));
    assert_eq!(engine.persistence().stored_reports().len(), 1);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_file_is_reported_not_fatal() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let source = TempDir::new()?;
    let output = TempDir::new()?;
    let path = write_image(source.path(), "locked.png", ImageFormat::Png);
    write_image(source.path(), "open.png", ImageFormat::Png);

    let mut perms = fs::metadata(&path)?.permissions();
    perms.set_mode(0o000);
    fs::set_permissions(&path, perms)?;

    // root 権限では読めてしまうため、読めるかどうかで期待値を変える
    let still_readable = fs::read(&path).is_ok();

    let engine = create_quiet_enhancement_engine(DefaultProcessingConfig::new(2));
    let report = engine
        .run(&EnhanceJob::new(
            source.path(),
            output.path(),
            EnhancementFactors::identity(),
        ))
        .await?;

    assert_eq!(report.total_input_count, 2);
    if still_readable {
        assert_eq!(report.counts.enhanced, 2);
    } else {
        assert_eq!(report.counts.enhanced, 1);
        assert_eq!(report.counts.failed, 1);
        assert_eq!(report.matched_count, 1);
    }

    let mut perms = fs::metadata(&path)?.permissions();
    perms.set_mode(0o644);
    fs::set_permissions(&path, perms)?;
    Ok(())
}
