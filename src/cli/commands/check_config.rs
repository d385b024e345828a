use crate::cli::SettingsArgs;
use crate::core::ProcessingConfig;
use crate::services::ResolvedSettings;
use anyhow::Result;
use std::time::Duration;

/// 実効設定を表示用の行に整形する
pub fn describe_settings(resolved: &ResolvedSettings) -> Vec<String> {
    let config = resolved.processing_config();
    let budget = config.time_budget();

    vec![
        format!("source_dir: {}", resolved.source_dir.display()),
        format!("output_dir: {}", resolved.output_dir.display()),
        format!("brightness: {:?}", resolved.factors.brightness),
        format!("sharpness: {:?}", resolved.factors.sharpness),
        format!("contrast: {:?}", resolved.factors.contrast),
        format!("minutes: {}", resolved.minutes),
        if budget == Duration::MAX {
            "time_budget: unlimited".to_string()
        } else {
            format!("time_budget: {}s", budget.as_secs())
        },
        format!("workers: {}", config.worker_count()),
        format!("channel_buffer_size: {}", config.channel_buffer_size()),
        format!("json_report: {}", config.write_json_report()),
    ]
}

/// Validate settings without touching any image
pub fn execute_check_config(settings: SettingsArgs) -> Result<()> {
    let run_settings = settings.load_settings()?;

    let missing = run_settings.missing_fields();
    if !missing.is_empty() {
        anyhow::bail!("Missing required settings: {}", missing.join(", "));
    }

    let resolved = run_settings.resolve()?;

    println!("✅ 設定は有効です");
    for line in describe_settings(&resolved) {
        println!("   - {line}");
    }

    if !resolved.source_dir.is_dir() {
        println!(
            "⚠️  入力ディレクトリが存在しません: {}",
            resolved.source_dir.display()
        );
    }
    Ok(())
}
