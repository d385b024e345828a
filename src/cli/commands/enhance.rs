use crate::cli::SettingsArgs;
use crate::core::{EnhanceJob, RunReport};
use crate::engine::create_default_enhancement_engine;
use crate::services::persistence::report_paths;
use crate::services::RunSettings;
use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// 値が有効になるまで1項目を問い合わせる
fn prompt_value<T, R, W>(reader: &mut R, writer: &mut W, question: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    R: BufRead,
    W: Write,
{
    loop {
        write!(writer, "{question}: ")?;
        writer.flush()?;

        let mut input = String::new();
        if reader.read_line(&mut input)? == 0 {
            anyhow::bail!("Input closed while waiting for: {question}");
        }

        match input.trim().parse::<T>() {
            Ok(value) => return Ok(value),
            Err(e) => writeln!(writer, "⚠️  入力が不正です ({e})。もう一度入力してください。")?,
        }
    }
}

/// 未指定の項目を対話的に補う
pub fn prompt_missing<R: BufRead, W: Write>(
    mut settings: RunSettings,
    reader: &mut R,
    writer: &mut W,
) -> Result<RunSettings> {
    if settings.source_dir.is_none() {
        settings.source_dir = Some(prompt_value::<PathBuf, _, _>(
            reader,
            writer,
            "Source image folder",
        )?);
    }
    if settings.output_dir.is_none() {
        settings.output_dir = Some(prompt_value::<PathBuf, _, _>(
            reader,
            writer,
            "Output folder",
        )?);
    }
    if settings.brightness.is_none() {
        settings.brightness = Some(prompt_value(reader, writer, "Brightness factor")?);
    }
    if settings.sharpness.is_none() {
        settings.sharpness = Some(prompt_value(reader, writer, "Sharpness factor")?);
    }
    if settings.contrast.is_none() {
        settings.contrast = Some(prompt_value(reader, writer, "Contrast factor")?);
    }
    if settings.minutes.is_none() {
        settings.minutes = Some(prompt_value(reader, writer, "Time budget (minutes)")?);
    }
    Ok(settings)
}

fn print_summary(report: &RunReport, include_json: bool) {
    println!("\n✅ 処理完了!");
    println!("📊 処理結果:");
    println!("   - 入力ファイル数: {}", report.total_input_count);
    println!("   - 出力と一致したファイル数: {}", report.matched_count);
    println!("   - 補正済み: {}", report.counts.enhanced);
    println!("   - 画像以外: {}", report.counts.skipped_not_an_image);
    println!("   - 時間切れ: {}", report.counts.skipped_deadline_exceeded);
    if report.counts.skipped_duplicate > 0 {
        println!("   - 名前重複: {}", report.counts.skipped_duplicate);
    }
    println!("   - 失敗: {}", report.counts.failed);
    println!("   - 総処理時間: {:.2}秒", report.elapsed_seconds);

    if report.counts.failed > 0 {
        println!("⚠️  {}個のファイルでエラーが発生しました", report.counts.failed);
    }

    for path in report_paths(report, include_json) {
        println!("📄 レポートを保存しました: {}", path.display());
    }
}

/// Enhance every image in the source directory
pub async fn execute_enhance(settings: SettingsArgs, quiet: bool, no_prompt: bool) -> Result<()> {
    let mut run_settings = settings.load_settings()?;

    if !no_prompt && !run_settings.missing_fields().is_empty() {
        let stdin = io::stdin();
        let mut reader = stdin.lock();
        let mut writer = io::stdout();
        run_settings = prompt_missing(run_settings, &mut reader, &mut writer)?;
    }

    let resolved = run_settings.resolve()?;
    let config = resolved.processing_config().with_progress_reporting(!quiet);
    let engine = create_default_enhancement_engine(config);

    if !quiet {
        println!("🖼️  画像一括補正ツール - enhanceコマンド");
        println!("📂 入力ディレクトリ: {}", resolved.source_dir.display());
        println!("📁 出力ディレクトリ: {}", resolved.output_dir.display());
        println!(
            "🎚️  係数: brightness={} sharpness={} contrast={}",
            resolved.factors.brightness, resolved.factors.sharpness, resolved.factors.contrast
        );
        println!("⏱️  時間予算: {}分", resolved.minutes);
    }

    let job = EnhanceJob::new(
        resolved.source_dir.clone(),
        resolved.output_dir.clone(),
        resolved.factors,
    );

    match engine.run(&job).await {
        Ok(report) => {
            print_summary(&report, resolved.json_report);
            Ok(())
        }
        Err(error) => {
            let context = error.context();
            eprintln!("❌ エラー [{}]: {error}", error.severity().as_str());
            if let Some(suggestion) = context.suggestion {
                eprintln!("💡 {suggestion}");
            }
            Err(error.into())
        }
    }
}
