use anyhow::Result;
use clap::Parser;
use image_enhancer::cli::{execute_check_config, execute_enhance, Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 診断ログは標準エラーへ（RUST_LOG で上書き可能）
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("image_enhancer=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Enhance {
            settings,
            quiet,
            no_prompt,
        } => execute_enhance(settings, quiet, no_prompt).await,
        Commands::CheckConfig { settings } => execute_check_config(settings),
    }
}
