use super::{ImageLoaderBackend, LoadResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;
use std::time::Instant;

/// `image` クレートによる標準的な読み書き実装
#[derive(Clone, Debug, Default)]
pub struct StandardImageLoader;

impl StandardImageLoader {
    pub fn new() -> Self {
        Self
    }

    /// 同期的にデコードする（内容からフォーマットを推定）
    pub fn decode_file(path: &Path) -> Result<(DynamicImage, Option<ImageFormat>)> {
        let reader = ImageReader::open(path)
            .with_context(|| format!("Failed to open image: {}", path.display()))?
            .with_guessed_format()
            .with_context(|| format!("Failed to detect image format: {}", path.display()))?;
        let format = reader.format();
        let image = reader
            .decode()
            .with_context(|| format!("Failed to decode image: {}", path.display()))?;
        Ok((image, format))
    }

    /// 同期的にエンコードして書き込む
    pub fn encode_file(image: &DynamicImage, path: &Path) -> Result<()> {
        let format = ImageFormat::from_path(path)
            .with_context(|| format!("Unsupported output format: {}", path.display()))?;
        image
            .save_with_format(path, format)
            .with_context(|| format!("Failed to write image: {}", path.display()))
    }
}

#[async_trait]
impl ImageLoaderBackend for StandardImageLoader {
    async fn load_from_path(&self, path: &Path) -> Result<LoadResult> {
        let start_time = Instant::now();

        let (image, format) = tokio::task::spawn_blocking({
            let path = path.to_path_buf();
            move || Self::decode_file(&path)
        })
        .await
        .context("Failed to spawn blocking task for image loading")??;

        Ok(LoadResult {
            dimensions: (image.width(), image.height()),
            image,
            format,
            load_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    async fn save_to_path(&self, image: DynamicImage, path: &Path) -> Result<()> {
        tokio::task::spawn_blocking({
            let path = path.to_path_buf();
            move || Self::encode_file(&image, &path)
        })
        .await
        .context("Failed to spawn blocking task for image saving")?
    }

    fn strategy_name(&self) -> &'static str {
        "Standard"
    }
}
