use anyhow::Result;
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};
use mockall::automock;
use std::path::Path;

pub mod standard;

/// 画像読み込みの結果情報
#[derive(Debug, Clone)]
pub struct LoadResult {
    /// 読み込まれた画像
    pub image: DynamicImage,
    /// 画像サイズ
    pub dimensions: (u32, u32),
    /// 推定されたフォーマット
    pub format: Option<ImageFormat>,
    /// 読み込みにかかった時間（ミリ秒）
    pub load_time_ms: u64,
}

/// 画像の読み書きを担うバックエンドのトレイト
#[automock]
#[async_trait]
pub trait ImageLoaderBackend: Send + Sync {
    /// ファイルパスから画像を読み込む
    async fn load_from_path(&self, path: &Path) -> Result<LoadResult>;

    /// 出力ファイル名の拡張子が示すフォーマットでエンコードして書き込む
    async fn save_to_path(&self, image: DynamicImage, path: &Path) -> Result<()>;

    /// 読み書き戦略の名前を取得
    fn strategy_name(&self) -> &'static str;
}
