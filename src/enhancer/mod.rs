use crate::core::EnhancementFactors;
use anyhow::Result;
use image::DynamicImage;
use mockall::automock;

pub mod standard;

/// 画像補正バックエンドのトレイト
///
/// 入力画像に brightness → sharpness → contrast の順で係数を適用する。
/// 純粋な変換で、ファイル書き込みは呼び出し側が行う。
#[automock]
pub trait EnhancementBackend: Send + Sync {
    /// 補正を適用した画像を返す
    fn apply(&self, image: DynamicImage, factors: &EnhancementFactors) -> Result<DynamicImage>;

    /// 補正戦略の名前
    fn strategy_name(&self) -> &'static str;
}

impl EnhancementBackend for Box<dyn EnhancementBackend> {
    fn apply(&self, image: DynamicImage, factors: &EnhancementFactors) -> Result<DynamicImage> {
        self.as_ref().apply(image, factors)
    }

    fn strategy_name(&self) -> &'static str {
        self.as_ref().strategy_name()
    }
}
