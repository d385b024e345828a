use super::EnhancementBackend;
use crate::core::EnhancementFactors;
use anyhow::{Context, Result};
use image::{ColorType, DynamicImage, Rgba, RgbaImage};

/// 平滑化カーネル（3x3、中央の重み5、合計13）
const SMOOTH_KERNEL: [[u32; 3]; 3] = [[1, 1, 1], [1, 5, 1], [1, 1, 1]];
const SMOOTH_SCALE: f32 = 13.0;

/// 標準的な補正実装
///
/// 各段階は「劣化画像と元画像の線形ブレンド」で表される。
/// 係数 0.0 で劣化画像、1.0 で元画像、1.0 超で差分が強調される。
/// アルファチャンネルは常に元画像の値を保持する。
#[derive(Clone, Debug, Default)]
pub struct StandardEnhancer;

impl StandardEnhancer {
    pub fn new() -> Self {
        Self
    }

    /// 明るさ: 黒とのブレンド
    pub fn adjust_brightness(image: &RgbaImage, factor: f32) -> RgbaImage {
        let mut output = image.clone();
        for pixel in output.pixels_mut() {
            for channel in 0..3 {
                pixel[channel] = blend(0, pixel[channel], factor);
            }
        }
        output
    }

    /// シャープネス: 平滑化画像とのブレンド
    ///
    /// 外周1ピクセルは平滑化の対象外で、元の値のまま残る。
    pub fn adjust_sharpness(image: &RgbaImage, factor: f32) -> RgbaImage {
        let (width, height) = image.dimensions();
        let mut output = image.clone();
        if width < 3 || height < 3 {
            return output;
        }

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let smoothed = smooth_at(image, x, y);
                let original = image.get_pixel(x, y);
                let target = output.get_pixel_mut(x, y);
                for channel in 0..3 {
                    target[channel] = blend(smoothed[channel], original[channel], factor);
                }
            }
        }
        output
    }

    /// コントラスト: 平均輝度の灰色とのブレンド
    pub fn adjust_contrast(image: &RgbaImage, factor: f32) -> RgbaImage {
        let mean = mean_luma(image);
        let mut output = image.clone();
        for pixel in output.pixels_mut() {
            for channel in 0..3 {
                pixel[channel] = blend(mean, pixel[channel], factor);
            }
        }
        output
    }
}

impl EnhancementBackend for StandardEnhancer {
    fn apply(&self, image: DynamicImage, factors: &EnhancementFactors) -> Result<DynamicImage> {
        factors.validate().context("Invalid enhancement factors")?;

        if factors.is_identity() {
            return Ok(image);
        }

        let color = image.color();
        let mut working = image.into_rgba8();

        // 順序固定: 前段の出力を次段へ渡す
        if factors.brightness != 1.0 {
            working = Self::adjust_brightness(&working, factors.brightness);
        }
        if factors.sharpness != 1.0 {
            working = Self::adjust_sharpness(&working, factors.sharpness);
        }
        if factors.contrast != 1.0 {
            working = Self::adjust_contrast(&working, factors.contrast);
        }

        Ok(restore_color(color, working))
    }

    fn strategy_name(&self) -> &'static str {
        "Standard blend"
    }
}

fn blend(degenerate: u8, original: u8, factor: f32) -> u8 {
    let degenerate = degenerate as f32;
    let original = original as f32;
    (degenerate + (original - degenerate) * factor)
        .round()
        .clamp(0.0, 255.0) as u8
}

fn smooth_at(image: &RgbaImage, x: u32, y: u32) -> [u8; 3] {
    let mut sums = [0u32; 3];
    for (dy, row) in SMOOTH_KERNEL.iter().enumerate() {
        for (dx, weight) in row.iter().enumerate() {
            let Rgba(neighbor) = *image.get_pixel(x + dx as u32 - 1, y + dy as u32 - 1);
            for channel in 0..3 {
                sums[channel] += neighbor[channel] as u32 * weight;
            }
        }
    }
    sums.map(|sum| (sum as f32 / SMOOTH_SCALE).round().clamp(0.0, 255.0) as u8)
}

/// ITU-R 601-2 の輝度
fn luma(pixel: &Rgba<u8>) -> u32 {
    (pixel[0] as u32 * 299 + pixel[1] as u32 * 587 + pixel[2] as u32 * 114) / 1000
}

fn mean_luma(image: &RgbaImage) -> u8 {
    let pixel_count = image.width() as u64 * image.height() as u64;
    if pixel_count == 0 {
        return 0;
    }
    let total: u64 = image.pixels().map(|pixel| luma(pixel) as u64).sum();
    (total as f64 / pixel_count as f64 + 0.5).min(255.0) as u8
}

/// 作業バッファをデコード時の色形式へ戻す（ネイティブ形式でのエンコードのため）
fn restore_color(color: ColorType, working: RgbaImage) -> DynamicImage {
    let working = DynamicImage::ImageRgba8(working);
    match color {
        ColorType::L8 => DynamicImage::ImageLuma8(working.into_luma8()),
        ColorType::La8 => DynamicImage::ImageLumaA8(working.into_luma_alpha8()),
        ColorType::Rgb8 => DynamicImage::ImageRgb8(working.into_rgb8()),
        ColorType::L16 => DynamicImage::ImageLuma16(working.into_luma16()),
        ColorType::La16 => DynamicImage::ImageLumaA16(working.into_luma_alpha16()),
        ColorType::Rgb16 => DynamicImage::ImageRgb16(working.into_rgb16()),
        ColorType::Rgba16 => DynamicImage::ImageRgba16(working.into_rgba16()),
        ColorType::Rgb32F => DynamicImage::ImageRgb32F(working.into_rgb32f()),
        ColorType::Rgba32F => DynamicImage::ImageRgba32F(working.into_rgba32f()),
        _ => working,
    }
}
