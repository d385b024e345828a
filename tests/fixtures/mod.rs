// 統合テスト用のヘルパー
// 実画像の生成と出力ディレクトリの検査

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

/// 位置に応じて色が変わるRGB画像
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) * 40 % 256) as u8,
        ])
    })
}

/// 指定形式で画像を書き出す
pub fn write_image(dir: &Path, name: &str, format: ImageFormat) -> PathBuf {
    let path = dir.join(name);
    let image = gradient_rgb(16, 12);
    match format {
        ImageFormat::Gif => DynamicImage::ImageRgba8(RgbaImage::from_fn(16, 12, |x, y| {
            let Rgb([r, g, b]) = *image.get_pixel(x, y);
            Rgba([r, g, b, 255])
        }))
        .save_with_format(&path, format)
        .unwrap(),
        _ => image.save_with_format(&path, format).unwrap(),
    }
    path
}

/// 代表的な混在ディレクトリ: a.jpg, b.png, c.txt, d.GIF
pub fn setup_mixed_directory(dir: &Path) {
    write_image(dir, "a.jpg", ImageFormat::Jpeg);
    write_image(dir, "b.png", ImageFormat::Png);
    fs::write(dir.join("c.txt"), "not an image").unwrap();
    write_image(dir, "d.GIF", ImageFormat::Gif);
}

/// 壊れた画像ファイルを作成
pub fn write_corrupted(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"INVALID_IMAGE_DATA").unwrap();
    path
}

/// ディレクトリ直下のファイル名（整列済み）
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
