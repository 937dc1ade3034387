use crate::consts::ImageKind;
use ndarray::{ArrayView3, Axis};

/// 判断超声图像为灰度 (B 模式) 还是彩色 (多普勒).
///
/// 统计前三个通道不完全相等的像素占比; 占比低于 `threshold` 时视为灰度.
/// 通道数不足 3 的图像一律视为灰度. 常用阈值见
/// [`crate::consts::COLOR_PERCENTAGE_THRESHOLD`].
pub fn determine_image_kind(image: &ArrayView3<u8>, threshold: f64) -> ImageKind {
    let (h, w, c) = image.dim();
    if c < 3 || h * w == 0 {
        return ImageKind::Grayscale;
    }
    let colored = image
        .lanes(Axis(2))
        .into_iter()
        .filter(|px| !(px[0] == px[1] && px[1] == px[2]))
        .count();
    if (colored as f64 / (h * w) as f64) < threshold {
        ImageKind::Grayscale
    } else {
        ImageKind::Color
    }
}
