//! 图像数据的基础操作: 类型判断, 缩放, 与 `image` crate 之间的转换, 持久化存储.

mod kind;
mod resize;
mod save;

pub use kind::determine_image_kind;
pub use resize::{resize, FilterType};
pub use save::ImgWriteRaw;

use crate::consts::ImageKind;
use image::{DynamicImage, GrayImage, RgbImage};
use ndarray::{Array3, ArrayView3};

/// 将 `image` crate 的 RGB 图像转为 `(H, W, 3)` 数组.
pub fn rgb_to_array(img: &RgbImage) -> Array3<u8> {
    let (w, h) = img.dimensions();
    Array3::from_shape_fn((h as usize, w as usize, 3), |(r, c, ch)| {
        img.get_pixel(c as u32, r as u32)[ch]
    })
}

/// 将 `image` crate 的灰度图像转为 `(H, W, 1)` 数组.
pub fn gray_to_array(img: &GrayImage) -> Array3<u8> {
    let (w, h) = img.dimensions();
    Array3::from_shape_fn((h as usize, w as usize, 1), |(r, c, _)| {
        img.get_pixel(c as u32, r as u32)[0]
    })
}

/// 按 `kind` 将解码后的图像转为数组: 灰度为 1 通道, 彩色为 3 通道.
pub fn dynamic_to_array(img: &DynamicImage, kind: ImageKind) -> Array3<u8> {
    match kind {
        ImageKind::Grayscale => gray_to_array(&img.to_luma8()),
        ImageKind::Color => rgb_to_array(&img.to_rgb8()),
    }
}

/// 取 `(H, W, C)` 图像的第 `ch` 个通道, 构造单通道 `image` 图像.
pub(crate) fn channel_to_gray(image: &ArrayView3<u8>, ch: usize) -> GrayImage {
    let (h, w, _) = image.dim();
    GrayImage::from_fn(w as u32, h as u32, |x, y| {
        image::Luma([image[[y as usize, x as usize, ch]]])
    })
}
