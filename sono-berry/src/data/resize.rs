use super::channel_to_gray;
use crate::Shape2d;
use image::imageops;
use ndarray::{Array3, ArrayView3};

/// 插值方法. 双三次插值对应 `FilterType::CatmullRom`.
pub use image::imageops::FilterType;

/// 将 `(H, W, C)` 图像缩放到 `(height, width)`, 通道数不变.
///
/// 插值由 `image` crate 完成, 每个通道独立缩放.
pub fn resize(image: &ArrayView3<u8>, (height, width): Shape2d, filter: FilterType) -> Array3<u8> {
    let channels = image.dim().2;
    let resized: Vec<_> = (0..channels)
        .map(|ch| {
            let gray = channel_to_gray(image, ch);
            imageops::resize(&gray, width as u32, height as u32, filter)
        })
        .collect();
    Array3::from_shape_fn((height, width, channels), |(r, c, ch)| {
        resized[ch].get_pixel(c as u32, r as u32)[0]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_shape() {
        let img = Array3::<u8>::from_elem((30, 40, 3), 9);
        let out = resize(&img.view(), (50, 60), FilterType::CatmullRom);
        assert_eq!(out.dim(), (50, 60, 3));
    }

    #[test]
    fn test_resize_constant_image() {
        let img = Array3::<u8>::from_elem((8, 8, 1), 128);
        for filter in [FilterType::Nearest, FilterType::Triangle, FilterType::CatmullRom] {
            let out = resize(&img.view(), (16, 12), filter);
            assert!(out.iter().all(|p| (127..=128).contains(p)));
        }
    }

    #[test]
    fn test_resize_identity_nearest() {
        let img = Array3::from_shape_fn((5, 7, 2), |(i, j, k)| (i * 7 + j + k * 50) as u8);
        let out = resize(&img.view(), (5, 7), FilterType::Nearest);
        assert_eq!(out, img);
    }
}
