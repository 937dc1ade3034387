//! 图像的持久化存储.

use super::channel_to_gray;
use image::error::{ParameterError, ParameterErrorKind};
use image::{ImageError, ImageResult, RgbImage};
use ndarray::{Array3, ArrayView3};
use std::path::Path;

/// 表明一个可以通过 **按原样** 模式持久化存储的图像对象.
///
/// 像素值不经任何映射直接写出. 1 通道图像存为灰度图, 3 通道图像存为 RGB 图,
/// 其他通道数返回 `ImageError::Parameter`.
pub trait ImgWriteRaw {
    /// 按原样将图片保存到 `path` 路径. 格式由扩展名决定.
    fn save_raw<P: AsRef<Path>>(&self, path: P) -> ImageResult<()>;
}

impl ImgWriteRaw for ArrayView3<'_, u8> {
    fn save_raw<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let (height, width, channels) = self.dim();
        match channels {
            1 => channel_to_gray(self, 0).save(path),
            3 => {
                let buf = RgbImage::from_fn(width as u32, height as u32, |x, y| {
                    let (r, c) = (y as usize, x as usize);
                    image::Rgb([self[[r, c, 0]], self[[r, c, 1]], self[[r, c, 2]]])
                });
                buf.save(path)
            }
            _ => Err(ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            ))),
        }
    }
}

impl ImgWriteRaw for Array3<u8> {
    #[inline]
    fn save_raw<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.view().save_raw(path)
    }
}
