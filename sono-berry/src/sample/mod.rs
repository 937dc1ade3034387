//! 从单张图像批量采样裁剪, 用于数据增强.

mod generator;
mod upscale;

pub use generator::{crop_generator, CropGenerator};
pub use upscale::{
    center_crop_auto_upscale, max_interpolation_factor, sample_to_batch, sample_to_batch_gray,
    target_shape_fit_in_image, SampleOptions,
};

use crate::crop::{
    apply_multiple_crops, center_crop_to_shape, empty_batch, extract_height_width, origin_crop,
};
use crate::{SampleError, SampleResult, Shape2d};
use ndarray::{Array, ArrayBase, Data, Dimension, RemoveAxis};
use rand::Rng;

/// 取图像的 (高, 宽). 维数不足 2 时返回 `SampleError::NotAnImage`.
#[inline]
pub(crate) fn native_shape<S: Data, D: Dimension>(image: &ArrayBase<S, D>) -> SampleResult<Shape2d> {
    extract_height_width(image.shape()).ok_or(SampleError::NotAnImage(image.ndim()))
}

/// 生成 `batch_size` 个完全相同的中心裁剪.
///
/// 原点固定, 因此不做任何增强; 可作为基线. `batch_size` 为 0 时返回空批次.
pub fn sample_to_batch_center_origin<A, S, D>(
    image: &ArrayBase<S, D>,
    target: Shape2d,
    batch_size: usize,
) -> SampleResult<Array<A, D::Larger>>
where
    A: Clone,
    S: Data<Elem = A>,
    D: Dimension,
    D::Larger: RemoveAxis,
{
    let crop = center_crop_to_shape(native_shape(image)?, target).desc();
    if batch_size == 0 {
        return Ok(empty_batch(image, crop.shape()));
    }
    apply_multiple_crops(image, std::iter::repeat(crop).take(batch_size))
}

/// 生成 `batch_size` 个原点相互独立、均匀随机的裁剪.
///
/// 行原点取自 `[0, max(H - h, 1))`, 列原点同理. 取 `max(.., 1)` 是为了让
/// `target == native` 时取值区间不为空, 此时原点只会是 0.
/// 先抽取全部行原点, 再抽取全部列原点. `batch_size` 为 0 时返回空批次,
/// 不消耗随机数.
pub fn sample_to_batch_random_origin<A, S, D, R>(
    image: &ArrayBase<S, D>,
    target: Shape2d,
    batch_size: usize,
    rng: &mut R,
) -> SampleResult<Array<A, D::Larger>>
where
    A: Clone,
    S: Data<Elem = A>,
    D: Dimension,
    D::Larger: RemoveAxis,
    R: Rng + ?Sized,
{
    let native = native_shape(image)?;
    if batch_size == 0 {
        return Ok(empty_batch(image, origin_crop(native, target, (0, 0)).desc().shape()));
    }
    let row_max = native.0.saturating_sub(target.0).max(1);
    let col_max = native.1.saturating_sub(target.1).max(1);

    let rows: Vec<usize> = (0..batch_size).map(|_| rng.gen_range(0..row_max)).collect();
    let cols: Vec<usize> = (0..batch_size).map(|_| rng.gen_range(0..col_max)).collect();

    let crops = rows
        .into_iter()
        .zip(cols)
        .map(|origin| origin_crop(native, target, origin).desc());
    apply_multiple_crops(image, crops)
}
