//! 按裁剪描述切取图像.

use super::CropDesc;
use crate::{SampleResult, Shape2d};
use ndarray::{stack, Array, ArrayBase, ArrayView, Axis, Data, Dimension, RemoveAxis, Slice};

/// 按 `crop` 切取 `image` 的前两维, 返回借用原图的只读视图.
///
/// # 注意
///
/// `crop` 必须完整落在 `image` 内 (由 [`super`] 中的几何计算保证),
/// 否则程序 panic. `image` 的维数必须不小于 2.
pub fn apply_single_crop<A, S, D>(image: &ArrayBase<S, D>, crop: CropDesc) -> ArrayView<'_, A, D>
where
    S: Data<Elem = A>,
    D: Dimension,
{
    let mut view = image.view();
    view.slice_axis_inplace(Axis(0), Slice::from(crop.row..crop.row + crop.height));
    view.slice_axis_inplace(Axis(1), Slice::from(crop.col..crop.col + crop.width));
    view
}

/// 对同一张 `image` 依次应用 `crops`, 并沿新的第 0 维堆叠为批次.
///
/// 所有裁剪的 (高, 宽) 必须一致, 且至少有一个裁剪, 否则返回 `SampleError::Shape`.
pub fn apply_multiple_crops<A, S, D, I>(
    image: &ArrayBase<S, D>,
    crops: I,
) -> SampleResult<Array<A, D::Larger>>
where
    A: Clone,
    S: Data<Elem = A>,
    D: Dimension,
    D::Larger: RemoveAxis,
    I: IntoIterator<Item = CropDesc>,
{
    let views: Vec<ArrayView<A, D>> = crops
        .into_iter()
        .map(|c| apply_single_crop(image, c))
        .collect();
    Ok(stack(Axis(0), &views)?)
}

/// 与 `image` 除前两维外形状相同、裁剪形状为 `shape` 的空批次 `(0, h, w, ..)`.
///
/// `shape` 在每一维上都不得大于 `image`, 否则程序 panic.
pub(crate) fn empty_batch<A, S, D>(image: &ArrayBase<S, D>, (h, w): Shape2d) -> Array<A, D::Larger>
where
    A: Clone,
    S: Data<Elem = A>,
    D: Dimension,
{
    let mut view = image.view().insert_axis(Axis(0));
    view.slice_axis_inplace(Axis(0), Slice::from(0..0));
    view.slice_axis_inplace(Axis(1), Slice::from(0..h));
    view.slice_axis_inplace(Axis(2), Slice::from(0..w));
    view.to_owned()
}
