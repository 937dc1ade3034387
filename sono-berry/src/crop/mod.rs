//! 裁剪区域的几何计算.
//!
//! 所有计算函数共用同一策略: 如果请求的裁剪区域无法完整落在原图内,
//! 则返回覆盖整张原图的裁剪描述 `(0, 0, H, W)`, 而不是报错或截断.

mod apply;

pub use apply::{apply_multiple_crops, apply_single_crop};
pub(crate) use apply::empty_batch;

use crate::{Origin, Shape2d};

/// 裁剪描述: 矩形区域的 (行偏移, 列偏移, 高, 宽).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct CropDesc {
    /// 行偏移.
    pub row: usize,

    /// 列偏移.
    pub col: usize,

    /// 高.
    pub height: usize,

    /// 宽.
    pub width: usize,
}

impl CropDesc {
    /// 直接构建.
    #[inline]
    pub const fn new(row: usize, col: usize, height: usize, width: usize) -> Self {
        Self {
            row,
            col,
            height,
            width,
        }
    }

    /// 从偏移和形状构建.
    #[inline]
    pub const fn from_parts((row, col): Origin, (height, width): Shape2d) -> Self {
        Self::new(row, col, height, width)
    }

    /// 覆盖整张原图 `native` 的裁剪描述.
    #[inline]
    pub const fn full(native: Shape2d) -> Self {
        Self::from_parts((0, 0), native)
    }

    /// 左上角偏移 (行, 列).
    #[inline]
    pub const fn offset(&self) -> Origin {
        (self.row, self.col)
    }

    /// 裁剪形状 (高, 宽).
    #[inline]
    pub const fn shape(&self) -> Shape2d {
        (self.height, self.width)
    }

    /// 该区域是否完整落在形状为 `native` 的图像内.
    #[inline]
    pub fn fits(&self, native: Shape2d) -> bool {
        crop_in_bounds(native, self.shape(), self.offset())
    }
}

impl From<(usize, usize, usize, usize)> for CropDesc {
    #[inline]
    fn from((row, col, height, width): (usize, usize, usize, usize)) -> Self {
        Self::new(row, col, height, width)
    }
}

impl From<CropDesc> for (usize, usize, usize, usize) {
    #[inline]
    fn from(c: CropDesc) -> Self {
        (c.row, c.col, c.height, c.width)
    }
}

/// 几何计算结果.
///
/// 两种情况对调用者在输出上不可区分 (都给出一个 [`CropDesc`]),
/// 但保留标记便于调试与测试.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CropFit {
    /// 请求被满足.
    Fitted(CropDesc),

    /// 请求无法满足, 退化为整张原图.
    Fallback(CropDesc),
}

impl CropFit {
    /// 请求区域落在图内时为 `Fitted`, 否则退化为覆盖 `native` 的 `Fallback`.
    fn checked(native: Shape2d, target: Shape2d, offset: Origin) -> Self {
        if crop_in_bounds(native, target, offset) {
            Self::Fitted(CropDesc::from_parts(offset, target))
        } else {
            Self::fallback(native)
        }
    }

    #[inline]
    fn fallback(native: Shape2d) -> Self {
        Self::Fallback(CropDesc::full(native))
    }

    /// 获取裁剪描述, 不区分是否退化.
    #[inline]
    pub const fn desc(self) -> CropDesc {
        match self {
            Self::Fitted(d) | Self::Fallback(d) => d,
        }
    }

    /// 是否退化为整张原图.
    #[inline]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// 取形状的前两维 (高, 宽). 维数不足 2 时返回 `None`.
#[inline]
pub fn extract_height_width(shape: &[usize]) -> Option<Shape2d> {
    match shape {
        [h, w, ..] => Some((*h, *w)),
        _ => None,
    }
}

/// 形状为 `target`, 偏移为 `offset` 的区域是否落在形状为 `native` 的图像内.
///
/// 允许恰好贴住图像边界.
#[inline]
pub fn crop_in_bounds(native: Shape2d, target: Shape2d, offset: Origin) -> bool {
    let fits = |t: usize, o: usize, n: usize| t.checked_add(o).is_some_and(|end| end <= n);
    fits(target.0, offset.0, native.0) && fits(target.1, offset.1, native.1)
}

/// 从固定原点 `origin` 裁剪出形状为 `target` 的区域.
pub fn origin_crop(native: Shape2d, target: Shape2d, origin: Origin) -> CropFit {
    CropFit::checked(native, target, origin)
}

/// 以图像中心为基准裁剪出形状为 `target` 的区域.
///
/// 偏移为 `floor((native - target) / 2)`. `target` 在任一维上大于 `native` 时退化.
pub fn center_crop_to_shape(native: Shape2d, target: Shape2d) -> CropFit {
    match centered_offset(native, target) {
        Some(offset) => CropFit::checked(native, target, offset),
        None => CropFit::fallback(native),
    }
}

/// 以图像中心为基准, 按比例裁剪.
///
/// `height_fraction` 和 `width_fraction` 必须位于 `(0, 1]`, 否则退化.
/// 目标形状按 `floor(native / (1 / fraction))` 计算 (而不是 `floor(native * fraction)`),
/// 两者仅在小数边界上的取整不同.
pub fn center_crop_to_percentage(
    native: Shape2d,
    height_fraction: f64,
    width_fraction: f64,
) -> CropFit {
    let valid = |f: f64| f > 0.0 && f <= 1.0;
    if !valid(height_fraction) || !valid(width_fraction) {
        return CropFit::fallback(native);
    }
    let scale = |n: usize, f: f64| floor_divide(n as f64, f.recip()) as usize;
    let target = (
        scale(native.0, height_fraction),
        scale(native.1, width_fraction),
    );
    match centered_offset(native, target) {
        Some(offset) => CropFit::checked(native, target, offset),
        None => CropFit::fallback(native),
    }
}

/// 以固定边距裁掉图像四周.
///
/// 每一维的边距都必须严格小于 `native / 2` (整除), 否则退化.
/// 结果形状为 `native - 2 * padding`, 偏移为 `padding`.
pub fn center_crop_to_padding(
    native: Shape2d,
    height_padding: usize,
    width_padding: usize,
) -> CropFit {
    if height_padding >= native.0 / 2 || width_padding >= native.1 / 2 {
        return CropFit::fallback(native);
    }
    let target = (native.0 - 2 * height_padding, native.1 - 2 * width_padding);
    CropFit::Fitted(CropDesc::from_parts((height_padding, width_padding), target))
}

/// `floor((native - target) / 2)`. 任一维 `target > native` 时返回 `None`.
#[inline]
fn centered_offset(native: Shape2d, target: Shape2d) -> Option<Origin> {
    Some((
        native.0.checked_sub(target.0)? / 2,
        native.1.checked_sub(target.1)? / 2,
    ))
}

/// 浮点整除, 按 `divmod` 语义取整: 先求余数, 再用 `(a - rem) / b` 求商,
/// 最后向下取整并在距上一个整数不足 0.5 时进位.
///
/// 只用于非负的 `a` 和正的 `b`.
fn floor_divide(a: f64, b: f64) -> f64 {
    let rem = a % b;
    let div = (a - rem) / b;
    if div == 0.0 {
        return 0.0;
    }
    let floor = div.floor();
    if div - floor > 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_height_width() {
        assert_eq!(extract_height_width(&[100, 200, 3]), Some((100, 200)));
        assert_eq!(extract_height_width(&[100, 200]), Some((100, 200)));
        assert_eq!(extract_height_width(&[100]), None);
        assert_eq!(extract_height_width(&[]), None);
    }

    #[test]
    fn test_crop_in_bounds_touching_border() {
        assert!(crop_in_bounds((10, 10), (10, 10), (0, 0)));
        assert!(crop_in_bounds((10, 10), (5, 5), (5, 5)));
        assert!(!crop_in_bounds((10, 10), (5, 5), (6, 5)));
        assert!(!crop_in_bounds((10, 10), (5, 6), (5, 5)));
        assert!(!crop_in_bounds((10, 10), (usize::MAX, 1), (1, 0)));
    }

    #[test]
    fn test_origin_crop_zero_origin() {
        for (n, t) in [((10, 10), (10, 10)), ((64, 32), (1, 1)), ((100, 200), (50, 199))] {
            let fit = origin_crop(n, t, (0, 0));
            assert_eq!(fit, CropFit::Fitted(CropDesc::from_parts((0, 0), t)));
        }
    }

    #[test]
    fn test_origin_crop_out_of_bounds() {
        let fit = origin_crop((10, 10), (5, 5), (6, 0));
        assert!(fit.is_fallback());
        assert_eq!(fit.desc(), CropDesc::new(0, 0, 10, 10));
    }

    #[test]
    fn test_fallback_when_target_too_large() {
        let native = (30, 40);
        let full = CropDesc::full(native);
        for target in [(31, 40), (30, 41), (50, 50)] {
            assert_eq!(origin_crop(native, target, (0, 0)).desc(), full);
            assert_eq!(center_crop_to_shape(native, target).desc(), full);
        }
        // 差 1 时, 向下取整的负偏移也不能 "凑" 进边界.
        assert!(center_crop_to_shape(native, (31, 40)).is_fallback());
    }

    #[test]
    fn test_center_crop_to_shape() {
        let fit = center_crop_to_shape((100, 200), (50, 50));
        assert_eq!(fit, CropFit::Fitted(CropDesc::new(25, 75, 50, 50)));

        for n in 1..20 {
            for t in 1..=n {
                let d = center_crop_to_shape((n, n + 3), (t, t)).desc();
                assert_eq!(d.offset(), ((n - t) / 2, (n + 3 - t) / 2));
                assert!(d.fits((n, n + 3)));
            }
        }
    }

    #[test]
    fn test_center_crop_to_percentage() {
        assert_eq!(
            center_crop_to_percentage((100, 200), 0.5, 0.25).desc(),
            CropDesc::new(25, 75, 50, 50)
        );
        assert_eq!(
            center_crop_to_percentage((100, 200), 1.0, 1.0),
            CropFit::Fitted(CropDesc::full((100, 200)))
        );
        // 100 / (1 / 0.95) == 95.
        assert_eq!(
            center_crop_to_percentage((100, 100), 0.95, 0.95).desc(),
            CropDesc::new(2, 2, 95, 95)
        );
        assert_eq!(
            center_crop_to_percentage((10, 10), 0.3, 0.3).desc(),
            CropDesc::new(4, 4, 2, 2)
        );
    }

    #[test]
    fn test_center_crop_to_percentage_invalid() {
        let full = CropDesc::full((64, 48));
        for (hf, wf) in [(0.0, 0.5), (0.5, 0.0), (1.01, 0.5), (0.5, -0.2), (f64::NAN, 0.5)] {
            let fit = center_crop_to_percentage((64, 48), hf, wf);
            assert!(fit.is_fallback());
            assert_eq!(fit.desc(), full);
        }
    }

    #[test]
    fn test_center_crop_to_padding() {
        assert_eq!(
            center_crop_to_padding((64, 64), 10, 10),
            CropFit::Fitted(CropDesc::new(10, 10, 44, 44))
        );
        assert_eq!(
            center_crop_to_padding((64, 64), 0, 0).desc(),
            CropDesc::full((64, 64))
        );
        assert_eq!(
            center_crop_to_padding((65, 64), 31, 0).desc(),
            CropDesc::new(31, 0, 3, 64)
        );
    }

    #[test]
    fn test_center_crop_to_padding_invalid() {
        assert!(center_crop_to_padding((64, 64), 32, 0).is_fallback());
        assert!(center_crop_to_padding((64, 64), 0, 40).is_fallback());
        assert!(center_crop_to_padding((65, 64), 32, 0).is_fallback());
        assert!(center_crop_to_padding((1, 1), 0, 0).is_fallback());
    }

    #[test]
    fn test_floor_divide() {
        assert_eq!(floor_divide(100.0, 2.0), 50.0);
        assert_eq!(floor_divide(7.0, 2.0), 3.0);
        assert_eq!(floor_divide(0.0, 3.0), 0.0);
        // 与 `floor(10 * 0.3) == 3` 不同.
        assert_eq!(floor_divide(10.0, 1.0 / 0.3), 2.0);
        assert_eq!(floor_divide(100.0, 1.0 / 0.95), 95.0);
    }

    #[test]
    fn test_crop_desc_tuple() {
        let d = CropDesc::from((1, 2, 3, 4));
        assert_eq!(d.offset(), (1, 2));
        assert_eq!(d.shape(), (3, 4));
        assert_eq!(<(usize, usize, usize, usize)>::from(d), (1, 2, 3, 4));
    }
}
