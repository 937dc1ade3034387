//! 采样总入口: 参数校验, 必要时放大图像, 然后批量采样.

use super::{native_shape, sample_to_batch_center_origin, sample_to_batch_random_origin};
use crate::consts::DEFAULT_BATCH_SIZE;
use crate::crop::{apply_single_crop, center_crop_to_shape};
use crate::data::{resize, FilterType};
use crate::{SampleError, SampleResult, Shape2d};
use ndarray::{Array3, Array4, ArrayView2, ArrayView3, Axis, CowArray};
use rand::Rng;

/// [`sample_to_batch`] 的参数.
///
/// 默认值: 批大小 16, 无目标形状, 不放大, 不使用最小维度,
/// 双三次插值, 随机原点采样.
#[derive(Clone, Debug)]
pub struct SampleOptions {
    /// 每批采样个数.
    pub batch_size: usize,

    /// 每个采样的形状 (高, 宽). 按约定应为正方形, 但不做检查.
    pub target_shape: Option<Shape2d>,

    /// 采样前先将图像缩放到 `target_shape`. 需要给出 `target_shape`.
    pub upscale_to_target: bool,

    /// 以原图较短边作为正方形采样边长. 没有 `target_shape` 时必须开启;
    /// 开启后无论 `target_shape` 为何值都会被覆盖.
    pub use_min_dimension: bool,

    /// 放大时使用的插值方法.
    pub interpolation: FilterType,

    /// 总是采样中心区域 (批内所有采样相同).
    pub always_sample_center: bool,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            target_shape: None,
            upscale_to_target: false,
            use_min_dimension: false,
            interpolation: FilterType::CatmullRom,
            always_sample_center: false,
        }
    }
}

impl SampleOptions {
    /// 以默认值创建.
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置批大小.
    pub fn set_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// 设置目标形状.
    pub fn set_target_shape(mut self, target: Shape2d) -> Self {
        self.target_shape = Some(target);
        self
    }

    /// 设置是否放大到目标形状.
    pub fn set_upscale_to_target(mut self, upscale: bool) -> Self {
        self.upscale_to_target = upscale;
        self
    }

    /// 设置是否使用最小维度.
    pub fn set_use_min_dimension(mut self, use_min: bool) -> Self {
        self.use_min_dimension = use_min;
        self
    }

    /// 设置插值方法.
    pub fn set_interpolation(mut self, filter: FilterType) -> Self {
        self.interpolation = filter;
        self
    }

    /// 设置是否总是采样中心区域.
    pub fn set_always_sample_center(mut self, center: bool) -> Self {
        self.always_sample_center = center;
        self
    }

    /// 校验参数组合, 并得到 (可能被覆盖的) 目标形状.
    ///
    /// # 注意
    ///
    /// 校验针对调用者给出的 `target_shape`, 在 `use_min_dimension` 覆盖之前进行.
    /// 因此即使开启了 `use_min_dimension`, 过大的 `target_shape` 在不放大时仍会报错.
    fn resolve_target(&self, native: Shape2d) -> SampleResult<Shape2d> {
        let min_dim = native.0.min(native.1);
        match self.target_shape {
            None if !self.use_min_dimension => Err(SampleError::MissingMinDimension),
            None if self.upscale_to_target => Err(SampleError::UpscaleWithoutTarget),
            None => Ok((min_dim, min_dim)),
            Some(target) => {
                if !self.upscale_to_target && !target_shape_fit_in_image(native, target) {
                    return Err(SampleError::TargetExceedsNative { native, target });
                }
                if self.use_min_dimension {
                    Ok((min_dim, min_dim))
                } else {
                    Ok(target)
                }
            }
        }
    }
}

/// 原图在每一维上都不小于目标形状.
#[inline]
pub fn target_shape_fit_in_image(native: Shape2d, target: Shape2d) -> bool {
    native.0 >= target.0 && native.1 >= target.1
}

/// 使目标形状能放进原图所需的最小放大倍数 `max(target_i / native_i)`.
#[inline]
pub fn max_interpolation_factor(native: Shape2d, target: Shape2d) -> f64 {
    f64::max(
        target.0 as f64 / native.0 as f64,
        target.1 as f64 / native.1 as f64,
    )
}

/// 对图像批量采样.
///
/// 流程:
///
/// 1. 按 [`SampleOptions`] 校验参数组合, 失败时立即返回, 不做任何缩放.
/// 2. 开启 `use_min_dimension` 时, 目标形状改为以原图短边为边长的正方形.
/// 3. 开启 `upscale_to_target` 时, 将图像缩放到目标形状.
/// 4. 若目标形状的短边仍大于 **原图** 短边, 则将目标形状收缩为以原图短边为边长的正方形.
/// 5. 按 `always_sample_center` 选择中心采样或随机采样.
///
/// 返回形状为 `(batch_size, h, w, C)` 的批次. 二维灰度图像请使用 [`sample_to_batch_gray`].
pub fn sample_to_batch<R: Rng + ?Sized>(
    image: &ArrayView3<u8>,
    options: &SampleOptions,
    rng: &mut R,
) -> SampleResult<Array4<u8>> {
    let native = native_shape(image)?;
    let native_min = native.0.min(native.1);
    let mut target = options.resolve_target(native)?;
    log::debug!("native shape: {native:?}, native min dim: {native_min}, target shape: {target:?}");

    let image: CowArray<u8, _> = if options.upscale_to_target {
        let resized = resize(image, target, options.interpolation);
        log::debug!("resized image to {:?}", resized.dim());
        resized.into()
    } else {
        image.view().into()
    };

    if target.0.min(target.1) > native_min {
        target = (native_min, native_min);
    }

    if options.always_sample_center {
        sample_to_batch_center_origin(&image, target, options.batch_size)
    } else {
        sample_to_batch_random_origin(&image, target, options.batch_size, rng)
    }
}

/// 对二维 `(H, W)` 灰度图像批量采样, 流程同 [`sample_to_batch`].
///
/// 图像被视为 `(H, W, 1)`, 返回形状为 `(batch_size, h, w, 1)` 的批次.
pub fn sample_to_batch_gray<R: Rng + ?Sized>(
    image: &ArrayView2<u8>,
    options: &SampleOptions,
    rng: &mut R,
) -> SampleResult<Array4<u8>> {
    sample_to_batch(&image.view().insert_axis(Axis(2)), options, rng)
}

/// 必要时放大图像, 然后中心裁剪到 `target`.
///
/// 目标形状放不进原图时, 以 [`max_interpolation_factor`] 倍放大,
/// 新形状为 `ceil(native_i * factor)`. 返回拥有所有权的裁剪结果.
pub fn center_crop_auto_upscale(
    image: &ArrayView3<u8>,
    target: Shape2d,
    filter: FilterType,
) -> SampleResult<Array3<u8>> {
    let native = native_shape(image)?;
    let image: CowArray<u8, _> = if target_shape_fit_in_image(native, target) {
        image.view().into()
    } else {
        let factor = max_interpolation_factor(native, target);
        let upscaled = (
            (native.0 as f64 * factor).ceil() as usize,
            (native.1 as f64 * factor).ceil() as usize,
        );
        log::debug!("upscaling {native:?} to {upscaled:?} (factor {factor:.4})");
        resize(image, upscaled, filter).into()
    };
    let crop = center_crop_to_shape(native_shape(&image)?, target).desc();
    Ok(apply_single_crop(&image, crop).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Axis;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ramp(h: usize, w: usize, c: usize) -> Array3<u8> {
        Array3::from_shape_fn((h, w, c), |(i, j, k)| ((i * 5 + j * 3 + k) % 256) as u8)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn test_defaults() {
        let o = SampleOptions::default();
        assert_eq!(o.batch_size, 16);
        assert_eq!(o.target_shape, None);
        assert!(!o.upscale_to_target && !o.use_min_dimension && !o.always_sample_center);
        assert_eq!(o.interpolation, FilterType::CatmullRom);
    }

    #[test]
    fn test_missing_min_dimension() {
        let img = ramp(20, 20, 3);
        let o = SampleOptions::new().set_batch_size(4);
        let err = sample_to_batch(&img.view(), &o, &mut rng()).unwrap_err();
        assert!(matches!(err, SampleError::MissingMinDimension));
    }

    #[test]
    fn test_upscale_without_target() {
        let img = ramp(20, 20, 3);
        let o = SampleOptions::new()
            .set_use_min_dimension(true)
            .set_upscale_to_target(true);
        let err = sample_to_batch(&img.view(), &o, &mut rng()).unwrap_err();
        assert!(matches!(err, SampleError::UpscaleWithoutTarget));
    }

    #[test]
    fn test_target_exceeds_native() {
        let img = ramp(30, 30, 3);
        let o = SampleOptions::new().set_target_shape((50, 50));
        let err = sample_to_batch(&img.view(), &o, &mut rng()).unwrap_err();
        assert!(matches!(
            err,
            SampleError::TargetExceedsNative {
                native: (30, 30),
                target: (50, 50)
            }
        ));
    }

    #[test]
    fn test_validation_runs_before_min_dimension_override() {
        let img = ramp(30, 40, 3);
        let o = SampleOptions::new()
            .set_target_shape((50, 50))
            .set_use_min_dimension(true);
        assert!(matches!(
            sample_to_batch(&img.view(), &o, &mut rng()),
            Err(SampleError::TargetExceedsNative { .. })
        ));
    }

    #[test]
    fn test_use_min_dimension() {
        let img = ramp(30, 40, 3);
        let o = SampleOptions::new().set_use_min_dimension(true).set_batch_size(5);
        let batch = sample_to_batch(&img.view(), &o, &mut rng()).unwrap();
        assert_eq!(batch.shape(), &[5, 30, 30, 3]);

        // 目标形状被覆盖.
        let o = o.set_target_shape((10, 10));
        let batch = sample_to_batch(&img.view(), &o, &mut rng()).unwrap();
        assert_eq!(batch.shape(), &[5, 30, 30, 3]);
    }

    #[test]
    fn test_batch_size_zero() {
        let img = ramp(16, 24, 3);
        let o = SampleOptions::new().set_target_shape((16, 24)).set_batch_size(0);
        let batch = sample_to_batch(&img.view(), &o, &mut rng()).unwrap();
        assert_eq!(batch.shape(), &[0, 16, 24, 3]);

        let o = o.set_always_sample_center(true);
        let batch = sample_to_batch(&img.view(), &o, &mut rng()).unwrap();
        assert_eq!(batch.shape(), &[0, 16, 24, 3]);
    }

    #[test]
    fn test_gray_2d_image() {
        let img = ndarray::Array2::from_shape_fn((40, 60), |(i, j)| (i + j) as u8);
        let o = SampleOptions::new()
            .set_target_shape((20, 20))
            .set_always_sample_center(true)
            .set_batch_size(2);
        let batch = sample_to_batch_gray(&img.view(), &o, &mut rng()).unwrap();
        assert_eq!(batch.shape(), &[2, 20, 20, 1]);
        assert_eq!(batch[[1, 0, 0, 0]], img[[10, 20]]);

        let o = SampleOptions::new().set_use_min_dimension(true).set_batch_size(3);
        let batch = sample_to_batch_gray(&img.view(), &o, &mut rng()).unwrap();
        assert_eq!(batch.shape(), &[3, 40, 40, 1]);
    }

    #[test]
    fn test_center_sampling() {
        let img = ramp(40, 60, 3);
        let o = SampleOptions::new()
            .set_target_shape((20, 20))
            .set_always_sample_center(true)
            .set_batch_size(3);
        let batch = sample_to_batch(&img.view(), &o, &mut rng()).unwrap();
        assert_eq!(batch.shape(), &[3, 20, 20, 3]);
        let first = batch.index_axis(Axis(0), 0);
        assert_eq!(first[[0, 0, 0]], img[[10, 20, 0]]);
        for sample in batch.axis_iter(Axis(0)) {
            assert_eq!(sample, first);
        }
    }

    #[test]
    fn test_upscale_then_clamp_to_native_min() {
        let img = ramp(30, 30, 1);
        let o = SampleOptions::new()
            .set_target_shape((50, 50))
            .set_upscale_to_target(true)
            .set_batch_size(2);
        let batch = sample_to_batch(&img.view(), &o, &mut rng()).unwrap();
        // 放大到 50x50 后, 目标仍被收缩到原图短边 30.
        assert_eq!(batch.shape(), &[2, 30, 30, 1]);
    }

    #[test]
    fn test_upscale_smaller_target() {
        let img = ramp(64, 80, 3);
        let o = SampleOptions::new()
            .set_target_shape((32, 32))
            .set_upscale_to_target(true)
            .set_batch_size(4);
        let batch = sample_to_batch(&img.view(), &o, &mut rng()).unwrap();
        // 缩放后的图像恰为目标大小.
        assert_eq!(batch.shape(), &[4, 32, 32, 3]);
    }

    #[test]
    fn test_fit_and_factor() {
        assert!(target_shape_fit_in_image((30, 40), (30, 40)));
        assert!(!target_shape_fit_in_image((30, 40), (31, 10)));
        assert_eq!(max_interpolation_factor((10, 20), (30, 20)), 3.0);
        assert_eq!(max_interpolation_factor((10, 20), (5, 40)), 2.0);
    }

    #[test]
    fn test_center_crop_auto_upscale() {
        let img = ramp(20, 40, 3);
        let out = center_crop_auto_upscale(&img.view(), (10, 10), FilterType::Nearest).unwrap();
        assert_eq!(out.dim(), (10, 10, 3));
        assert_eq!(out[[0, 0, 0]], img[[5, 15, 0]]);

        // 需要放大 2.5 倍: (20, 40) -> (50, 100).
        let out = center_crop_auto_upscale(&img.view(), (50, 30), FilterType::Triangle).unwrap();
        assert_eq!(out.dim(), (50, 30, 3));
    }
}
