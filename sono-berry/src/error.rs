//! 采样运行时错误.

use crate::Shape2d;
use ndarray::ShapeError;
use std::fmt;

/// 批量采样或增强生成的错误.
///
/// 几何计算本身不会产生错误 (失败时退化为整张原图),
/// 这里只包含调用者参数配置错误和数据形状错误.
#[derive(Debug, Clone)]
pub enum SampleError {
    /// 没有给出目标形状, 同时又没有开启 `use_min_dimension`.
    MissingMinDimension,

    /// 开启了 `upscale_to_target`, 但没有给出目标形状.
    UpscaleWithoutTarget,

    /// 不放大的前提下, 原图在某一维上小于目标形状.
    TargetExceedsNative {
        /// 原图形状.
        native: Shape2d,
        /// 目标形状.
        target: Shape2d,
    },

    /// 输入数组的维数不足 2, 不能被视为图像. 参数为实际维数.
    NotAnImage(usize),

    /// 图像通道数与要求不符.
    ChannelMismatch {
        /// 要求的通道数.
        expected: usize,
        /// 实际的通道数.
        found: usize,
    },

    /// 裁剪结果的形状与目标形状不符 (目标形状大于原图时会退化为整张原图).
    CropShapeMismatch {
        /// 目标形状.
        expected: Shape2d,
        /// 实际裁剪形状.
        found: Shape2d,
    },

    /// 上游批次的图像个数少于标签个数.
    LabelCountMismatch {
        /// 图像个数.
        images: usize,
        /// 标签个数.
        labels: usize,
    },

    /// 堆叠裁剪结果时形状不一致, 或没有可堆叠的裁剪.
    Shape(ShapeError),
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMinDimension => write!(
                f,
                "use minimum dimension must be true when no target shape is given"
            ),
            Self::UpscaleWithoutTarget => {
                write!(f, "upscale_to_target requires a defined target shape")
            }
            Self::TargetExceedsNative { native, target } => write!(
                f,
                "every native dimension must be >= target dimension when not upscaling \
                 (native: {native:?}, target: {target:?})"
            ),
            Self::NotAnImage(ndim) => write!(f, "expected at least 2 axes, found {ndim}"),
            Self::ChannelMismatch { expected, found } => {
                write!(f, "expected {expected} channels, found {found}")
            }
            Self::CropShapeMismatch { expected, found } => {
                write!(f, "expected crops of shape {expected:?}, found {found:?}")
            }
            Self::LabelCountMismatch { images, labels } => {
                write!(f, "batch has {images} images but {labels} labels")
            }
            Self::Shape(err) => write!(f, "cannot stack crops: {err}"),
        }
    }
}

impl std::error::Error for SampleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Shape(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShapeError> for SampleError {
    fn from(err: ShapeError) -> Self {
        Self::Shape(err)
    }
}

/// 采样运行时错误.
pub type SampleResult<T> = Result<T, SampleError>;
