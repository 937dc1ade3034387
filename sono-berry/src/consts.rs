//! 通用常量.

/// `sample_to_batch` 默认的批大小.
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// 增强生成器输出批次的通道数. 目前写死为 3 (彩色).
pub const CROP_CHANNELS: usize = 3;

/// 判断图像类型时的彩色像素占比阈值.
///
/// MOV -> MP4 -> PNG 转换后的灰度帧有少量偏色像素, 实测占比约 0.02 ~ 0.04;
/// 真正的彩色扫描带有色标, 占比一般高于 10%.
pub const COLOR_PERCENTAGE_THRESHOLD: f64 = 0.04;

/// 病人级别切分的默认训练集比例.
pub const TRAIN_FRACTION: f64 = 0.70;

/// 病人级别切分的默认测试集比例. 剩余部分归入验证集.
pub const TEST_FRACTION: f64 = 0.15;

/// 图像类型.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "UPPERCASE")
)]
pub enum ImageKind {
    /// 灰度 (B 模式) 超声图像.
    Grayscale,

    /// 彩色 (多普勒) 超声图像.
    Color,
}

impl ImageKind {
    /// 是否为灰度图像.
    #[inline]
    pub fn is_grayscale(&self) -> bool {
        matches!(self, Self::Grayscale)
    }

    /// 是否为彩色图像.
    #[inline]
    pub fn is_color(&self) -> bool {
        !self.is_grayscale()
    }
}

/// 病人 (及其全部图像) 的病理类别.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "UPPERCASE")
)]
pub enum Class {
    /// 良性.
    Benign,

    /// 恶性.
    Malignant,
}

impl Class {
    /// 二分类标签值. 良性为 0, 恶性为 1.
    #[inline]
    pub const fn label(&self) -> u8 {
        match self {
            Self::Benign => 0,
            Self::Malignant => 1,
        }
    }

    /// 类别名称.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Benign => "BENIGN",
            Self::Malignant => "MALIGNANT",
        }
    }
}
