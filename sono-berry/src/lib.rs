#![warn(missing_docs)] // <= 合适时移除它.
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 为超声图像 (良性/恶性) 分类研究提供图像裁剪、批量采样、
//! 数据增强生成器, 以及病人级别的数据集切分等基础工具.
//!
//! 该 crate 目前仅提供 `safe` 接口.
//!
//! # 注意
//!
//! 1. 所有图像均以 `ndarray` 数组表示, 前两维固定为 (高, 宽). 第三维 (若存在)
//!   为通道维, 几何计算会忽略它.
//! 2. 几何计算永远不会失败: 无法满足的裁剪请求会退化为 "整张原图"
//!   (见 [`crop::CropFit`]). 只有参数组合本身非法时才会返回 [`SampleError`].
//! 3. 所有随机性都由调用者以 `rand::Rng` 的形式注入, 便于复现.
//!
//! # 开发计划
//!
//! ### 裁剪几何计算 ✅
//!
//! 固定原点裁剪, 中心裁剪 (目标形状/比例/边距).
//!
//! 实现位于 `sono-berry/src/crop`.
//!
//! ### 批量采样与自动放大 ✅
//!
//! 中心/随机原点批量采样, 以及 `sample_to_batch` 总入口.
//!
//! 实现位于 `sono-berry/src/sample`.
//!
//! ### 数据增强裁剪生成器 ✅
//!
//! 包装上游 `(images, labels)` 批次迭代器, 将每张图像扩增为若干随机裁剪.
//!
//! 实现位于 `sono-berry/src/sample/generator.rs`.
//!
//! ### 图像类型判断, 缩放, 持久化 ✅
//!
//! 实现位于 `sono-berry/src/data`.
//!
//! ### 病人级别的训练/测试/验证集切分, manifest 读取, 帧批次加载 ✅
//!
//! 实现位于 `sono-berry/src/dataset`.
//!
//! ### 非 3 通道图像的增强生成器 ⌛️
//!
//! 目前 [`sample::CropGenerator`] 只接受 3 通道图像.

/// 二维形状 (高, 宽).
pub type Shape2d = (usize, usize);

/// 二维原点 (行, 列), 相对于图像左上角 (0, 0).
pub type Origin = (usize, usize);

mod error;

pub use error::{SampleError, SampleResult};

pub mod consts;

pub mod crop;

pub mod data;

pub mod dataset;

pub mod prelude;

pub mod sample;
