//! 数据集操作.
//!
//! 超声数据集的目录结构为 `{类别根目录}/{病人}/{帧目录}/*.png`,
//! 良性与恶性各有一个类别根目录.

use itertools::Itertools;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

mod frames;
mod npz;
pub mod split;

pub use frames::{collect_frames, FrameBatches, FrameEntry};
pub use npz::{load_batch, save_batch};

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        pub mod manifest;

        pub use manifest::{FrameRecord, Manifest};
    }
}

/// 获取 `{用户主目录}/dataset` 目录.
pub fn home_dataset_dir() -> Option<PathBuf> {
    let mut ans = dirs::home_dir()?;
    ans.push("dataset");
    Some(ans)
}

/// 获取 `{用户主目录}/dataset` 目录下给定继续项组成的全路径.
pub fn home_dataset_dir_with<P: AsRef<Path>, I: IntoIterator<Item = P>>(it: I) -> Option<PathBuf> {
    let mut ans = home_dataset_dir()?;
    ans.extend(it);
    Some(ans)
}

/// 列出类别根目录 `root` 下的所有病人 (即所有子目录名), 按字典序排列.
pub fn list_patients<P: AsRef<Path>>(root: P) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names.into_iter().sorted().collect())
}

/// 数据集读写错误.
#[derive(Debug)]
pub enum DatasetError {
    /// 底层 I/O 错误.
    Io(io::Error),

    /// 图像解码/编码错误.
    Image(image::ImageError),

    /// manifest 解析错误.
    #[cfg(feature = "serde")]
    Json(serde_json::Error),

    /// 读取 npz 文件错误.
    ReadNpz(ndarray_npy::ReadNpzError),

    /// 写入 npz 文件错误.
    WriteNpz(ndarray_npy::WriteNpzError),

    /// 批次中没有可用的帧.
    EmptyBatch,

    /// 堆叠帧时形状不一致.
    Shape(ndarray::ShapeError),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::Image(err) => write!(f, "image error: {err}"),
            #[cfg(feature = "serde")]
            Self::Json(err) => write!(f, "manifest error: {err}"),
            Self::ReadNpz(err) => write!(f, "npz read error: {err}"),
            Self::WriteNpz(err) => write!(f, "npz write error: {err}"),
            Self::EmptyBatch => write!(f, "no frame in batch could be decoded"),
            Self::Shape(err) => write!(f, "cannot stack frames: {err}"),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Image(err) => Some(err),
            #[cfg(feature = "serde")]
            Self::Json(err) => Some(err),
            Self::ReadNpz(err) => Some(err),
            Self::WriteNpz(err) => Some(err),
            Self::EmptyBatch => None,
            Self::Shape(err) => Some(err),
        }
    }
}

impl From<io::Error> for DatasetError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for DatasetError {
    fn from(err: image::ImageError) -> Self {
        Self::Image(err)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<ndarray_npy::ReadNpzError> for DatasetError {
    fn from(err: ndarray_npy::ReadNpzError) -> Self {
        Self::ReadNpz(err)
    }
}

impl From<ndarray_npy::WriteNpzError> for DatasetError {
    fn from(err: ndarray_npy::WriteNpzError) -> Self {
        Self::WriteNpz(err)
    }
}

impl From<ndarray::ShapeError> for DatasetError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Shape(err)
    }
}

/// 数据集读写结果.
pub type DatasetResult<T> = Result<T, DatasetError>;
