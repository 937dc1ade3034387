//! 带标签的超声帧加载器.
//!
//! 提供迭代器风格的批次获取模式, 可直接作为 [`crate::sample::CropGenerator`] 的上游.

use super::{DatasetError, DatasetResult};
use crate::consts::{Class, ImageKind};
use crate::data::{dynamic_to_array, resize, FilterType};
use crate::Shape2d;
use itertools::Itertools;
use ndarray::{stack, Array1, Array3, Array4, ArrayView3, Axis};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 支持的帧文件扩展名.
const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// 一帧图像的位置及其类别.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameEntry {
    /// 帧文件路径.
    pub path: PathBuf,

    /// 帧所属病人的类别.
    pub class: Class,
}

#[inline]
fn is_frame(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| FRAME_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// 收集类别根目录 `root` 下给定病人的全部帧.
///
/// 每个病人的帧位于 `root/{patient}/{frame_folder}` (若 `frame_folder` 为 `None`,
/// 则直接位于 `root/{patient}`). 同一病人的帧按文件名排序.
pub fn collect_frames<P: AsRef<Path>, S: AsRef<str>>(
    root: P,
    patients: &[S],
    frame_folder: Option<&str>,
    class: Class,
) -> io::Result<Vec<FrameEntry>> {
    let mut ans = Vec::new();
    for patient in patients {
        let mut dir = root.as_ref().join(patient.as_ref());
        if let Some(folder) = frame_folder {
            dir.push(folder);
        }
        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file() && is_frame(&path) {
                paths.push(path);
            }
        }
        ans.extend(
            paths
                .into_iter()
                .sorted()
                .map(|path| FrameEntry { path, class }),
        );
    }
    Ok(ans)
}

/// 读取一帧, 转为 3 通道, 并缩放到 `shape`.
fn decode(entry: &FrameEntry, shape: Shape2d, filter: FilterType) -> DatasetResult<Array3<u8>> {
    let img = image::open(&entry.path)?;
    let arr = dynamic_to_array(&img, ImageKind::Color);
    let (h, w, _) = arr.dim();
    if (h, w) == shape {
        Ok(arr)
    } else {
        Ok(resize(&arr.view(), shape, filter))
    }
}

/// 按批次加载帧, 每批产出 `(images, labels)`, 形状分别为
/// `(n, H, W, 3)` 与 `(n,)`, 标签取 [`Class::label`].
///
/// 无法解码的帧会被跳过并记录警告; 整批都无法解码时产出 `DatasetError::EmptyBatch`.
#[derive(Debug)]
pub struct FrameBatches {
    entries_rev: Vec<FrameEntry>,
    batch_size: usize,
    frame_shape: Shape2d,
    filter: FilterType,
}

impl FrameBatches {
    /// 以 `entries` 的顺序, 每批 `batch_size` 帧, 统一缩放到 `frame_shape`.
    ///
    /// `batch_size` 为 0 时返回 `None`.
    pub fn new(entries: Vec<FrameEntry>, batch_size: usize, frame_shape: Shape2d) -> Option<Self> {
        if batch_size == 0 {
            return None;
        }
        let mut entries_rev = entries;
        entries_rev.reverse();
        Some(Self {
            entries_rev,
            batch_size,
            frame_shape,
            filter: FilterType::CatmullRom,
        })
    }

    /// 打乱剩余帧的顺序.
    pub fn shuffle<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.entries_rev.shuffle(rng);
        self
    }

    /// 设置缩放时使用的插值方法.
    pub fn set_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// 剩余帧数.
    #[inline]
    pub fn remaining_frames(&self) -> usize {
        self.entries_rev.len()
    }

    fn decode_all(&self, batch: &[FrameEntry]) -> Vec<DatasetResult<Array3<u8>>> {
        let (shape, filter) = (self.frame_shape, self.filter);
        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                use rayon::prelude::*;
                batch.par_iter().map(|e| decode(e, shape, filter)).collect()
            } else {
                batch.iter().map(|e| decode(e, shape, filter)).collect()
            }
        }
    }
}

impl Iterator for FrameBatches {
    type Item = DatasetResult<(Array4<u8>, Array1<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.entries_rev.is_empty() {
            return None;
        }
        let take = self.batch_size.min(self.entries_rev.len());
        let mut batch = self.entries_rev.split_off(self.entries_rev.len() - take);
        batch.reverse();

        let mut images = Vec::with_capacity(take);
        let mut labels = Vec::with_capacity(take);
        for (entry, decoded) in batch.iter().zip(self.decode_all(&batch)) {
            match decoded {
                Ok(img) => {
                    images.push(img);
                    labels.push(entry.class.label());
                }
                Err(err) => log::warn!("skipping frame {}: {err}", entry.path.display()),
            }
        }
        if images.is_empty() {
            return Some(Err(DatasetError::EmptyBatch));
        }

        let views: Vec<ArrayView3<u8>> = images.iter().map(|a| a.view()).collect();
        let stacked = stack(Axis(0), &views).map_err(DatasetError::from);
        Some(stacked.map(|images| (images, Array1::from(labels))))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.entries_rev.len() + self.batch_size - 1) / self.batch_size;
        (n, Some(n))
    }
}

impl ExactSizeIterator for FrameBatches {}
