//! 以 npz 格式存取增强后的批次, 与 `numpy.load` 兼容.

use super::DatasetResult;
use ndarray::{Array1, Array4, Ix1, Ix4, OwnedRepr};
use ndarray_npy::{NpzReader, NpzWriter};
use std::fs::File;
use std::path::Path;

const IMAGES: &str = "images.npy";
const LABELS: &str = "labels.npy";

/// 将一个批次写入 `path`, 包含 `images` (`(n, H, W, C)`) 与 `labels` (`(n,)`) 两项.
pub fn save_batch<P: AsRef<Path>>(
    path: P,
    images: &Array4<u8>,
    labels: &Array1<u8>,
) -> DatasetResult<()> {
    let mut npz = NpzWriter::new(File::create(path)?);
    npz.add_array(IMAGES, images)?;
    npz.add_array(LABELS, labels)?;
    npz.finish()?;
    Ok(())
}

/// 读取 [`save_batch`] 写入的批次.
pub fn load_batch<P: AsRef<Path>>(path: P) -> DatasetResult<(Array4<u8>, Array1<u8>)> {
    let mut npz = NpzReader::new(File::open(path)?)?;
    let images = npz.by_name::<OwnedRepr<u8>, Ix4>(IMAGES)?;
    let labels = npz.by_name::<OwnedRepr<u8>, Ix1>(LABELS)?;
    Ok((images, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetError;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("step_0000.npz");
        let images = Array4::from_shape_fn((2, 4, 5, 3), |(n, r, c, ch)| (n + r * c + ch) as u8);
        let labels = Array1::from(vec![0u8, 1]);
        save_batch(&path, &images, &labels).unwrap();

        let (i, l) = load_batch(&path).unwrap();
        assert_eq!(i, images);
        assert_eq!(l, labels);
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_batch(dir.path().join("absent.npz")).unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }
}
