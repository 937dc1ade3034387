//! 数据集 manifest: 记录每个病人的每一帧及其图像类型.
//!
//! 文件格式为 JSON:
//!
//! ```json
//! {
//!     "patient-001": [
//!         { "filename": "frame_0001.png", "type": "GRAYSCALE" },
//!         { "filename": "frame_0002.png", "type": "COLOR" }
//!     ]
//! }
//! ```

use super::DatasetResult;
use crate::consts::ImageKind;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 一帧的记录.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// 帧文件名 (相对于病人的帧目录).
    pub filename: String,

    /// 图像类型.
    #[serde(rename = "type")]
    pub kind: ImageKind,
}

/// 病人 -> 帧记录列表.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(BTreeMap<String, Vec<FrameRecord>>);

impl Manifest {
    /// 从 `path` 读取 manifest.
    pub fn open<P: AsRef<Path>>(path: P) -> DatasetResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// 从 JSON 字符串解析 manifest.
    pub fn from_json(s: &str) -> DatasetResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// 所有病人, 按字典序.
    pub fn patients(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// 病人 `patient` 的全部帧记录. 病人不存在时返回 `None`.
    #[inline]
    pub fn frames(&self, patient: &str) -> Option<&[FrameRecord]> {
        self.0.get(patient).map(Vec::as_slice)
    }

    /// 病人 `patient` 所有类型为 `kind` 的帧文件名.
    pub fn frames_of_kind(&self, patient: &str, kind: ImageKind) -> Vec<&str> {
        self.frames(patient)
            .unwrap_or_default()
            .iter()
            .filter(|f| f.kind == kind)
            .map(|f| f.filename.as_str())
            .collect()
    }

    /// 从病人 `patient` 类型为 `kind` 的帧中随机选取一帧.
    ///
    /// 病人不存在或没有该类型的帧时返回 `None`.
    pub fn random_frame<R: Rng + ?Sized>(
        &self,
        patient: &str,
        kind: ImageKind,
        rng: &mut R,
    ) -> Option<&str> {
        self.frames_of_kind(patient, kind).choose(rng).copied()
    }

    /// 添加一帧记录.
    pub fn insert(&mut self, patient: impl Into<String>, record: FrameRecord) {
        self.0.entry(patient.into()).or_default().push(record);
    }

    /// 病人个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 是否为空.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SAMPLE: &str = r#"{
        "p1": [
            { "filename": "a.png", "type": "GRAYSCALE" },
            { "filename": "b.png", "type": "COLOR" },
            { "filename": "c.png", "type": "GRAYSCALE" }
        ],
        "p0": []
    }"#;

    #[test]
    fn test_parse() {
        let m = Manifest::from_json(SAMPLE).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.patients().collect::<Vec<_>>(), vec!["p0", "p1"]);
        assert_eq!(m.frames("p1").unwrap().len(), 3);
        assert_eq!(m.frames_of_kind("p1", ImageKind::Grayscale), vec!["a.png", "c.png"]);
        assert_eq!(m.frames_of_kind("p1", ImageKind::Color), vec!["b.png"]);
        assert!(m.frames("p9").is_none());
    }

    #[test]
    fn test_random_frame() {
        let m = Manifest::from_json(SAMPLE).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..10 {
            let f = m.random_frame("p1", ImageKind::Grayscale, &mut rng).unwrap();
            assert!(f == "a.png" || f == "c.png");
        }
        assert!(m.random_frame("p0", ImageKind::Grayscale, &mut rng).is_none());
        assert!(m.random_frame("p9", ImageKind::Color, &mut rng).is_none());
    }

    #[test]
    fn test_bad_type() {
        let bad = r#"{ "p": [ { "filename": "a.png", "type": "SEPIA" } ] }"#;
        assert!(Manifest::from_json(bad).is_err());
    }

    #[test]
    fn test_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let mut m = Manifest::default();
        m.insert(
            "p3",
            FrameRecord {
                filename: "x.png".to_string(),
                kind: ImageKind::Color,
            },
        );
        std::fs::write(&path, serde_json::to_string(&m).unwrap()).unwrap();
        assert_eq!(Manifest::open(&path).unwrap(), m);
    }
}
