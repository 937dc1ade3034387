//! 病人级别的训练集/测试集/验证集切分.
//!
//! 同一病人的所有帧只会出现在同一个子集中, 避免数据泄漏.

use super::{list_patients, DatasetResult};
use crate::consts::{Class, TEST_FRACTION, TRAIN_FRACTION};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use std::path::Path;

/// 训练集与测试集所占比例. 验证集获得剩余部分.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SplitRatio {
    train: f64,
    test: f64,
}

impl SplitRatio {
    /// 构建切分比例.
    ///
    /// `train` 和 `test` 必须非负, 且 `train + test <= 1`, 否则返回 `None`.
    pub fn new(train: f64, test: f64) -> Option<Self> {
        if train >= 0.0 && test >= 0.0 && train + test <= 1.0 {
            Some(Self { train, test })
        } else {
            None
        }
    }

    /// 训练集比例.
    #[inline]
    pub fn train(&self) -> f64 {
        self.train
    }

    /// 测试集比例.
    #[inline]
    pub fn test(&self) -> f64 {
        self.test
    }

    /// 验证集比例.
    #[inline]
    pub fn validation(&self) -> f64 {
        1.0 - self.train - self.test
    }
}

/// 0.70 / 0.15 / 0.15.
impl Default for SplitRatio {
    fn default() -> Self {
        Self {
            train: TRAIN_FRACTION,
            test: TEST_FRACTION,
        }
    }
}

/// 单一类别的病人切分结果.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatientSplit {
    /// 训练集病人.
    pub train: Vec<String>,

    /// 测试集病人.
    pub test: Vec<String>,

    /// 验证集病人.
    pub validation: Vec<String>,
}

impl PatientSplit {
    /// 病人总数.
    #[inline]
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len() + self.validation.len()
    }

    /// 是否没有任何病人.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 良性与恶性两个类别的切分结果.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassSplit {
    /// 良性病人.
    pub benign: PatientSplit,

    /// 恶性病人.
    pub malignant: PatientSplit,
}

impl ClassSplit {
    /// 获取 `class` 对应的切分.
    #[inline]
    pub fn get(&self, class: Class) -> &PatientSplit {
        match class {
            Class::Benign => &self.benign,
            Class::Malignant => &self.malignant,
        }
    }
}

/// 对单一类别的病人做切分.
///
/// 先不放回地抽取 `floor(train * n)` 个训练集病人, 再从剩余病人中不放回地抽取
/// `floor(test * n)` 个测试集病人, 其余病人归入验证集. 各子集保持 `patients`
/// 中的原有顺序.
pub fn split_patients<R: Rng + ?Sized>(
    patients: &[String],
    ratio: SplitRatio,
    rng: &mut R,
) -> PatientSplit {
    let n = patients.len();
    let n_train = (ratio.train * n as f64).floor() as usize;
    let n_test = ((ratio.test * n as f64).floor() as usize).min(n - n_train);

    let mut assigned = vec![Subset::Validation; n];
    for i in index::sample(rng, n, n_train) {
        assigned[i] = Subset::Train;
    }
    let rest: Vec<usize> = (0..n).filter(|&i| assigned[i] == Subset::Validation).collect();
    for &i in rest.choose_multiple(rng, n_test) {
        assigned[i] = Subset::Test;
    }

    let mut ans = PatientSplit::default();
    for (p, s) in patients.iter().zip(assigned) {
        match s {
            Subset::Train => ans.train.push(p.clone()),
            Subset::Test => ans.test.push(p.clone()),
            Subset::Validation => ans.validation.push(p.clone()),
        }
    }
    ans
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Subset {
    Train,
    Test,
    Validation,
}

/// 列出良性和恶性根目录下的病人, 并对两个类别分别切分.
pub fn patient_train_test_validation_split<P: AsRef<Path>, R: Rng + ?Sized>(
    benign_root: P,
    malignant_root: P,
    ratio: SplitRatio,
    rng: &mut R,
) -> DatasetResult<ClassSplit> {
    let malignant = list_patients(malignant_root)?;
    let benign = list_patients(benign_root)?;
    log::info!(
        "splitting {} malignant and {} benign patients",
        malignant.len(),
        benign.len()
    );
    Ok(ClassSplit {
        malignant: split_patients(&malignant, ratio, rng),
        benign: split_patients(&benign, ratio, rng),
    })
}
