//! 对 `sono-berry::dataset` 的更一层封装. 从环境变量或用户主目录获取数据集配置.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// 增强生成步数的默认值.
pub const DEFAULT_STEPS: usize = 8;

fn dir_from_env_or_home(key: &str, rest: &[&str]) -> Option<PathBuf> {
    match env::var_os(key) {
        Some(d) if !d.is_empty() => Some(PathBuf::from(d)),
        _ => sono_berry::dataset::home_dataset_dir_with(rest),
    }
}

/// 读取并解析环境变量 `key`. 变量不存在时返回 `None`; 无法解析时记录警告并返回 `None`.
fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring ${key}: cannot parse `{raw}`");
            None
        }
    }
}

/// 获取良性病人根目录.
///
/// 1. 若环境变量 `$US_BENIGN_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/ultrasound/benign`.
pub fn benign_dir_from_env_or_home() -> Option<PathBuf> {
    dir_from_env_or_home("US_BENIGN_DIR", &["ultrasound", "benign"])
}

/// 获取恶性病人根目录.
///
/// 1. 若环境变量 `$US_MALIGNANT_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/ultrasound/malignant`.
pub fn malignant_dir_from_env_or_home() -> Option<PathBuf> {
    dir_from_env_or_home("US_MALIGNANT_DIR", &["ultrasound", "malignant"])
}

/// 获取增强结果输出目录.
///
/// 1. 若环境变量 `$US_OUTPUT_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/ultrasound/augmented`.
pub fn output_dir_from_env_or_home() -> Option<PathBuf> {
    dir_from_env_or_home("US_OUTPUT_DIR", &["ultrasound", "augmented"])
}

/// 随机种子, 来自 `$US_SEED`.
#[inline]
pub fn seed_from_env() -> Option<u64> {
    parse_env("US_SEED")
}

/// 增强生成步数, 来自 `$US_STEPS`, 默认为 [`DEFAULT_STEPS`].
#[inline]
pub fn steps_from_env() -> usize {
    parse_env("US_STEPS").unwrap_or(DEFAULT_STEPS)
}

/// 病人目录下存放帧的子目录名, 来自 `$US_FRAME_DIR`. 未设置时帧直接位于病人目录下.
pub fn frame_folder_from_env() -> Option<String> {
    env::var("US_FRAME_DIR").ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_from_env_prefers_env() {
        env::set_var("US_TEST_ONLY_DIR", "/tmp/somewhere");
        assert_eq!(
            dir_from_env_or_home("US_TEST_ONLY_DIR", &["x"]),
            Some(PathBuf::from("/tmp/somewhere"))
        );
        env::remove_var("US_TEST_ONLY_DIR");
        if let Some(home) = sono_berry::dataset::home_dataset_dir() {
            assert_eq!(
                dir_from_env_or_home("US_TEST_ONLY_DIR", &["x", "y"]),
                Some(home.join("x").join("y"))
            );
        }
    }

    #[test]
    fn test_parse_env() {
        env::set_var("US_TEST_ONLY_NUM", " 42 ");
        assert_eq!(parse_env::<u64>("US_TEST_ONLY_NUM"), Some(42));
        env::set_var("US_TEST_ONLY_NUM", "forty-two");
        assert_eq!(parse_env::<u64>("US_TEST_ONLY_NUM"), None);
        env::remove_var("US_TEST_ONLY_NUM");
        assert_eq!(parse_env::<u64>("US_TEST_ONLY_NUM"), None);
    }
}
