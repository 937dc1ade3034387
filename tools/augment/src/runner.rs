//! 程序运行函数.

use crate::profile::Profile;
use crate::result::AugmentResult;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sono_berry::consts::{Class, DEFAULT_BATCH_SIZE};
use sono_berry::dataset::split::{patient_train_test_validation_split, ClassSplit, SplitRatio};
use sono_berry::dataset::{collect_frames, save_batch, FrameBatches, FrameEntry};
use sono_berry::sample::crop_generator;
use sono_berry::Shape2d;
use std::cell::Cell;
use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use utils::loader;

/// 帧统一缩放到的形状.
const FRAME_SHAPE: Shape2d = (256, 256);

/// 裁剪形状.
const CROP_SHAPE: Shape2d = (224, 224);

/// 每帧生成的裁剪个数.
const CROPS_PER_FRAME: usize = 4;

type RunResult<T> = Result<T, Box<dyn Error>>;

/// 一次运行的配置.
#[derive(Debug)]
pub struct RunConfig {
    pub benign: PathBuf,
    pub malignant: PathBuf,
    pub output: PathBuf,
    pub frame_folder: Option<String>,
    pub seed: Option<u64>,
    pub steps: usize,
}

impl RunConfig {
    /// 从环境变量或用户主目录获取配置.
    pub fn from_env_or_home() -> Option<Self> {
        Some(Self {
            benign: loader::benign_dir_from_env_or_home()?,
            malignant: loader::malignant_dir_from_env_or_home()?,
            output: loader::output_dir_from_env_or_home()?,
            frame_folder: loader::frame_folder_from_env(),
            seed: loader::seed_from_env(),
            steps: loader::steps_from_env(),
        })
    }
}

fn write_split(split: &ClassSplit, output: &Path) -> RunResult<()> {
    let path = output.join("split.json");
    serde_json::to_writer_pretty(BufWriter::new(File::create(&path)?), split)?;
    log::info!("patient split written to {}", path.display());
    Ok(())
}

fn train_frames(cfg: &RunConfig, split: &ClassSplit) -> RunResult<Vec<FrameEntry>> {
    let folder = cfg.frame_folder.as_deref();
    let mut entries = Vec::new();
    for (root, class) in [(&cfg.benign, Class::Benign), (&cfg.malignant, Class::Malignant)] {
        let frames = collect_frames(root, &split.get(class).train, folder, class)?;
        log::info!("{} training frames for class `{}`", frames.len(), class.name());
        entries.extend(frames);
    }
    Ok(entries)
}

/// 实际运行.
///
/// 切分病人, 加载训练集帧, 对每个帧批次做随机裁剪扩增, 并将前 `steps`
/// 个扩增批次以 `step_XXXX.npz` 写入输出目录.
pub fn run(cfg: &RunConfig) -> RunResult<AugmentResult> {
    let mut profile = Profile::new();
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    fs::create_dir_all(&cfg.output)?;
    let split = patient_train_test_validation_split(
        &cfg.benign,
        &cfg.malignant,
        SplitRatio::default(),
        &mut rng,
    )?;
    write_split(&split, &cfg.output)?;

    let entries = train_frames(cfg, &split)?;
    if entries.is_empty() {
        return Err("no training frames found".into());
    }

    let skipped = Cell::new(0u64);
    let upstream = FrameBatches::new(entries, DEFAULT_BATCH_SIZE, FRAME_SHAPE)
        .ok_or("frame batch size must be positive")?
        .shuffle(&mut rng)
        .filter_map(|batch| match batch {
            Ok(batch) => Some(batch),
            Err(err) => {
                log::warn!("dropping frame batch: {err}");
                skipped.set(skipped.get() + 1);
                None
            }
        });
    let crop_rng = StdRng::seed_from_u64(rng.gen());
    let mut crops = crop_generator(upstream, CROP_SHAPE, CROPS_PER_FRAME, crop_rng);

    for step in 0..cfg.steps {
        profile.step_start();
        let Some(batch) = crops.next() else {
            log::info!("frames exhausted after {step} steps");
            break;
        };
        let written = batch
            .map_err(Box::<dyn Error>::from)
            .and_then(|(images, labels)| {
                let path = cfg.output.join(format!("step_{step:04}.npz"));
                save_batch(&path, &images, &labels)?;
                log::debug!("{} crops written to {}", labels.len(), path.display());
                Ok(labels.len())
            });
        match written {
            Ok(n) => profile.count_batch(n),
            Err(err) => {
                log::error!("step {step} failed: {err}");
                profile.count_failed();
            }
        }
        profile.step_elapsed();
    }
    drop(crops);
    profile.count_skipped(skipped.get());

    Ok(AugmentResult {
        output: cfg.output.clone(),
        profile: profile.finish(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use sono_berry::dataset::load_batch;

    fn write_patient(root: &Path, name: &str, frames: usize) {
        let dir = root.join(name).join("frames");
        fs::create_dir_all(&dir).unwrap();
        for i in 0..frames {
            RgbImage::from_pixel(300, 260, Rgb([i as u8, 2, 3]))
                .save(dir.join(format!("{i}.png")))
                .unwrap();
        }
    }

    #[test]
    fn test_run_end_to_end() {
        let root = tempfile::tempdir().unwrap();
        let benign = root.path().join("benign");
        let malignant = root.path().join("malignant");
        for i in 0..4 {
            write_patient(&benign, &format!("b{i}"), 3);
            write_patient(&malignant, &format!("m{i}"), 2);
        }
        let cfg = RunConfig {
            benign,
            malignant,
            output: root.path().join("out"),
            frame_folder: Some("frames".to_string()),
            seed: Some(7),
            steps: 3,
        };
        let result = run(&cfg).unwrap();
        assert!(cfg.output.join("split.json").is_file());
        assert_eq!(result.profile.get_failed(), 0);

        // 训练集: floor(0.7 * 4) = 2 个良性病人 (6 帧) + 2 个恶性病人 (4 帧), 不足一个批次.
        assert_eq!(result.profile.get_batches(), 1);
        assert_eq!(result.profile.get_crops(), 10 * CROPS_PER_FRAME as u64);

        let (images, labels) = load_batch(cfg.output.join("step_0000.npz")).unwrap();
        assert_eq!(images.shape(), &[40, 224, 224, 3]);
        assert_eq!(labels.iter().filter(|&&l| l == 1).count(), 4 * CROPS_PER_FRAME);
    }
}
