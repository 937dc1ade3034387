//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Origin, Shape2d};
pub use crate::{SampleError, SampleResult};

pub use crate::crop::{
    apply_multiple_crops, apply_single_crop, center_crop_to_padding, center_crop_to_percentage,
    center_crop_to_shape, origin_crop, CropDesc, CropFit,
};

pub use crate::sample::{
    center_crop_auto_upscale, crop_generator, sample_to_batch, sample_to_batch_center_origin,
    sample_to_batch_gray, sample_to_batch_random_origin, CropGenerator, SampleOptions,
};

pub use crate::data::{determine_image_kind, resize, FilterType, ImgWriteRaw};

pub use crate::consts::{Class, ImageKind, COLOR_PERCENTAGE_THRESHOLD, DEFAULT_BATCH_SIZE};

pub use crate::dataset::split::{patient_train_test_validation_split, SplitRatio};
pub use crate::dataset::{self, home_dataset_dir_with, DatasetError, DatasetResult};

#[cfg(feature = "serde")]
pub use crate::dataset::Manifest;
