//! 数据增强裁剪生成器.

use super::sample_to_batch_random_origin;
use crate::consts::CROP_CHANNELS;
use crate::{SampleError, SampleResult, Shape2d};
use ndarray::{concatenate, Array1, Array4, ArrayView4, Axis};
use rand::Rng;

/// 包装上游 `(images, labels)` 批次迭代器, 对每张图像生成 `number_crops`
/// 个随机裁剪, 并为每个裁剪复制对应的标签.
///
/// 输出批次形状为 `(上游批大小 * number_crops, h, w, 3)`. 每次 `next`
/// 只从上游拉取一个批次, 不做额外缓冲; 上游结束时生成器随之结束.
///
/// 由 [`crop_generator`] 构造.
#[derive(Debug)]
pub struct CropGenerator<I, R> {
    upstream: I,
    target: Shape2d,
    number_crops: usize,
    rng: R,
}

/// 以 `rng` 为随机源, 构建每张图像产生 `number_crops` 个 `target` 形状裁剪的生成器.
pub fn crop_generator<I, R>(
    upstream: I,
    target: Shape2d,
    number_crops: usize,
    rng: R,
) -> CropGenerator<I, R> {
    CropGenerator {
        upstream,
        target,
        number_crops,
        rng,
    }
}

impl<I, R> CropGenerator<I, R> {
    /// 裁剪形状 (高, 宽).
    #[inline]
    pub fn target(&self) -> Shape2d {
        self.target
    }

    /// 每张图像产生的裁剪个数.
    #[inline]
    pub fn number_crops(&self) -> usize {
        self.number_crops
    }

    /// 消费自我, 取回上游迭代器.
    #[inline]
    pub fn into_inner(self) -> I {
        self.upstream
    }
}

impl<I, R: Rng> CropGenerator<I, R> {
    /// 将一个上游批次扩增为裁剪批次.
    fn expand<A: Clone, L: Clone>(
        &mut self,
        images: &Array4<A>,
        labels: &Array1<L>,
    ) -> SampleResult<(Array4<A>, Array1<L>)> {
        let (count, _, _, channels) = images.dim();
        if count < labels.len() {
            return Err(SampleError::LabelCountMismatch {
                images: count,
                labels: labels.len(),
            });
        }
        if channels != CROP_CHANNELS {
            return Err(SampleError::ChannelMismatch {
                expected: CROP_CHANNELS,
                found: channels,
            });
        }

        let (h, w) = self.target;
        let mut crops = Vec::with_capacity(labels.len());
        for i in 0..labels.len() {
            let image = images.index_axis(Axis(0), i);
            let batch =
                sample_to_batch_random_origin(&image, self.target, self.number_crops, &mut self.rng)?;
            let (_, bh, bw, _) = batch.dim();
            if (bh, bw) != (h, w) {
                return Err(SampleError::CropShapeMismatch {
                    expected: (h, w),
                    found: (bh, bw),
                });
            }
            crops.push(batch);
        }

        let images = if crops.is_empty() {
            Array4::from_shape_vec((0, h, w, CROP_CHANNELS), Vec::new())?
        } else {
            let views: Vec<ArrayView4<A>> = crops.iter().map(|b| b.view()).collect();
            concatenate(Axis(0), &views)?
        };
        let labels: Array1<L> = labels
            .iter()
            .flat_map(|l| std::iter::repeat(l.clone()).take(self.number_crops))
            .collect();
        log::trace!("expanded batch into {} crops", labels.len());
        Ok((images, labels))
    }
}

impl<I, R, A, L> Iterator for CropGenerator<I, R>
where
    I: Iterator<Item = (Array4<A>, Array1<L>)>,
    R: Rng,
    A: Clone,
    L: Clone,
{
    type Item = SampleResult<(Array4<A>, Array1<L>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let (images, labels) = self.upstream.next()?;
        Some(self.expand(&images, &labels))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }
}
