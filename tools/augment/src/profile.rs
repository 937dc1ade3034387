//! 增强流程运行统计.

use std::time::{Duration, Instant};

/// 可累加计时器.
///
/// 该计时器支持 "中途中断" 与 "结束中断, 继续开始计时".
#[derive(Clone, Debug)]
struct AccTimer {
    consumed: Duration,
    since: Instant,
}

impl AccTimer {
    /// 初始化计时器. 初始化时会视为已经开始计时 (`self.start()`).
    #[inline]
    fn new() -> Self {
        Self {
            consumed: Duration::ZERO,
            since: Instant::now(),
        }
    }

    /// 开始计时.
    #[inline]
    fn start(&mut self) {
        self.since = Instant::now();
    }

    /// 结束计时, 并将这一区间的时间累加. 返回本轮计时时长.
    ///
    /// # 注意
    ///
    /// 上一次调用必须是 `self.start()`, 否则计算时间值无意义.
    #[inline]
    fn elapsed(&mut self) -> Duration {
        let d = self.since.elapsed();
        self.consumed += d;
        d
    }

    /// 获得总共累计下来的时间 (以微秒为单位).
    #[inline]
    fn get_total_us(&self) -> u64 {
        self.consumed.as_micros() as u64
    }
}

/// 增强流程数据统计.
#[derive(Clone, Debug)]
pub struct Profile {
    /// 成功写出的批次个数.
    batches: u64,

    /// 写出的裁剪总数.
    crops: u64,

    /// 生成或写出失败的批次个数.
    failed: u64,

    /// 因无法解码而被丢弃的帧批次个数.
    skipped: u64,

    /// 生成并写出批次花费的总时间.
    step_time: AccTimer,

    /// 整个流程花费的总时间 (包括切分与目录扫描).
    real_time: AccTimer,

    /// 最耗时的一步.
    most: Option<Duration>,
}

impl Profile {
    /// 初始化, 同时开始总计时.
    #[inline]
    pub fn new() -> Self {
        Self {
            batches: 0,
            crops: 0,
            failed: 0,
            skipped: 0,
            step_time: AccTimer::new(),
            real_time: AccTimer::new(),
            most: None,
        }
    }

    /// 开始一步计时.
    #[inline]
    pub fn step_start(&mut self) {
        self.step_time.start();
    }

    /// 结束一步计时.
    #[inline]
    pub fn step_elapsed(&mut self) {
        let d = self.step_time.elapsed();
        self.most = Some(self.most.map_or(d, |m| m.max(d)));
    }

    /// 记录一个写出的批次, 含 `crops` 个裁剪.
    #[inline]
    pub fn count_batch(&mut self, crops: usize) {
        self.batches += 1;
        self.crops += crops as u64;
    }

    /// 记录一个失败的批次.
    #[inline]
    pub fn count_failed(&mut self) {
        self.failed += 1;
    }

    /// 记录 `n` 个被丢弃的帧批次.
    #[inline]
    pub fn count_skipped(&mut self, n: u64) {
        self.skipped += n;
    }

    /// 结束全部计时.
    #[inline]
    pub fn finish(mut self) -> Self {
        self.real_time.elapsed();
        self
    }

    /// 写出的批次个数.
    #[inline]
    pub fn get_batches(&self) -> u64 {
        self.batches
    }

    /// 写出的裁剪总数.
    #[inline]
    pub fn get_crops(&self) -> u64 {
        self.crops
    }

    /// 失败批次个数.
    #[inline]
    pub fn get_failed(&self) -> u64 {
        self.failed
    }

    /// 被丢弃的帧批次个数.
    #[inline]
    pub fn get_skipped(&self) -> u64 {
        self.skipped
    }

    /// 以微秒为单位获得生成批次的总时间.
    #[inline]
    pub fn get_step_time_us(&self) -> u64 {
        self.step_time.get_total_us()
    }

    /// 以微秒为单位获得流程总时间.
    #[inline]
    pub fn get_real_time_us(&self) -> u64 {
        self.real_time.get_total_us()
    }

    /// 以微秒为单位获得每个写出批次的平均时间.
    pub fn get_avg_step_time_us(&self) -> Option<f64> {
        match self.batches {
            0 => None,
            n => Some(self.get_step_time_us() as f64 / n as f64),
        }
    }

    /// 最耗时一步所消耗的时间. 若没有任何一步, 返回 `None`.
    #[inline]
    pub fn get_most_time_consuming(&self) -> Option<Duration> {
        self.most
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}
