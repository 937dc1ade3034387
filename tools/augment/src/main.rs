//! 超声数据增强流程: 病人切分, 帧加载, 随机裁剪扩增, 批次落盘.

mod profile;
mod result;
mod runner;

use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::error::Error;

fn log_level() -> LevelFilter {
    std::env::var("SONO_LOG")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

fn main() -> Result<(), Box<dyn Error>> {
    SimpleLogger::new().with_level(log_level()).init()?;

    let threads = utils::cpus();
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()?;
    log::debug!("decoding frames on {threads} threads");

    let cfg = runner::RunConfig::from_env_or_home().ok_or("cannot locate home directory")?;
    log::info!("running augmentation with {cfg:?}");
    runner::run(&cfg)?.analyze()?;
    Ok(())
}
