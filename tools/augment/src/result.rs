//! 运行结果.

use crate::profile::Profile;
use std::io::{self, Write};
use std::path::PathBuf;

/// 将 `profile` 的结果写进 `w` 中.
fn describe_into<W: Write>(p: &Profile, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    #[inline]
    fn f64_to_display(f: Option<f64>) -> String {
        match f {
            Some(f) => format!("{f:.3}"),
            None => "/".to_string(),
        }
    }

    writeln!(w, "Augmentation profile:")?;
    writeln!(w, "{S4}Batches written: {}", p.get_batches())?;
    writeln!(w, "{S4}Crops written: {}", p.get_crops())?;
    writeln!(w, "{S4}Failed batches: {}", p.get_failed())?;
    writeln!(w, "{S4}Undecodable frame batches: {}", p.get_skipped())?;
    writeln!(w, "{S4}Total step time: {} us", p.get_step_time_us())?;
    writeln!(
        w,
        "{S4}Average step time: {} us",
        f64_to_display(p.get_avg_step_time_us())
    )?;
    writeln!(w, "{S4}Total machine time: {} us", p.get_real_time_us())?;
    let t = p.get_most_time_consuming().map(|d| d.as_micros() as f64);
    write!(w, "{S4}Slowest step costs {} us", f64_to_display(t))?;
    Ok(())
}

/// 增强流程最终结果.
pub struct AugmentResult {
    pub output: PathBuf,
    pub profile: Profile,
}

impl AugmentResult {
    /// 打印运行结果.
    pub fn analyze(&self) -> io::Result<()> {
        utils::sep();
        println!("Output: {}", self.output.display());

        let mut buf = Vec::with_capacity(512);
        describe_into(&self.profile, &mut buf)?;
        println!("{}", String::from_utf8_lossy(&buf));

        utils::sep();
        Ok(())
    }
}
