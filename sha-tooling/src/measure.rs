use std::time::{Duration, Instant};

use anyhow::Result;
use cpu_time::ProcessTime;

pub struct FuncMeasurement<T> {
    pub cpu_time: Duration,
    pub wall_time: Duration,
    pub return_value: T,
}

impl<T> FuncMeasurement<T> {
    /// Bytes per wall clock second for `bytes` processed in total.
    pub fn throughput(&self, bytes: u64) -> f64 {
        let secs = self.wall_time.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        bytes as f64 / secs
    }
}

pub fn measure<T, F>(f: F) -> Result<FuncMeasurement<T>>
where
    F: FnOnce() -> Result<T>,
{
    let cpu_start = ProcessTime::now();
    let wall_start = Instant::now();

    let return_value = f()?;

    Ok(FuncMeasurement {
        cpu_time: cpu_start.elapsed(),
        wall_time: wall_start.elapsed(),
        return_value,
    })
}

/// Run `f` `iterations` times under a single measurement, keeping the last result.
pub fn measure_repeated<T, F>(iterations: usize, mut f: F) -> Result<FuncMeasurement<Option<T>>>
where
    F: FnMut() -> Result<T>,
{
    measure(|| {
        let mut last = None;
        for _ in 0..iterations {
            last = Some(f()?);
        }
        Ok(last)
    })
}
