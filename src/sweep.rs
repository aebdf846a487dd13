//! # Row sweeps
//!
//! Drives a per-row computation over a disparity map, either on the current thread or spread over
//! the rayon thread pool. Rows are independent: a worker only writes the row it was handed.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::Deserialize;

use crate::disparity::DisparityMap;
use crate::error::*;

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    /// Rows computed in order on the calling thread.
    Sequential,

    /// Rows distributed over the global rayon pool. Produces the same map as `Sequential`.
    Parallel
}

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Number of rows completed so far. In parallel sweeps reports may arrive out of order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub rows_done: usize,
    pub rows_total: usize
}

/// Optional hooks into a running sweep: a per-row progress callback and a cancellation flag.
#[derive(Default)]
pub struct SweepControl<'a> {
    on_row: Option<Box<dyn Fn(Progress) + Send + Sync + 'a>>,
    cancel: Option<&'a AtomicBool>
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Default for Execution {
    fn default() -> Self {
        Execution::Sequential
    }
}

impl Progress {
    pub fn percent(&self) -> f32 {
        if self.rows_total == 0 {
            return 100.0;
        }

        100.0 * self.rows_done as f32 / self.rows_total as f32
    }
}

impl<'a> SweepControl<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `f` once after every completed row.
    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(Progress) + Send + Sync + 'a
    {
        self.on_row = Some(Box::new(f));
        self
    }

    /// Stop the sweep at the next row boundary once `flag` is set.
    pub fn cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.map_or(false, |flag| flag.load(Ordering::SeqCst))
    }

    fn report(&self, progress: Progress) {
        log::debug!("Calculating disparity... {:.0} %", progress.percent());

        if let Some(f) = &self.on_row {
            f(progress);
        }
    }
}

/// Run `fill_row(y, row)` for every `y` in `rows`, where `row` is that row of `map`.
pub(crate) fn run_rows<F>(
    map: &mut DisparityMap,
    rows: Range<usize>,
    execution: Execution,
    control: &SweepControl,
    fill_row: F
) -> Result<()>
where
    F: Fn(usize, &mut [u32]) + Sync
{
    let width = map.width();
    let rows_total = rows.len();

    if width == 0 || rows_total == 0 {
        return Ok(());
    }

    let first = rows.start;
    let done = AtomicUsize::new(0);
    let buffer = &mut map.data_mut()[rows.start * width..rows.end * width];

    let process = |(i, row): (usize, &mut [u32])| -> Result<()> {
        if control.is_cancelled() {
            return Err(Error::Cancelled {
                rows_done: done.load(Ordering::SeqCst),
                rows_total
            });
        }

        fill_row(first + i, row);

        let rows_done = done.fetch_add(1, Ordering::SeqCst) + 1;
        control.report(Progress { rows_done, rows_total });

        Ok(())
    };

    match execution {
        Execution::Sequential => buffer.chunks_mut(width).enumerate().try_for_each(process),
        Execution::Parallel => buffer.par_chunks_mut(width).enumerate().try_for_each(process)
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Logger keeping every record, so tests can check what a sweep emits.
    struct Capture(Mutex<Vec<(log::Level, String)>>);

    impl log::Log for Capture {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            self.0.lock().unwrap().push((record.level(), format!("{}", record.args())));
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

    #[test]
    fn fills_only_requested_rows() {
        let mut map = DisparityMap::new(3, 5);

        run_rows(&mut map, 1..4, Execution::Sequential, &SweepControl::new(), |y, row| {
            for v in row.iter_mut() {
                *v = y as u32;
            }
        }).unwrap();

        assert_eq!(map.as_slice(), &[0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 0, 0, 0]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut seq = DisparityMap::new(17, 40);
        let mut par = DisparityMap::new(17, 40);
        let f = |y: usize, row: &mut [u32]| {
            for (x, v) in row.iter_mut().enumerate() {
                *v = (x * 31 + y * 7) as u32 % 13;
            }
        };

        run_rows(&mut seq, 2..38, Execution::Sequential, &SweepControl::new(), f).unwrap();
        run_rows(&mut par, 2..38, Execution::Parallel, &SweepControl::new(), f).unwrap();

        assert_eq!(seq, par);
    }

    #[test]
    fn reports_every_row() {
        let mut map = DisparityMap::new(4, 6);
        let seen = Mutex::new(Vec::new());
        let control = SweepControl::new().on_progress(|p| seen.lock().unwrap().push(p));

        run_rows(&mut map, 1..5, Execution::Sequential, &control, |_, _| {}).unwrap();
        drop(control);

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen.last(), Some(&Progress { rows_done: 4, rows_total: 4 }));
        assert_eq!(seen[1].percent(), 50.0);
    }

    #[test]
    fn progress_logged_at_debug() {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Debug);

        let mut map = DisparityMap::new(3, 4);
        run_rows(&mut map, 0..4, Execution::Sequential, &SweepControl::new(), |_, _| {}).unwrap();

        let records = CAPTURE.0.lock().unwrap();
        assert!(records.iter().any(|(level, msg)| {
            *level == log::Level::Debug && msg == "Calculating disparity... 100 %"
        }));
    }

    #[test]
    fn cancelled_before_start() {
        let mut map = DisparityMap::new(4, 6);
        let flag = AtomicBool::new(true);
        let control = SweepControl::new().cancel_flag(&flag);

        let res = run_rows(&mut map, 0..6, Execution::Parallel, &control, |_, row| {
            for v in row.iter_mut() {
                *v = 1;
            }
        });

        assert!(matches!(res, Err(Error::Cancelled { rows_done: 0, rows_total: 6 })));
        assert!(map.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn empty_range_is_a_no_op() {
        let mut map = DisparityMap::new(4, 2);
        let res = run_rows(&mut map, 1..1, Execution::Sequential, &SweepControl::new(), |_, _| {
            panic!("no rows to fill")
        });

        assert!(res.is_ok());
    }
}
