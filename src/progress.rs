//! Progress reporting.
//!
//! Long running operations accept an optional [`ProgressCallback`] that
//! receives the completed fraction of the work in `[0, 1]`. Callbacks observe
//! only; they cannot cancel the operation.

use std::cell::Cell;
use std::ffi::{c_char, c_double, c_int, c_void};

use gdal_sys::GDALProgressFunc;

pub type ProgressCallback<'a> = dyn Fn(f64) + 'a;

/// Forwards a sub-task's own completion into the `[offset, offset + scale]`
/// slice of the caller's progress. Reported values never decrease.
pub struct ScaledProgress<'a> {
    callback: Option<&'a ProgressCallback<'a>>,
    offset: f64,
    scale: f64,
    last: Cell<f64>,
}

impl<'a> ScaledProgress<'a> {
    pub fn new(callback: Option<&'a ProgressCallback<'a>>, offset: f64, scale: f64) -> Self {
        ScaledProgress {
            callback,
            offset,
            scale,
            last: Cell::new(f64::NEG_INFINITY),
        }
    }

    pub fn report(&self, completion: f64) {
        let Some(callback) = self.callback else {
            return;
        };
        let completion = if completion.is_nan() {
            0.0
        } else {
            completion.clamp(0.0, 1.0)
        };
        let value = completion.mul_add(self.scale, self.offset);
        if value > self.last.get() {
            self.last.set(value);
            callback(value);
        }
    }

    /// Function pointer and user data to hand to GDAL functions taking a
    /// `GDALProgressFunc`. The pointer is valid for as long as `self` is.
    pub(crate) fn as_gdal(&self) -> (GDALProgressFunc, *mut c_void) {
        if self.callback.is_none() {
            return (None, std::ptr::null_mut());
        }
        (
            Some(gdal_progress),
            self as *const ScaledProgress<'a> as *mut c_void,
        )
    }
}

unsafe extern "C" fn gdal_progress(
    complete: c_double,
    _message: *const c_char,
    progress_arg: *mut c_void,
) -> c_int {
    if !progress_arg.is_null() {
        let progress = &*(progress_arg as *const ScaledProgress<'_>);
        progress.report(complete);
    }
    // keep going
    1
}

/// Turns a known number of equally sized steps into progress reports.
pub struct CountingProgress<'a> {
    progress: ScaledProgress<'a>,
    total: usize,
    done: Cell<usize>,
}

impl<'a> CountingProgress<'a> {
    pub fn new(total: usize, progress: ScaledProgress<'a>) -> Self {
        CountingProgress {
            progress,
            total,
            done: Cell::new(0),
        }
    }

    pub fn increment(&self) {
        let done = self.done.get() + 1;
        self.done.set(done);
        if self.total == 0 {
            self.progress.report(1.0);
        } else {
            self.progress.report(done as f64 / self.total as f64);
        }
    }
}
