//! GDAL Configuration Functions
//!
//! The GDAL library can be configured at runtime using environment variables or
//! by using functions in this module. Options set by calling functions in this
//! module override options set in environment variables.
//!
//! ```no_run
//! use cogeo::config::*;
//!
//! // Increase GDAL's cache size to 1024Mb
//! set_config_option("GDAL_CACHEMAX", "1024").unwrap();
//! assert_eq!(get_config_option("GDAL_CACHEMAX", "").unwrap(), "1024");
//! clear_config_option("GDAL_CACHEMAX").unwrap();
//! ```
//!
//! Refer to [GDAL `ConfigOptions`](https://gdal.org/user/configoptions.html) for
//! a full list of options.

use std::ffi::{c_char, CString};
use std::marker::PhantomData;
use std::ptr;

use gdal_sys::{CPLErr, CPLErrorNum};

use crate::errors::{CplErrType, Result};
use crate::utils::_string;

/// Set a GDAL library configuration option
pub fn set_config_option(key: &str, value: &str) -> Result<()> {
    let c_key = CString::new(key.as_bytes())?;
    let c_val = CString::new(value.as_bytes())?;
    unsafe {
        gdal_sys::CPLSetConfigOption(c_key.as_ptr(), c_val.as_ptr());
    };
    Ok(())
}

/// Get the value of a GDAL library configuration option
///
/// If the config option specified by `key` is not found, `default` is returned.
pub fn get_config_option(key: &str, default: &str) -> Result<String> {
    let c_key = CString::new(key.as_bytes())?;
    let c_default = CString::new(default.as_bytes())?;
    let rv = unsafe { gdal_sys::CPLGetConfigOption(c_key.as_ptr(), c_default.as_ptr()) };
    Ok(_string(rv))
}

/// Clear the value of a GDAL library configuration option
pub fn clear_config_option(key: &str) -> Result<()> {
    let c_key = CString::new(key.as_bytes())?;
    unsafe {
        gdal_sys::CPLSetConfigOption(c_key.as_ptr(), ptr::null());
    };
    Ok(())
}

/// Set a GDAL library configuration option with **thread local** scope
pub fn set_thread_local_config_option(key: &str, value: &str) -> Result<()> {
    let c_key = CString::new(key.as_bytes())?;
    let c_val = CString::new(value.as_bytes())?;
    unsafe {
        gdal_sys::CPLSetThreadLocalConfigOption(c_key.as_ptr(), c_val.as_ptr());
    };
    Ok(())
}

/// Get the value of a **thread local** GDAL library configuration option
///
/// If the config option specified by `key` is not found, `default` is returned.
pub fn get_thread_local_config_option(key: &str, default: &str) -> Result<String> {
    let c_key = CString::new(key.as_bytes())?;
    let c_default = CString::new(default.as_bytes())?;
    let rv = unsafe { gdal_sys::CPLGetThreadLocalConfigOption(c_key.as_ptr(), c_default.as_ptr()) };
    Ok(_string(rv))
}

/// Clear the value of a **thread local** GDAL library configuration option
pub fn clear_thread_local_config_option(key: &str) -> Result<()> {
    let c_key = CString::new(key.as_bytes())?;
    unsafe {
        gdal_sys::CPLSetThreadLocalConfigOption(c_key.as_ptr(), ptr::null());
    };
    Ok(())
}

fn thread_local_config_value(key: &CString) -> Option<String> {
    let rv = unsafe { gdal_sys::CPLGetThreadLocalConfigOption(key.as_ptr(), ptr::null()) };
    if rv.is_null() {
        None
    } else {
        Some(_string(rv))
    }
}

/// Sets a thread local configuration option for as long as the guard lives.
///
/// The previous thread local value (or its absence) is restored on drop.
pub struct ThreadLocalConfigGuard {
    key: CString,
    previous: Option<CString>,
    // Thread local options belong to the creating thread.
    _not_send: PhantomData<*mut ()>,
}

impl ThreadLocalConfigGuard {
    pub fn set(key: &str, value: &str) -> Result<Self> {
        let key = CString::new(key)?;
        let value = CString::new(value)?;
        let previous = thread_local_config_value(&key)
            .map(CString::new)
            .transpose()?;
        unsafe {
            gdal_sys::CPLSetThreadLocalConfigOption(key.as_ptr(), value.as_ptr());
        }
        Ok(ThreadLocalConfigGuard {
            key,
            previous,
            _not_send: PhantomData,
        })
    }
}

impl Drop for ThreadLocalConfigGuard {
    fn drop(&mut self) {
        let previous = self
            .previous
            .as_ref()
            .map_or(ptr::null(), |value| value.as_ptr());
        unsafe {
            gdal_sys::CPLSetThreadLocalConfigOption(self.key.as_ptr(), previous);
        }
    }
}

unsafe extern "C" fn log_error_handler(
    error_type: CPLErr::Type,
    error_num: CPLErrorNum,
    error_msg_ptr: *const c_char,
) {
    let level: log::Level = CplErrType::from(error_type).into();
    let msg = _string(error_msg_ptr);
    log::log!(target: "gdal", level, "{msg} (CPL error number {error_num})");
}

/// Route GDAL's CPL messages into the [`log`] facade.
///
/// Debug messages are logged at `debug`, warnings at `warn` and failures at
/// `error`, all under the `gdal` target. Errors still reach callers as
/// [`GdalError`](crate::errors::GdalError) values.
pub fn install_log_error_handler() {
    unsafe {
        gdal_sys::CPLSetErrorHandler(Some(log_error_handler));
    }
}

/// Restore GDAL's default error handler, which prints to stderr.
pub fn remove_error_handler() {
    unsafe {
        gdal_sys::CPLSetErrorHandler(None);
    }
}
