//! GDAL's `/vsimem/` in-memory file system.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use gdal_sys::{VSIFree, VSIGetMemFileBuffer, VSIUnlink};

use crate::dataset::Dataset;
use crate::errors::{GdalError, Result};
use crate::utils::{_last_null_pointer_err, _path_to_c_string};

static MEM_FILE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A `/vsimem/` path that no other call in this process has handed out.
pub fn unique_mem_path(stem: &str, extension: &str) -> PathBuf {
    let n = MEM_FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
    PathBuf::from(format!(
        "/vsimem/{stem}-{}-{n}.{extension}",
        std::process::id()
    ))
}

/// Unlink a VSIMemFile.
pub fn unlink_mem_file<P: AsRef<Path>>(file_name: P) -> Result<()> {
    let file_name = file_name.as_ref();
    let file_name_c = _path_to_c_string(file_name)?;

    let rv = unsafe { VSIUnlink(file_name_c.as_ptr()) };

    if rv != 0 {
        return Err(GdalError::UnlinkMemFile {
            file_name: file_name.display().to_string(),
        });
    }

    Ok(())
}

/// Copies the bytes of the VSIMemFile with given `file_name`, leaving the file in place.
pub fn get_vsi_mem_file_bytes<P: AsRef<Path>>(file_name: P) -> Result<Vec<u8>> {
    let file_name = _path_to_c_string(file_name.as_ref())?;

    let bytes = unsafe {
        let mut length: u64 = 0;
        let bytes = VSIGetMemFileBuffer(file_name.as_ptr(), &mut length, false as i32);

        if bytes.is_null() {
            return Err(_last_null_pointer_err("VSIGetMemFileBuffer"));
        }

        std::slice::from_raw_parts(bytes, length as usize).to_vec()
    };

    Ok(bytes)
}

/// Takes the bytes of the VSIMemFile with given `file_name`, unlinking the file.
pub fn take_vsi_mem_file_bytes<P: AsRef<Path>>(file_name: P) -> Result<Vec<u8>> {
    let file_name = _path_to_c_string(file_name.as_ref())?;

    let owned_bytes = unsafe {
        let mut length: u64 = 0;
        let bytes = VSIGetMemFileBuffer(file_name.as_ptr(), &mut length, true as i32);

        if bytes.is_null() {
            return Err(_last_null_pointer_err("VSIGetMemFileBuffer"));
        }

        let vec = std::slice::from_raw_parts(bytes, length as usize).to_vec();
        VSIFree(bytes.cast::<std::ffi::c_void>());
        vec
    };

    Ok(owned_bytes)
}

/// An in-memory raster file. The file is unlinked when the value is dropped.
#[derive(Debug)]
pub struct MemFile {
    path: PathBuf,
}

impl MemFile {
    /// Takes ownership of an existing `/vsimem/` file.
    pub fn from_path(path: PathBuf) -> Self {
        MemFile { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file read-only.
    pub fn open(&self) -> Result<Dataset> {
        Dataset::open(&self.path)
    }

    /// A copy of the file's bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        get_vsi_mem_file_bytes(&self.path)
    }

    /// Consume the file and return its bytes.
    pub fn into_bytes(mut self) -> Result<Vec<u8>> {
        let bytes = take_vsi_mem_file_bytes(&self.path)?;
        // already unlinked by GDAL, leave nothing for drop
        self.path = PathBuf::new();
        Ok(bytes)
    }

    /// Write the file's bytes to `path` on the local file system.
    pub fn persist<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_bytes()?).map_err(|e| GdalError::Io {
            path: path.display().to_string(),
            msg: e.to_string(),
        })
    }
}

impl Drop for MemFile {
    fn drop(&mut self) {
        if self.path.as_os_str().is_empty() {
            return;
        }
        // the file may already be gone
        let _ = unlink_mem_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Driver;
    use crate::raster::GdalDataType;

    #[test]
    fn unique_paths_differ() {
        let a = unique_mem_path("cog", "tif");
        let b = unique_mem_path("cog", "tif");
        assert_ne!(a, b);
        assert!(a.starts_with("/vsimem"));
        assert_eq!(a.extension().unwrap(), "tif");
    }

    #[test]
    fn mem_file_lifecycle() {
        let path = unique_mem_path("vsi-test", "tif");
        {
            let driver = Driver::get_by_name("GTiff").unwrap();
            driver
                .create(&path, (8, 8), 1, GdalDataType::UInt8)
                .unwrap();
        }
        let file = MemFile::from_path(path.clone());
        let bytes = file.to_bytes().unwrap();
        assert_eq!(&bytes[..2], b"II");
        assert_eq!(file.open().unwrap().raster_size(), (8, 8));

        drop(file);
        assert!(get_vsi_mem_file_bytes(&path).is_err());
    }

    #[test]
    fn into_bytes_unlinks() {
        let path = unique_mem_path("vsi-test", "tif");
        {
            let driver = Driver::get_by_name("GTiff").unwrap();
            driver
                .create(&path, (4, 4), 1, GdalDataType::UInt8)
                .unwrap();
        }
        let file = MemFile::from_path(path.clone());
        let bytes = file.into_bytes().unwrap();
        assert!(!bytes.is_empty());
        assert!(unlink_mem_file(&path).is_err());
    }

    #[test]
    fn into_bytes_leaves_path_free() {
        let path = unique_mem_path("vsi-test", "tif");
        let driver = Driver::get_by_name("GTiff").unwrap();
        drop(driver.create(&path, (4, 4), 1, GdalDataType::UInt8).unwrap());
        MemFile::from_path(path.clone()).into_bytes().unwrap();

        // a file created at the same path afterwards is not unlinked
        drop(driver.create(&path, (2, 2), 1, GdalDataType::UInt8).unwrap());
        let file = MemFile::from_path(path);
        assert_eq!(file.open().unwrap().raster_size(), (2, 2));
    }

    #[test]
    fn into_bytes_of_missing_file_fails() {
        let file = MemFile::from_path(unique_mem_path("vsi-test", "tif"));
        let _nolog = crate::test_utils::SuppressGDALErrorLog::new();
        assert!(file.into_bytes().is_err());
    }

    #[test]
    fn unlink_missing_file_fails() {
        let err = unlink_mem_file("/vsimem/does-not-exist.tif").unwrap_err();
        assert!(matches!(err, GdalError::UnlinkMemFile { .. }));
    }
}
