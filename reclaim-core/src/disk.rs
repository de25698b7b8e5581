use std::path::{Path, PathBuf};

use crate::Result;

/// Capacity and free space of one volume, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskUsage {
    pub total: u64,
    /// Space available to this user
    pub free: u64,
}

impl DiskUsage {
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.free)
    }

    /// Share of the volume in use, 0.0 for an empty reading
    pub fn percent_used(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.used() as f64 * 100.0 / self.total as f64
    }
}

/// OS primitive reporting disk usage for the system drive
pub trait DiskInfo: Send + Sync {
    fn usage(&self) -> Result<DiskUsage>;
}

/// Reads the volume holding `path`
#[derive(Debug, Clone)]
pub struct SystemDisk {
    path: PathBuf,
}

impl SystemDisk {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The drive the OS is installed on
    pub fn system_drive() -> Self {
        Self::new(system_drive_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(windows)]
fn system_drive_path() -> PathBuf {
    std::env::var_os("SystemDrive")
        .filter(|v| !v.is_empty())
        .map(|drive| {
            let mut root = PathBuf::from(drive);
            root.push("\\");
            root
        })
        .unwrap_or_else(|| PathBuf::from("C:\\"))
}

#[cfg(not(windows))]
fn system_drive_path() -> PathBuf {
    PathBuf::from("/")
}

#[cfg(windows)]
impl DiskInfo for SystemDisk {
    fn usage(&self) -> Result<DiskUsage> {
        use std::os::windows::ffi::OsStrExt;
        use winapi::um::fileapi::GetDiskFreeSpaceExW;
        use winapi::um::winnt::ULARGE_INTEGER;

        let wide: Vec<u16> = self
            .path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        unsafe {
            let mut available: ULARGE_INTEGER = std::mem::zeroed();
            let mut total: ULARGE_INTEGER = std::mem::zeroed();
            let mut total_free: ULARGE_INTEGER = std::mem::zeroed();

            if GetDiskFreeSpaceExW(wide.as_ptr(), &mut available, &mut total, &mut total_free) == 0 {
                return Err(std::io::Error::last_os_error().into());
            }

            Ok(DiskUsage {
                total: *total.QuadPart(),
                free: *available.QuadPart(),
            })
        }
    }
}

#[cfg(not(windows))]
impl DiskInfo for SystemDisk {
    fn usage(&self) -> Result<DiskUsage> {
        Ok(DiskUsage {
            total: fs2::total_space(&self.path)?,
            free: fs2::available_space(&self.path)?,
        })
    }
}
