use crate::Result;

/// OS trash store covering every volume
pub trait TrashStore: Send + Sync {
    fn empty_all(&self) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTrash;

#[cfg(windows)]
impl TrashStore for SystemTrash {
    fn empty_all(&self) -> Result<()> {
        use winapi::shared::winerror::SUCCEEDED;
        use winapi::um::shellapi::{
            SHERB_NOCONFIRMATION, SHERB_NOPROGRESSUI, SHERB_NOSOUND, SHEmptyRecycleBinW,
        };

        // A null root path means every volume
        let hr = unsafe {
            SHEmptyRecycleBinW(
                std::ptr::null_mut(),
                std::ptr::null(),
                SHERB_NOCONFIRMATION | SHERB_NOPROGRESSUI | SHERB_NOSOUND,
            )
        };

        if SUCCEEDED(hr) {
            Ok(())
        } else {
            Err(crate::ReclaimError::Trash(format!("HRESULT {:#010x}", hr)))
        }
    }
}

#[cfg(not(windows))]
impl TrashStore for SystemTrash {
    fn empty_all(&self) -> Result<()> {
        Err(crate::ReclaimError::Unsupported("emptying the trash"))
    }
}
