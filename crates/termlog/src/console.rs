//! Native console backend for Windows terminals that predate ANSI escape
//! support. Colors are applied by swapping console text attributes around
//! each segment, and text is written pre-encoded as UTF-16.

use windows_sys::Win32::Foundation::{HANDLE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::System::Console::{
    CONSOLE_SCREEN_BUFFER_INFO, GetConsoleMode, GetConsoleScreenBufferInfo, GetStdHandle,
    STD_ERROR_HANDLE, SetConsoleTextAttribute, WriteConsoleW,
};

use crate::color::LEVEL_ATTRIBUTES;

/// Handle to the process's error console, with the attribute state needed to
/// restore it after each colorized segment.
pub(crate) struct WinConsole {
    handle: HANDLE,
    attr_orig: u16,
    background: u16,
}

// Console handles are process-global and the containing sink serializes all
// access behind its mutex.
unsafe impl Send for WinConsole {}
unsafe impl Sync for WinConsole {}

impl WinConsole {
    /// Binds to the error console, or returns `None` when standard error is
    /// not an actual console (redirected, or a pseudo-terminal).
    pub(crate) fn stderr() -> Option<Self> {
        // SAFETY: querying the process's own standard handle; a failed probe
        // is reported through the return values we check.
        unsafe {
            let handle = GetStdHandle(STD_ERROR_HANDLE);
            if handle == INVALID_HANDLE_VALUE || handle.is_null() {
                return None;
            }
            let mut mode = 0u32;
            if GetConsoleMode(handle, &mut mode) == 0 {
                return None;
            }
            let mut info: CONSOLE_SCREEN_BUFFER_INFO = std::mem::zeroed();
            GetConsoleScreenBufferInfo(handle, &mut info);
            let attr_orig = info.wAttributes;
            Some(Self {
                handle,
                attr_orig,
                background: attr_orig & 0xF0,
            })
        }
    }

    /// Writes text to the console as UTF-16.
    pub(crate) fn write(&self, text: &str) {
        let wide: Vec<u16> = text.encode_utf16().collect();
        let mut written = 0u32;
        // SAFETY: the pointer and length describe the `wide` buffer, which
        // outlives the call.
        unsafe {
            WriteConsoleW(
                self.handle,
                wide.as_ptr().cast(),
                wide.len() as u32,
                &mut written,
                std::ptr::null(),
            );
        }
    }

    /// Applies the attribute color for a level bucket, keeping the original
    /// background.
    pub(crate) fn set_level_color(&self, bucket: usize) {
        // SAFETY: plain attribute write on a probed console handle.
        unsafe {
            SetConsoleTextAttribute(self.handle, self.background | LEVEL_ATTRIBUTES[bucket]);
        }
    }

    /// Restores the attributes observed when the console was bound.
    pub(crate) fn restore(&self) {
        // SAFETY: plain attribute write on a probed console handle.
        unsafe {
            SetConsoleTextAttribute(self.handle, self.attr_orig);
        }
    }
}
