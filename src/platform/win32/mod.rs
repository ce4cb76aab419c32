// ── Win32 platform implementation ─────────────────────────────────────────────
//
// One of the few modules where `unsafe` code is permitted (the others are
// `library::call` and the struct decoding in `wrapper`).  Every `unsafe` block
// MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub(crate) mod loader; // LoadLibraryW / GetProcAddress symbol resolver

use windows::core::HRESULT;
use windows::Win32::Foundation::{GetLastError, SetLastError, WIN32_ERROR};

use crate::config::Config;
use crate::error::BuildError;

use super::SymbolResolver;

// ── Last error ────────────────────────────────────────────────────────────────

pub(super) fn last_error() -> u32 {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    unsafe { GetLastError() }.0
}

pub(super) fn set_last_error(code: u32) {
    // SAFETY: SetLastError only writes the calling thread's last-error slot.
    unsafe { SetLastError(WIN32_ERROR(code)) }
}

/// System message text for a Win32 error code (`FormatMessageW` underneath).
pub(super) fn error_message(code: u32) -> String {
    HRESULT::from_win32(code).message()
}

// ── Descriptors ───────────────────────────────────────────────────────────────

/// `_get_osfhandle` for a non-negative descriptor.
///
/// The descriptor must be open in this process's C runtime; the CRT treats a
/// closed descriptor as an invalid parameter.
pub(super) fn os_handle(fd: i32) -> isize {
    // SAFETY: get_osfhandle only reads the CRT descriptor table; the caller
    // guarantees `fd` is an open descriptor of the linked runtime.
    unsafe { libc::get_osfhandle(fd) }
}

pub(super) fn system_resolver(config: &Config) -> Result<Box<dyn SymbolResolver>, BuildError> {
    Ok(Box::new(loader::SystemModules::new(
        config.system_directory.clone(),
    )))
}
