// Portable stand-ins for hosts without kernel32.  The last-error channel is a
// thread-local cell with the same per-thread semantics as the real one.

use std::cell::Cell;

use crate::config::Config;
use crate::error::BuildError;

use super::SymbolResolver;

thread_local! {
    static LAST_ERROR: Cell<u32> = const { Cell::new(0) };
}

pub(super) fn last_error() -> u32 {
    LAST_ERROR.with(Cell::get)
}

pub(super) fn set_last_error(code: u32) {
    LAST_ERROR.with(|cell| cell.set(code));
}

pub(super) fn error_message(code: u32) -> String {
    let text = std::io::Error::from_raw_os_error(code as i32).to_string();
    let suffix = format!(" (os error {})", code as i32);
    match text.strip_suffix(&suffix) {
        Some(message) => message.to_owned(),
        None => text,
    }
}

/// Descriptors are already the native handle type here.
pub(super) fn os_handle(fd: i32) -> isize {
    fd as isize
}

pub(super) fn system_resolver(_config: &Config) -> Result<Box<dyn SymbolResolver>, BuildError> {
    Err(BuildError::Unsupported {
        platform: std::env::consts::OS,
    })
}
