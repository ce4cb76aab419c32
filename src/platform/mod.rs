// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the interface the rest of the crate uses to talk to the
// OS: the thread's last-error channel, error-message decoding, the
// descriptor-to-handle primitive and symbol resolution.  No `unsafe` lives
// here; Win32 FFI is confined to the `win32` sub-module.  Other hosts get the
// `emulated` channel so the registry, cache and wrapper stay testable.

#[cfg(windows)]
pub mod win32;

#[cfg(not(windows))]
mod emulated;

#[cfg(windows)]
use win32 as imp;

#[cfg(not(windows))]
use emulated as imp;

use crate::config::Config;
use crate::decl::Module;
use crate::error::BuildError;

// ── Symbol resolution ─────────────────────────────────────────────────────────

/// Maps `(module, exported symbol)` to an entry point address.
///
/// The loader only ever asks for `Kernel32` and `Ws2_32` symbols; helper
/// routines are bound from `crate::helpers` directly.
pub trait SymbolResolver {
    /// Returns a non-zero entry point address.
    fn resolve(&mut self, module: Module, symbol: &str) -> Result<usize, BuildError>;
}

/// The resolver backed by the system loader.
pub fn system_resolver(config: &Config) -> Result<Box<dyn SymbolResolver>, BuildError> {
    imp::system_resolver(config)
}

// ── Last error ────────────────────────────────────────────────────────────────

/// The calling thread's last-error value.
///
/// Must be read before any other native call on the same thread.
pub fn last_error() -> u32 {
    imp::last_error()
}

pub fn set_last_error(code: u32) {
    imp::set_last_error(code)
}

/// Human-readable text for an error code, without trailing line breaks.
pub fn error_message(code: u32) -> String {
    let message = imp::error_message(code);
    let message = message.trim_end();
    if message.is_empty() {
        format!("unknown error {code}")
    } else {
        message.to_owned()
    }
}

// ── Descriptors ───────────────────────────────────────────────────────────────

/// OS handle behind a C runtime descriptor, or `-1` for a negative descriptor.
pub fn os_handle(fd: i32) -> isize {
    if fd < 0 {
        return -1;
    }
    imp::os_handle(fd)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
