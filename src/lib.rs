// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `platform::win32` – Win32 FFI (last error, loader, CRT descriptors)
//   • `library::call`   – dispatch to bound entry points
//   • `wrapper`         – the unsafe `invoke*` surface and struct reads
//   • `wintypes`        – `NativeStruct` impls for the `#[repr(C)]` mirrors
// Each unsafe block in those modules MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

//! Declaration-driven, error-checked access to a curated subset of the
//! Windows API.
//!
//! Declarations live in static fragments ([`decl::fragments`]).  The
//! [`registry`] merges them into one [`InterfaceDescription`], the
//! [`library`] binds every function once per process, and the [`wrapper`]
//! turns each raw call into a [`CallOutcome`] or a [`FailureRecord`].

pub mod config;
pub mod decl;
pub mod error;
pub mod helpers;
pub mod library;
pub mod logging;
pub mod platform;
pub mod registry;
pub mod wintypes;
pub mod wrapper;

pub use config::Config;
pub use error::{
    ArgumentError, AssemblyError, BuildError, ConfigError, ConflictError, Error, FailureRecord,
    Result, UnresolvedAliasError,
};
pub use library::{get_library, LibraryCache, LoadedLibrary};
pub use platform::{error_message, last_error, set_last_error};
pub use registry::{assemble, assemble_for, InterfaceDescription, PointerWidth};
pub use wintypes::{Handle, Socket};
pub use wrapper::{invoke, Arg, CallOutcome, NativeCallResult, OutValue, RawValue, StructValue};
