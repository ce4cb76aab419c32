// ── Central error types ───────────────────────────────────────────────────────
//
// Fallible operations in winshim return `error::Result<T>`.  Assembly and
// build errors describe defects in the declaration tables or the host
// environment and are fatal for the process; `FailureRecord` is the
// per-call outcome a caller is expected to handle.

use std::path::PathBuf;

use crate::decl::{Direction, Module};

// ── Assembly ──────────────────────────────────────────────────────────────────

/// Two declarations share a name but not a shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{name}` is declared by fragment `{first}` and again, differently, by `{second}`")]
pub struct ConflictError {
    pub name: String,
    pub first: String,
    pub second: String,
}

/// A type name used by a declaration never received a definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{name}` (used by `{used_by}`) does not resolve to a native type")]
pub struct UnresolvedAliasError {
    pub name: String,
    pub used_by: String,
}

/// Errors raised while merging declaration fragments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    UnresolvedAlias(#[from] UnresolvedAliasError),

    /// A declaration is well-formed text but cannot describe native memory
    /// or a callable signature (bad bit-field group, unsized out pointer, …).
    #[error("invalid declaration `{name}`: {reason}")]
    InvalidDeclaration { name: String, reason: String },
}

// ── Build ─────────────────────────────────────────────────────────────────────

/// Errors raised while turning an interface description into a callable
/// library.  Cloned out of the process-wide cache for every caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("interface assembly failed: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("failed to load {module}: {message} (error {code:#010x})")]
    ModuleLoad {
        module: Module,
        code: u32,
        message: String,
    },

    #[error("{module} does not export `{symbol}`")]
    MissingSymbol { module: Module, symbol: String },

    /// A compiled helper routine does not match the signature the registry
    /// resolved for it.
    #[error("helper `{name}` is compiled as {compiled} but declared as {declared}")]
    HelperSignature {
        name: String,
        compiled: String,
        declared: String,
    },

    #[error("`{name}` takes {params} parameters; at most {max} are supported")]
    Arity {
        name: String,
        params: usize,
        max: usize,
    },

    #[error("system modules are not available on this platform ({platform})")]
    Unsupported { platform: &'static str },
}

// ── Per-call failures ─────────────────────────────────────────────────────────

/// A native call whose convention signalled failure.
///
/// Carries the captured error code together with its decoded message; one is
/// never reported without the other.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{function} failed (error {code}): {message}")]
pub struct FailureRecord {
    function: String,
    code: u32,
    message: String,
}

impl FailureRecord {
    pub fn new(function: impl Into<String>, code: u32, message: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            code,
            message: message.into(),
        }
    }

    /// Name of the function that failed.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// The native error code (`GetLastError()` or the follow-up function's value).
    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Arguments that do not fit the descriptor being invoked.  Detected before
/// any native call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("{function} expects {expected} arguments, got {got}")]
    Count {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error("{function}: parameter {index} (`{param}`) is {direction:?}, got {got}")]
    Direction {
        function: String,
        index: usize,
        param: &'static str,
        direction: Direction,
        got: &'static str,
    },
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

// ── Crate error ───────────────────────────────────────────────────────────────

/// Every error that winshim can produce.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    NativeCall(#[from] FailureRecord),

    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error("`{0}` is not part of the loaded interface")]
    UnknownFunction(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// The failure record, if this error came from a native call.
    pub fn failure(&self) -> Option<&FailureRecord> {
        match self {
            Self::NativeCall(record) => Some(record),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

// ── Tests ─────────────────────────────────────────────────────────────────────
