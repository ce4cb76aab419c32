// ── Declaration model ─────────────────────────────────────────────────────────
//
// Plain descriptor tables.  Nothing in here performs resolution or touches the
// OS; the registry (`crate::registry`) merges fragments and the loader binds
// them.  All descriptors are `const`-constructible so fragments can live in
// `static` tables.

pub mod fragments;

use std::fmt;

// ── Modules ───────────────────────────────────────────────────────────────────

/// The native module that exports a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Module {
    Kernel32,
    Ws2_32,
    User32,
    /// Routines compiled into this crate (see `crate::helpers`).
    Helpers,
}

impl Module {
    /// File name passed to the system loader.  `None` for in-crate helpers.
    pub fn dll_name(self) -> Option<&'static str> {
        match self {
            Self::Kernel32 => Some("kernel32.dll"),
            Self::Ws2_32 => Some("ws2_32.dll"),
            Self::User32 => Some("user32.dll"),
            Self::Helpers => None,
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dll_name() {
            Some(name) => f.write_str(name),
            None => f.write_str("native helpers"),
        }
    }
}

// ── Types ─────────────────────────────────────────────────────────────────────

/// How a type alias is represented natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repr {
    /// Fixed-width integer.
    Int { bits: u8, signed: bool },
    /// Opaque pointer (`LPVOID`, `HANDLE`).
    Pointer,
    /// Pointer to a named type.  The pointee sizes out-parameters.
    PointerTo(&'static str),
    /// Integer as wide as a pointer on the target (`ULONG_PTR`, `SOCKET`).
    PointerWidth { signed: bool },
    /// Another name for an existing type.
    Alias(&'static str),
    /// No value; valid only as a return type.
    Void,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeAlias {
    pub name: &'static str,
    pub repr: Repr,
}

impl TypeAlias {
    pub const fn int(name: &'static str, bits: u8, signed: bool) -> Self {
        Self {
            name,
            repr: Repr::Int { bits, signed },
        }
    }

    pub const fn pointer(name: &'static str) -> Self {
        Self {
            name,
            repr: Repr::Pointer,
        }
    }

    pub const fn pointer_to(name: &'static str, pointee: &'static str) -> Self {
        Self {
            name,
            repr: Repr::PointerTo(pointee),
        }
    }

    pub const fn pointer_width(name: &'static str, signed: bool) -> Self {
        Self {
            name,
            repr: Repr::PointerWidth { signed },
        }
    }

    pub const fn alias(name: &'static str, target: &'static str) -> Self {
        Self {
            name,
            repr: Repr::Alias(target),
        }
    }
}

// ── Structs ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub ty: &'static str,
    /// Bit width for bit-field members.
    pub bits: Option<u8>,
    /// Element count for fixed-length arrays.
    pub count: Option<usize>,
}

impl Field {
    pub const fn new(name: &'static str, ty: &'static str) -> Self {
        Self {
            name,
            ty,
            bits: None,
            count: None,
        }
    }

    pub const fn bits(name: &'static str, ty: &'static str, bits: u8) -> Self {
        Self {
            name,
            ty,
            bits: Some(bits),
            count: None,
        }
    }

    pub const fn array(name: &'static str, ty: &'static str, count: usize) -> Self {
        Self {
            name,
            ty,
            bits: None,
            count: Some(count),
        }
    }
}

/// One of the names a struct layout is known by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructName {
    pub name: &'static str,
    /// `true` for `*LPFOO`-style names that denote a pointer to the layout.
    pub pointer: bool,
}

impl StructName {
    pub const fn value(name: &'static str) -> Self {
        Self {
            name,
            pointer: false,
        }
    }

    pub const fn pointer(name: &'static str) -> Self {
        Self {
            name,
            pointer: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructDescriptor {
    /// The struct tag, e.g. `_SECURITY_ATTRIBUTES`.
    pub tag: &'static str,
    /// Fields in native memory order.
    pub fields: &'static [Field],
    pub names: &'static [StructName],
}

// ── Functions ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
    InOut,
    /// An input that may be null.
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub ty: &'static str,
    pub direction: Direction,
}

impl Param {
    pub const fn input(name: &'static str, ty: &'static str) -> Self {
        Self {
            name,
            ty,
            direction: Direction::In,
        }
    }

    pub const fn out(name: &'static str, ty: &'static str) -> Self {
        Self {
            name,
            ty,
            direction: Direction::Out,
        }
    }

    pub const fn in_out(name: &'static str, ty: &'static str) -> Self {
        Self {
            name,
            ty,
            direction: Direction::InOut,
        }
    }

    pub const fn optional(name: &'static str, ty: &'static str) -> Self {
        Self {
            name,
            ty,
            direction: Direction::Optional,
        }
    }
}

/// A return value that marks failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// Compared after truncating both sides to the return type's width.
    Value(i64),
    /// `WSA_INVALID_EVENT`, tested through the `wsa_invalid_event` helper.
    InvalidEvent,
}

/// Where the error code of a failed call comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSource {
    /// The thread's last-error value.
    LastError,
    /// A zero-argument function in the same interface (`WSAGetLastError`).
    Function(&'static str),
}

/// The documented rule for reading a raw return value as success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    Infallible,
    /// Zero (or a null handle) means failure.
    NonZero,
    /// Like `NonZero`, but a last-error value in the list means the operation
    /// is still in flight rather than failed.
    NonZeroOr(&'static [u32]),
    FailsOn(Sentinel, ErrorSource),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub name: &'static str,
    pub module: Module,
    /// The exported symbol; differs from `name` for `W`-suffixed exports.
    pub export: &'static str,
    pub ret: &'static str,
    pub params: &'static [Param],
    pub convention: Convention,
}

// ── Constants ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant {
    pub name: &'static str,
    pub value: i64,
}

impl Constant {
    pub const fn new(name: &'static str, value: i64) -> Self {
        Self {
            name,
            value,
        }
    }
}

// ── Fragments ─────────────────────────────────────────────────────────────────

/// A self-contained set of declarations for one subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationFragment {
    pub name: &'static str,
    /// Bumped whenever the fragment's declarations change shape.
    pub revision: u32,
    pub types: &'static [TypeAlias],
    pub structs: &'static [StructDescriptor],
    pub functions: &'static [FunctionDescriptor],
    pub constants: &'static [Constant],
}

impl DeclarationFragment {
    /// An empty fragment, for struct-update syntax in the tables.
    pub const EMPTY: Self = Self {
        name: "",
        revision: 0,
        types: &[],
        structs: &[],
        functions: &[],
        constants: &[],
    };
}
