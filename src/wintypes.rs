// ── Typed mirrors ─────────────────────────────────────────────────────────────
//
// `#[repr(C)]` Rust views of the declared structs, for callers that build
// input buffers or want typed access to struct out-values.  Pointers are held
// as `usize` so every mirror is plain integer data.

#![allow(unsafe_code)]

use std::mem::size_of;

// ── Handles ───────────────────────────────────────────────────────────────────

/// A kernel object handle (`HANDLE`, `WSAEVENT`).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Handle(pub isize);

impl Handle {
    pub const NULL: Self = Self(0);
    /// `INVALID_HANDLE_VALUE`.
    pub const INVALID: Self = Self(-1);

    /// `true` for both null and `INVALID_HANDLE_VALUE`.
    pub fn is_invalid(self) -> bool {
        self == Self::NULL || self == Self::INVALID
    }
}

/// A winsock socket (`SOCKET`, pointer-sized and unsigned).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Socket(pub usize);

impl Socket {
    pub const INVALID: Self = Self(crate::helpers::INVALID_SOCKET);
}

// ── Struct mirrors ────────────────────────────────────────────────────────────

/// A `#[repr(C)]` mirror of a declared struct.
///
/// # Safety
///
/// Implementors must be `#[repr(C)]`, consist only of integer fields (or
/// mirrors that satisfy this trait), so that any bit pattern is a valid
/// value, and match the layout the registry computes for `NAME`.
pub unsafe trait NativeStruct: Copy {
    /// Any name the struct is declared under.
    const NAME: &'static str;

    fn size() -> usize {
        size_of::<Self>()
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecurityAttributes {
    pub length: u32,
    pub security_descriptor: usize,
    pub inherit_handle: i32,
}

impl SecurityAttributes {
    /// Attributes with `nLength` filled in.
    pub fn new(inherit_handle: bool) -> Self {
        Self {
            length: size_of::<Self>() as u32,
            security_descriptor: 0,
            inherit_handle: i32::from(inherit_handle),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlapped {
    pub internal: usize,
    pub internal_high: usize,
    pub offset: u32,
    pub offset_high: u32,
    pub event: Handle,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileTime {
    pub low_date_time: u32,
    pub high_date_time: u32,
}

impl FileTime {
    /// 100-nanosecond intervals since 1601-01-01.
    pub fn ticks(self) -> u64 {
        (u64::from(self.high_date_time) << 32) | u64::from(self.low_date_time)
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByHandleFileInformation {
    pub file_attributes: u32,
    pub creation_time: FileTime,
    pub last_access_time: FileTime,
    pub last_write_time: FileTime,
    pub volume_serial_number: u32,
    pub file_size_high: u32,
    pub file_size_low: u32,
    pub number_of_links: u32,
    pub file_index_high: u32,
    pub file_index_low: u32,
}

impl ByHandleFileInformation {
    pub fn file_size(&self) -> u64 {
        (u64::from(self.file_size_high) << 32) | u64::from(self.file_size_low)
    }
}

/// `COMSTAT`.  The seven one-bit flags share the first `DWORD`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComStat {
    pub flags: u32,
    pub in_queue: u32,
    pub out_queue: u32,
}

impl ComStat {
    const CTS_HOLD: u32 = 1 << 0;
    const DSR_HOLD: u32 = 1 << 1;
    const RLSD_HOLD: u32 = 1 << 2;
    const XOFF_HOLD: u32 = 1 << 3;
    const XOFF_SENT: u32 = 1 << 4;
    const EOF: u32 = 1 << 5;
    const TXIM: u32 = 1 << 6;

    pub fn cts_hold(&self) -> bool {
        self.flags & Self::CTS_HOLD != 0
    }

    pub fn dsr_hold(&self) -> bool {
        self.flags & Self::DSR_HOLD != 0
    }

    pub fn rlsd_hold(&self) -> bool {
        self.flags & Self::RLSD_HOLD != 0
    }

    pub fn xoff_hold(&self) -> bool {
        self.flags & Self::XOFF_HOLD != 0
    }

    pub fn xoff_sent(&self) -> bool {
        self.flags & Self::XOFF_SENT != 0
    }

    pub fn eof(&self) -> bool {
        self.flags & Self::EOF != 0
    }

    pub fn txim(&self) -> bool {
        self.flags & Self::TXIM != 0
    }

    /// The 25 reserved high bits.
    pub fn reserved(&self) -> u32 {
        self.flags >> 7
    }
}

/// `FD_MAX_EVENTS` error slots, indexed by the `FD_*_BIT` position.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WsaNetworkEvents {
    pub network_events: i32,
    pub error_code: [i32; 10],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartupInfo {
    pub cb: u32,
    pub reserved: usize,
    pub desktop: usize,
    pub title: usize,
    pub x: u32,
    pub y: u32,
    pub x_size: u32,
    pub y_size: u32,
    pub x_count_chars: u32,
    pub y_count_chars: u32,
    pub fill_attribute: u32,
    pub flags: u32,
    pub show_window: u16,
    pub reserved2_len: u16,
    pub reserved2: usize,
    pub std_input: Handle,
    pub std_output: Handle,
    pub std_error: Handle,
}

impl StartupInfo {
    /// A zeroed `STARTUPINFOW` with `cb` set.
    pub fn new() -> Self {
        Self {
            cb: size_of::<Self>() as u32,
            ..Self::default()
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessInformation {
    pub process: Handle,
    pub thread: Handle,
    pub process_id: u32,
    pub thread_id: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coord {
    pub x: i16,
    pub y: i16,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmallRect {
    pub left: i16,
    pub top: i16,
    pub right: i16,
    pub bottom: i16,
}

impl SmallRect {
    /// Columns covered; both edges are inclusive.
    pub fn width(&self) -> i16 {
        self.right - self.left + 1
    }

    pub fn height(&self) -> i16 {
        self.bottom - self.top + 1
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleScreenBufferInfo {
    pub size: Coord,
    pub cursor_position: Coord,
    pub attributes: u16,
    pub window: SmallRect,
    pub maximum_window_size: Coord,
}

// SAFETY (all impls below): each mirror is `#[repr(C)]`, holds only integers
// and integer newtypes, and is checked against the registry layout in tests.
unsafe impl NativeStruct for SecurityAttributes {
    const NAME: &'static str = "SECURITY_ATTRIBUTES";
}
unsafe impl NativeStruct for Overlapped {
    const NAME: &'static str = "OVERLAPPED";
}
unsafe impl NativeStruct for FileTime {
    const NAME: &'static str = "FILETIME";
}
unsafe impl NativeStruct for ByHandleFileInformation {
    const NAME: &'static str = "BY_HANDLE_FILE_INFORMATION";
}
unsafe impl NativeStruct for ComStat {
    const NAME: &'static str = "COMSTAT";
}
unsafe impl NativeStruct for WsaNetworkEvents {
    const NAME: &'static str = "WSANETWORKEVENTS";
}
unsafe impl NativeStruct for StartupInfo {
    const NAME: &'static str = "STARTUPINFOW";
}
unsafe impl NativeStruct for ProcessInformation {
    const NAME: &'static str = "PROCESS_INFORMATION";
}
unsafe impl NativeStruct for Coord {
    const NAME: &'static str = "COORD";
}
unsafe impl NativeStruct for SmallRect {
    const NAME: &'static str = "SMALL_RECT";
}
unsafe impl NativeStruct for ConsoleScreenBufferInfo {
    const NAME: &'static str = "CONSOLE_SCREEN_BUFFER_INFO";
}

// ── Tests ─────────────────────────────────────────────────────────────────────
