// Argument and result values passed through the wrapper.

use std::sync::Arc;

use crate::registry::{FieldKind, FieldLayout, NativeType, OutSlot, PointerWidth, StructLayout};
use crate::wintypes::{Handle, NativeStruct, Socket};

// ── Arguments ─────────────────────────────────────────────────────────────────

/// One argument to a wrapped call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    /// An integer or pointer, for `In` and `Optional` parameters.
    Value(usize),
    /// Null, for `Optional` parameters.
    Null,
    /// Storage the wrapper allocates and sizes, for `Out` parameters.
    Out,
    /// Initial value of an `InOut` scalar.
    InOut(u64),
}

impl Arg {
    /// Pass `value` by address.
    pub fn by_ref<T>(value: &T) -> Self {
        Self::Value(value as *const T as usize)
    }

    /// Pass `value` by mutable address.
    pub fn by_mut<T>(value: &mut T) -> Self {
        Self::Value(value as *mut T as usize)
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Value(_) => "a value",
            Self::Null => "null",
            Self::Out => "an out slot",
            Self::InOut(_) => "an in-out value",
        }
    }
}

impl From<u32> for Arg {
    fn from(value: u32) -> Self {
        Self::Value(value as usize)
    }
}

/// Sign-extended, so `STD_INPUT_HANDLE` (-10) reaches a `DWORD` slot intact.
impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Self::Value(value as isize as usize)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Self::Value(usize::from(value))
    }
}

impl From<usize> for Arg {
    fn from(value: usize) -> Self {
        Self::Value(value)
    }
}

impl From<isize> for Arg {
    fn from(value: isize) -> Self {
        Self::Value(value as usize)
    }
}

impl From<Handle> for Arg {
    fn from(handle: Handle) -> Self {
        Self::Value(handle.0 as usize)
    }
}

impl From<Socket> for Arg {
    fn from(socket: Socket) -> Self {
        Self::Value(socket.0)
    }
}

impl<T> From<*const T> for Arg {
    fn from(ptr: *const T) -> Self {
        Self::Value(ptr as usize)
    }
}

impl<T> From<*mut T> for Arg {
    fn from(ptr: *mut T) -> Self {
        Self::Value(ptr as usize)
    }
}

// ── Raw values ────────────────────────────────────────────────────────────────

pub(crate) fn mask(raw: u64, bits: u8) -> u64 {
    match bits {
        0 => 0,
        64.. => raw,
        _ => raw & ((1u64 << bits) - 1),
    }
}

fn sign_extend(raw: u64, bits: u8) -> i64 {
    match bits {
        0 => 0,
        64.. => raw as i64,
        _ => {
            let shift = 64 - u32::from(bits);
            ((raw << shift) as i64) >> shift
        }
    }
}

/// A return or out-parameter value, already masked to its declared width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawValue {
    raw: u64,
    bits: u8,
    signed: bool,
}

impl RawValue {
    pub(crate) fn new(raw: u64, ty: NativeType, width: PointerWidth) -> Self {
        let bits = ty.bits(width);
        Self {
            raw: mask(raw, bits),
            bits,
            signed: ty.is_signed(),
        }
    }

    fn bit_field(raw: u64, bits: u8) -> Self {
        Self {
            raw: mask(raw, bits),
            bits,
            signed: false,
        }
    }

    /// The masked bits, zero-extended.
    pub fn bits(&self) -> u64 {
        self.raw
    }

    pub fn width(&self) -> u8 {
        self.bits
    }

    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    pub fn as_u32(&self) -> u32 {
        self.raw as u32
    }

    pub fn as_i32(&self) -> i32 {
        self.raw as u32 as i32
    }

    pub fn as_bool(&self) -> bool {
        self.raw != 0
    }

    pub fn as_usize(&self) -> usize {
        self.raw as usize
    }

    /// Sign-extended from the declared width, regardless of signedness, so
    /// pointer sentinels such as `INVALID_HANDLE_VALUE` read as -1.
    pub fn as_isize(&self) -> isize {
        sign_extend(self.raw, self.bits) as isize
    }

    /// Sign-extended for signed types, zero-extended otherwise.
    pub fn as_i64(&self) -> i64 {
        if self.signed {
            sign_extend(self.raw, self.bits)
        } else {
            self.raw as i64
        }
    }

    pub fn as_handle(&self) -> Handle {
        Handle(self.as_isize())
    }

    pub fn as_socket(&self) -> Socket {
        Socket(self.as_usize())
    }
}

// ── Out values ────────────────────────────────────────────────────────────────

/// Heap storage behind one `Out`/`InOut` pointer.  `u64` cells keep every
/// declared struct suitably aligned.
#[derive(Debug)]
pub(crate) struct OutCell {
    slot: OutSlot,
    cells: Box<[u64]>,
}

impl OutCell {
    pub(crate) fn new(slot: &OutSlot, initial: u64) -> Self {
        let size = match slot {
            OutSlot::Scalar(_) => 8,
            OutSlot::Struct(layout) => layout.size,
        };
        let mut cells = vec![0u64; size.div_ceil(8).max(1)].into_boxed_slice();
        cells[0] = initial;
        Self {
            slot: slot.clone(),
            cells,
        }
    }

    /// The address handed to the callee.  Stable for the cell's lifetime.
    pub(crate) fn address(&mut self) -> usize {
        self.cells.as_mut_ptr() as usize
    }

    pub(crate) fn into_value(self, width: PointerWidth) -> OutValue {
        match self.slot {
            OutSlot::Scalar(ty) => OutValue::Scalar(RawValue::new(self.cells[0], ty, width)),
            OutSlot::Struct(layout) => {
                let bytes = self
                    .cells
                    .iter()
                    .flat_map(|cell| cell.to_ne_bytes())
                    .take(layout.size)
                    .collect();
                OutValue::Struct(StructValue::new(layout, bytes, width))
            }
        }
    }
}

/// The value an `Out` or `InOut` parameter held after the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutValue {
    Scalar(RawValue),
    Struct(StructValue),
}

impl OutValue {
    pub fn scalar(&self) -> Option<RawValue> {
        match self {
            Self::Scalar(value) => Some(*value),
            Self::Struct(_) => None,
        }
    }

    pub fn structure(&self) -> Option<&StructValue> {
        match self {
            Self::Struct(value) => Some(value),
            Self::Scalar(_) => None,
        }
    }
}

/// A struct buffer decoded through its computed layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructValue {
    layout: Arc<StructLayout>,
    bytes: Vec<u8>,
    width: PointerWidth,
}

impl StructValue {
    pub(crate) fn new(layout: Arc<StructLayout>, bytes: Vec<u8>, width: PointerWidth) -> Self {
        Self {
            layout,
            bytes,
            width,
        }
    }

    pub fn layout(&self) -> &StructLayout {
        &self.layout
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn scalar_at(&self, field: &FieldLayout, index: usize) -> Option<RawValue> {
        let FieldKind::Scalar(ty) = field.kind else {
            return None;
        };
        if index >= field.count {
            return None;
        }
        let start = field.offset + index * field.size;
        let chunk = self.bytes.get(start..start + field.size)?;
        let mut buf = [0u8; 8];
        buf[..chunk.len()].copy_from_slice(chunk);
        let unit = u64::from_ne_bytes(buf);

        Some(match field.bits {
            Some(range) => RawValue::bit_field(unit >> range.shift, range.width),
            None => RawValue::new(unit, ty, self.width),
        })
    }

    /// A scalar or bit-field member.
    pub fn field(&self, name: &str) -> Option<RawValue> {
        self.scalar_at(self.layout.field(name)?, 0)
    }

    /// One element of a fixed-length array member.
    pub fn element(&self, name: &str, index: usize) -> Option<RawValue> {
        self.scalar_at(self.layout.field(name)?, index)
    }

    /// A struct member held by value.
    pub fn nested(&self, name: &str) -> Option<StructValue> {
        let field = self.layout.field(name)?;
        let FieldKind::Struct(layout) = &field.kind else {
            return None;
        };
        let bytes = self.bytes.get(field.offset..field.offset + layout.size)?;
        Some(StructValue::new(Arc::clone(layout), bytes.to_vec(), self.width))
    }

    /// Copy the buffer into its typed mirror.  `None` when the sizes differ.
    pub fn read<T: NativeStruct>(&self) -> Option<T> {
        if T::size() != self.bytes.len() {
            return None;
        }
        // SAFETY: the buffer holds exactly `size_of::<T>()` bytes and
        // `NativeStruct` guarantees any bit pattern is a valid `T`.
        Some(unsafe { std::ptr::read_unaligned(self.bytes.as_ptr().cast::<T>()) })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
