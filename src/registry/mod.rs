// ── Interface registry ────────────────────────────────────────────────────────
//
// Merges declaration fragments into one `InterfaceDescription`.  Merging is
// purely by name: every name (type, struct name, function, constant) lives in
// one namespace and maps to exactly one shape.  Resolution of aliases, struct
// layouts and signatures happens in `resolve` once every fragment is in.

mod resolve;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::decl::{
    DeclarationFragment, FunctionDescriptor, Param, StructDescriptor, TypeAlias,
};
use crate::error::{AssemblyError, ConflictError};

// ── Target ────────────────────────────────────────────────────────────────────

/// Pointer width of the target the description is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl PointerWidth {
    /// The width of the running process.
    pub const fn host() -> Self {
        if usize::BITS == 64 {
            Self::Bits64
        } else {
            Self::Bits32
        }
    }

    pub const fn bits(self) -> u8 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }

    pub const fn bytes(self) -> usize {
        self.bits() as usize / 8
    }
}

// ── Resolved types ────────────────────────────────────────────────────────────

/// A fully resolved native type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeType {
    Void,
    Int { bits: u8, signed: bool },
    Pointer,
}

impl NativeType {
    pub const fn signed(bits: u8) -> Self {
        Self::Int { bits, signed: true }
    }

    pub const fn unsigned(bits: u8) -> Self {
        Self::Int {
            bits,
            signed: false,
        }
    }

    /// Width in bits on `width`; zero for `Void`.
    pub fn bits(self, width: PointerWidth) -> u8 {
        match self {
            Self::Void => 0,
            Self::Int { bits, .. } => bits,
            Self::Pointer => width.bits(),
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(self, Self::Int { signed: true, .. })
    }
}

/// Where a bit-field member lives inside its storage unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitRange {
    pub shift: u8,
    pub width: u8,
}

impl BitRange {
    pub const fn new(shift: u8, width: u8) -> Self {
        Self { shift, width }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(NativeType),
    Struct(Arc<StructLayout>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: &'static str,
    pub offset: usize,
    /// Size of one element in bytes.
    pub size: usize,
    /// Element count; 1 for plain members.
    pub count: usize,
    pub kind: FieldKind,
    pub bits: Option<BitRange>,
}

/// C layout of a struct, computed for the description's pointer width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructLayout {
    pub tag: &'static str,
    pub size: usize,
    pub align: usize,
    pub fields: Vec<FieldLayout>,
}

impl StructLayout {
    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Storage the wrapper allocates for an out-parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutSlot {
    Scalar(NativeType),
    Struct(Arc<StructLayout>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParam {
    pub param: Param,
    pub ty: NativeType,
    /// Present for `Out` and `InOut` parameters.
    pub slot: Option<OutSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFunction {
    pub descriptor: FunctionDescriptor,
    pub ret: NativeType,
    pub params: Vec<ResolvedParam>,
}

// ── Interface description ─────────────────────────────────────────────────────

/// The merged, conflict-free and fully resolved declaration set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescription {
    pointer_width: PointerWidth,
    types: BTreeMap<&'static str, NativeType>,
    structs: BTreeMap<&'static str, Arc<StructLayout>>,
    /// Every accepted struct name → (tag, is pointer name).
    struct_names: BTreeMap<&'static str, (&'static str, bool)>,
    functions: BTreeMap<&'static str, ResolvedFunction>,
    constants: BTreeMap<&'static str, i64>,
}

impl InterfaceDescription {
    pub fn pointer_width(&self) -> PointerWidth {
        self.pointer_width
    }

    pub fn function(&self, name: &str) -> Option<&ResolvedFunction> {
        self.functions.get(name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &ResolvedFunction> {
        self.functions.values()
    }

    /// Layout for a struct tag or any of its accepted names, pointer names
    /// included.
    pub fn struct_layout(&self, name: &str) -> Option<&Arc<StructLayout>> {
        let tag = self
            .struct_names
            .get(name)
            .map(|(tag, _)| *tag)
            .unwrap_or(name);
        self.structs.get(tag)
    }

    /// The names that share a layout with `name` (tag first).
    pub fn equivalent_names(&self, name: &str) -> Vec<&'static str> {
        let Some(layout) = self.struct_layout(name) else {
            return Vec::new();
        };
        std::iter::once(layout.tag)
            .chain(
                self.struct_names
                    .iter()
                    .filter(|(_, (tag, _))| *tag == layout.tag)
                    .map(|(name, _)| *name),
            )
            .collect()
    }

    /// Native type of a type alias or pointer struct name.
    pub fn type_of(&self, name: &str) -> Option<NativeType> {
        if let Some(ty) = self.types.get(name) {
            return Some(*ty);
        }
        match self.struct_names.get(name) {
            Some((_, true)) => Some(NativeType::Pointer),
            _ => None,
        }
    }

    pub fn constant(&self, name: &str) -> Option<i64> {
        self.constants.get(name).copied()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

// ── Merge ─────────────────────────────────────────────────────────────────────

/// One declared name and the shape it was declared with.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Decl {
    Type(TypeAlias),
    Struct(StructDescriptor),
    StructName { tag: &'static str, pointer: bool },
    Function(FunctionDescriptor),
    Constant(i64),
}

/// Fragments merged by name but not yet resolved.
#[derive(Default)]
struct Merged {
    names: HashMap<&'static str, (Decl, &'static str)>,
    types: Vec<TypeAlias>,
    structs: Vec<StructDescriptor>,
    functions: Vec<FunctionDescriptor>,
    constants: Vec<(&'static str, i64)>,
}

impl Merged {
    fn add(&mut self, fragment: &DeclarationFragment) -> Result<(), ConflictError> {
        for alias in fragment.types {
            if self.declare(alias.name, Decl::Type(*alias), fragment.name)? {
                self.types.push(*alias);
            }
        }
        for desc in fragment.structs {
            if self.declare(desc.tag, Decl::Struct(*desc), fragment.name)? {
                self.structs.push(*desc);
            }
            for name in desc.names {
                let decl = Decl::StructName {
                    tag: desc.tag,
                    pointer: name.pointer,
                };
                self.declare(name.name, decl, fragment.name)?;
            }
        }
        for function in fragment.functions {
            if self.declare(function.name, Decl::Function(*function), fragment.name)? {
                self.functions.push(*function);
            }
        }
        for constant in fragment.constants {
            if self.declare(constant.name, Decl::Constant(constant.value), fragment.name)? {
                self.constants.push((constant.name, constant.value));
            }
        }
        Ok(())
    }

    /// Record `name`.  Returns `false` for an identical redeclaration.
    fn declare(
        &mut self,
        name: &'static str,
        decl: Decl,
        fragment: &'static str,
    ) -> Result<bool, ConflictError> {
        match self.names.get(name) {
            Some((existing, _)) if *existing == decl => Ok(false),
            Some((_, first)) => Err(ConflictError {
                name: name.to_owned(),
                first: (*first).to_owned(),
                second: fragment.to_owned(),
            }),
            None => {
                self.names.insert(name, (decl, fragment));
                Ok(true)
            }
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Assemble `fragments` for the pointer width of the running process.
pub fn assemble(
    fragments: &[DeclarationFragment],
) -> Result<InterfaceDescription, AssemblyError> {
    assemble_for(fragments, PointerWidth::host())
}

/// Assemble `fragments`, resolving pointer-width types for `width`.
pub fn assemble_for(
    fragments: &[DeclarationFragment],
    width: PointerWidth,
) -> Result<InterfaceDescription, AssemblyError> {
    let mut merged = Merged::default();
    for fragment in fragments {
        log::trace!("merging fragment `{}` (revision {})", fragment.name, fragment.revision);
        merged.add(fragment)?;
    }

    let description = resolve::Resolver::new(&merged, width).resolve()?;
    log::debug!(
        "assembled {} fragments: {} types, {} structs, {} functions, {} constants",
        fragments.len(),
        description.types.len(),
        description.structs.len(),
        description.functions.len(),
        description.constants.len(),
    );
    Ok(description)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::decl::fragments::{BASE, CANONICAL, COMMUNICATIONS, ERRORS, PROCESSES};
    use crate::decl::{
        Convention, ErrorSource, Field, Module, Param, Sentinel, StructName, TypeAlias,
    };

    fn fragment(name: &'static str) -> DeclarationFragment {
        DeclarationFragment {
            name,
            revision: 1,
            ..DeclarationFragment::EMPTY
        }
    }

    #[test]
    fn canonical_fragments_assemble() {
        let iface = assemble(CANONICAL).expect("canonical set assembles");
        assert!(iface.function("OpenProcess").is_some());
        assert!(iface.function("WSAEventSelect").is_some());
        assert!(iface.function("handle_from_fd").is_some());
        assert!(iface.function("CreateToolhelp32Snapshot").is_some());
        assert!(iface.function("SetConsoleTextAttribute").is_some());
        assert_eq!(
            iface.function("MsgWaitForMultipleObjects").map(|f| f.descriptor.module),
            Some(Module::User32)
        );
        assert_eq!(iface.constant("PROCESS_QUERY_INFORMATION"), Some(0x0400));
        assert_eq!(iface.constant("ERROR_IO_PENDING"), Some(997));
        assert_eq!(iface.pointer_width(), PointerWidth::host());
    }

    #[test]
    fn merge_order_does_not_change_the_result() {
        let forward = assemble(CANONICAL).expect("forward");
        let reversed: Vec<_> = CANONICAL.iter().rev().copied().collect();
        let backward = assemble(&reversed).expect("reversed");
        assert_eq!(forward, backward);
    }

    #[test]
    fn identical_redeclaration_is_accepted() {
        let once = assemble(&[BASE]).expect("once");
        let twice = assemble(&[BASE, BASE]).expect("twice");
        assert_eq!(once, twice);
    }

    #[test]
    fn conflicting_redeclaration_fails_in_either_order() {
        const NARROW: &[TypeAlias] = &[TypeAlias::int("DWORD", 16, false)];
        let extra = DeclarationFragment {
            types: NARROW,
            ..fragment("narrow")
        };

        for set in [[BASE, extra], [extra, BASE]] {
            match assemble(&set) {
                Err(AssemblyError::Conflict(conflict)) => {
                    assert_eq!(conflict.name, "DWORD");
                    assert_eq!(conflict.first, set[0].name);
                    assert_eq!(conflict.second, set[1].name);
                }
                other => panic!("expected a conflict, got {other:?}"),
            }
        }
    }

    #[test]
    fn conflicting_struct_pointer_name_is_reported() {
        const OTHER: &[StructDescriptor] = &[StructDescriptor {
            tag: "_OTHER",
            fields: &[Field::new("value", "DWORD")],
            names: &[StructName::pointer("LPSECURITY_ATTRIBUTES")],
        }];
        let extra = DeclarationFragment {
            structs: OTHER,
            ..fragment("other")
        };
        let err = assemble(&[BASE, extra]).expect_err("pointer name reused");
        assert!(matches!(
            err,
            AssemblyError::Conflict(ConflictError { ref name, .. })
                if name == "LPSECURITY_ATTRIBUTES"
        ));
    }

    #[test]
    fn unresolved_alias_is_reported() {
        const TYPES: &[TypeAlias] = &[TypeAlias::alias("LPFOO", "FOO")];
        let foo = DeclarationFragment {
            types: TYPES,
            ..fragment("foo")
        };
        let err = assemble(&[foo]).expect_err("FOO is never defined");
        assert_eq!(
            err,
            AssemblyError::UnresolvedAlias(crate::error::UnresolvedAliasError {
                name: "FOO".into(),
                used_by: "LPFOO".into(),
            })
        );
    }

    #[test]
    fn alias_cycle_is_unresolved() {
        const TYPES: &[TypeAlias] = &[TypeAlias::alias("A", "B"), TypeAlias::alias("B", "A")];
        let cycle = DeclarationFragment {
            types: TYPES,
            ..fragment("cycle")
        };
        let err = assemble(&[cycle]).expect_err("cycle");
        assert!(matches!(err, AssemblyError::UnresolvedAlias(_)));
    }

    #[test]
    fn function_with_unknown_parameter_type_is_unresolved() {
        const FUNCTIONS: &[FunctionDescriptor] = &[FunctionDescriptor {
            name: "Frobnicate",
            module: Module::Kernel32,
            export: "Frobnicate",
            ret: "BOOL",
            params: &[Param::input("x", "LPFROB")],
            convention: Convention::NonZero,
        }];
        let extra = DeclarationFragment {
            functions: FUNCTIONS,
            ..fragment("frob")
        };
        let err = assemble(&[BASE, extra]).expect_err("LPFROB is missing");
        assert!(matches!(
            err,
            AssemblyError::UnresolvedAlias(ref e) if e.name == "LPFROB" && e.used_by == "Frobnicate"
        ));
    }

    #[test]
    fn partial_bit_field_group_is_invalid() {
        const STRUCTS: &[StructDescriptor] = &[StructDescriptor {
            tag: "_FLAGS",
            fields: &[
                Field::bits("a", "DWORD", 1),
                Field::bits("b", "DWORD", 2),
                Field::new("tail", "DWORD"),
            ],
            names: &[],
        }];
        let extra = DeclarationFragment {
            structs: STRUCTS,
            ..fragment("flags")
        };
        let err = assemble(&[BASE, extra]).expect_err("3 of 32 bits");
        assert!(matches!(
            err,
            AssemblyError::InvalidDeclaration { ref name, .. } if name == "_FLAGS"
        ));
    }

    #[test]
    fn overflowing_bit_field_group_is_invalid() {
        const STRUCTS: &[StructDescriptor] = &[StructDescriptor {
            tag: "_WIDE",
            fields: &[Field::bits("a", "DWORD", 31), Field::bits("b", "DWORD", 2)],
            names: &[],
        }];
        let extra = DeclarationFragment {
            structs: STRUCTS,
            ..fragment("wide")
        };
        assert!(matches!(
            assemble(&[BASE, extra]),
            Err(AssemblyError::InvalidDeclaration { .. })
        ));
    }

    #[test]
    fn comstat_bit_fields_pack_into_one_dword() {
        let iface = assemble(&[BASE, COMMUNICATIONS, ERRORS]).expect("assemble");
        let comstat = iface.struct_layout("COMSTAT").expect("COMSTAT");
        assert_eq!(comstat.size, 12);
        assert_eq!(comstat.align, 4);

        let txim = comstat.field("fTxim").expect("fTxim");
        assert_eq!((txim.offset, txim.bits), (0, Some(BitRange::new(6, 1))));
        let reserved = comstat.field("fReserved").expect("fReserved");
        assert_eq!(reserved.bits, Some(BitRange::new(7, 25)));
        assert_eq!(comstat.field("cbInQue").map(|f| f.offset), Some(4));
        assert_eq!(comstat.field("cbOutQue").map(|f| f.offset), Some(8));

        let events = iface.struct_layout("LPWSANETWORKEVENTS").expect("pointer name");
        assert_eq!(events.size, 44);
        let codes = events.field("iErrorCode").expect("iErrorCode");
        assert_eq!((codes.offset, codes.size, codes.count), (4, 4, 10));
    }

    #[test]
    fn struct_names_share_one_layout() {
        let iface = assemble(&[BASE]).expect("assemble");
        let by_tag = iface.struct_layout("_SECURITY_ATTRIBUTES").expect("tag");
        for name in ["SECURITY_ATTRIBUTES", "PSECURITY_ATTRIBUTES", "LPSECURITY_ATTRIBUTES"] {
            assert_eq!(iface.struct_layout(name), Some(by_tag), "{name}");
        }
        assert_eq!(iface.type_of("LPSECURITY_ATTRIBUTES"), Some(NativeType::Pointer));
        assert_eq!(iface.type_of("SECURITY_ATTRIBUTES"), None);
        assert_eq!(
            iface.equivalent_names("PSECURITY_ATTRIBUTES"),
            vec![
                "_SECURITY_ATTRIBUTES",
                "LPSECURITY_ATTRIBUTES",
                "PSECURITY_ATTRIBUTES",
                "SECURITY_ATTRIBUTES",
            ]
        );
    }

    #[test]
    fn pointer_width_types_follow_the_target() {
        let narrow = assemble_for(CANONICAL, PointerWidth::Bits32).expect("32-bit");
        let wide = assemble_for(CANONICAL, PointerWidth::Bits64).expect("64-bit");

        assert_eq!(narrow.type_of("SOCKET"), Some(NativeType::unsigned(32)));
        assert_eq!(wide.type_of("SOCKET"), Some(NativeType::unsigned(64)));
        assert_eq!(wide.type_of("WSAEVENT"), Some(NativeType::Pointer));

        assert_eq!(narrow.struct_layout("STARTUPINFOW").map(|l| l.size), Some(68));
        assert_eq!(wide.struct_layout("STARTUPINFOW").map(|l| l.size), Some(104));
        assert_eq!(wide.struct_layout("OVERLAPPED").map(|l| l.size), Some(32));
        assert_eq!(narrow.struct_layout("OVERLAPPED").map(|l| l.size), Some(20));
    }

    #[test]
    fn out_parameters_are_sized_from_their_pointee() {
        let iface = assemble(CANONICAL).expect("assemble");

        let pipe = iface.function("CreatePipe").expect("CreatePipe");
        assert_eq!(pipe.params[0].slot, Some(OutSlot::Scalar(NativeType::Pointer)));
        assert_eq!(pipe.params[2].slot, None);

        let comm = iface.function("ClearCommError").expect("ClearCommError");
        assert_eq!(comm.params[1].slot, Some(OutSlot::Scalar(NativeType::unsigned(32))));
        match &comm.params[2].slot {
            Some(OutSlot::Struct(layout)) => assert_eq!(layout.tag, "_COMSTAT"),
            other => panic!("expected a struct slot, got {other:?}"),
        }

        let create = iface.function("CreateProcess").expect("CreateProcess");
        assert_eq!(create.params.len(), 10);
        assert!(matches!(create.params[9].slot, Some(OutSlot::Struct(_))));
    }

    #[test]
    fn void_return_cannot_signal_failure() {
        const FUNCTIONS: &[FunctionDescriptor] = &[FunctionDescriptor {
            name: "Nothing",
            module: Module::Kernel32,
            export: "Nothing",
            ret: "VOID",
            params: &[],
            convention: Convention::NonZero,
        }];
        let extra = DeclarationFragment {
            functions: FUNCTIONS,
            ..fragment("nothing")
        };
        assert!(matches!(
            assemble(&[BASE, extra]),
            Err(AssemblyError::InvalidDeclaration { ref name, .. }) if name == "Nothing"
        ));
    }

    #[test]
    fn error_source_must_be_declared() {
        const FUNCTIONS: &[FunctionDescriptor] = &[FunctionDescriptor {
            name: "SockThing",
            module: Module::Ws2_32,
            export: "SockThing",
            ret: "INT",
            params: &[],
            convention: Convention::FailsOn(
                Sentinel::Value(-1),
                ErrorSource::Function("WSAGetLastError"),
            ),
        }];
        let extra = DeclarationFragment {
            functions: FUNCTIONS,
            ..fragment("sock")
        };
        let err = assemble(&[BASE, extra]).expect_err("no WSAGetLastError");
        assert!(matches!(
            err,
            AssemblyError::UnresolvedAlias(ref e) if e.name == "WSAGetLastError"
        ));
        assemble(&[BASE, COMMUNICATIONS, extra]).expect("declared alongside");
    }

    #[test]
    fn struct_by_value_parameter_is_invalid() {
        const FUNCTIONS: &[FunctionDescriptor] = &[FunctionDescriptor {
            name: "TakesStruct",
            module: Module::Kernel32,
            export: "TakesStruct",
            ret: "BOOL",
            params: &[Param::input("info", "PROCESS_INFORMATION")],
            convention: Convention::NonZero,
        }];
        let extra = DeclarationFragment {
            functions: FUNCTIONS,
            ..fragment("by-value")
        };
        assert!(matches!(
            assemble(&[BASE, PROCESSES, extra]),
            Err(AssemblyError::InvalidDeclaration { .. })
        ));
    }

    #[test]
    fn console_buffer_info_nests_structs_by_value() {
        let iface = assemble(CANONICAL).expect("assemble");
        let info = iface
            .struct_layout("PCONSOLE_SCREEN_BUFFER_INFO")
            .expect("CONSOLE_SCREEN_BUFFER_INFO");
        assert_eq!((info.size, info.align), (22, 2));

        let window = info.field("srWindow").expect("srWindow");
        assert_eq!(window.offset, 10);
        match &window.kind {
            FieldKind::Struct(rect) => {
                assert_eq!(rect.tag, "_SMALL_RECT");
                assert_eq!(rect.size, 8);
                assert_eq!(rect.field("Bottom").map(|f| f.offset), Some(6));
            }
            other => panic!("expected a nested struct, got {other:?}"),
        }
        assert_eq!(info.field("dwMaximumWindowSize").map(|f| f.offset), Some(18));

        let get = iface
            .function("GetConsoleScreenBufferInfo")
            .expect("GetConsoleScreenBufferInfo");
        assert!(matches!(
            get.params[1].slot,
            Some(OutSlot::Struct(ref layout)) if layout.tag == "_CONSOLE_SCREEN_BUFFER_INFO"
        ));
    }

    #[test]
    fn out_parameter_must_point_at_sized_data() {
        const FUNCTIONS: &[FunctionDescriptor] = &[FunctionDescriptor {
            name: "FillAnything",
            module: Module::Kernel32,
            export: "FillAnything",
            ret: "BOOL",
            params: &[Param::out("p", "LPVOID")],
            convention: Convention::NonZero,
        }];
        let extra = DeclarationFragment {
            functions: FUNCTIONS,
            ..fragment("opaque-out")
        };
        match assemble(&[BASE, extra]) {
            Err(AssemblyError::InvalidDeclaration { name, reason }) => {
                assert_eq!(name, "FillAnything");
                assert!(reason.contains("not a pointer to a sized type"), "{reason}");
            }
            other => panic!("expected an invalid declaration, got {other:?}"),
        }
    }

    const QUAD: &[TypeAlias] = &[TypeAlias::int("ULONGLONG", 64, false)];

    #[test]
    fn parameter_wider_than_a_pointer_is_invalid() {
        const FUNCTIONS: &[FunctionDescriptor] = &[FunctionDescriptor {
            name: "TakesQuad",
            module: Module::Kernel32,
            export: "TakesQuad",
            ret: "BOOL",
            params: &[Param::input("value", "ULONGLONG")],
            convention: Convention::NonZero,
        }];
        let extra = DeclarationFragment {
            types: QUAD,
            functions: FUNCTIONS,
            ..fragment("quad-param")
        };

        assemble_for(&[BASE, extra], PointerWidth::Bits64).expect("fits a 64-bit slot");
        match assemble_for(&[BASE, extra], PointerWidth::Bits32) {
            Err(AssemblyError::InvalidDeclaration { name, reason }) => {
                assert_eq!(name, "TakesQuad");
                assert!(reason.contains("wider than a pointer"), "{reason}");
            }
            other => panic!("expected an invalid declaration, got {other:?}"),
        }
    }

    #[test]
    fn return_wider_than_a_pointer_is_invalid() {
        const FUNCTIONS: &[FunctionDescriptor] = &[FunctionDescriptor {
            name: "GetQuad",
            module: Module::Kernel32,
            export: "GetQuad",
            ret: "ULONGLONG",
            params: &[],
            convention: Convention::Infallible,
        }];
        let extra = DeclarationFragment {
            types: QUAD,
            functions: FUNCTIONS,
            ..fragment("quad-return")
        };

        assemble_for(&[BASE, extra], PointerWidth::Bits64).expect("fits a 64-bit register");
        match assemble_for(&[BASE, extra], PointerWidth::Bits32) {
            Err(AssemblyError::InvalidDeclaration { name, reason }) => {
                assert_eq!(name, "GetQuad");
                assert!(reason.contains("wider than a pointer"), "{reason}");
            }
            other => panic!("expected an invalid declaration, got {other:?}"),
        }
    }
}
