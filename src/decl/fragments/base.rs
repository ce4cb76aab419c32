// Base Windows types plus the layouts shared by several subsystems.

use crate::decl::{DeclarationFragment, Field, Repr, StructDescriptor, StructName, TypeAlias};

pub const BASE: DeclarationFragment = DeclarationFragment {
    name: "base",
    revision: 2,
    types: &[
        TypeAlias {
            name: "VOID",
            repr: Repr::Void,
        },
        TypeAlias::int("BYTE", 8, false),
        TypeAlias::int("WORD", 16, false),
        TypeAlias::int("DWORD", 32, false),
        TypeAlias::int("BOOL", 32, true),
        TypeAlias::int("INT", 32, true),
        TypeAlias::int("LONG", 32, true),
        TypeAlias::int("UINT", 32, false),
        TypeAlias::alias("ULONG", "DWORD"),
        TypeAlias::pointer_width("ULONG_PTR", false),
        TypeAlias::alias("SIZE_T", "ULONG_PTR"),
        TypeAlias::pointer("HANDLE"),
        TypeAlias::pointer("LPVOID"),
        TypeAlias::alias("PVOID", "LPVOID"),
        TypeAlias::pointer("LPCVOID"),
        TypeAlias::pointer_to("LPBYTE", "BYTE"),
        TypeAlias::pointer_to("LPDWORD", "DWORD"),
        TypeAlias::pointer_to("PHANDLE", "HANDLE"),
        TypeAlias::alias("LPHANDLE", "PHANDLE"),
        TypeAlias::pointer("LPWSTR"),
        TypeAlias::pointer("LPCWSTR"),
        // winsock2.h: UINT_PTR, so 32 or 64 bits depending on the target.
        TypeAlias::pointer_width("SOCKET", false),
        TypeAlias::alias("WSAEVENT", "HANDLE"),
    ],
    structs: &[
        // https://learn.microsoft.com/windows/win32/api/wtypesbase/ns-wtypesbase-security_attributes
        StructDescriptor {
            tag: "_SECURITY_ATTRIBUTES",
            fields: &[
                Field::new("nLength", "DWORD"),
                Field::new("lpSecurityDescriptor", "LPVOID"),
                Field::new("bInheritHandle", "BOOL"),
            ],
            names: &[
                StructName::value("SECURITY_ATTRIBUTES"),
                StructName::pointer("PSECURITY_ATTRIBUTES"),
                StructName::pointer("LPSECURITY_ATTRIBUTES"),
            ],
        },
    ],
    ..DeclarationFragment::EMPTY
};
