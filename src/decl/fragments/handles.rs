// Generic handle operations and waits.

use crate::decl::{
    Constant, Convention, DeclarationFragment, ErrorSource, FunctionDescriptor, Module, Param,
    Sentinel,
};

const WAIT_FAILED: i64 = 0xFFFF_FFFF;
const INVALID_HANDLE_VALUE: i64 = -1;

pub const HANDLES: DeclarationFragment = DeclarationFragment {
    name: "handles",
    revision: 3,
    functions: &[
        FunctionDescriptor {
            name: "CloseHandle",
            module: Module::Kernel32,
            export: "CloseHandle",
            ret: "BOOL",
            params: &[Param::input("hObject", "HANDLE")],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "GetStdHandle",
            module: Module::Kernel32,
            export: "GetStdHandle",
            ret: "HANDLE",
            params: &[Param::input("nStdHandle", "DWORD")],
            convention: Convention::FailsOn(
                Sentinel::Value(INVALID_HANDLE_VALUE),
                ErrorSource::LastError,
            ),
        },
        FunctionDescriptor {
            name: "WaitForSingleObject",
            module: Module::Kernel32,
            export: "WaitForSingleObject",
            ret: "DWORD",
            params: &[
                Param::input("hHandle", "HANDLE"),
                Param::input("dwMilliseconds", "DWORD"),
            ],
            convention: Convention::FailsOn(Sentinel::Value(WAIT_FAILED), ErrorSource::LastError),
        },
        FunctionDescriptor {
            name: "GetHandleInformation",
            module: Module::Kernel32,
            export: "GetHandleInformation",
            ret: "BOOL",
            params: &[
                Param::input("hObject", "HANDLE"),
                Param::out("lpdwFlags", "LPDWORD"),
            ],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "SetHandleInformation",
            module: Module::Kernel32,
            export: "SetHandleInformation",
            ret: "BOOL",
            params: &[
                Param::input("hObject", "HANDLE"),
                Param::input("dwMask", "DWORD"),
                Param::input("dwFlags", "DWORD"),
            ],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "DuplicateHandle",
            module: Module::Kernel32,
            export: "DuplicateHandle",
            ret: "BOOL",
            params: &[
                Param::input("hSourceProcessHandle", "HANDLE"),
                Param::input("hSourceHandle", "HANDLE"),
                Param::input("hTargetProcessHandle", "HANDLE"),
                Param::out("lpTargetHandle", "LPHANDLE"),
                Param::input("dwDesiredAccess", "DWORD"),
                Param::input("bInheritHandle", "BOOL"),
                Param::input("dwOptions", "DWORD"),
            ],
            convention: Convention::NonZero,
        },
    ],
    constants: &[
        Constant::new("INVALID_HANDLE_VALUE", INVALID_HANDLE_VALUE),
        Constant::new("STD_INPUT_HANDLE", -10),
        Constant::new("STD_OUTPUT_HANDLE", -11),
        Constant::new("STD_ERROR_HANDLE", -12),
        Constant::new("WAIT_OBJECT_0", 0),
        Constant::new("WAIT_ABANDONED", 0x80),
        Constant::new("WAIT_TIMEOUT", 0x102),
        Constant::new("WAIT_FAILED", WAIT_FAILED),
        Constant::new("INFINITE", 0xFFFF_FFFF),
        Constant::new("HANDLE_FLAG_INHERIT", 0x1),
        Constant::new("HANDLE_FLAG_PROTECT_FROM_CLOSE", 0x2),
        Constant::new("DUPLICATE_CLOSE_SOURCE", 0x1),
        Constant::new("DUPLICATE_SAME_ACCESS", 0x2),
    ],
    ..DeclarationFragment::EMPTY
};
