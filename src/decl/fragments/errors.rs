// Last-error accessors and the error codes callers match on.

use crate::decl::{
    Constant, Convention, DeclarationFragment, FunctionDescriptor, Module, Param,
};

pub const ERROR_IO_PENDING: u32 = 997;

pub const ERRORS: DeclarationFragment = DeclarationFragment {
    name: "errors",
    revision: 1,
    functions: &[
        FunctionDescriptor {
            name: "GetLastError",
            module: Module::Kernel32,
            export: "GetLastError",
            ret: "DWORD",
            params: &[],
            convention: Convention::Infallible,
        },
        FunctionDescriptor {
            name: "SetLastError",
            module: Module::Kernel32,
            export: "SetLastError",
            ret: "VOID",
            params: &[Param::input("dwErrCode", "DWORD")],
            convention: Convention::Infallible,
        },
    ],
    constants: &[
        Constant::new("ERROR_SUCCESS", 0),
        Constant::new("ERROR_FILE_NOT_FOUND", 2),
        Constant::new("ERROR_ACCESS_DENIED", 5),
        Constant::new("ERROR_INVALID_HANDLE", 6),
        Constant::new("ERROR_INVALID_PARAMETER", 87),
        Constant::new("ERROR_BROKEN_PIPE", 109),
        Constant::new("ERROR_ALREADY_EXISTS", 183),
        Constant::new("ERROR_IO_INCOMPLETE", 996),
        Constant::new("ERROR_IO_PENDING", ERROR_IO_PENDING as i64),
        Constant::new("WSAENOTSOCK", 10038),
        Constant::new("WSANOTINITIALISED", 10093),
    ],
    ..DeclarationFragment::EMPTY
};
