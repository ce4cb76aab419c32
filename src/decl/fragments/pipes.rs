// Anonymous and named pipe primitives.

use crate::decl::{Constant, Convention, DeclarationFragment, FunctionDescriptor, Module, Param};

pub const PIPES: DeclarationFragment = DeclarationFragment {
    name: "pipes",
    revision: 2,
    functions: &[
        FunctionDescriptor {
            name: "CreatePipe",
            module: Module::Kernel32,
            export: "CreatePipe",
            ret: "BOOL",
            params: &[
                Param::out("hReadPipe", "PHANDLE"),
                Param::out("hWritePipe", "PHANDLE"),
                Param::optional("lpPipeAttributes", "LPSECURITY_ATTRIBUTES"),
                Param::input("nSize", "DWORD"),
            ],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "SetNamedPipeHandleState",
            module: Module::Kernel32,
            export: "SetNamedPipeHandleState",
            ret: "BOOL",
            params: &[
                Param::input("hNamedPipe", "HANDLE"),
                Param::optional("lpMode", "LPDWORD"),
                Param::optional("lpMaxCollectionCount", "LPDWORD"),
                Param::optional("lpCollectDataTimeout", "LPDWORD"),
            ],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "PeekNamedPipe",
            module: Module::Kernel32,
            export: "PeekNamedPipe",
            ret: "BOOL",
            params: &[
                Param::input("hNamedPipe", "HANDLE"),
                Param::optional("lpBuffer", "LPVOID"),
                Param::input("nBufferSize", "DWORD"),
                Param::out("lpBytesRead", "LPDWORD"),
                Param::out("lpTotalBytesAvail", "LPDWORD"),
                Param::out("lpBytesLeftThisMessage", "LPDWORD"),
            ],
            convention: Convention::NonZero,
        },
    ],
    constants: &[
        Constant::new("PIPE_WAIT", 0x0),
        Constant::new("PIPE_NOWAIT", 0x1),
        Constant::new("PIPE_READMODE_BYTE", 0x0),
        Constant::new("PIPE_READMODE_MESSAGE", 0x2),
    ],
    ..DeclarationFragment::EMPTY
};
