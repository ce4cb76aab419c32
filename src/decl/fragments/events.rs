// Kernel event objects.

use crate::decl::{Constant, Convention, DeclarationFragment, FunctionDescriptor, Module, Param};

pub const EVENTS: DeclarationFragment = DeclarationFragment {
    name: "events",
    revision: 2,
    functions: &[
        FunctionDescriptor {
            name: "CreateEvent",
            module: Module::Kernel32,
            export: "CreateEventW",
            ret: "HANDLE",
            params: &[
                Param::optional("lpEventAttributes", "LPSECURITY_ATTRIBUTES"),
                Param::input("bManualReset", "BOOL"),
                Param::input("bInitialState", "BOOL"),
                Param::optional("lpName", "LPCWSTR"),
            ],
            // An existing named event is returned with ERROR_ALREADY_EXISTS set;
            // the handle is still valid so only NULL is a failure.
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "OpenEvent",
            module: Module::Kernel32,
            export: "OpenEventW",
            ret: "HANDLE",
            params: &[
                Param::input("dwDesiredAccess", "DWORD"),
                Param::input("bInheritHandle", "BOOL"),
                Param::input("lpName", "LPCWSTR"),
            ],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "SetEvent",
            module: Module::Kernel32,
            export: "SetEvent",
            ret: "BOOL",
            params: &[Param::input("hEvent", "HANDLE")],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "ResetEvent",
            module: Module::Kernel32,
            export: "ResetEvent",
            ret: "BOOL",
            params: &[Param::input("hEvent", "HANDLE")],
            convention: Convention::NonZero,
        },
    ],
    constants: &[
        Constant::new("EVENT_MODIFY_STATE", 0x0002),
        Constant::new("EVENT_ALL_ACCESS", 0x001F_0003),
    ],
    ..DeclarationFragment::EMPTY
};
