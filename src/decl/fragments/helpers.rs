// Routines compiled into the crate rather than exported by a system module.

use crate::decl::{Convention, DeclarationFragment, FunctionDescriptor, Module, Param};

pub const HELPERS: DeclarationFragment = DeclarationFragment {
    name: "helpers",
    revision: 2,
    functions: &[
        FunctionDescriptor {
            name: "handle_from_fd",
            module: Module::Helpers,
            export: "handle_from_fd",
            ret: "HANDLE",
            params: &[Param::input("fd", "INT")],
            convention: Convention::Infallible,
        },
        FunctionDescriptor {
            name: "socket_from_fd",
            module: Module::Helpers,
            export: "socket_from_fd",
            ret: "SOCKET",
            params: &[Param::input("fd", "INT")],
            convention: Convention::Infallible,
        },
        FunctionDescriptor {
            name: "wsa_invalid_event",
            module: Module::Helpers,
            export: "wsa_invalid_event",
            ret: "BOOL",
            params: &[Param::input("event", "WSAEVENT")],
            convention: Convention::Infallible,
        },
    ],
    ..DeclarationFragment::EMPTY
};
