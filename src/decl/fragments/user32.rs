// user32 waits that also wake on window-message input.

use crate::decl::{
    Constant, Convention, DeclarationFragment, ErrorSource, FunctionDescriptor, Module, Param,
    Sentinel,
};

const WAIT_FAILED: i64 = 0xFFFF_FFFF;

pub const USER32: DeclarationFragment = DeclarationFragment {
    name: "user32",
    revision: 1,
    functions: &[FunctionDescriptor {
        name: "MsgWaitForMultipleObjects",
        module: Module::User32,
        export: "MsgWaitForMultipleObjects",
        ret: "DWORD",
        params: &[
            Param::input("nCount", "DWORD"),
            // `const HANDLE *`; the caller passes the array by reference.
            Param::input("pHandles", "LPHANDLE"),
            Param::input("bWaitAll", "BOOL"),
            Param::input("dwMilliseconds", "DWORD"),
            Param::input("dwWakeMask", "DWORD"),
        ],
        convention: Convention::FailsOn(Sentinel::Value(WAIT_FAILED), ErrorSource::LastError),
    }],
    constants: &[
        Constant::new("QS_KEY", 0x0001),
        Constant::new("QS_MOUSEMOVE", 0x0002),
        Constant::new("QS_MOUSEBUTTON", 0x0004),
        Constant::new("QS_POSTMESSAGE", 0x0008),
        Constant::new("QS_TIMER", 0x0010),
        Constant::new("QS_PAINT", 0x0020),
        Constant::new("QS_SENDMESSAGE", 0x0040),
        Constant::new("QS_HOTKEY", 0x0080),
        Constant::new("QS_ALLPOSTMESSAGE", 0x0100),
        Constant::new("QS_RAWINPUT", 0x0400),
        Constant::new("QS_ALLINPUT", 0x04FF),
    ],
    ..DeclarationFragment::EMPTY
};
