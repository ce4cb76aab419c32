// Console screen buffers and character attributes.

use crate::decl::{
    Constant, Convention, DeclarationFragment, ErrorSource, Field, FunctionDescriptor, Module,
    Param, Sentinel, StructDescriptor, StructName, TypeAlias,
};

const INVALID_HANDLE_VALUE: i64 = -1;

pub const CONSOLE: DeclarationFragment = DeclarationFragment {
    name: "console",
    revision: 1,
    types: &[TypeAlias::int("SHORT", 16, true)],
    structs: &[
        // https://learn.microsoft.com/windows/console/coord-str
        StructDescriptor {
            tag: "_COORD",
            fields: &[Field::new("X", "SHORT"), Field::new("Y", "SHORT")],
            names: &[StructName::value("COORD"), StructName::pointer("PCOORD")],
        },
        StructDescriptor {
            tag: "_SMALL_RECT",
            fields: &[
                Field::new("Left", "SHORT"),
                Field::new("Top", "SHORT"),
                Field::new("Right", "SHORT"),
                Field::new("Bottom", "SHORT"),
            ],
            names: &[
                StructName::value("SMALL_RECT"),
                StructName::pointer("PSMALL_RECT"),
            ],
        },
        // https://learn.microsoft.com/windows/console/console-screen-buffer-info-str
        StructDescriptor {
            tag: "_CONSOLE_SCREEN_BUFFER_INFO",
            fields: &[
                Field::new("dwSize", "COORD"),
                Field::new("dwCursorPosition", "COORD"),
                Field::new("wAttributes", "WORD"),
                Field::new("srWindow", "SMALL_RECT"),
                Field::new("dwMaximumWindowSize", "COORD"),
            ],
            names: &[
                StructName::value("CONSOLE_SCREEN_BUFFER_INFO"),
                StructName::pointer("PCONSOLE_SCREEN_BUFFER_INFO"),
            ],
        },
    ],
    functions: &[
        FunctionDescriptor {
            name: "CreateConsoleScreenBuffer",
            module: Module::Kernel32,
            export: "CreateConsoleScreenBuffer",
            ret: "HANDLE",
            params: &[
                Param::input("dwDesiredAccess", "DWORD"),
                Param::input("dwShareMode", "DWORD"),
                Param::optional("lpSecurityAttributes", "LPSECURITY_ATTRIBUTES"),
                Param::input("dwFlags", "DWORD"),
                // Reserved; must be null.
                Param::optional("lpScreenBufferData", "LPVOID"),
            ],
            convention: Convention::FailsOn(
                Sentinel::Value(INVALID_HANDLE_VALUE),
                ErrorSource::LastError,
            ),
        },
        FunctionDescriptor {
            name: "GetConsoleScreenBufferInfo",
            module: Module::Kernel32,
            export: "GetConsoleScreenBufferInfo",
            ret: "BOOL",
            params: &[
                Param::input("hConsoleOutput", "HANDLE"),
                Param::out("lpConsoleScreenBufferInfo", "PCONSOLE_SCREEN_BUFFER_INFO"),
            ],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "SetConsoleTextAttribute",
            module: Module::Kernel32,
            export: "SetConsoleTextAttribute",
            ret: "BOOL",
            params: &[
                Param::input("hConsoleOutput", "HANDLE"),
                Param::input("wAttributes", "WORD"),
            ],
            convention: Convention::NonZero,
        },
    ],
    constants: &[
        Constant::new("CONSOLE_TEXTMODE_BUFFER", 1),
        Constant::new("FOREGROUND_BLUE", 0x0001),
        Constant::new("FOREGROUND_GREEN", 0x0002),
        Constant::new("FOREGROUND_RED", 0x0004),
        Constant::new("FOREGROUND_INTENSITY", 0x0008),
        Constant::new("BACKGROUND_BLUE", 0x0010),
        Constant::new("BACKGROUND_GREEN", 0x0020),
        Constant::new("BACKGROUND_RED", 0x0040),
        Constant::new("BACKGROUND_INTENSITY", 0x0080),
    ],
};
