// Process creation, inspection and termination.

use crate::decl::{
    Constant, Convention, DeclarationFragment, ErrorSource, Field, FunctionDescriptor, Module,
    Param, Sentinel, StructDescriptor, StructName,
};

const INVALID_HANDLE_VALUE: i64 = -1;

pub const PROCESSES: DeclarationFragment = DeclarationFragment {
    name: "processes",
    revision: 5,
    structs: &[
        // https://learn.microsoft.com/windows/win32/api/processthreadsapi/ns-processthreadsapi-startupinfow
        StructDescriptor {
            tag: "_STARTUPINFOW",
            fields: &[
                Field::new("cb", "DWORD"),
                Field::new("lpReserved", "LPWSTR"),
                Field::new("lpDesktop", "LPWSTR"),
                Field::new("lpTitle", "LPWSTR"),
                Field::new("dwX", "DWORD"),
                Field::new("dwY", "DWORD"),
                Field::new("dwXSize", "DWORD"),
                Field::new("dwYSize", "DWORD"),
                Field::new("dwXCountChars", "DWORD"),
                Field::new("dwYCountChars", "DWORD"),
                Field::new("dwFillAttribute", "DWORD"),
                Field::new("dwFlags", "DWORD"),
                Field::new("wShowWindow", "WORD"),
                Field::new("cbReserved2", "WORD"),
                Field::new("lpReserved2", "LPBYTE"),
                Field::new("hStdInput", "HANDLE"),
                Field::new("hStdOutput", "HANDLE"),
                Field::new("hStdError", "HANDLE"),
            ],
            names: &[
                StructName::value("STARTUPINFOW"),
                StructName::value("STARTUPINFO"),
                StructName::pointer("LPSTARTUPINFOW"),
                StructName::pointer("LPSTARTUPINFO"),
            ],
        },
        StructDescriptor {
            tag: "_PROCESS_INFORMATION",
            fields: &[
                Field::new("hProcess", "HANDLE"),
                Field::new("hThread", "HANDLE"),
                Field::new("dwProcessId", "DWORD"),
                Field::new("dwThreadId", "DWORD"),
            ],
            names: &[
                StructName::value("PROCESS_INFORMATION"),
                StructName::pointer("PPROCESS_INFORMATION"),
                StructName::pointer("LPPROCESS_INFORMATION"),
            ],
        },
    ],
    functions: &[
        FunctionDescriptor {
            name: "OpenProcess",
            module: Module::Kernel32,
            export: "OpenProcess",
            ret: "HANDLE",
            params: &[
                Param::input("dwDesiredAccess", "DWORD"),
                Param::input("bInheritHandle", "BOOL"),
                Param::input("dwProcessId", "DWORD"),
            ],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "GetCurrentProcess",
            module: Module::Kernel32,
            export: "GetCurrentProcess",
            ret: "HANDLE",
            params: &[],
            // Pseudo handle (-1); never fails and must not be closed.
            convention: Convention::Infallible,
        },
        FunctionDescriptor {
            name: "GetCurrentProcessId",
            module: Module::Kernel32,
            export: "GetCurrentProcessId",
            ret: "DWORD",
            params: &[],
            convention: Convention::Infallible,
        },
        FunctionDescriptor {
            name: "GetProcessId",
            module: Module::Kernel32,
            export: "GetProcessId",
            ret: "DWORD",
            params: &[Param::input("Process", "HANDLE")],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "GetExitCodeProcess",
            module: Module::Kernel32,
            export: "GetExitCodeProcess",
            ret: "BOOL",
            params: &[
                Param::input("hProcess", "HANDLE"),
                Param::out("lpExitCode", "LPDWORD"),
            ],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "TerminateProcess",
            module: Module::Kernel32,
            export: "TerminateProcess",
            ret: "BOOL",
            params: &[
                Param::input("hProcess", "HANDLE"),
                Param::input("uExitCode", "UINT"),
            ],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "CreateProcess",
            module: Module::Kernel32,
            export: "CreateProcessW",
            ret: "BOOL",
            params: &[
                Param::optional("lpApplicationName", "LPCWSTR"),
                Param::optional("lpCommandLine", "LPWSTR"),
                Param::optional("lpProcessAttributes", "LPSECURITY_ATTRIBUTES"),
                Param::optional("lpThreadAttributes", "LPSECURITY_ATTRIBUTES"),
                Param::input("bInheritHandles", "BOOL"),
                Param::input("dwCreationFlags", "DWORD"),
                Param::optional("lpEnvironment", "LPVOID"),
                Param::optional("lpCurrentDirectory", "LPCWSTR"),
                Param::input("lpStartupInfo", "LPSTARTUPINFOW"),
                Param::out("lpProcessInformation", "LPPROCESS_INFORMATION"),
            ],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "CreateToolhelp32Snapshot",
            module: Module::Kernel32,
            export: "CreateToolhelp32Snapshot",
            ret: "HANDLE",
            params: &[
                Param::input("dwFlags", "DWORD"),
                Param::input("th32ProcessID", "DWORD"),
            ],
            convention: Convention::FailsOn(
                Sentinel::Value(INVALID_HANDLE_VALUE),
                ErrorSource::LastError,
            ),
        },
    ],
    constants: &[
        Constant::new("PROCESS_TERMINATE", 0x0001),
        Constant::new("PROCESS_QUERY_INFORMATION", 0x0400),
        Constant::new("PROCESS_QUERY_LIMITED_INFORMATION", 0x1000),
        Constant::new("SYNCHRONIZE", 0x0010_0000),
        Constant::new("STILL_ACTIVE", 259),
        Constant::new("CREATE_NO_WINDOW", 0x0800_0000),
        Constant::new("CREATE_UNICODE_ENVIRONMENT", 0x0000_0400),
        Constant::new("STARTF_USESTDHANDLES", 0x0000_0100),
        Constant::new("STARTF_UNTRUSTEDSOURCE", 0x0000_8000),
        Constant::new("TH32CS_SNAPHEAPLIST", 0x0000_0001),
        Constant::new("TH32CS_SNAPPROCESS", 0x0000_0002),
        Constant::new("TH32CS_SNAPTHREAD", 0x0000_0004),
        Constant::new("TH32CS_SNAPMODULE", 0x0000_0008),
        Constant::new("TH32CS_SNAPMODULE32", 0x0000_0010),
        Constant::new("TH32CS_INHERIT", 0x8000_0000),
    ],
    ..DeclarationFragment::EMPTY
};
