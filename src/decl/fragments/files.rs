// File creation and synchronous/overlapped I/O.

use super::errors::ERROR_IO_PENDING;
use crate::decl::{
    Constant, Convention, DeclarationFragment, ErrorSource, Field, FunctionDescriptor, Module,
    Param, Sentinel, StructDescriptor, StructName,
};

pub const FILES: DeclarationFragment = DeclarationFragment {
    name: "files",
    revision: 5,
    structs: &[
        // https://learn.microsoft.com/windows/win32/api/minwinbase/ns-minwinbase-overlapped
        // The Offset/OffsetHigh vs. Pointer union is declared by its struct arm;
        // both arms occupy the same pointer-aligned slot.
        StructDescriptor {
            tag: "_OVERLAPPED",
            fields: &[
                Field::new("Internal", "ULONG_PTR"),
                Field::new("InternalHigh", "ULONG_PTR"),
                Field::new("Offset", "DWORD"),
                Field::new("OffsetHigh", "DWORD"),
                Field::new("hEvent", "HANDLE"),
            ],
            names: &[
                StructName::value("OVERLAPPED"),
                StructName::pointer("LPOVERLAPPED"),
            ],
        },
        StructDescriptor {
            tag: "_FILETIME",
            fields: &[
                Field::new("dwLowDateTime", "DWORD"),
                Field::new("dwHighDateTime", "DWORD"),
            ],
            names: &[
                StructName::value("FILETIME"),
                StructName::pointer("PFILETIME"),
                StructName::pointer("LPFILETIME"),
            ],
        },
        StructDescriptor {
            tag: "_BY_HANDLE_FILE_INFORMATION",
            fields: &[
                Field::new("dwFileAttributes", "DWORD"),
                Field::new("ftCreationTime", "FILETIME"),
                Field::new("ftLastAccessTime", "FILETIME"),
                Field::new("ftLastWriteTime", "FILETIME"),
                Field::new("dwVolumeSerialNumber", "DWORD"),
                Field::new("nFileSizeHigh", "DWORD"),
                Field::new("nFileSizeLow", "DWORD"),
                Field::new("nNumberOfLinks", "DWORD"),
                Field::new("nFileIndexHigh", "DWORD"),
                Field::new("nFileIndexLow", "DWORD"),
            ],
            names: &[
                StructName::value("BY_HANDLE_FILE_INFORMATION"),
                StructName::pointer("PBY_HANDLE_FILE_INFORMATION"),
                StructName::pointer("LPBY_HANDLE_FILE_INFORMATION"),
            ],
        },
    ],
    functions: &[
        FunctionDescriptor {
            name: "CreateFile",
            module: Module::Kernel32,
            export: "CreateFileW",
            ret: "HANDLE",
            params: &[
                Param::input("lpFileName", "LPCWSTR"),
                Param::input("dwDesiredAccess", "DWORD"),
                Param::input("dwShareMode", "DWORD"),
                Param::optional("lpSecurityAttributes", "LPSECURITY_ATTRIBUTES"),
                Param::input("dwCreationDisposition", "DWORD"),
                Param::input("dwFlagsAndAttributes", "DWORD"),
                Param::optional("hTemplateFile", "HANDLE"),
            ],
            convention: Convention::FailsOn(Sentinel::Value(-1), ErrorSource::LastError),
        },
        FunctionDescriptor {
            name: "ReadFile",
            module: Module::Kernel32,
            export: "ReadFile",
            ret: "BOOL",
            params: &[
                Param::input("hFile", "HANDLE"),
                Param::input("lpBuffer", "LPVOID"),
                Param::input("nNumberOfBytesToRead", "DWORD"),
                Param::out("lpNumberOfBytesRead", "LPDWORD"),
                Param::optional("lpOverlapped", "LPOVERLAPPED"),
            ],
            convention: Convention::NonZeroOr(&[ERROR_IO_PENDING]),
        },
        FunctionDescriptor {
            name: "WriteFile",
            module: Module::Kernel32,
            export: "WriteFile",
            ret: "BOOL",
            params: &[
                Param::input("hFile", "HANDLE"),
                Param::input("lpBuffer", "LPCVOID"),
                Param::input("nNumberOfBytesToWrite", "DWORD"),
                Param::out("lpNumberOfBytesWritten", "LPDWORD"),
                Param::optional("lpOverlapped", "LPOVERLAPPED"),
            ],
            convention: Convention::NonZeroOr(&[ERROR_IO_PENDING]),
        },
        FunctionDescriptor {
            name: "FlushFileBuffers",
            module: Module::Kernel32,
            export: "FlushFileBuffers",
            ret: "BOOL",
            params: &[Param::input("hFile", "HANDLE")],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "MoveFileEx",
            module: Module::Kernel32,
            export: "MoveFileExW",
            ret: "BOOL",
            params: &[
                Param::input("lpExistingFileName", "LPCWSTR"),
                Param::optional("lpNewFileName", "LPCWSTR"),
                Param::input("dwFlags", "DWORD"),
            ],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "GetFileInformationByHandle",
            module: Module::Kernel32,
            export: "GetFileInformationByHandle",
            ret: "BOOL",
            params: &[
                Param::input("hFile", "HANDLE"),
                Param::out("lpFileInformation", "LPBY_HANDLE_FILE_INFORMATION"),
            ],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "GetOverlappedResult",
            module: Module::Kernel32,
            export: "GetOverlappedResult",
            ret: "BOOL",
            params: &[
                Param::input("hFile", "HANDLE"),
                Param::input("lpOverlapped", "LPOVERLAPPED"),
                Param::out("lpNumberOfBytesTransferred", "LPDWORD"),
                Param::input("bWait", "BOOL"),
            ],
            convention: Convention::NonZero,
        },
    ],
    constants: &[
        Constant::new("GENERIC_READ", 0x8000_0000),
        Constant::new("GENERIC_WRITE", 0x4000_0000),
        Constant::new("FILE_SHARE_READ", 0x1),
        Constant::new("FILE_SHARE_WRITE", 0x2),
        Constant::new("FILE_SHARE_DELETE", 0x4),
        Constant::new("CREATE_NEW", 1),
        Constant::new("CREATE_ALWAYS", 2),
        Constant::new("OPEN_EXISTING", 3),
        Constant::new("OPEN_ALWAYS", 4),
        Constant::new("TRUNCATE_EXISTING", 5),
        Constant::new("FILE_ATTRIBUTE_NORMAL", 0x80),
        Constant::new("FILE_FLAG_OVERLAPPED", 0x4000_0000),
        Constant::new("FILE_FLAG_SESSION_AWARE", 0x0080_0000),
        Constant::new("MOVEFILE_REPLACE_EXISTING", 0x1),
        Constant::new("MOVEFILE_COPY_ALLOWED", 0x2),
        Constant::new("MOVEFILE_DELAY_UNTIL_REBOOT", 0x4),
        Constant::new("MOVEFILE_WRITE_THROUGH", 0x8),
    ],
    ..DeclarationFragment::EMPTY
};
