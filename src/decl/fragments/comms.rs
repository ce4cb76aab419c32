// Serial communications status and winsock event selection.

use crate::decl::{
    Constant, Convention, DeclarationFragment, ErrorSource, Field, FunctionDescriptor, Module,
    Param, Sentinel, StructDescriptor, StructName,
};

const SOCKET_ERROR: i64 = -1;
const FD_MAX_EVENTS: usize = 10;

pub const COMMUNICATIONS: DeclarationFragment = DeclarationFragment {
    name: "communications",
    revision: 3,
    structs: &[
        // https://learn.microsoft.com/windows/win32/api/winbase/ns-winbase-comstat
        StructDescriptor {
            tag: "_COMSTAT",
            fields: &[
                Field::bits("fCtsHold", "DWORD", 1),
                Field::bits("fDsrHold", "DWORD", 1),
                Field::bits("fRlsdHold", "DWORD", 1),
                Field::bits("fXoffHold", "DWORD", 1),
                Field::bits("fXoffSent", "DWORD", 1),
                Field::bits("fEof", "DWORD", 1),
                Field::bits("fTxim", "DWORD", 1),
                Field::bits("fReserved", "DWORD", 25),
                Field::new("cbInQue", "DWORD"),
                Field::new("cbOutQue", "DWORD"),
            ],
            names: &[
                StructName::value("COMSTAT"),
                StructName::pointer("LPCOMSTAT"),
            ],
        },
        StructDescriptor {
            tag: "_WSANETWORKEVENTS",
            fields: &[
                Field::new("lNetworkEvents", "LONG"),
                Field::array("iErrorCode", "INT", FD_MAX_EVENTS),
            ],
            names: &[
                StructName::value("WSANETWORKEVENTS"),
                StructName::pointer("LPWSANETWORKEVENTS"),
            ],
        },
    ],
    functions: &[
        FunctionDescriptor {
            name: "ClearCommError",
            module: Module::Kernel32,
            export: "ClearCommError",
            ret: "BOOL",
            params: &[
                Param::input("hFile", "HANDLE"),
                Param::out("lpErrors", "LPDWORD"),
                Param::out("lpStat", "LPCOMSTAT"),
            ],
            convention: Convention::NonZero,
        },
        FunctionDescriptor {
            name: "WSAGetLastError",
            module: Module::Ws2_32,
            export: "WSAGetLastError",
            ret: "INT",
            params: &[],
            convention: Convention::Infallible,
        },
        FunctionDescriptor {
            name: "WSACreateEvent",
            module: Module::Ws2_32,
            export: "WSACreateEvent",
            ret: "WSAEVENT",
            params: &[],
            convention: Convention::FailsOn(
                Sentinel::InvalidEvent,
                ErrorSource::Function("WSAGetLastError"),
            ),
        },
        FunctionDescriptor {
            name: "WSACloseEvent",
            module: Module::Ws2_32,
            export: "WSACloseEvent",
            ret: "BOOL",
            params: &[Param::input("hEvent", "WSAEVENT")],
            convention: Convention::FailsOn(
                Sentinel::Value(0),
                ErrorSource::Function("WSAGetLastError"),
            ),
        },
        FunctionDescriptor {
            name: "WSAEventSelect",
            module: Module::Ws2_32,
            export: "WSAEventSelect",
            ret: "INT",
            params: &[
                Param::input("s", "SOCKET"),
                Param::input("hEventObject", "WSAEVENT"),
                Param::input("lNetworkEvents", "LONG"),
            ],
            convention: Convention::FailsOn(
                Sentinel::Value(SOCKET_ERROR),
                ErrorSource::Function("WSAGetLastError"),
            ),
        },
        FunctionDescriptor {
            name: "WSAEnumNetworkEvents",
            module: Module::Ws2_32,
            export: "WSAEnumNetworkEvents",
            ret: "INT",
            params: &[
                Param::input("s", "SOCKET"),
                Param::optional("hEventObject", "WSAEVENT"),
                Param::out("lpNetworkEvents", "LPWSANETWORKEVENTS"),
            ],
            convention: Convention::FailsOn(
                Sentinel::Value(SOCKET_ERROR),
                ErrorSource::Function("WSAGetLastError"),
            ),
        },
    ],
    constants: &[
        Constant::new("SOCKET_ERROR", SOCKET_ERROR),
        Constant::new("FD_READ", 0x01),
        Constant::new("FD_WRITE", 0x02),
        Constant::new("FD_OOB", 0x04),
        Constant::new("FD_ACCEPT", 0x08),
        Constant::new("FD_CONNECT", 0x10),
        Constant::new("FD_CLOSE", 0x20),
        Constant::new("FD_MAX_EVENTS", FD_MAX_EVENTS as i64),
        Constant::new("CE_RXOVER", 0x0001),
        Constant::new("CE_OVERRUN", 0x0002),
        Constant::new("CE_RXPARITY", 0x0004),
        Constant::new("CE_FRAME", 0x0008),
        Constant::new("CE_BREAK", 0x0010),
    ],
    ..DeclarationFragment::EMPTY
};
