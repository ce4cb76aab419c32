// ── Native helper routines ────────────────────────────────────────────────────
//
// Small routines callers cannot express through the declared API alone.  They
// are compiled into the crate with the system calling convention, so the
// loader binds them exactly like kernel32 exports and the wrapper calls them
// through the same entry-point path.

use std::collections::HashMap;

use crate::decl::Module;
use crate::error::BuildError;
use crate::platform;
use crate::registry::{InterfaceDescription, NativeType, PointerWidth};

/// `INVALID_SOCKET`: `~0` at pointer width.
pub const INVALID_SOCKET: usize = usize::MAX;

// ── Routines ──────────────────────────────────────────────────────────────────

/// The OS handle behind C runtime descriptor `fd`.
///
/// Negative descriptors yield `INVALID_HANDLE_VALUE` without consulting the
/// runtime.  On hosts where descriptors are native handles this is the
/// identity.
pub extern "system" fn handle_from_fd(fd: i32) -> isize {
    platform::os_handle(fd)
}

/// Widen a descriptor to the pointer-sized `SOCKET` type.
pub extern "system" fn socket_from_fd(fd: i32) -> usize {
    if fd < 0 {
        INVALID_SOCKET
    } else {
        fd as usize
    }
}

/// Nonzero when `event` is `WSA_INVALID_EVENT` (a null handle).
pub extern "system" fn wsa_invalid_event(event: isize) -> i32 {
    i32::from(event == 0)
}

// ── Compiled signatures ───────────────────────────────────────────────────────

const INT: NativeType = NativeType::signed(32);
const BOOL: NativeType = INT;
const SOCKET: NativeType = NativeType::unsigned(usize::BITS as u8);

struct Compiled {
    export: &'static str,
    ret: NativeType,
    params: &'static [NativeType],
    entry: usize,
}

fn compiled() -> [Compiled; 3] {
    [
        Compiled {
            export: "handle_from_fd",
            ret: NativeType::Pointer,
            params: &[INT],
            entry: handle_from_fd as *const () as usize,
        },
        Compiled {
            export: "socket_from_fd",
            ret: SOCKET,
            params: &[INT],
            entry: socket_from_fd as *const () as usize,
        },
        Compiled {
            export: "wsa_invalid_event",
            ret: BOOL,
            params: &[NativeType::Pointer],
            entry: wsa_invalid_event as *const () as usize,
        },
    ]
}

fn render(
    ret: NativeType,
    params: impl IntoIterator<Item = NativeType>,
    width: PointerWidth,
) -> String {
    let name = |ty: NativeType| match ty {
        NativeType::Void => "void".to_owned(),
        NativeType::Int { bits, signed: true } => format!("i{bits}"),
        NativeType::Int { bits, signed: false } => format!("u{bits}"),
        NativeType::Pointer => format!("ptr{}", width.bits()),
    };
    let params: Vec<_> = params.into_iter().map(name).collect();
    format!("fn({}) -> {}", params.join(", "), name(ret))
}

/// Check every helper the interface declares against its compiled routine
/// and return the entry points by export name.
pub fn compile(
    interface: &InterfaceDescription,
) -> Result<HashMap<&'static str, usize>, BuildError> {
    let routines = compiled();
    let mut entries = HashMap::new();

    for function in interface
        .functions()
        .filter(|f| f.descriptor.module == Module::Helpers)
    {
        let export = function.descriptor.export;
        let Some(routine) = routines.iter().find(|r| r.export == export) else {
            return Err(BuildError::MissingSymbol {
                module: Module::Helpers,
                symbol: export.to_owned(),
            });
        };

        let compiled = render(routine.ret, routine.params.iter().copied(), PointerWidth::host());
        let declared = render(
            function.ret,
            function.params.iter().map(|p| p.ty),
            interface.pointer_width(),
        );
        if compiled != declared {
            return Err(BuildError::HelperSignature {
                name: function.descriptor.name.to_owned(),
                compiled,
                declared,
            });
        }

        entries.insert(export, routine.entry);
    }

    log::debug!("compiled {} helper routines", entries.len());
    Ok(entries)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::fragments::{BASE, CANONICAL, HELPERS};
    use crate::decl::{Convention, DeclarationFragment, FunctionDescriptor, Param};
    use crate::registry::{assemble, assemble_for};

    #[test]
    fn socket_from_fd_widens_and_flags_negatives() {
        assert_eq!(socket_from_fd(7), 7);
        assert_eq!(socket_from_fd(0), 0);
        assert_eq!(socket_from_fd(-1), INVALID_SOCKET);
    }

    #[test]
    fn wsa_invalid_event_matches_only_null() {
        assert_ne!(wsa_invalid_event(0), 0);
        assert_eq!(wsa_invalid_event(0x1c4), 0);
        assert_eq!(wsa_invalid_event(-1), 0);
    }

    #[test]
    fn handle_from_negative_fd_is_invalid() {
        assert_eq!(handle_from_fd(-1), -1);
    }

    #[cfg(not(windows))]
    #[test]
    fn handle_from_fd_is_identity_without_a_crt() {
        assert_eq!(handle_from_fd(3), 3);
    }

    #[test]
    fn compile_binds_every_declared_helper() {
        let iface = assemble(CANONICAL).expect("assemble");
        let entries = compile(&iface).expect("compile");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries["socket_from_fd"], socket_from_fd as *const () as usize);
        assert_eq!(entries["wsa_invalid_event"], wsa_invalid_event as *const () as usize);
    }

    #[test]
    fn foreign_pointer_width_is_a_signature_mismatch() {
        let foreign = match PointerWidth::host() {
            PointerWidth::Bits64 => PointerWidth::Bits32,
            PointerWidth::Bits32 => PointerWidth::Bits64,
        };
        let iface = assemble_for(CANONICAL, foreign).expect("assemble");
        match compile(&iface) {
            Err(BuildError::HelperSignature { compiled, declared, .. }) => {
                assert_ne!(compiled, declared);
            }
            other => panic!("expected a signature mismatch, got {other:?}"),
        }
    }

    #[test]
    fn redeclared_parameter_type_is_a_signature_mismatch() {
        const FUNCTIONS: &[FunctionDescriptor] = &[FunctionDescriptor {
            name: "socket_from_fd",
            module: Module::Helpers,
            export: "socket_from_fd",
            ret: "SOCKET",
            params: &[Param::input("fd", "WORD")],
            convention: Convention::Infallible,
        }];
        let iface = assemble(&[
            BASE,
            DeclarationFragment {
                name: "narrow",
                revision: 1,
                functions: FUNCTIONS,
                ..DeclarationFragment::EMPTY
            },
        ])
        .expect("assemble");
        let err = compile(&iface).expect_err("WORD is not INT");
        assert_eq!(
            err,
            BuildError::HelperSignature {
                name: "socket_from_fd".into(),
                compiled: format!("fn(i32) -> u{}", usize::BITS),
                declared: format!("fn(u16) -> u{}", usize::BITS),
            }
        );
    }

    #[test]
    fn unknown_helper_is_a_missing_symbol() {
        const FUNCTIONS: &[FunctionDescriptor] = &[FunctionDescriptor {
            name: "fd_from_handle",
            module: Module::Helpers,
            export: "fd_from_handle",
            ret: "INT",
            params: &[Param::input("handle", "HANDLE")],
            convention: Convention::Infallible,
        }];
        let iface = assemble(&[
            BASE,
            HELPERS,
            DeclarationFragment {
                name: "extra",
                revision: 1,
                functions: FUNCTIONS,
                ..DeclarationFragment::EMPTY
            },
        ])
        .expect("assemble");
        assert!(matches!(
            compile(&iface),
            Err(BuildError::MissingSymbol {
                module: Module::Helpers,
                ref symbol,
            }) if symbol == "fd_from_handle"
        ));
    }
}
