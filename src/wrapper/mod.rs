// ── Error-checked call wrapper ────────────────────────────────────────────────
//
// Every native call goes through `LoadedLibrary::invoke_descriptor`:
//   1. validate arguments against the resolved descriptor and allocate out
//      storage,
//   2. call the bound entry point,
//   3. mask the return and evaluate the declared convention,
//   4. on failure capture the error code before anything else runs on this
//      thread, then decode it into a `FailureRecord`.
//
// Calling arbitrary entry points is inherently unsafe; the `unsafe` surface is
// the `invoke*` functions themselves, whose callers vouch for handle and
// pointer validity.

#![allow(unsafe_code)]

mod values;

pub use values::{Arg, OutValue, RawValue, StructValue};

use values::{mask, OutCell};

use crate::decl::{Convention, Direction, ErrorSource, Sentinel};
use crate::error::{ArgumentError, BuildError, Error, FailureRecord, Result};
use crate::helpers;
use crate::library::{call::call_entry, get_library, LoadedLibrary, MAX_ARITY};
use crate::platform;
use crate::registry::{PointerWidth, ResolvedFunction};

/// The outcome of one wrapped call.
pub type NativeCallResult = Result<CallOutcome>;

/// A call whose convention reported success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub function: &'static str,
    /// The return value masked to its declared width.
    pub value: RawValue,
    /// `Out` and `InOut` values, in parameter order.
    pub outputs: Vec<OutValue>,
    /// A last-error code the convention tolerates (`ERROR_IO_PENDING`).
    pub tolerated_error: Option<u32>,
}

impl CallOutcome {
    /// The `index`-th scalar out value.
    pub fn out_scalar(&self, index: usize) -> Option<RawValue> {
        self.outputs.get(index).and_then(OutValue::scalar)
    }

    /// The `index`-th struct out value.
    pub fn out_struct(&self, index: usize) -> Option<&StructValue> {
        self.outputs.get(index).and_then(OutValue::structure)
    }
}

enum Verdict {
    Success { tolerated: Option<u32> },
    Failed { code: u32 },
}

// ── Argument frame ────────────────────────────────────────────────────────────

/// Register slots for one call plus the out storage they point into.
struct Frame {
    slots: Vec<usize>,
    cells: Vec<OutCell>,
}

impl Frame {
    fn new(function: &ResolvedFunction, args: &[Arg]) -> std::result::Result<Self, ArgumentError> {
        let name = function.descriptor.name;
        if args.len() != function.params.len() {
            return Err(ArgumentError::Count {
                function: name.to_owned(),
                expected: function.params.len(),
                got: args.len(),
            });
        }

        let mut slots = Vec::with_capacity(args.len());
        let mut cells = Vec::new();
        for (index, (param, arg)) in function.params.iter().zip(args).enumerate() {
            let direction = param.param.direction;
            let slot = match (direction, arg, &param.slot) {
                (Direction::In | Direction::Optional, Arg::Value(value), _) => *value,
                (Direction::Optional, Arg::Null, _) => 0,
                (Direction::Out, Arg::Out, Some(slot)) => {
                    let mut cell = OutCell::new(slot, 0);
                    let address = cell.address();
                    cells.push(cell);
                    address
                }
                (Direction::InOut, Arg::InOut(initial), Some(slot)) => {
                    let mut cell = OutCell::new(slot, *initial);
                    let address = cell.address();
                    cells.push(cell);
                    address
                }
                _ => {
                    return Err(ArgumentError::Direction {
                        function: name.to_owned(),
                        index,
                        param: param.param.name,
                        direction,
                        got: arg.kind(),
                    });
                }
            };
            slots.push(slot);
        }

        Ok(Self { slots, cells })
    }

    fn outputs(self, width: PointerWidth) -> Vec<OutValue> {
        self.cells.into_iter().map(|cell| cell.into_value(width)).collect()
    }
}

// ── Invocation ────────────────────────────────────────────────────────────────

impl LoadedLibrary {
    /// Call the function declared as `name`.
    ///
    /// # Safety
    ///
    /// Handles and pointers in `args` must be valid for the native function,
    /// and any buffer a pointer refers to must stay alive for the call.
    pub unsafe fn invoke(&self, name: &str, args: &[Arg]) -> NativeCallResult {
        let function = self
            .interface()
            .function(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_owned()))?;
        // SAFETY: forwarded from the caller.
        unsafe { self.invoke_descriptor(function, args) }
    }

    /// Call `function`, which must belong to this library's interface.
    ///
    /// # Safety
    ///
    /// As for [`LoadedLibrary::invoke`].
    pub unsafe fn invoke_descriptor(
        &self,
        function: &ResolvedFunction,
        args: &[Arg],
    ) -> NativeCallResult {
        let name = function.descriptor.name;
        let entry = self
            .entry(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_owned()))?;
        let frame = Frame::new(function, args)?;

        // SAFETY: `entry` was bound for this descriptor, whose parameters are
        // all at most pointer-wide, and `frame.slots` has exactly one slot per
        // parameter.  Out pointers address `frame.cells`, alive until after
        // the outputs are read.  The caller vouches for every other pointer.
        let raw = unsafe { call_entry(entry, &frame.slots) }.ok_or_else(|| {
            BuildError::Arity {
                name: name.to_owned(),
                params: frame.slots.len(),
                max: MAX_ARITY,
            }
        })?;

        let width = self.interface().pointer_width();
        let value = RawValue::new(raw as u64, function.ret, width);
        let tolerated_error = match self.check(function, &value)? {
            Verdict::Success { tolerated } => tolerated,
            Verdict::Failed { code } => {
                let record = FailureRecord::new(name, code, platform::error_message(code));
                log::debug!("{record}");
                return Err(record.into());
            }
        };

        Ok(CallOutcome {
            function: name,
            value,
            outputs: frame.outputs(width),
            tolerated_error,
        })
    }

    /// Evaluate the convention, capturing the error code on failure.
    fn check(&self, function: &ResolvedFunction, value: &RawValue) -> Result<Verdict> {
        let verdict = match function.descriptor.convention {
            Convention::Infallible => Verdict::Success { tolerated: None },
            Convention::NonZero if value.is_zero() => Verdict::Failed {
                code: platform::last_error(),
            },
            Convention::NonZero => Verdict::Success { tolerated: None },
            Convention::NonZeroOr(in_flight) if value.is_zero() => {
                let code = platform::last_error();
                if in_flight.contains(&code) {
                    log::trace!("{} in flight (error {code})", function.descriptor.name);
                    Verdict::Success {
                        tolerated: Some(code),
                    }
                } else {
                    Verdict::Failed { code }
                }
            }
            Convention::NonZeroOr(_) => Verdict::Success { tolerated: None },
            Convention::FailsOn(sentinel, source) => {
                let failed = match sentinel {
                    Sentinel::Value(expected) => {
                        value.bits() == mask(expected as u64, value.width())
                    }
                    Sentinel::InvalidEvent => helpers::wsa_invalid_event(value.as_isize()) != 0,
                };
                if !failed {
                    Verdict::Success { tolerated: None }
                } else {
                    let code = match source {
                        ErrorSource::LastError => platform::last_error(),
                        ErrorSource::Function(follow_up) => self.error_from(follow_up)?,
                    };
                    Verdict::Failed { code }
                }
            }
        };
        Ok(verdict)
    }

    /// Call a zero-argument error function such as `WSAGetLastError`.
    fn error_from(&self, name: &str) -> Result<u32> {
        let function = self
            .interface()
            .function(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_owned()))?;
        let entry = self
            .entry(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_owned()))?;

        // SAFETY: the registry only accepts parameterless error sources.
        let raw = unsafe { call_entry(entry, &[]) }.unwrap_or(0);
        Ok(RawValue::new(raw as u64, function.ret, self.interface().pointer_width()).as_u32())
    }
}

/// Call `name` on the process-wide library, building it on first use.
///
/// # Safety
///
/// As for [`LoadedLibrary::invoke`].
pub unsafe fn invoke(name: &str, args: &[Arg]) -> NativeCallResult {
    let library = get_library()?;
    // SAFETY: forwarded from the caller.
    unsafe { library.invoke(name, args) }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::decl::fragments::{BASE, CANONICAL};
    use crate::decl::{DeclarationFragment, FunctionDescriptor, Module, Param};
    use crate::library::tests::FakeResolver;
    use crate::registry::assemble;
    use crate::wintypes::{ComStat, ConsoleScreenBufferInfo, Coord, Handle, SmallRect};

    const CURRENT_PID: u32 = 4242;
    const PROCESS_HANDLE: usize = 0x1c4;
    const CE_BREAK: u32 = 0x10;

    // ── Fake entry points ─────────────────────────────────────────────────────

    extern "system" fn open_process(_access: u32, _inherit: i32, pid: u32) -> usize {
        if pid == CURRENT_PID {
            PROCESS_HANDLE
        } else {
            platform::set_last_error(87);
            0
        }
    }

    extern "system" fn close_handle(handle: usize) -> i32 {
        if handle == PROCESS_HANDLE {
            1
        } else {
            platform::set_last_error(6);
            0
        }
    }

    extern "system" fn get_std_handle(_which: u32) -> isize {
        platform::set_last_error(6);
        -1
    }

    extern "system" fn wait_failed(_handle: usize, _millis: u32) -> u32 {
        platform::set_last_error(6);
        u32::MAX
    }

    extern "system" fn read_pending(
        _h: usize,
        _buf: usize,
        _len: u32,
        read: *mut u32,
        _ov: usize,
    ) -> i32 {
        // SAFETY: `read` is the wrapper's out cell.
        unsafe { read.write(0) };
        platform::set_last_error(997);
        0
    }

    extern "system" fn write_denied(
        _h: usize,
        _buf: usize,
        _len: u32,
        _written: *mut u32,
        _ov: usize,
    ) -> i32 {
        platform::set_last_error(5);
        0
    }

    extern "system" fn write_all(
        _h: usize,
        _buf: usize,
        len: u32,
        written: *mut u32,
        _ov: usize,
    ) -> i32 {
        // SAFETY: `written` is the wrapper's out cell.
        unsafe { written.write(len) };
        1
    }

    extern "system" fn wsa_get_last_error() -> i32 {
        10038
    }

    extern "system" fn wsa_create_event_fails() -> usize {
        platform::set_last_error(0);
        0
    }

    extern "system" fn wsa_event_select_fails(_s: usize, _event: usize, _mask: i32) -> i32 {
        platform::set_last_error(0);
        -1
    }

    extern "system" fn clear_comm_error(_h: usize, errors: *mut u32, stat: *mut ComStat) -> i32 {
        // SAFETY: both pointers are wrapper out cells sized from the layout.
        unsafe {
            errors.write(CE_BREAK);
            stat.write(ComStat {
                flags: 0b0000_0101,
                in_queue: 12,
                out_queue: 3,
            });
        }
        1
    }

    extern "system" fn create_pipe(
        read: *mut isize,
        write: *mut isize,
        _attrs: usize,
        _size: u32,
    ) -> i32 {
        // SAFETY: both pointers are wrapper out cells of pointer size.
        unsafe {
            read.write(0x10);
            write.write(0x14);
        }
        1
    }

    extern "system" fn console_info(_h: usize, info: *mut ConsoleScreenBufferInfo) -> i32 {
        // SAFETY: `info` is the wrapper's out cell, sized from the layout.
        unsafe {
            info.write(ConsoleScreenBufferInfo {
                size: Coord { x: 120, y: 9001 },
                cursor_position: Coord { x: 4, y: 30 },
                attributes: 0x07,
                window: SmallRect {
                    left: 0,
                    top: 10,
                    right: 119,
                    bottom: 39,
                },
                maximum_window_size: Coord { x: 120, y: 50 },
            });
        }
        1
    }

    extern "system" fn bump(value: *mut u32) -> i32 {
        // SAFETY: `value` is the wrapper's in-out cell.
        unsafe { value.write(value.read() + 1) };
        1
    }

    fn library(overrides: &[(&'static str, usize)]) -> LoadedLibrary {
        let mut resolver = FakeResolver {
            overrides: overrides.iter().copied().collect(),
            ..FakeResolver::default()
        };
        LoadedLibrary::build(assemble(CANONICAL).expect("assemble"), &mut resolver).expect("build")
    }

    fn failure_code(result: NativeCallResult) -> u32 {
        let err = result.expect_err("call should fail");
        let record = err.failure().expect("native failure");
        assert!(!record.message().is_empty());
        record.code()
    }

    // ── Conventions ───────────────────────────────────────────────────────────

    #[test]
    fn open_process_scenario() {
        let lib = library(&[("OpenProcess", open_process as *const () as usize)]);

        // SAFETY: the fake entry point takes three integer arguments.
        let args = [0x0400u32.into(), false.into(), 0xFFFF_FFF0u32.into()];
        let result = unsafe { lib.invoke("OpenProcess", &args) };
        let err = result.expect_err("invalid pid");
        let record = err.failure().expect("native failure");
        assert_eq!(record.function(), "OpenProcess");
        assert_eq!(record.code(), 87);
        assert!(!record.message().is_empty());
        assert!(err.to_string().contains("(error 87)"));

        // SAFETY: as above.
        let args = [0x0400u32.into(), false.into(), CURRENT_PID.into()];
        let outcome = unsafe { lib.invoke("OpenProcess", &args) }.expect("current pid");
        assert_eq!(outcome.value.as_handle(), Handle(PROCESS_HANDLE as isize));
        assert_eq!(outcome.tolerated_error, None);
        assert!(outcome.outputs.is_empty());
    }

    #[test]
    fn non_zero_return_is_success_and_zero_is_failure() {
        let lib = library(&[("CloseHandle", close_handle as *const () as usize)]);
        // SAFETY: the fake takes one pointer-sized argument.
        unsafe {
            let ok = lib.invoke("CloseHandle", &[Arg::Value(PROCESS_HANDLE)]).expect("close");
            assert!(ok.value.as_bool());
            assert_eq!(failure_code(lib.invoke("CloseHandle", &[Arg::Value(0x99)])), 6);
        }
    }

    #[test]
    fn sentinel_is_compared_at_the_return_width() {
        let lib = library(&[
            ("GetStdHandle", get_std_handle as *const () as usize),
            ("WaitForSingleObject", wait_failed as *const () as usize),
        ]);
        // SAFETY: the fakes take integer arguments only.
        unsafe {
            assert_eq!(failure_code(lib.invoke("GetStdHandle", &[(-11i32).into()])), 6);
            let args = [Arg::Value(PROCESS_HANDLE), 0u32.into()];
            assert_eq!(failure_code(lib.invoke("WaitForSingleObject", &args)), 6);
        }
    }

    #[test]
    fn in_flight_code_is_tolerated() {
        let lib = library(&[
            ("ReadFile", read_pending as *const () as usize),
            ("WriteFile", write_denied as *const () as usize),
        ]);
        let mut buf = [0u8; 16];
        let args = [
            Arg::Value(PROCESS_HANDLE),
            Arg::by_mut(&mut buf),
            16u32.into(),
            Arg::Out,
            Arg::Null,
        ];

        // SAFETY: `buf` outlives the calls; the fakes never touch it.
        unsafe {
            let outcome = lib.invoke("ReadFile", &args).expect("pending is not a failure");
            assert_eq!(outcome.tolerated_error, Some(997));
            assert!(outcome.value.is_zero());
            assert_eq!(outcome.out_scalar(0).map(|v| v.as_u32()), Some(0));

            assert_eq!(failure_code(lib.invoke("WriteFile", &args)), 5);
        }
    }

    #[test]
    fn follow_up_function_supplies_the_code() {
        let lib = library(&[
            ("WSAGetLastError", wsa_get_last_error as *const () as usize),
            ("WSACreateEvent", wsa_create_event_fails as *const () as usize),
            ("WSAEventSelect", wsa_event_select_fails as *const () as usize),
        ]);
        // SAFETY: the fakes take integer arguments only.
        unsafe {
            assert_eq!(failure_code(lib.invoke("WSACreateEvent", &[])), 10038);
            let args = [Arg::Value(3), Arg::Value(PROCESS_HANDLE), 0x21i32.into()];
            assert_eq!(failure_code(lib.invoke("WSAEventSelect", &args)), 10038);
        }
    }

    // ── Out parameters ────────────────────────────────────────────────────────

    #[test]
    fn scalar_out_values_are_returned_in_order() {
        let lib = library(&[
            ("WriteFile", write_all as *const () as usize),
            ("CreatePipe", create_pipe as *const () as usize),
        ]);
        let data = *b"hello";
        // SAFETY: `data` outlives the call; out cells are wrapper-owned.
        unsafe {
            let args = [
                Arg::Value(PROCESS_HANDLE),
                Arg::by_ref(&data),
                5u32.into(),
                Arg::Out,
                Arg::Null,
            ];
            let outcome = lib.invoke("WriteFile", &args).expect("write");
            assert_eq!(outcome.out_scalar(0).map(|v| v.as_u32()), Some(5));

            let pipe = lib
                .invoke("CreatePipe", &[Arg::Out, Arg::Out, Arg::Null, 0u32.into()])
                .expect("pipe");
            assert_eq!(pipe.outputs.len(), 2);
            assert_eq!(pipe.out_scalar(0).map(|v| v.as_handle()), Some(Handle(0x10)));
            assert_eq!(pipe.out_scalar(1).map(|v| v.as_handle()), Some(Handle(0x14)));
        }
    }

    #[test]
    fn struct_out_values_decode_through_the_layout() {
        let lib = library(&[("ClearCommError", clear_comm_error as *const () as usize)]);
        // SAFETY: out cells are wrapper-owned.
        let args = [Arg::Value(PROCESS_HANDLE), Arg::Out, Arg::Out];
        let outcome = unsafe { lib.invoke("ClearCommError", &args) }.expect("clear");

        assert_eq!(outcome.out_scalar(0).map(|v| v.as_u32()), Some(CE_BREAK));
        let stat = outcome.out_struct(1).expect("COMSTAT");
        assert_eq!(stat.field("fCtsHold").map(|v| v.as_bool()), Some(true));
        assert_eq!(stat.field("fRlsdHold").map(|v| v.as_bool()), Some(true));
        assert_eq!(stat.field("cbInQue").map(|v| v.as_u32()), Some(12));

        let typed: ComStat = stat.read().expect("mirror");
        assert!(typed.cts_hold() && typed.rlsd_hold() && !typed.dsr_hold());
        assert_eq!(typed.out_queue, 3);
    }

    #[test]
    fn nested_struct_members_decode_by_value() {
        let lib = library(&[(
            "GetConsoleScreenBufferInfo",
            console_info as *const () as usize,
        )]);
        let args = [Arg::Value(PROCESS_HANDLE), Arg::Out];
        // SAFETY: the out cell is wrapper-owned.
        let outcome = unsafe { lib.invoke("GetConsoleScreenBufferInfo", &args) }.expect("info");

        let info = outcome.out_struct(0).expect("CONSOLE_SCREEN_BUFFER_INFO");
        assert_eq!(info.bytes().len(), 22);
        assert_eq!(info.field("wAttributes").map(|v| v.as_u32()), Some(0x07));
        let window = info.nested("srWindow").expect("SMALL_RECT");
        assert_eq!(window.field("Top").map(|v| v.as_i32()), Some(10));
        assert_eq!(window.field("Right").map(|v| v.as_i32()), Some(119));
        let size = info.nested("dwSize").expect("COORD");
        assert_eq!(size.field("Y").map(|v| v.as_i32()), Some(9001));

        let typed: ConsoleScreenBufferInfo = info.read().expect("mirror");
        assert_eq!(typed.cursor_position, Coord { x: 4, y: 30 });
        assert_eq!((typed.window.width(), typed.window.height()), (120, 30));
        let rect: SmallRect = window.read().expect("mirror");
        assert_eq!(rect, typed.window);
    }

    #[test]
    fn in_out_value_is_passed_and_read_back() {
        const FUNCTIONS: &[FunctionDescriptor] = &[FunctionDescriptor {
            name: "Bump",
            module: Module::Kernel32,
            export: "Bump",
            ret: "BOOL",
            params: &[Param::in_out("lpValue", "LPDWORD")],
            convention: Convention::NonZero,
        }];
        let extra = DeclarationFragment {
            name: "bump",
            revision: 1,
            functions: FUNCTIONS,
            ..DeclarationFragment::EMPTY
        };
        let mut resolver = FakeResolver {
            overrides: [("Bump", bump as *const () as usize)].into_iter().collect(),
            ..FakeResolver::default()
        };
        let iface = assemble(&[BASE, extra]).expect("assemble");
        let lib = LoadedLibrary::build(iface, &mut resolver).expect("build");

        // SAFETY: the in-out cell is wrapper-owned.
        let outcome = unsafe { lib.invoke("Bump", &[Arg::InOut(41)]) }.expect("bump");
        assert_eq!(outcome.out_scalar(0).map(|v| v.as_u32()), Some(42));
    }

    // ── Validation ────────────────────────────────────────────────────────────

    #[test]
    fn argument_mismatches_fail_before_the_call() {
        let lib = library(&[("CreatePipe", create_pipe as *const () as usize)]);
        // SAFETY: none of these reach the entry point.
        unsafe {
            let err = lib.invoke("CreatePipe", &[Arg::Out]).expect_err("count");
            assert!(matches!(
                err,
                Error::Argument(ArgumentError::Count { expected: 4, got: 1, .. })
            ));

            let err = lib
                .invoke("CreatePipe", &[Arg::Value(0x1000), Arg::Out, Arg::Null, 0u32.into()])
                .expect_err("value for an out parameter");
            match err {
                Error::Argument(ArgumentError::Direction { index, param, direction, got, .. }) => {
                    assert_eq!(
                        (index, param, direction, got),
                        (0, "hReadPipe", Direction::Out, "a value")
                    );
                }
                other => panic!("expected a direction error, got {other:?}"),
            }

            let err = lib
                .invoke("CreatePipe", &[Arg::Out, Arg::Out, Arg::Null, Arg::Null])
                .expect_err("null for a required input");
            assert!(matches!(err, Error::Argument(ArgumentError::Direction { index: 3, .. })));

            let err = lib.invoke("NoSuchFunction", &[]).expect_err("unknown");
            assert!(matches!(err, Error::UnknownFunction(ref name) if name == "NoSuchFunction"));
        }
    }

    #[test]
    fn helper_routines_are_invoked_like_exports() {
        let lib = library(&[]);
        // SAFETY: the helpers are pure functions of their integer arguments.
        unsafe {
            let socket = lib.invoke("socket_from_fd", &[5i32.into()]).expect("socket");
            assert_eq!(socket.value.as_usize(), 5);
            let invalid = lib.invoke("socket_from_fd", &[(-1i32).into()]).expect("socket");
            assert_eq!(invalid.value.as_usize(), helpers::INVALID_SOCKET);

            let handle = lib.invoke("handle_from_fd", &[(-1i32).into()]).expect("handle");
            assert_eq!(handle.value.as_handle(), Handle::INVALID);

            let null = lib.invoke("wsa_invalid_event", &[Arg::Value(0)]).expect("event");
            assert!(null.value.as_bool());
            let event = lib
                .invoke("wsa_invalid_event", &[Arg::Value(PROCESS_HANDLE)])
                .expect("event");
            assert!(!event.value.as_bool());
        }
    }

    #[cfg(not(windows))]
    #[test]
    fn free_invoke_reports_the_build_failure() {
        // SAFETY: the build fails before any call is made.
        let err = unsafe { invoke("GetCurrentProcessId", &[]) }.expect_err("no system modules");
        assert!(matches!(err, Error::Build(BuildError::Unsupported { .. })));
    }
}
