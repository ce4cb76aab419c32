// ── System module loader ──────────────────────────────────────────────────────
//
// Resolves exported symbols of kernel32, ws2_32 and user32.  Modules are loaded on
// first use and intentionally never freed: the bound entry points live in the
// process-wide library, which is never torn down.

#![allow(unsafe_code)]

use std::collections::HashMap;
use std::ffi::CString;
use std::os::windows::ffi::OsStrExt;
use std::path::PathBuf;

use windows::core::{PCSTR, PCWSTR};
use windows::Win32::Foundation::HMODULE;
use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};

use crate::decl::Module;
use crate::error::BuildError;
use crate::platform::SymbolResolver;

pub(crate) struct SystemModules {
    /// Load from this directory by full path instead of the default search order.
    directory: Option<PathBuf>,
    loaded: HashMap<Module, HMODULE>,
}

impl SystemModules {
    pub(crate) fn new(directory: Option<PathBuf>) -> Self {
        Self {
            directory,
            loaded: HashMap::new(),
        }
    }

    fn module(&mut self, module: Module) -> Result<HMODULE, BuildError> {
        if let Some(handle) = self.loaded.get(&module) {
            return Ok(*handle);
        }
        let Some(dll) = module.dll_name() else {
            return Err(BuildError::MissingSymbol {
                module,
                symbol: "<module>".to_owned(),
            });
        };

        let path = match &self.directory {
            Some(dir) => dir.join(dll),
            None => PathBuf::from(dll),
        };
        let wide: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        // SAFETY: `wide` is a NUL-terminated UTF-16 string that outlives the
        // call.  The returned module is kept loaded for the process lifetime.
        let handle = unsafe { LoadLibraryW(PCWSTR(wide.as_ptr())) }.map_err(|e| {
            BuildError::ModuleLoad {
                module,
                code: e.code().0 as u32,
                message: e.message(),
            }
        })?;

        log::info!("loaded {}", path.display());
        self.loaded.insert(module, handle);
        Ok(handle)
    }
}

impl SymbolResolver for SystemModules {
    fn resolve(&mut self, module: Module, symbol: &str) -> Result<usize, BuildError> {
        let handle = self.module(module)?;
        let missing = || BuildError::MissingSymbol {
            module,
            symbol: symbol.to_owned(),
        };
        let name = CString::new(symbol).map_err(|_| missing())?;

        // SAFETY: `handle` is a module loaded above and never freed; `name` is
        // a NUL-terminated ANSI string alive for the duration of the call.
        let entry = unsafe { GetProcAddress(handle, PCSTR(name.as_ptr().cast())) };
        entry.map(|f| f as usize).ok_or_else(missing)
    }
}
