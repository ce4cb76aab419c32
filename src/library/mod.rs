// ── Library loader and process-wide cache ─────────────────────────────────────
//
// `LoadedLibrary` is an assembled interface with every function bound to an
// entry point.  The process-wide instance is built at most once, on first use,
// behind a `OnceLock`; the published `Result` (success or failure) is what
// every later caller sees.

pub(crate) mod call;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

pub use call::MAX_ARITY;

use crate::config::Config;
use crate::decl::{fragments::CANONICAL, Module};
use crate::error::BuildError;
use crate::helpers;
use crate::platform::{self, SymbolResolver};
use crate::registry::{self, InterfaceDescription};

// ── Loaded library ────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct LoadedLibrary {
    interface: InterfaceDescription,
    /// Entry point by function name (not export name).
    entries: HashMap<&'static str, usize>,
}

impl LoadedLibrary {
    /// Compile the helper routines against `interface`, then bind every
    /// declared function through `resolver`.
    pub fn build(
        interface: InterfaceDescription,
        resolver: &mut dyn SymbolResolver,
    ) -> Result<Self, BuildError> {
        let helpers = helpers::compile(&interface)?;

        let mut entries = HashMap::with_capacity(interface.function_count());
        for function in interface.functions() {
            let desc = &function.descriptor;
            if desc.params.len() > MAX_ARITY {
                return Err(BuildError::Arity {
                    name: desc.name.to_owned(),
                    params: desc.params.len(),
                    max: MAX_ARITY,
                });
            }

            let entry = match desc.module {
                Module::Helpers => helpers.get(desc.export).copied().ok_or_else(|| {
                    BuildError::MissingSymbol {
                        module: desc.module,
                        symbol: desc.export.to_owned(),
                    }
                })?,
                Module::Kernel32 | Module::Ws2_32 | Module::User32 => {
                    resolver.resolve(desc.module, desc.export)?
                }
            };
            log::trace!("bound {} to {}!{} at {entry:#x}", desc.name, desc.module, desc.export);
            entries.insert(desc.name, entry);
        }

        log::info!("bound {} functions", entries.len());
        Ok(Self { interface, entries })
    }

    pub fn interface(&self) -> &InterfaceDescription {
        &self.interface
    }

    /// Entry point bound for `name`.
    pub fn entry(&self, name: &str) -> Option<usize> {
        self.entries.get(name).copied()
    }
}

// ── Cache ─────────────────────────────────────────────────────────────────────

pub type BuildFn = fn() -> Result<LoadedLibrary, BuildError>;

/// A once-only build guard.  Concurrent first callers block until the single
/// build publishes its result; failures are cached, never retried.
pub struct LibraryCache<F = BuildFn> {
    cell: OnceLock<Result<LoadedLibrary, BuildError>>,
    attempts: AtomicUsize,
    build: F,
}

impl<F> LibraryCache<F>
where
    F: Fn() -> Result<LoadedLibrary, BuildError>,
{
    pub const fn new(build: F) -> Self {
        Self {
            cell: OnceLock::new(),
            attempts: AtomicUsize::new(0),
            build,
        }
    }

    pub fn get(&self) -> Result<&LoadedLibrary, BuildError> {
        self.cell
            .get_or_init(|| {
                self.attempts.fetch_add(1, Ordering::SeqCst);
                let built = (self.build)();
                if let Err(e) = &built {
                    log::error!("library build failed: {e}");
                }
                built
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// How many builds have run; never more than one.
    pub fn build_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

// ── Process-wide library ──────────────────────────────────────────────────────

static LIBRARY: LibraryCache = LibraryCache::new(build_system_library as BuildFn);

fn build_system_library() -> Result<LoadedLibrary, BuildError> {
    let config = Config::load();
    let interface = registry::assemble(CANONICAL)?;
    let mut resolver = platform::system_resolver(&config)?;
    LoadedLibrary::build(interface, resolver.as_mut())
}

/// The process-wide library, built from the canonical fragments on first use.
pub fn get_library() -> Result<&'static LoadedLibrary, BuildError> {
    LIBRARY.get()
}

/// Build attempts made by [`get_library`] so far.
pub fn global_build_attempts() -> usize {
    LIBRARY.build_attempts()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
