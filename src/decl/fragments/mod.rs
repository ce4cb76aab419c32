// ── Canonical declaration fragments ───────────────────────────────────────────
//
// One file per subsystem.  `CANONICAL` fixes the merge order; the order only
// matters for which fragment is named first in a conflict report.

mod base;
mod comms;
mod console;
mod errors;
mod events;
mod files;
mod handles;
mod helpers;
mod pipes;
mod processes;
mod user32;

use super::DeclarationFragment;

pub use base::BASE;
pub use comms::COMMUNICATIONS;
pub use console::CONSOLE;
pub use errors::{ERRORS, ERROR_IO_PENDING};
pub use events::EVENTS;
pub use files::FILES;
pub use handles::HANDLES;
pub use helpers::HELPERS;
pub use pipes::PIPES;
pub use processes::PROCESSES;
pub use user32::USER32;

/// Every fragment shipped with the crate, in merge order.
pub static CANONICAL: &[DeclarationFragment] = &[
    BASE,
    ERRORS,
    HANDLES,
    PROCESSES,
    PIPES,
    FILES,
    EVENTS,
    COMMUNICATIONS,
    CONSOLE,
    USER32,
    HELPERS,
];

// ── Tests ─────────────────────────────────────────────────────────────────────
