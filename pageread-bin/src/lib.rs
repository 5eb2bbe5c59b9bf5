//! # pageread
//!
//! `pageread` reads a range of physical memory pages through `/dev/mem`,
//! optionally dumping what it reads, and exits with the sum of all bytes it
//! touched (truncated to 8 bits) as its status.
//!
//! ```sh
//! # sum the first 16 bytes of the four pages starting at 1 MiB, uncached
//! sudo pageread --addr=0x100000 --pages=4 --bytes=16
//! echo $?
//! ```
//!
//! ## Modules
//!
//! - `cli`: Command line parsing and the usage text.
//!
//! ## External Crates
//!
//! - `log`: Used for logging throughout the crate.
//! - `env_logger`: Log output on stderr, tuned through `RUST_LOG`.
pub mod cli;

use std::io::Write;

use pageread_core::memory::DeviceOpener;
use pageread_core::read_pages;

use crate::cli::{Invocation, usage};

/// Exit status of every fatal error.
pub const EXIT_FAILURE: u8 = 1;

/// Sets up `env_logger` on stderr, logging warnings unless `RUST_LOG` says otherwise.
pub fn init_logging() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init()?;
    Ok(())
}

/// Executes a parsed invocation and returns the process exit status.
///
/// Informational output goes to `out`, diagnostics and the usage text to
/// `err`. Help never touches `opener`.
pub fn run<D, O, E>(
    progname: &str,
    invocation: Invocation,
    opener: &mut D,
    out: &mut O,
    err: &mut E,
) -> u8
where
    D: DeviceOpener,
    O: Write,
    E: Write,
{
    match invocation {
        Invocation::Help => {
            report(err, format_args!("{}", usage(progname)));
            0
        }
        Invocation::Read(request) => match read_pages(&request, opener, out) {
            Ok(summary) => summary.checksum.exit_status(),
            Err(e) => {
                log::debug!("{:?}", e);
                report(err, format_args!("{}\n", e));
                if e.is_usage() {
                    report(err, format_args!("{}", usage(progname)));
                }
                EXIT_FAILURE
            }
        },
    }
}

/// Writes a diagnostic; a broken stderr must not change the exit status.
fn report<E: Write>(err: &mut E, text: std::fmt::Arguments) {
    if let Err(e) = err.write_fmt(text) {
        log::debug!("failed to write diagnostics: {}", e);
    }
}
