//! Command line parsing.
//!
//! Options follow the classic `getopt_long` contract of the tool: numeric
//! arguments are C literals, the last occurrence of an option wins and
//! anything unrecognized is dropped without complaint.

use std::path::PathBuf;

use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use log::debug;
use pageread_core::memory::PhysAddr;
use pageread_core::util::{DEVMEM_FILE, NBYTES, NPAGES, parse_c_long, parse_c_ulong};
use pageread_core::{CacheMode, Request};

/// CLI arguments for the `pageread` binary.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "pageread",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true,
    infer_long_args = true
)]
struct CliArgs {
    /// HPA address to start reading pages from.
    #[arg(short = 'a', long = "addr", allow_hyphen_values = true, value_parser = parse_addr)]
    addr: Option<u64>,
    /// Number of pages to span.
    #[arg(short = 'p', long = "pages", allow_hyphen_values = true, value_parser = parse_extent)]
    pages: Option<i64>,
    /// Number of bytes to read from each page.
    #[arg(short = 'b', long = "bytes", allow_hyphen_values = true, value_parser = parse_extent)]
    bytes: Option<i64>,
    /// Dump read data to the console.
    #[arg(short = 'd', long = "dump")]
    dump: bool,
    /// Use cached mappings.
    #[arg(short = 'c', long = "cached")]
    cached: bool,
    /// Print the usage text.
    #[arg(short = 'h', long = "help")]
    help: bool,
    /// Physical memory device to read from.
    #[arg(long = "device")]
    device: Option<PathBuf>,
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Print the usage text and exit successfully, without touching the device
    Help,
    /// Read pages as described by the request
    Read(Request),
}

fn parse_addr(s: &str) -> Result<u64, String> {
    Ok(parse_c_ulong(s))
}

fn parse_extent(s: &str) -> Result<i64, String> {
    Ok(parse_c_long(s))
}

impl From<CliArgs> for Invocation {
    fn from(args: CliArgs) -> Self {
        if args.help {
            return Invocation::Help;
        }
        Invocation::Read(Request {
            phys_addr: PhysAddr::new(args.addr.unwrap_or(0)),
            page_count: args.pages.unwrap_or(NPAGES),
            bytes_per_page: args.bytes.unwrap_or(NBYTES),
            dump: args.dump,
            cache_mode: CacheMode::from(args.cached),
            device: args.device.unwrap_or_else(|| PathBuf::from(DEVMEM_FILE)),
        })
    }
}

/// Long options and whether they take a value.
const LONG_OPTIONS: [(&str, bool); 7] = [
    ("addr", true),
    ("pages", true),
    ("bytes", true),
    ("dump", false),
    ("cached", false),
    ("help", false),
    ("device", true),
];

/// Short options taking a value, either attached (`-a0x1000`) or as the next argument.
const SHORT_WITH_VALUE: [char; 3] = ['a', 'p', 'b'];

/// Parses the full argument vector, program name included.
///
/// Unrecognized options, stray positional arguments, values attached to
/// options that take none and a trailing option missing its value are
/// ignored. Long options may be abbreviated to any unambiguous prefix.
///
/// # Errors
///
/// Returns the clap error if the arguments cannot be made sense of even after
/// dropping the offending ones.
pub fn parse_args<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut args: Vec<String> = args.into_iter().map(Into::into).collect();
    loop {
        let err = match CliArgs::try_parse_from(&args) {
            Ok(cli) => return Ok(cli.into()),
            Err(err) => err,
        };
        let stripped = match err.kind() {
            ErrorKind::UnknownArgument => match err.get(ContextKind::InvalidArg) {
                Some(ContextValue::String(arg)) => strip_unknown(&mut args, arg),
                _ => false,
            },
            ErrorKind::TooManyValues => strip_flag_with_value(&mut args),
            ErrorKind::InvalidValue => strip_dangling(&mut args),
            _ => false,
        };
        if !stripped {
            return Err(err);
        }
    }
}

/// Resolves a long option name or an unambiguous prefix of one.
fn resolve_long(name: &str) -> Option<(&'static str, bool)> {
    if let Some(&option) = LONG_OPTIONS.iter().find(|(long, _)| *long == name) {
        return Some(option);
    }
    let mut matches = LONG_OPTIONS
        .iter()
        .filter(|(long, _)| !name.is_empty() && long.starts_with(name));
    match (matches.next(), matches.next()) {
        (Some(&option), None) => Some(option),
        _ => None,
    }
}

/// True if `arg`, in option position, consumes the following argument as its value.
fn wants_value(arg: &str) -> bool {
    if let Some(long) = arg.strip_prefix("--") {
        return !long.contains('=') && resolve_long(long).is_some_and(|(_, takes)| takes);
    }
    match arg.strip_prefix('-') {
        // the first letter taking a value swallows the rest of the cluster
        Some(cluster) => cluster
            .find(|c: char| SHORT_WITH_VALUE.contains(&c))
            .is_some_and(|at| at + 1 == cluster.len()),
        None => false,
    }
}

/// Indices of the arguments in option position: the program name and the
/// separate values of options are skipped, everything after `--` is positional.
fn option_indices(args: &[String]) -> Vec<usize> {
    let mut indices = Vec::new();
    let mut skip_value = false;
    let mut positional_only = false;
    for (i, arg) in args.iter().enumerate().skip(1) {
        if skip_value {
            skip_value = false;
            continue;
        }
        indices.push(i);
        if positional_only {
            continue;
        }
        if arg == "--" {
            positional_only = true;
            continue;
        }
        skip_value = wants_value(arg);
    }
    indices
}

fn strip_unknown(args: &mut Vec<String>, unknown: &str) -> bool {
    debug!("ignoring unrecognized argument {}", unknown);
    let long_with_value = format!("{unknown}=");
    let mut letters = unknown.chars();
    let letter = match (letters.next(), letters.next(), letters.next()) {
        (Some('-'), Some(letter), None) if letter != '-' => Some(letter),
        _ => None,
    };

    for i in option_indices(args.as_slice()) {
        let arg = &args[i];
        // whole arguments: positionals, `-x`, `--name` and `--name=value`
        if arg == unknown || (unknown.starts_with("--") && arg.starts_with(&long_with_value)) {
            args.remove(i);
            return true;
        }
        // a letter inside a cluster of short flags such as `-dx`, never
        // looking past the first letter that takes a value
        let Some(letter) = letter else { continue };
        let Some(cluster) = arg.strip_prefix('-').filter(|c| !c.starts_with('-')) else {
            continue;
        };
        let mut hit = None;
        for (at, c) in cluster.char_indices() {
            if c == letter {
                hit = Some(at + 1);
                break;
            }
            if SHORT_WITH_VALUE.contains(&c) {
                break;
            }
        }
        if let Some(at) = hit {
            args[i].remove(at);
            if args[i] == "-" {
                args.remove(i);
            }
            return true;
        }
    }
    false
}

/// Drops the first `--flag=value` whose option takes no value.
fn strip_flag_with_value(args: &mut Vec<String>) -> bool {
    let found = option_indices(args.as_slice()).into_iter().find(|&i| {
        args[i]
            .strip_prefix("--")
            .and_then(|long| long.split_once('='))
            .and_then(|(name, _)| resolve_long(name))
            .is_some_and(|(_, takes)| !takes)
    });
    match found {
        Some(i) => {
            debug!("ignoring option {} with an unexpected value", args[i]);
            args.remove(i);
            true
        }
        None => false,
    }
}

fn strip_dangling(args: &mut Vec<String>) -> bool {
    match option_indices(args.as_slice()).last() {
        Some(&last) if last + 1 == args.len() && wants_value(&args[last]) => {
            debug!("ignoring option {} without a value", args[last]);
            // `-da` keeps its `d`, a lone `-a` or `--addr` goes away
            let arg = &mut args[last];
            if !arg.starts_with("--") && arg.len() > 2 {
                arg.pop();
            } else {
                args.pop();
            }
            true
        }
        _ => false,
    }
}

/// Usage text, printed on `--help` and after request validation errors.
pub fn usage(progname: &str) -> String {
    format!(
        "\nUsage: {progname} [option(s)]\n\
         \t -a|--addr=<value>     : HPA address to start reading pages from\n\
         \t[-p|--pages=<value>]   : Number of pages to span (default: {NPAGES})\n\
         \t[-b|--bytes=<value>]   : Number of bytes to read from each page (default: {NBYTES})\n\
         \t[-d|--dump]            : Dump read data to the console (default: Data are not dumped)\n\
         \t[-c|--cached]          : Use cached mappings (default: Memory access is not cached)\n\
         \t[--device=<path>]      : Physical memory device (default: {DEVMEM_FILE})\n\
         \t[-h|--help]            : Print this help message"
    )
}

/// Version banner printed at startup.
pub fn banner(progname: &str) -> String {
    format!("{} - version: {}", progname, env!("CARGO_PKG_VERSION"))
}
