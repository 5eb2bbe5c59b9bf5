use std::io;
use std::process::ExitCode;

use pageread_bin::cli::{banner, parse_args};
use pageread_bin::{EXIT_FAILURE, init_logging, run};
use pageread_core::memory::DevMemOpener;

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("failed to initialize logging: {:?}", e);
    }

    let args: Vec<String> = std::env::args_os()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let progname = args.first().cloned().unwrap_or_else(|| "pageread".into());
    println!("{}", banner(&progname));

    let invocation = match parse_args(args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    log::debug!("{:?}", invocation);

    let status = run(
        &progname,
        invocation,
        &mut DevMemOpener,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    ExitCode::from(status)
}
