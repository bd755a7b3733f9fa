//! `codeplans` entry point.

use codeplans_cli::{parse, Args, Parsed, Shell, ShellConfig};
use codeplans_core::{init_logging, PlanFiles, PlannerService};
use log::error;
use std::env;
use std::io::{self, IsTerminal};
use std::process;

fn main() {
    let args = match parse(env::args().skip(1).collect()) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help(usage)) => {
            println!("{usage}");
            process::exit(0);
        }
        Err(message) => {
            eprintln!("{message}");
            process::exit(1);
        }
    };

    // File logging is best effort; the planner works without it.
    if let Err(err) = init_logging(&args.log_level, &args.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    if let Err(err) = run(args) {
        error!("event=shell_exit module=cli status=error error={err}");
        eprintln!("{err}");
        process::exit(1);
    }
}

fn run(args: Args) -> io::Result<()> {
    let files = match args.workdir {
        Some(dir) => PlanFiles::new(dir),
        None => PlanFiles::in_current_dir()
            .map_err(|err| io::Error::new(io::ErrorKind::NotFound, err.to_string()))?,
    };
    let config = ShellConfig {
        example_url: args.example_url,
        clear_screen: io::stdout().is_terminal(),
        welcome: args.welcome,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock(), PlannerService::new(files), config);
    shell.run()
}
