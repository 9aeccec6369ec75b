//! Reads and writes the Wujie 16 fan attributes from user space.
//!
//! ```text
//! fanctl                     show every attribute
//! fanctl <attribute>         show one attribute
//! fanctl <attribute> <value> store a value
//! ```
//!
//! Port access goes through `/dev/port` (override with `FANCTL_PORT_DEVICE`)
//! and needs root. Log verbosity is taken from `FANCTL_LOG`.

mod dev_port;
mod logger;

use crate::dev_port::{DEFAULT_PORT_DEVICE, DevPort, DevPortLock, PORT_DEVICE_ENV};
use crate::logger::{LOG_ENV, StderrLogger};
use kernel_ec::attr::GROUP_NAME;
use kernel_ec::{Attribute, EcError, FanController};
use log::{debug, error, info};
use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "usage: fanctl [<attribute> [<value>]]";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    ShowAll,
    Show(Attribute),
    Store(Attribute, String),
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("too many arguments")]
    Usage,
    #[error("unknown attribute {0:?}, expected one of: fan1 fan2 fanctl_en cpu_temp env_temp")]
    UnknownAttribute(String),
    #[error("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Ec(#[from] EcError),
}

fn main() -> ExitCode {
    let level = StderrLogger::level_from(env::var(LOG_ENV).ok().as_deref());
    if let Err(e) = StderrLogger::new(level).init() {
        eprintln!("fanctl: failed to install logger: {e}");
    }

    let args: Vec<String> = env::args().skip(1).collect();
    match parse_args(&args).and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            if matches!(e, CliError::Usage) {
                eprintln!("{USAGE}");
            }
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let lookup = |name: &str| {
        Attribute::from_name(name).ok_or_else(|| CliError::UnknownAttribute(name.to_owned()))
    };

    match args {
        [] => Ok(Command::ShowAll),
        [flag] if flag == "-h" || flag == "--help" => Ok(Command::Help),
        [name] => Ok(Command::Show(lookup(name)?)),
        [name, value] => Ok(Command::Store(lookup(name)?, value.clone())),
        _ => Err(CliError::Usage),
    }
}

fn run(command: Command) -> Result<(), CliError> {
    if command == Command::Help {
        println!("{USAGE}");
        return Ok(());
    }

    let device = env::var_os(PORT_DEVICE_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_PORT_DEVICE), PathBuf::from);
    debug!("using port device {}", device.display());

    let open_err = |source| CliError::Open {
        path: device.clone(),
        source,
    };
    let lock = DevPortLock::open(&device).map_err(open_err)?;
    let io = DevPort::open(&device).map_err(open_err)?;

    let ctl = FanController::init(io, &lock)?;
    let result = match command {
        Command::ShowAll => Attribute::ALL.into_iter().try_for_each(|attr| {
            let mut value = String::new();
            attr.show(&ctl, &mut value)?;
            println!("{GROUP_NAME}/{attr}: {value}");
            Ok(())
        }),
        Command::Show(attr) => {
            let mut value = String::new();
            attr.show(&ctl, &mut value).map(|()| println!("{value}"))
        }
        Command::Store(attr, value) => attr
            .store(&ctl, &value)
            .map(|n| info!("{attr}: stored {n} bytes")),
        Command::Help => Ok(()),
    };
    ctl.shutdown();

    result.map_err(CliError::from)
}
