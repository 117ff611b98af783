//! Command line flags for trees of subcommands.
//!
//! A [`Command`] is built once from a [`CommandBuilder`] and then parses
//! argument lists in two steps: [`scan`] splits the arguments into per-command
//! token streams, the resolver binds those tokens to typed [`Value`] sinks,
//! falling back to environment variables and defaults.
//!
//! ```
//! use cmdflag::{CommandBuilder, Flag, Value};
//!
//! let mut tar = CommandBuilder::new("tar")
//!     .flag(Flag::new("-z, --gz", Value::bool()).usage("gzip format"))
//!     .flag(Flag::new("-c", Value::bool()).usage("create tar file"))
//!     .flag(Flag::new("-f", Value::string()).arglist("FILE"))
//!     .flag(Flag::positional("SOURCE", Value::string_seq()))
//!     .build()?;
//!
//! tar.parse(["tar", "-zcf", "a.tgz", "a.rs", "b.rs"])?;
//! assert_eq!(tar.get("--gz").and_then(|it| it.as_bool()), Some(true));
//! assert_eq!(tar.get("-f").and_then(|it| it.as_str()), Some("a.tgz"));
//! assert_eq!(tar.get("SOURCE").and_then(|it| it.as_strs()).map(|it| it.len()), Some(2));
//! # Ok::<(), cmdflag::Error>(())
//! ```

mod command;
mod env;
mod error;
mod flag;
mod help;
mod resolve;
mod scan;
mod value;

pub use crate::{
    command::{Command, CommandBuilder, Parsed},
    env::{Env, SystemEnv},
    error::{Error, ErrorKind, ErrorPolicy},
    flag::Flag,
    scan::{scan, Argument, ScanResult},
    value::{parse_bool, ConversionError, NumKind, Number, Scalar, Value},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;
