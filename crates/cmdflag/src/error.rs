use bitflags::bitflags;
use thiserror::Error;

use crate::value::ConversionError;

/// Everything that can go wrong while building a command tree or parsing
/// arguments against it.
///
/// Parse errors carry the space-separated path of the command they occurred
/// in, e.g. `tar list`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{context}: unknown flag `{flag}`")]
    UnknownFlag { context: String, flag: String },
    #[error("{context}: expected a value for `{flag}`")]
    MissingValue { context: String, flag: String },
    #[error("{context}: unexpected argument `{value}`")]
    UnexpectedValue { context: String, value: String },
    #[error("{context}: flag specified more than once: `{flag}`")]
    DuplicateFlag { context: String, flag: String },
    #[error("{context}: can't parse `{flag}`, {source}")]
    Conversion {
        context: String,
        flag: String,
        #[source]
        source: ConversionError,
    },
    #[error("{context}: invalid value `{value}` for `{flag}`, expected one of [{choices}]")]
    InvalidSelection { context: String, flag: String, value: String, choices: String },
    #[error("invalid command model: {0}")]
    Model(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownFlag,
    MissingValue,
    UnexpectedValue,
    DuplicateFlag,
    Conversion,
    InvalidSelection,
    Model,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownFlag { .. } => ErrorKind::UnknownFlag,
            Error::MissingValue { .. } => ErrorKind::MissingValue,
            Error::UnexpectedValue { .. } => ErrorKind::UnexpectedValue,
            Error::DuplicateFlag { .. } => ErrorKind::DuplicateFlag,
            Error::Conversion { .. } => ErrorKind::Conversion,
            Error::InvalidSelection { .. } => ErrorKind::InvalidSelection,
            Error::Model(_) => ErrorKind::Model,
        }
    }

    /// Prints the error to stderr and exits with status 2.
    pub fn exit(self) -> ! {
        eprintln!("{self}");
        std::process::exit(2)
    }
}

macro_rules! model_err {
    ($($tt:tt)*) => {
        $crate::Error::Model(format!($($tt)*))
    };
}
pub(crate) use model_err;

bitflags! {
    /// What [`Command::run`](crate::Command::run) does with a parse error.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ErrorPolicy: u8 {
        const PRINT = 1;
        const EXIT = 1 << 1;
        const PANIC = 1 << 2;
        const IGNORE = 1 << 3;
    }
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        ErrorPolicy::PRINT | ErrorPolicy::EXIT
    }
}

impl ErrorPolicy {
    /// `PANIC` wins over everything, `EXIT` over `IGNORE`. Returns `Ok` only
    /// when the error is ignored.
    pub fn handle(self, err: Error) -> crate::Result<()> {
        if self.contains(ErrorPolicy::PANIC) {
            panic!("{err}");
        }
        if self.contains(ErrorPolicy::PRINT) {
            eprintln!("{err}");
        }
        if self.contains(ErrorPolicy::EXIT) {
            std::process::exit(2);
        }
        if self.contains(ErrorPolicy::IGNORE) {
            tracing::debug!(%err, "ignoring parse error");
            return Ok(());
        }
        Err(err)
    }
}
