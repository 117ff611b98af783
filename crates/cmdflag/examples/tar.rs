//! `RUST_LOG=cmdflag=trace cargo run --example tar -- -zcf a.tgz src list -l`

use cmdflag::{Command, CommandBuilder, Flag, NumKind, Value};
use tracing_subscriber::EnvFilter;

fn tar() -> cmdflag::Result<Command> {
    CommandBuilder::new("tar")
        .usage("Manipulates tape archives.")
        .version("0.3.0")
        .flag(Flag::new("-z, --gz", Value::bool()).usage("Filter the archive through gzip."))
        .flag(Flag::new("-c, --create", Value::bool()).usage("Create a new archive."))
        .flag(
            Flag::new("-f, --file", Value::string())
                .arglist("ARCHIVE")
                .usage("Use archive file ARCHIVE.")
                .env("TAR_FILE"),
        )
        .flag(
            Flag::new("--level", Value::number(NumKind::U8))
                .usage("Compression level.")
                .selects(["1", "6", "9"])
                .default("6"),
        )
        .flag(Flag::positional("SOURCE", Value::string_seq()).usage("Files to archive."))
        .subcommand(
            CommandBuilder::new("list")
                .alias("t")
                .usage("Lists the contents of an archive.")
                .flag(Flag::new("-l, --long", Value::bool()).usage("Show sizes and dates.")),
        )
        .build()
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut cmd = tar().unwrap_or_else(|err| err.exit());
    let parsed = match cmd.run() {
        Ok(it) => it,
        Err(err) => err.exit(),
    };

    let get = |name: &str| cmd.get(name).cloned();
    match parsed.active().first().map(String::as_str) {
        Some("list") => {
            let long = cmd.find(&["list"]).and_then(|it| it.get("--long")).and_then(Value::as_bool);
            println!("listing {:?}, long = {:?}", get("--file"), long);
        }
        _ => println!(
            "gz = {:?}, create = {:?}, file = {:?}, level = {:?}, sources = {:?}",
            get("--gz"),
            get("--create"),
            get("--file"),
            get("--level"),
            get("SOURCE"),
        ),
    }
}
