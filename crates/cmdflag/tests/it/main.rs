mod help;
mod scan;

use std::{collections::HashMap, fmt::Write};

use cmdflag::{Command, Value};
use expect_test::Expect;

fn check(cmd: &mut Command, args: &str, expect: Expect) {
    check_env(cmd, args, &[], expect)
}

/// Parses whitespace-separated `args` from a clean state and snapshots
/// either the error or every sink of the selected commands.
fn check_env(cmd: &mut Command, args: &str, vars: &[(&str, &str)], expect: Expect) {
    let env = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<HashMap<String, String>>();
    cmd.reset();
    let args = std::iter::once("prog").chain(args.split_ascii_whitespace());
    match cmd.parse_with_env(args, &env) {
        Ok(parsed) => {
            let mut actual = dump(cmd);
            if !parsed.active().is_empty() {
                let _ = writeln!(actual, "active: {}", parsed.active().join(" "));
            }
            expect.assert_eq(&actual);
        }
        Err(err) => expect.assert_eq(&err.to_string()),
    }
}

fn dump(cmd: &Command) -> String {
    let mut buf = String::new();
    dump_rec(&mut buf, cmd, "");
    buf
}

fn dump_rec(buf: &mut String, cmd: &Command, indent: &str) {
    for flag in cmd.flags() {
        if flag.names()[0] == "-h" {
            continue;
        }
        let _ = writeln!(buf, "{indent}{}: {}", flag.names()[0], render(flag.value()));
    }
    if cmd.has_overflow() {
        let _ = writeln!(buf, "{indent}...: {:?}", cmd.overflow());
    }
    for sub in cmd.subcommands().iter().filter(|it| it.enabled()) {
        let _ = writeln!(buf, "{indent}{}", sub.name());
        dump_rec(buf, sub, &format!("{indent}  "));
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Bool(it) => it.to_string(),
        Value::String(it) => format!("{it:?}"),
        Value::Number(it) => it.to_string(),
        Value::BoolSeq(it) => format!("{it:?}"),
        Value::StringSeq(it) => format!("{it:?}"),
        Value::NumberSeq(_, it) => {
            format!("[{}]", it.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))
        }
    }
}
