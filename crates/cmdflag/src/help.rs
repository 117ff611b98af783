use std::fmt::Write;

use crate::{Command, Flag};

macro_rules! w {
    ($($tt:tt)*) => {{
        let _ = write!($($tt)*);
    }};
}

impl Command {
    /// Renders help for this command and a one-line summary of each
    /// subcommand.
    pub fn help(&self) -> String {
        let mut buf = String::new();
        help_rec(&mut buf, self);
        buf
    }
}

fn help_rec(buf: &mut String, cmd: &Command) {
    w!(buf, "{}\n", cmd.name());
    if !cmd.usage().is_empty() {
        write_lines_indented(buf, cmd.usage(), 2);
    }
    if !cmd.desc().is_empty() {
        if !cmd.usage().is_empty() {
            blank_line(buf);
        }
        write_lines_indented(buf, cmd.desc(), 2);
    }

    if !cmd.version().is_empty() {
        blank_line(buf);
        w!(buf, "VERSION:\n");
        write_lines_indented(buf, cmd.version(), 4);
    }

    let positionals = cmd.flags().iter().filter(|it| it.is_positional()).collect::<Vec<_>>();
    if !positionals.is_empty() || cmd.has_overflow() {
        blank_line(buf);
        w!(buf, "ARGS:\n");

        let mut blank = "";
        for flag in positionals {
            w!(buf, "{blank}");
            blank = "\n";

            let dots = if flag.value().is_seq() { "..." } else { "" };
            w!(buf, "    [{}]{dots}\n", flag.names()[0]);
            write_flag_body(buf, flag);
        }
        if cmd.has_overflow() {
            w!(buf, "{blank}");
            w!(buf, "    [ARGS]...\n");
        }
    }

    let named = cmd.flags().iter().filter(|it| !it.is_positional()).collect::<Vec<_>>();
    if !named.is_empty() {
        blank_line(buf);
        w!(buf, "OPTIONS:\n");

        let mut blank = "";
        for flag in named {
            w!(buf, "{blank}");
            blank = "\n";

            let value = if flag.value().is_bool() {
                String::new()
            } else {
                let dots = if flag.value().is_seq() { "..." } else { "" };
                format!(" <{}>{dots}", flag.arglist_text().unwrap_or("VALUE"))
            };
            w!(buf, "    {}{value}\n", flag.display_name());
            write_flag_body(buf, flag);
        }
    }

    if !cmd.subcommands().is_empty() {
        blank_line(buf);
        w!(buf, "SUBCOMMANDS:\n");

        let mut blank = "";
        for sub in cmd.subcommands() {
            w!(buf, "{blank}");
            blank = "\n";

            w!(buf, "    {}", sub.name());
            for alias in sub.aliases() {
                w!(buf, ", {alias}");
            }
            w!(buf, "\n");
            if !sub.usage().is_empty() {
                write_lines_indented(buf, sub.usage(), 6);
            }
        }
    }
}

fn write_flag_body(buf: &mut String, flag: &Flag) {
    let info = value_info(flag);
    if flag.usage_text().is_empty() {
        w!(buf, "      ({info})\n");
    } else {
        w!(buf, "      {} ({info})\n", flag.usage_text());
    }
    if !flag.desc_text().is_empty() {
        write_lines_indented(buf, flag.desc_text(), 6);
    }
}

fn value_info(flag: &Flag) -> String {
    let value = flag.value();
    let mut info = format!("type: {}", value.type_name());
    if let Some(env) = flag.env_name() {
        w!(info, "; env: {env}");
        if value.is_seq() {
            w!(info, ", split by '{}'", flag.separator());
        }
    }
    let defaults = flag.default_values();
    if !defaults.is_empty() {
        if value.is_seq() {
            w!(info, "; default: [{}]", defaults.join(", "));
        } else {
            w!(info, "; default: {}", defaults.join(", "));
        }
    }
    if !flag.select_values().is_empty() {
        w!(info, "; selects: [{}]", flag.select_values().join(", "));
    }
    info
}

fn write_lines_indented(buf: &mut String, multiline_str: &str, indent: usize) {
    for line in multiline_str.split('\n').map(str::trim_end) {
        if line.is_empty() {
            w!(buf, "\n")
        } else {
            w!(buf, "{blank:indent$}{line}\n", blank = "");
        }
    }
}

fn blank_line(buf: &mut String) {
    w!(buf, "\n");
}

/// Drops leading and trailing blank lines and the indentation common to
/// all remaining lines.
pub(crate) fn dedent(text: &str) -> String {
    let lines = text.lines().collect::<Vec<_>>();
    fn is_blank(line: &str) -> bool {
        line.trim().is_empty()
    }

    let (Some(begin), Some(end)) =
        (lines.iter().position(|it| !is_blank(it)), lines.iter().rposition(|it| !is_blank(it)))
    else {
        return String::new();
    };
    let lines = &lines[begin..=end];
    let indent = lines
        .iter()
        .filter(|it| !is_blank(it))
        .map(|it| it.len() - it.trim_start().len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|it| it.get(indent..).unwrap_or("").trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}
