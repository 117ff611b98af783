//! Splits a flat argument list into per-command token streams.
//!
//! Scanning never fails. Tokens are classified using only the flags and
//! subcommands registered at the level being scanned; everything that is not
//! recognized is left for the resolver to reject.

use crate::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// A flag name, possibly with a value attached by `name=value`.
    Flag { name: String, attached: Option<String> },
    Value(String),
}

impl Argument {
    fn flag(name: &str) -> Argument {
        Argument::Flag { name: name.to_string(), attached: None }
    }

    fn value(text: &str) -> Argument {
        Argument::Value(text.to_string())
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, Argument::Flag { .. })
    }
}

/// Tokens of one command level plus the runs split off for subcommands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub args: Vec<Argument>,
    /// Canonical subcommand name and its own scan, in the order they were
    /// encountered.
    pub children: Vec<(String, ScanResult)>,
}

impl ScanResult {
    /// The first subcommand encountered, which decides the active command.
    pub fn first(&self) -> Option<&str> {
        self.children.first().map(|(name, _)| name.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&ScanResult> {
        self.children.iter().find(|(it, _)| it == name).map(|(_, scan)| scan)
    }
}

/// One raw argument after classification at the current level.
#[derive(Debug)]
enum Item {
    /// A standalone `-` or `--` that switched the mode.
    Marker,
    /// A plain value that can't name a subcommand: forced by a marker or
    /// produced by a trailing marker.
    Forced(Argument),
    /// A bare word, which may name a subcommand.
    Word(Argument),
    Flags(Vec<Argument>),
}

pub fn scan<S: AsRef<str>>(cmd: &Command, args: &[S]) -> ScanResult {
    tracing::debug!(command = cmd.name(), args = args.len(), "scan");
    let items = classify(cmd, args);

    let mut res = ScanResult::default();
    // (subcommand index, raw arguments of its run)
    let mut run: Option<(usize, Vec<&str>)> = None;
    for (raw, item) in args.iter().map(AsRef::as_ref).zip(items) {
        if let Some((_, rargs)) = &mut run {
            if closes_run(cmd, raw, &item) {
                close_run(cmd, &mut res, run.take());
            } else {
                rargs.push(raw);
                continue;
            }
        }
        match item {
            Item::Marker => (),
            Item::Forced(arg) => res.args.push(arg),
            Item::Word(arg) => match cmd.subcommand_index(raw) {
                Some(idx) if res.child(cmd.subcommands[idx].name()).is_none() => {
                    tracing::trace!(subcommand = raw, "open run");
                    run = Some((idx, Vec::new()));
                }
                _ => res.args.push(arg),
            },
            Item::Flags(flags) => res.args.extend(flags),
        }
    }
    close_run(cmd, &mut res, run);
    res
}

fn close_run(cmd: &Command, res: &mut ScanResult, run: Option<(usize, Vec<&str>)>) {
    if let Some((idx, rargs)) = run {
        let sub = &cmd.subcommands[idx];
        res.children.push((sub.name().to_string(), scan(sub, &rargs)));
    }
}

/// A run ends at the first argument that names a flag of the parent level,
/// either as a whole or before an attached `=value`. Clusters and glued
/// values stay with the child, which may own a longer name like `-verbose`.
fn closes_run(cmd: &Command, raw: &str, item: &Item) -> bool {
    if !matches!(item, Item::Flags(_)) {
        return false;
    }
    cmd.has_flag(raw) || split_attached(raw).map_or(false, |(name, _)| cmd.has_flag(name))
}

/// Resolves `-` and `--` markers and flag splitting for every argument,
/// before any subcommand run is split off.
fn classify<S: AsRef<str>>(cmd: &Command, args: &[S]) -> Vec<Item> {
    let mut items = Vec::with_capacity(args.len());
    let mut force_rest = false;
    let mut force_next = false;
    for (i, arg) in args.iter().map(AsRef::as_ref).enumerate() {
        let last = i + 1 == args.len();
        let item = if force_rest || force_next {
            force_next = false;
            Item::Forced(Argument::value(arg))
        } else {
            match arg {
                "-" | "--" if last => Item::Forced(Argument::value(arg)),
                "-" => {
                    force_next = true;
                    Item::Marker
                }
                "--" => {
                    force_rest = true;
                    Item::Marker
                }
                _ if arg.starts_with("--") => Item::Flags(vec![long_flag(arg)]),
                _ if arg.starts_with('-') => Item::Flags(short_flags(cmd, arg)),
                _ => Item::Word(Argument::value(arg)),
            }
        };
        tracing::trace!(arg, ?item, "classify");
        items.push(item);
    }
    items
}

/// Splits on the first `=` that is neither the first nor the last character.
fn split_attached(arg: &str) -> Option<(&str, &str)> {
    let idx = arg.match_indices('=').map(|(idx, _)| idx).find(|&idx| idx > 0 && idx + 1 < arg.len())?;
    Some((&arg[..idx], &arg[idx + 1..]))
}

fn long_flag(arg: &str) -> Argument {
    match split_attached(arg) {
        Some((name, value)) => {
            Argument::Flag { name: name.to_string(), attached: Some(value.to_string()) }
        }
        None => Argument::flag(arg),
    }
}

fn short_flags(cmd: &Command, arg: &str) -> Vec<Argument> {
    if let Some((name, value)) = split_attached(arg) {
        if cmd.has_flag(name) {
            return vec![Argument::Flag { name: name.to_string(), attached: Some(value.to_string()) }];
        }
        if let Some(mut flags) = cluster(cmd, name) {
            if let Some(Argument::Flag { attached, .. }) = flags.last_mut() {
                *attached = Some(value.to_string());
            }
            return flags;
        }
    }

    if cmd.has_flag(arg) {
        return vec![Argument::flag(arg)];
    }
    if let Some(flags) = cluster(cmd, arg) {
        return flags;
    }

    // `-I/usr/include`: a known single-character flag glued to its value.
    let rest = &arg[1..];
    if let Some(first) = rest.chars().next() {
        let name = format!("-{first}");
        if cmd.has_flag(&name) {
            return vec![Argument::flag(&name), Argument::value(&rest[first.len_utf8()..])];
        }
    }

    match split_attached(arg) {
        Some((name, value)) => {
            vec![Argument::Flag { name: name.to_string(), attached: Some(value.to_string()) }]
        }
        None => vec![Argument::flag(arg)],
    }
}

/// `-zcf` as `-z -c -f` when every character is a registered short flag.
fn cluster(cmd: &Command, arg: &str) -> Option<Vec<Argument>> {
    let chars = arg.strip_prefix('-')?;
    if chars.is_empty() {
        return None;
    }
    chars
        .chars()
        .map(|c| {
            let name = format!("-{c}");
            if cmd.has_flag(&name) {
                Some(Argument::Flag { name, attached: None })
            } else {
                None
            }
        })
        .collect()
}
