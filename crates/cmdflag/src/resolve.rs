//! Binds scanned tokens to flag sinks, then recurses into subcommands.

use crate::{
    env::Env,
    scan::{Argument, ScanResult},
    Command, Error, Result,
};

/// Resolves the whole tree and returns the path of the active subcommand.
pub(crate) fn resolve(cmd: &mut Command, scanned: &ScanResult, env: &dyn Env) -> Result<Vec<String>> {
    let mut context = Vec::new();
    resolve_level(cmd, scanned, env, &mut context)
}

fn resolve_level(
    cmd: &mut Command,
    scanned: &ScanResult,
    env: &dyn Env,
    context: &mut Vec<String>,
) -> Result<Vec<String>> {
    context.push(cmd.name().to_string());
    let ctx = context.join(" ");
    tracing::debug!(command = %ctx, tokens = scanned.args.len(), "resolve");

    let mut level = Level::new(cmd, &ctx, &scanned.args);
    for (pos, arg) in scanned.args.iter().enumerate() {
        match arg {
            Argument::Flag { name, attached } => level.flag(name, attached.as_deref())?,
            Argument::Value(value) => level.value(pos, value)?,
        }
    }
    level.finish_open()?;
    let applied = level.applied;
    fallback(cmd, &ctx, &applied, env)?;

    let mut active = Vec::new();
    for (name, sub_scan) in &scanned.children {
        let Some(idx) = cmd.subcommand_index(name) else { continue };
        let sub = &mut cmd.subcommands[idx];
        sub.enabled = true;
        let path = resolve_level(sub, sub_scan, env, context)?;
        if scanned.first() == Some(name.as_str()) {
            active.push(name.clone());
            active.extend(path);
        }
    }

    context.pop();
    Ok(active)
}

/// The flag waiting for its value.
struct Open {
    idx: usize,
    token: String,
    filled: bool,
}

struct Level<'a> {
    cmd: &'a mut Command,
    ctx: &'a str,
    applied: Vec<bool>,
    open: Option<Open>,
    next_positional: usize,
    last_flag: Option<usize>,
}

impl<'a> Level<'a> {
    fn new(cmd: &'a mut Command, ctx: &'a str, args: &[Argument]) -> Level<'a> {
        let applied = vec![false; cmd.flags.len()];
        let last_flag = args.iter().rposition(Argument::is_flag);
        Level { cmd, ctx, applied, open: None, next_positional: 0, last_flag }
    }

    fn flag(&mut self, name: &str, attached: Option<&str>) -> Result<()> {
        self.finish_open()?;

        let idx = self.cmd.flag_index(name).ok_or_else(|| Error::UnknownFlag {
            context: self.ctx.to_string(),
            flag: name.to_string(),
        })?;
        let flag = &mut self.cmd.flags[idx];
        if self.applied[idx] && !flag.value.is_seq() {
            return Err(Error::DuplicateFlag {
                context: self.ctx.to_string(),
                flag: flag.display_name(),
            });
        }

        if let Some(value) = attached {
            flag.apply(self.ctx, value)?;
            self.applied[idx] = true;
        } else if flag.value.is_bool() {
            // Booleans never take the next token, it might be a positional.
            flag.apply(self.ctx, "true")?;
            self.applied[idx] = true;
        } else {
            self.open = Some(Open { idx, token: name.to_string(), filled: false });
        }
        Ok(())
    }

    fn value(&mut self, pos: usize, value: &str) -> Result<()> {
        if let Some(open) = &mut self.open {
            let flag = &mut self.cmd.flags[open.idx];
            flag.apply(self.ctx, value)?;
            self.applied[open.idx] = true;
            if flag.value.is_seq() {
                open.filled = true;
            } else {
                self.open = None;
            }
            return Ok(());
        }

        if let Some(&idx) = self.cmd.positionals.get(self.next_positional) {
            let flag = &mut self.cmd.flags[idx];
            flag.apply(self.ctx, value)?;
            self.applied[idx] = true;
            if !flag.value.is_seq() {
                self.next_positional += 1;
            }
            return Ok(());
        }

        let unexpected = || Error::UnexpectedValue {
            context: self.ctx.to_string(),
            value: value.to_string(),
        };
        match &mut self.cmd.overflow {
            Some(overflow) => {
                if !overflow.anywhere && self.last_flag.map_or(false, |last| last > pos) {
                    return Err(unexpected());
                }
                tracing::trace!(value, "overflow");
                overflow.values.push(value.to_string());
                Ok(())
            }
            None => Err(unexpected()),
        }
    }

    /// A flag still open without any value is only legal for sequences
    /// that already received one.
    fn finish_open(&mut self) -> Result<()> {
        match self.open.take() {
            Some(Open { token, filled: false, .. }) => Err(Error::MissingValue {
                context: self.ctx.to_string(),
                flag: token,
            }),
            _ => Ok(()),
        }
    }
}

/// Environment first, then defaults, for every flag without an explicit value.
fn fallback(cmd: &mut Command, ctx: &str, applied: &[bool], env: &dyn Env) -> Result<()> {
    for (idx, flag) in cmd.flags.iter_mut().enumerate() {
        if applied[idx] {
            continue;
        }
        let mut values: Vec<String> = match flag.env.as_deref().and_then(|name| env.var(name)) {
            Some(text) if flag.value.is_seq() => text
                .split(flag.sep.as_str())
                .map(str::trim)
                .filter(|it| !it.is_empty())
                .map(String::from)
                .collect(),
            Some(text) => vec![text],
            None => Vec::new(),
        };
        if values.is_empty() {
            values = flag.defaults.clone();
        }
        if values.is_empty() {
            continue;
        }
        tracing::debug!(flag = %flag.display_name(), ?values, "fallback");
        for value in &values {
            flag.apply(ctx, value)?;
        }
    }
    Ok(())
}
