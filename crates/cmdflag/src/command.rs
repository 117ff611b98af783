use std::collections::{HashMap, HashSet};

use crate::{
    env::{Env, SystemEnv},
    error::{model_err, ErrorPolicy},
    help, resolve, scan,
    value::Value,
    Flag, Result,
};

/// Declarative description of a command, turned into a validated
/// [`Command`] by [`CommandBuilder::build`].
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    names: Vec<String>,
    usage: String,
    desc: String,
    version: String,
    flags: Vec<Flag>,
    subcommands: Vec<CommandBuilder>,
    overflow: Option<bool>,
    help: bool,
    policy: ErrorPolicy,
}

impl CommandBuilder {
    pub fn new(name: &str) -> CommandBuilder {
        CommandBuilder {
            names: vec![name.to_string()],
            usage: String::new(),
            desc: String::new(),
            version: String::new(),
            flags: Vec::new(),
            subcommands: Vec::new(),
            overflow: None,
            help: true,
            policy: ErrorPolicy::default(),
        }
    }

    /// Another name this command can be invoked by.
    pub fn alias(mut self, name: &str) -> CommandBuilder {
        self.names.push(name.to_string());
        self
    }

    pub fn usage(mut self, usage: &str) -> CommandBuilder {
        self.usage = usage.to_string();
        self
    }

    pub fn desc(mut self, desc: &str) -> CommandBuilder {
        self.desc = help::dedent(desc);
        self
    }

    pub fn version(mut self, version: &str) -> CommandBuilder {
        self.version = help::dedent(version);
        self
    }

    pub fn flag(mut self, flag: Flag) -> CommandBuilder {
        self.flags.push(flag);
        self
    }

    pub fn subcommand(mut self, cmd: CommandBuilder) -> CommandBuilder {
        self.subcommands.push(cmd);
        self
    }

    /// Collects trailing values once positional flags are exhausted. With
    /// `anywhere` unset they must come after the last flag.
    pub fn overflow(mut self, anywhere: bool) -> CommandBuilder {
        self.overflow = Some(anywhere);
        self
    }

    /// Whether `-h, --help` is registered on the root. On by default.
    pub fn help(mut self, help: bool) -> CommandBuilder {
        self.help = help;
        self
    }

    pub fn error_policy(mut self, policy: ErrorPolicy) -> CommandBuilder {
        self.policy = policy;
        self
    }

    pub fn build(mut self) -> Result<Command> {
        let with_help = self.help && !self.uses_name("-h") && !self.uses_name("--help");
        if with_help {
            self.flags.push(
                Flag::new("-h, --help", Value::bool()).usage("Prints help information."),
            );
        }
        let policy = self.policy;

        let mut cmd = self.build_rec(&mut Vec::new())?;
        cmd.policy = policy;
        if with_help {
            cmd.help_flag = cmd.index.get("-h").copied();
        }
        tracing::debug!(command = %cmd.name(), "built command tree");
        Ok(cmd)
    }

    fn uses_name(&self, name: &str) -> bool {
        self.flags.iter().any(|flag| !flag.positional && flag.names.iter().any(|it| it == name))
            || self.subcommands.iter().any(|sub| sub.names.iter().any(|it| it == name))
            || self.subcommands.iter().any(|sub| sub.uses_name(name))
    }

    fn build_rec(self, ancestors: &mut Vec<String>) -> Result<Command> {
        let cmd_name = self.names[0].clone();
        for name in &self.names {
            if name.is_empty() || name.starts_with('-') || name.contains(char::is_whitespace) {
                return Err(model_err!("invalid command name `{name}`"));
            }
        }

        let mut local = HashSet::new();
        let mut claim = |name: &str| {
            if ancestors.iter().any(|it| it == name) || !local.insert(name.to_string()) {
                return Err(model_err!("duplicate name `{name}` in `{cmd_name}`"));
            }
            Ok(())
        };

        let mut flags = Vec::with_capacity(self.flags.len());
        let mut index = HashMap::new();
        let mut positionals = Vec::new();
        for mut flag in self.flags {
            flag.validate(&cmd_name)?;
            let idx = flags.len();
            if flag.positional {
                positionals.push(idx);
            } else {
                for name in &flag.names {
                    claim(name)?;
                    index.insert(name.clone(), idx);
                }
            }
            flags.push(flag);
        }

        let mut sub_index = HashMap::new();
        for (idx, sub) in self.subcommands.iter().enumerate() {
            for name in &sub.names {
                claim(name)?;
                sub_index.insert(name.clone(), idx);
            }
        }

        let mut positional_names = HashSet::new();
        for &idx in &positionals {
            let name = flags[idx].names[0].as_str();
            if index.contains_key(name) || !positional_names.insert(name) {
                return Err(model_err!("duplicate name `{name}` in `{cmd_name}`"));
            }
        }

        if let Some((_, init)) = positionals.split_last() {
            if let Some(&idx) = init.iter().find(|&&idx| flags[idx].value.is_seq()) {
                return Err(model_err!(
                    "only the last positional flag of `{cmd_name}` may be a sequence, not `{}`",
                    flags[idx].display_name()
                ));
            }
        }
        let seq_positional = positionals.last().map_or(false, |&idx| flags[idx].value.is_seq());
        if seq_positional && self.overflow.is_some() {
            return Err(model_err!(
                "`{cmd_name}` has both a sequence positional flag and an overflow sink"
            ));
        }

        let depth = ancestors.len();
        ancestors.extend(local);
        let subcommands = self
            .subcommands
            .into_iter()
            .map(|sub| sub.build_rec(ancestors))
            .collect::<Result<Vec<_>>>();
        ancestors.truncate(depth);

        Ok(Command {
            names: self.names,
            usage: self.usage,
            desc: self.desc,
            version: self.version,
            flags,
            index,
            positionals,
            subcommands: subcommands?,
            sub_index,
            enabled: false,
            overflow: self.overflow.map(|anywhere| Overflow { values: Vec::new(), anywhere }),
            policy: ErrorPolicy::default(),
            help_flag: None,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Overflow {
    pub(crate) values: Vec<String>,
    pub(crate) anywhere: bool,
}

/// A validated command tree. Parsing writes into the flag sinks in place;
/// call [`Command::reset`] before parsing again with the same tree.
#[derive(Debug, Clone)]
pub struct Command {
    names: Vec<String>,
    usage: String,
    desc: String,
    version: String,
    pub(crate) flags: Vec<Flag>,
    index: HashMap<String, usize>,
    pub(crate) positionals: Vec<usize>,
    pub(crate) subcommands: Vec<Command>,
    sub_index: HashMap<String, usize>,
    pub(crate) enabled: bool,
    pub(crate) overflow: Option<Overflow>,
    policy: ErrorPolicy,
    help_flag: Option<usize>,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.names[0]
    }

    pub fn aliases(&self) -> &[String] {
        &self.names[1..]
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// Looks a flag up by any of its names, or a positional flag by its
    /// placeholder name.
    pub fn flag(&self, name: &str) -> Option<&Flag> {
        match self.index.get(name) {
            Some(&idx) => Some(&self.flags[idx]),
            None => self
                .positionals
                .iter()
                .map(|&idx| &self.flags[idx])
                .find(|flag| flag.names[0] == name),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.flag(name).map(Flag::value)
    }

    pub fn subcommands(&self) -> &[Command] {
        &self.subcommands
    }

    pub fn subcommand(&self, name: &str) -> Option<&Command> {
        self.sub_index.get(name).map(|&idx| &self.subcommands[idx])
    }

    /// Walks down the tree by command names, not including this command.
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<&Command> {
        path.iter().try_fold(self, |cmd, name| cmd.subcommand(name.as_ref()))
    }

    /// Set once this command was selected on the command line.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn has_overflow(&self) -> bool {
        self.overflow.is_some()
    }

    pub fn overflow(&self) -> &[String] {
        self.overflow.as_ref().map_or(&[], |it| it.values.as_slice())
    }

    pub(crate) fn has_flag(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub(crate) fn flag_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn subcommand_index(&self, name: &str) -> Option<usize> {
        self.sub_index.get(name).copied()
    }

    /// Restores every sink of the tree to its zero value.
    pub fn reset(&mut self) {
        self.flags.iter_mut().for_each(Flag::reset);
        self.enabled = false;
        if let Some(overflow) = &mut self.overflow {
            overflow.values.clear();
        }
        self.subcommands.iter_mut().for_each(Command::reset);
    }

    /// Parses `args` against the process environment. The first argument is
    /// the program name and is skipped.
    pub fn parse<I, T>(&mut self, args: I) -> Result<Parsed>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.parse_with_env(args, &SystemEnv)
    }

    pub fn parse_with_env<I, T>(&mut self, args: I, env: &dyn Env) -> Result<Parsed>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args = args.into_iter().skip(1).map(Into::into).collect::<Vec<String>>();
        let scanned = scan::scan(self, &args);
        let active = resolve::resolve(self, &scanned, env)?;
        let help = self.help_flag.map_or(false, |idx| self.flags[idx].value == Value::Bool(true));
        Ok(Parsed { active, help })
    }

    /// Parses `std::env::args_os`, replacing invalid UTF-8.
    pub fn parse_from_env(&mut self) -> Result<Parsed> {
        self.parse(std::env::args_os().map(|it| it.to_string_lossy().into_owned()))
    }

    /// Like [`Command::parse_from_env`], but prints help and exits when help
    /// was requested, and routes errors through the [`ErrorPolicy`].
    pub fn run(&mut self) -> Result<Parsed> {
        self.run_from(std::env::args_os().map(|it| it.to_string_lossy().into_owned()))
    }

    pub fn run_from<I, T>(&mut self, args: I) -> Result<Parsed>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        match self.parse(args) {
            Ok(parsed) => {
                if parsed.help_requested() {
                    let root: &Command = self;
                    let cmd = root.find(parsed.active()).unwrap_or(root);
                    print!("{}", cmd.help());
                    std::process::exit(0)
                }
                Ok(parsed)
            }
            Err(err) => {
                self.policy.handle(err)?;
                Ok(Parsed { active: Vec::new(), help: false })
            }
        }
    }
}

/// Outcome of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    active: Vec<String>,
    help: bool,
}

impl Parsed {
    /// Path from the root to the command that ran, root excluded. Empty when
    /// no subcommand was given.
    pub fn active(&self) -> &[String] {
        &self.active
    }

    pub fn help_requested(&self) -> bool {
        self.help
    }
}
