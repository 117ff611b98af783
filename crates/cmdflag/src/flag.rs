use crate::{
    error::model_err,
    help,
    value::{Scalar, Value},
    Error, Result,
};

/// A named (or positional) option bound to a [`Value`] sink.
///
/// Names are given as one comma-separated string, `"-z, --gz"`. Every name
/// must start with a dash; single-dash single-character names take part in
/// short flag clusters such as `-zcf`.
#[derive(Debug, Clone)]
pub struct Flag {
    pub(crate) names: Vec<String>,
    pub(crate) positional: bool,
    pub(crate) value: Value,
    pub(crate) usage: String,
    pub(crate) desc: String,
    pub(crate) arglist: Option<String>,
    pub(crate) env: Option<String>,
    pub(crate) sep: String,
    pub(crate) defaults: Vec<String>,
    pub(crate) selects: Vec<String>,
    pub(crate) choices: Vec<Scalar>,
}

impl Flag {
    pub fn new(names: &str, value: Value) -> Flag {
        let names = names
            .split(',')
            .map(str::trim)
            .filter(|it| !it.is_empty())
            .map(String::from)
            .collect();
        Flag::with_names(names, false, value)
    }

    /// A flag bound by position rather than by name. `name` is only used in
    /// help and error messages.
    pub fn positional(name: &str, value: Value) -> Flag {
        Flag::with_names(vec![name.trim().to_string()], true, value)
    }

    fn with_names(names: Vec<String>, positional: bool, value: Value) -> Flag {
        Flag {
            names,
            positional,
            value,
            usage: String::new(),
            desc: String::new(),
            arglist: None,
            env: None,
            sep: ",".to_string(),
            defaults: Vec::new(),
            selects: Vec::new(),
            choices: Vec::new(),
        }
    }

    pub fn usage(mut self, usage: &str) -> Flag {
        self.usage = usage.to_string();
        self
    }

    pub fn desc(mut self, desc: &str) -> Flag {
        self.desc = help::dedent(desc);
        self
    }

    /// Placeholder shown after the flag names in help, `-f <FILE>`.
    pub fn arglist(mut self, arglist: &str) -> Flag {
        self.arglist = Some(arglist.to_string());
        self
    }

    pub fn env(mut self, name: &str) -> Flag {
        self.env = Some(name.to_string());
        self
    }

    /// Separator for splitting the environment value of sequence flags.
    pub fn sep(mut self, sep: &str) -> Flag {
        self.sep = sep.to_string();
        self
    }

    pub fn default(mut self, value: &str) -> Flag {
        self.defaults = vec![value.to_string()];
        self
    }

    /// Defaults for sequence flags, applied in order.
    pub fn defaults<I, T>(mut self, values: I) -> Flag
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.defaults = values.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts accepted values. Only for string and number sinks.
    pub fn selects<I, T>(mut self, values: I) -> Flag
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.selects = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn display_name(&self) -> String {
        self.names.join(", ")
    }

    pub fn is_positional(&self) -> bool {
        self.positional
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn usage_text(&self) -> &str {
        &self.usage
    }

    pub fn desc_text(&self) -> &str {
        &self.desc
    }

    pub fn arglist_text(&self) -> Option<&str> {
        self.arglist.as_deref()
    }

    pub fn env_name(&self) -> Option<&str> {
        self.env.as_deref()
    }

    pub fn separator(&self) -> &str {
        &self.sep
    }

    pub fn default_values(&self) -> &[String] {
        &self.defaults
    }

    pub fn select_values(&self) -> &[String] {
        &self.selects
    }

    /// Converts `text`, checks it against the selectable set and stores it.
    pub(crate) fn apply(&mut self, context: &str, text: &str) -> Result<()> {
        let scalar = self.value.convert(text).map_err(|source| Error::Conversion {
            context: context.to_string(),
            flag: self.display_name(),
            source,
        })?;
        if !self.choices.is_empty() && !self.choices.iter().any(|it| it.same(&scalar)) {
            return Err(Error::InvalidSelection {
                context: context.to_string(),
                flag: self.display_name(),
                value: text.to_string(),
                choices: self.selects.join(", "),
            });
        }
        tracing::trace!(flag = %self.display_name(), value = %scalar, "apply");
        self.value.store(scalar);
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.value.reset();
    }

    /// Checks names, selects and defaults; converts selects once.
    pub(crate) fn validate(&mut self, command: &str) -> Result<()> {
        if self.names.is_empty() {
            return Err(model_err!("flag without names in `{command}`"));
        }
        if self.positional {
            if self.names[0].is_empty() {
                return Err(model_err!("positional flag without a name in `{command}`"));
            }
        } else {
            for name in &self.names {
                if !name.starts_with('-') || name.len() < 2 || name == "--" {
                    return Err(model_err!("flag name `{name}` must start with `-`"));
                }
                if name.contains('=') || name.contains(char::is_whitespace) {
                    return Err(model_err!("flag name `{name}` contains `=` or whitespace"));
                }
            }
        }
        if self.sep.is_empty() {
            return Err(model_err!("empty separator for `{}`", self.display_name()));
        }

        if !self.selects.is_empty() {
            if self.value.is_bool() {
                return Err(model_err!(
                    "selects are not supported for {} flag `{}`",
                    self.value.type_name(),
                    self.display_name()
                ));
            }
            let mut choices = Vec::with_capacity(self.selects.len());
            for text in &self.selects {
                let choice = self.value.convert(text).map_err(|err| {
                    model_err!("invalid select for `{}`: {err}", self.display_name())
                })?;
                choices.push(choice);
            }
            self.choices = choices;
        }

        if self.defaults.len() > 1 && !self.value.is_seq() {
            return Err(model_err!("several defaults for single flag `{}`", self.display_name()));
        }
        for text in &self.defaults {
            let scalar = self.value.convert(text).map_err(|err| {
                model_err!("invalid default for `{}`: {err}", self.display_name())
            })?;
            if !self.choices.is_empty() && !self.choices.iter().any(|it| it.same(&scalar)) {
                return Err(model_err!(
                    "default `{text}` of `{}` is not one of [{}]",
                    self.display_name(),
                    self.selects.join(", ")
                ));
            }
        }
        Ok(())
    }
}
