//! Simulator-style plusargs.
//!
//! The driver forwards process arguments to the model untouched; models pick
//! their own options out of them with this parser. Recognized forms:
//! 1. **Valued:** `+NAME=value` (the value may itself contain `=`).
//! 2. **Flags:** `+NAME`.
//!
//! Anything not starting with `+` is kept in `raw()` but otherwise ignored.
//! When a name appears more than once the first occurrence wins, as with
//! `$value$plusargs`.

use std::str::FromStr;

use crate::common::ScenarioError;

/// Parsed view of forwarded process arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlusArgs {
    raw: Vec<String>,
    entries: Vec<(String, Option<String>)>,
}

impl PlusArgs {
    /// Parses a list of arguments.
    ///
    /// # Arguments
    ///
    /// * `args` - Arguments as forwarded by the driver, without the program name.
    ///
    /// # Returns
    ///
    /// The parsed plusargs; never fails, malformed entries are simply not plusargs.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let raw: Vec<String> = args.into_iter().map(Into::into).collect();
        let entries = raw
            .iter()
            .filter_map(|arg| arg.strip_prefix('+'))
            .filter(|body| !body.is_empty())
            .map(|body| match body.split_once('=') {
                Some((name, value)) => (name.to_string(), Some(value.to_string())),
                None => (body.to_string(), None),
            })
            .collect();
        Self { raw, entries }
    }

    /// Returns the arguments exactly as they were forwarded.
    pub fn raw(&self) -> &[String] {
        &self.raw
    }

    /// Returns `true` if `+name` or `+name=...` was given.
    pub fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Returns the value of the first `+name=value`, if any.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Parses the value of `+name=value` into `T`.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::InvalidPlusarg` if the plusarg is present but its
    /// value does not parse. An absent plusarg is `Ok(None)`.
    pub fn parse_value<T>(&self, name: &str) -> Result<Option<T>, ScenarioError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(value) = self.value(name) else {
            return Ok(None);
        };
        value
            .parse::<T>()
            .map(Some)
            .map_err(|e| ScenarioError::InvalidPlusarg {
                name: name.to_string(),
                value: value.to_string(),
                reason: e.to_string(),
            })
    }
}
