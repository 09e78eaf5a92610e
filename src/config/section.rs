//! Typed access to untyped config sections

use crate::config::ini::{Section, Value};
use crate::error::{Result, ShellError};

/// A read-only typed view over one section of a parsed document
///
/// `key_name` describes where the values came from (`"flag"`, `"config key"`)
/// and is used in every error message.
#[derive(Debug, Clone, Copy)]
pub struct TypedSection<'a> {
    key_name: &'a str,
    values: &'a Section,
}

impl<'a> TypedSection<'a> {
    #[must_use]
    pub const fn new(key_name: &'a str, values: &'a Section) -> Self {
        Self { key_name, values }
    }

    /// The raw values behind this view
    #[must_use]
    pub const fn values(&self) -> &'a Section {
        self.values
    }

    /// Names of every key in this section
    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        self.values.keys().map(String::as_str)
    }

    /// Optional string value
    ///
    /// # Errors
    ///
    /// Returns an error if the key holds a number or an object.
    pub fn str_opt(&self, key: &str) -> Result<Option<&'a str>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(self.type_mismatch(key, "string", other)),
        }
    }

    /// Required string value
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or not a string.
    pub fn str(&self, key: &str) -> Result<&'a str> {
        self.require(key, self.str_opt(key)?)
    }

    /// Optional number value; numeric strings are parsed as base-10 integers
    ///
    /// # Errors
    ///
    /// Returns an error if the key holds an object or a non-numeric string.
    pub fn number_opt(&self, key: &str) -> Result<Option<i64>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(Some(*n)),
            Some(Value::String(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| {
                ShellError::invalid_config(format!(
                    "Invalid number for {} {key}: '{s}'",
                    self.key_name
                ))
            }),
            Some(other) => Err(self.type_mismatch(key, "number", other)),
        }
    }

    /// Required number value
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or not a number.
    pub fn number(&self, key: &str) -> Result<i64> {
        self.require(key, self.number_opt(key)?)
    }

    /// Nested section
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or not an object.
    pub fn object(&self, key: &str) -> Result<Self> {
        match self.values.get(key) {
            None => Err(self.missing(key)),
            Some(Value::Section(section)) => Ok(Self::new(self.key_name, section)),
            Some(other) => Err(self.type_mismatch(key, "object", other)),
        }
    }

    /// Whether `key` holds a nested section
    #[must_use]
    pub fn object_exists(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(Value::Section(_)))
    }

    /// Turn a missing optional value into a missing required value error
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is `None`.
    pub fn require<T>(&self, key: &str, value: Option<T>) -> Result<T> {
        value.ok_or_else(|| self.missing(key))
    }

    /// Every nested section whose key matches `predicate`
    ///
    /// # Errors
    ///
    /// Returns an error if a matching key holds something other than an object.
    pub fn all_objects_where<P>(&self, predicate: P) -> Result<Vec<(&'a str, Self)>>
    where
        P: Fn(&str) -> bool,
    {
        self.values
            .keys()
            .filter(|key| predicate(key.as_str()))
            .map(|key| Ok((key.as_str(), self.object(key)?)))
            .collect()
    }

    /// Every child section of the section at `key`
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is missing, or it or one of its children is
    /// not an object.
    pub fn objects_in(&self, key: &str) -> Result<Vec<(&'a str, Self)>> {
        self.object(key)?.all_objects_where(|_| true)
    }

    fn missing(&self, key: &str) -> ShellError {
        ShellError::invalid_config(format!(
            "Missing value for required {} {key}",
            self.key_name
        ))
    }

    fn type_mismatch(&self, key: &str, expected: &str, got: &Value) -> ShellError {
        ShellError::invalid_config(format!(
            "Expected {expected} for {} {key}, got {}",
            self.key_name,
            got.type_name()
        ))
    }
}
