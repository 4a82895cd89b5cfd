use serde::{Deserialize, Serialize};

use crate::format::{Template, TemplateError};

/// References a macro naming template may use.
pub const NAME_REFS: &[&str] = &["n"];
/// References of a per-pair assertion message.
pub const ALL_REFS: &[&str] = &["enumerator1", "enumerator2"];
/// References of a per-invocation assertion message.
pub const ONCE_REFS: &[&str] = &["n", "name", "type"];

pub const DEFAULT_AREUNIQ_NAME: &str = "areuniq{n}";
pub const DEFAULT_UNIQENUM_NAME: &str = "uniqenum{n}";
pub const DEFAULT_ALL_MESSAGE: &str = "duplicate enum values: {enumerator1} and {enumerator2}";
pub const DEFAULT_ONCE_MESSAGE: &str = "duplicate enum values: {name} {type}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AssertWhen {
    /// One `_Static_assert` per compared pair.
    All,
    /// A single `_Static_assert` per `uniqenum` invocation.
    #[default]
    Once,
}

impl AssertWhen {
    fn refs(self) -> &'static [&'static str] {
        match self {
            AssertWhen::All => ALL_REFS,
            AssertWhen::Once => ONCE_REFS,
        }
    }

    pub fn default_message(self) -> Template {
        match self {
            AssertWhen::All => Template::parse(DEFAULT_ALL_MESSAGE),
            AssertWhen::Once => Template::parse(DEFAULT_ONCE_MESSAGE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AssertionRepr")]
pub struct Assertion {
    pub when: AssertWhen,
    pub message: Template,
}

/// Lets a config pick `when` alone and get the matching default message.
#[derive(Deserialize)]
struct AssertionRepr {
    #[serde(default)]
    when: AssertWhen,
    message: Option<Template>,
}

impl From<AssertionRepr> for Assertion {
    fn from(repr: AssertionRepr) -> Self {
        Self {
            when: repr.when,
            message: repr.message.unwrap_or_else(|| repr.when.default_message()),
        }
    }
}

impl Assertion {
    pub fn new(when: AssertWhen) -> Self {
        Self {
            when,
            message: when.default_message(),
        }
    }
}

impl Default for Assertion {
    fn default() -> Self {
        Self::new(AssertWhen::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameTemplates {
    pub areuniq: Template,
    pub uniqenum: Template,
}

impl Default for NameTemplates {
    fn default() -> Self {
        Self {
            areuniq: Template::parse(DEFAULT_AREUNIQ_NAME),
            uniqenum: Template::parse(DEFAULT_UNIQENUM_NAME),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub names: NameTemplates,
    pub assertion: Assertion,
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), TemplateError> {
        self.names.areuniq.check_refs(NAME_REFS, NAME_REFS)?;
        self.names.uniqenum.check_refs(NAME_REFS, NAME_REFS)?;
        self.assertion.message.check_refs(self.assertion.when.refs(), &[])
    }
}
