//! Naming and message templates.
//!
//! A template is text with `{name}` references. Macro names are rendered
//! as plain text; assertion messages are rendered as C string literals in
//! which macro parameters are stringified with `#`.

pub mod error;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::escape::EscapeCache;
use crate::writer::CodeWriter;
pub use error::TemplateError;

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid reference pattern"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Ref(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

/// Value bound to a template reference in a C-string rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    /// A macro parameter, stringified with `#`.
    Param(&'a str),
    /// Text spliced into the literal.
    Value(&'a str),
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;
        for caps in reference_pattern().captures_iter(source) {
            let whole = caps.get(0).expect("group 0 always matches");
            if whole.start() > last {
                segments.push(Segment::Text(source[last..whole.start()].to_owned()));
            }
            segments.push(Segment::Ref(caps[1].to_owned()));
            last = whole.end();
        }
        if last < source.len() {
            segments.push(Segment::Text(source[last..].to_owned()));
        }
        Self {
            source: source.to_owned(),
            segments,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn refs(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Ref(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// Checks every reference is in `allowed` and every name in `required` is used.
    pub fn check_refs(&self, allowed: &[&str], required: &[&str]) -> Result<(), TemplateError> {
        if let Some(unknown) = self.refs().find(|name| !allowed.contains(name)) {
            return Err(TemplateError::UnknownRef {
                template: self.source.clone(),
                name: unknown.to_owned(),
                allowed: allowed.join(", "),
            });
        }
        if let Some(missing) = required.iter().find(|name| !self.refs().any(|r| r == **name)) {
            return Err(TemplateError::MissingRef {
                template: self.source.clone(),
                name: (*missing).to_owned(),
            });
        }
        Ok(())
    }

    /// Substitutes references with `args`; unbound references render empty.
    pub fn render(&self, args: &[(&str, &str)]) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Ref(name) => {
                    if let Some((_, value)) = args.iter().find(|(key, _)| key == name) {
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }

    /// Writes the template as a C string-literal expression.
    ///
    /// Adjacent text is escaped as one run so a numeric escape never absorbs
    /// the character after it. Renders `""` rather than nothing.
    pub fn write_cstring(&self, w: &mut dyn CodeWriter, escapes: &EscapeCache, args: &[(&str, Arg<'_>)]) {
        let mut pending = String::new();
        let mut wrote = false;
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => pending.push_str(text),
                Segment::Ref(name) => match args.iter().find(|(key, _)| key == name) {
                    Some((_, Arg::Value(value))) => pending.push_str(value),
                    Some((_, Arg::Param(param))) => {
                        flush_literal(w, escapes, &mut pending);
                        w.str("#").str(param);
                        wrote = true;
                    }
                    None => {}
                },
            }
        }
        wrote |= flush_literal(w, escapes, &mut pending);
        if !wrote {
            w.str("\"\"");
        }
    }
}

fn flush_literal(w: &mut dyn CodeWriter, escapes: &EscapeCache, pending: &mut String) -> bool {
    if pending.is_empty() {
        return false;
    }
    w.str("\"").str(&escapes.get(pending)).str("\"");
    pending.clear();
    true
}

impl From<String> for Template {
    fn from(source: String) -> Self {
        Template::parse(&source)
    }
}

impl From<&str> for Template {
    fn from(source: &str) -> Self {
        Template::parse(source)
    }
}

impl From<Template> for String {
    fn from(template: Template) -> Self {
        template.source
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
