use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown reference {{{name}}} in template {template:?} (expected one of: {allowed})")]
    UnknownRef {
        template: String,
        name: String,
        allowed: String,
    },
    #[error("template {template:?} must reference {{{name}}}")]
    MissingRef { template: String, name: String },
}
