use std::path::PathBuf;

use thiserror::Error;

use crate::format::TemplateError;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("invalid range: {0}")]
    InvalidRange(String),
    #[error("at least one macro family must be selected")]
    NoFamilySelected,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
    #[error("output target {target} needs a byte budget when the range end is unbounded")]
    UnboundedOutput { target: &'static str },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
