pub mod cli;
pub mod codegen;
pub mod emitter;
pub mod error;
pub mod escape;
pub mod format;
pub mod generate;
pub mod ident;
pub mod range;
pub mod writer;

pub use codegen::{CodeGenerator, Family, GeneratorConfig};
pub use emitter::{GenerationSummary, IncludeGuard};
pub use error::GenerateError;
pub use generate::{generate, DependencyPolicy, GenerateOptions, OutputTarget};
pub use range::{GeneratedRange, Range};
