pub mod assembler;
pub mod code;
pub mod diag;
pub mod directive;
pub mod dump;
pub mod encode;
pub mod error;
pub mod export;
pub mod lexer;
pub mod link;
pub mod literal;
pub mod source;

pub use assembler::{AsmConfig, Assembler, Report, MAX_MEMORY_SIZE, MEMORY_SIZE};
pub use error::Error;
pub use export::{export, Format};
