use crate::literal::LiteralError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot open source file `{0}`")]
    SourceOpen(String, #[source] std::io::Error),

    #[error("Failed to read line from `{0}`")]
    FileRead(String, #[source] std::io::Error),

    #[error("Invalid number of operands to `{0}` directive")]
    DirectiveArity(String),

    #[error("Invalid number of operands to `{0}` instruction")]
    InstructionArity(String),

    #[error(transparent)]
    Literal(#[from] LiteralError),

    #[error("Unknown instruction `{0}`")]
    UnknownOperation(String),

    #[error("Invalid address `{0}`")]
    InvalidAddress(String),

    #[error("`{0}` directive only supports direct addressing")]
    DirectAddressing(String),

    #[error("Overwriting existing object code: 0x{0:X} is below the current end 0x{1:X}")]
    AddressOverflow(u32, u32),

    #[error("Cannot resolve `{0}`")]
    UnresolvedSymbol(String),

    #[error("Object code exceeds memory size by {0} words")]
    MemoryOverflow(usize),

    #[error("Memory size {0} exceeds the limit of {1} words")]
    MemorySize(usize, usize),

    #[error("Re-defined label: `{0}`")]
    RedefinedLabel(String),

    #[error("Already defined here. The first definition is used")]
    DefinedHere,

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}
