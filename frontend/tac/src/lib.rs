pub mod parser;
pub mod program;
pub mod samples;
pub mod statement;

pub use parser::parse_statement;
pub use program::Program;
pub use statement::{Statement, StmtKind};
