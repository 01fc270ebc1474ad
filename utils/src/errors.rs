use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TacError {
	#[error("line {line}: malformed statement `{text}`: {reason}")]
	MalformedStatement {
		line: usize,
		text: String,
		reason: String,
	},
	#[error("statement {stmt}: jump target {target} is outside 1..={count}")]
	InvalidJumpTarget {
		stmt: usize,
		target: i64,
		count: usize,
	},
	#[error("statement {stmt}: no definition of `{var}` reaches this use")]
	EmptyUdChain { stmt: usize, var: String },
	#[error("{analysis} did not converge within {bound} passes")]
	NonTerminatingFixedPoint { analysis: &'static str, bound: usize },
	#[error("program has no statements")]
	EmptyProgram,
	#[error("stage `{0}` has not been computed")]
	MissingStage(&'static str),
	#[error("system error: {0}")]
	SystemError(String),
}

pub type Result<T, E = TacError> = std::result::Result<T, E>;

pub fn map_sys_err(e: std::io::Error) -> TacError {
	TacError::SystemError(e.to_string())
}
