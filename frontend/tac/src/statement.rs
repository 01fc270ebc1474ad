use std::fmt::Display;

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StmtKind {
	Assignment { lhs: String, operands: Vec<String> },
	ConditionalBranch { target: usize },
	UnconditionalJump { target: usize },
	Return,
	Other,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Statement {
	/// 1-based position in the program.
	pub index: usize,
	pub text: String,
	pub kind: StmtKind,
}

impl Statement {
	pub fn new(index: usize, text: impl Display, kind: StmtKind) -> Self {
		Self {
			index,
			text: text.to_string(),
			kind,
		}
	}

	/// Variable assigned by this statement.
	pub fn defines(&self) -> Option<&str> {
		match &self.kind {
			StmtKind::Assignment { lhs, .. } => Some(lhs),
			_ => None,
		}
	}

	/// Identifiers read on the right-hand side, in order of appearance.
	pub fn operands(&self) -> &[String] {
		match &self.kind {
			StmtKind::Assignment { operands, .. } => operands,
			_ => &[],
		}
	}

	pub fn reads(&self, var: &str) -> bool {
		self.operands().iter().any(|v| v == var)
	}

	pub fn jump_target(&self) -> Option<usize> {
		match self.kind {
			StmtKind::ConditionalBranch { target }
			| StmtKind::UnconditionalJump { target } => Some(target),
			_ => None,
		}
	}

	pub fn is_conditional(&self) -> bool {
		matches!(self.kind, StmtKind::ConditionalBranch { .. })
	}

	pub fn is_ret(&self) -> bool {
		matches!(self.kind, StmtKind::Return)
	}
}

impl Display for Statement {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "({}) {}", self.index, self.text)
	}
}

pub fn is_identifier(word: &str) -> bool {
	let mut chars = word.chars();
	match chars.next() {
		Some(c) if c.is_ascii_alphabetic() || c == '_' => {
			chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
		}
		_ => false,
	}
}
