use std::fmt::Display;

use crate::{BackEdge, BasicBlock};

fn stmt_list(stmts: &[usize]) -> String {
	stmts.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

#[cfg(not(feature = "debug"))]
impl Display for BasicBlock {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{}: [{}]", self.id, stmt_list(&self.stmts))
	}
}

#[cfg(feature = "debug")]
impl Display for BasicBlock {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"{}: leader: {} last: {} stmts: [{}]",
			self.id,
			self.leader(),
			self.last(),
			stmt_list(&self.stmts)
		)
	}
}

impl Display for BackEdge {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{} -> {}", self.tail, self.header)
	}
}
