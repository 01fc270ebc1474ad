use std::{collections::BTreeMap, fmt::Display};

use log::debug;
use serde::Serialize;
use utils::{errors::Result, TacError::EmptyProgram};

use crate::{parser::parse_statement, statement::Statement};

/// A parsed TAC program. Statements are addressed by their 1-based index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Program {
	statements: Vec<Statement>,
}

impl Program {
	pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
		if lines.is_empty() {
			return Err(EmptyProgram);
		}
		let count = lines.len();
		let statements = lines
			.iter()
			.enumerate()
			.map(|(i, line)| parse_statement(i + 1, line.as_ref(), count))
			.collect::<Result<Vec<_>>>()?;
		debug!("parsed {} statements", statements.len());
		Ok(Self { statements })
	}

	/// One statement per line; trailing blank lines are dropped.
	pub fn from_source(source: &str) -> Result<Self> {
		let mut lines: Vec<&str> = source.lines().collect();
		while lines.last().is_some_and(|v| v.trim().is_empty()) {
			lines.pop();
		}
		Self::parse(&lines)
	}

	pub fn len(&self) -> usize {
		self.statements.len()
	}

	pub fn is_empty(&self) -> bool {
		self.statements.is_empty()
	}

	pub fn get(&self, index: usize) -> Option<&Statement> {
		index.checked_sub(1).and_then(|i| self.statements.get(i))
	}

	pub fn statements(&self) -> &[Statement] {
		&self.statements
	}

	pub fn iter(&self) -> impl Iterator<Item = &Statement> {
		self.statements.iter()
	}

	/// Statement index to the variable it assigns, for every assignment.
	pub fn definitions(&self) -> BTreeMap<usize, String> {
		self
			.statements
			.iter()
			.filter_map(|s| s.defines().map(|v| (s.index, v.to_string())))
			.collect()
	}
}

impl Display for Program {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for stmt in self.statements.iter() {
			writeln!(f, "{}", stmt)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use utils::TacError;

	use super::*;
	use crate::samples::ARRAY_SUM;

	#[test]
	fn parses_array_sum() {
		let program = Program::parse(ARRAY_SUM).unwrap();
		assert_eq!(program.len(), 12);
		assert_eq!(program.get(3).and_then(|s| s.jump_target()), Some(12));
		assert!(program.get(3).unwrap().is_conditional());
		assert_eq!(program.get(11).and_then(|s| s.jump_target()), Some(3));
		assert!(program.get(12).unwrap().is_ret());
		assert!(program.get(0).is_none());
		assert!(program.get(13).is_none());
	}

	#[test]
	fn definitions_map() {
		let program = Program::parse(ARRAY_SUM).unwrap();
		let defs = program.definitions();
		assert_eq!(defs.len(), 9);
		assert_eq!(defs[&1], "sum");
		assert_eq!(defs[&10], "i");
		assert!(!defs.contains_key(&3));
	}

	#[test]
	fn empty_program_is_rejected() {
		let lines: [&str; 0] = [];
		assert_eq!(Program::parse(&lines), Err(TacError::EmptyProgram));
		assert_eq!(Program::from_source("\n\n"), Err(TacError::EmptyProgram));
	}

	#[test]
	fn source_keeps_interior_lines() {
		let program = Program::from_source("a = 1\nb = a\nreturn b\n\n").unwrap();
		assert_eq!(program.len(), 3);
		assert!(matches!(
			Program::from_source("a = 1\n\nreturn a"),
			Err(TacError::MalformedStatement { line: 2, .. })
		));
	}

	#[test]
	fn target_past_the_end_reports_statement() {
		assert_eq!(
			Program::parse(&["x = 1", "GOTO 5", "return x"]),
			Err(TacError::InvalidJumpTarget {
				stmt: 2,
				target: 5,
				count: 3
			})
		);
	}
}
