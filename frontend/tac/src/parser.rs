use log::trace;
use pest::{iterators::Pair, Parser};
use pest_derive::Parser;
use utils::{
	constants::{BRANCH_MARKER, GUARD_KEYWORD},
	errors::Result,
	TacError::{self, InvalidJumpTarget, MalformedStatement},
};

use crate::statement::{is_identifier, Statement, StmtKind};

#[derive(Parser)]
#[grammar = "tac.pest"]
struct TacParser;

fn malformed(index: usize, text: &str, reason: impl Into<String>) -> TacError {
	MalformedStatement {
		line: index,
		text: text.to_string(),
		reason: reason.into(),
	}
}

fn explain_failure(text: &str) -> &'static str {
	let guarded = text.trim_start().starts_with(GUARD_KEYWORD);
	if text.trim().is_empty() {
		"empty statement"
	} else if text.contains(BRANCH_MARKER) && text.contains('=') && !guarded {
		"jump inside an assignment; statements must be separated"
	} else if text.contains(BRANCH_MARKER) {
		"expected `GOTO <statement number>`"
	} else if guarded {
		"conditional without `GOTO <statement number>`"
	} else if text.contains('=') {
		"expected `<identifier> = <expression>`"
	} else {
		"unrecognized statement"
	}
}

/// A word holding an `=` that is not part of `==`, `<=`, `>=` or `!=`
/// means two statements were run together.
fn has_bare_assign(word: &str) -> bool {
	let bytes = word.as_bytes();
	bytes.iter().enumerate().any(|(i, &b)| {
		if b != b'=' {
			return false;
		}
		let prev = i.checked_sub(1).map(|j| bytes[j]);
		let next = bytes.get(i + 1).copied();
		!matches!(prev, Some(b'=' | b'<' | b'>' | b'!')) && next != Some(b'=')
	})
}

/// Targets too large for `i64` saturate and are reported as out of range.
fn parse_target(pair: Pair<Rule>, index: usize, count: usize) -> Result<usize> {
	let digits = pair.as_str();
	let target: i64 = digits.parse().unwrap_or(if digits.starts_with('-') {
		i64::MIN
	} else {
		i64::MAX
	});
	if target <= 0 || target as u64 > count as u64 {
		return Err(InvalidJumpTarget {
			stmt: index,
			target,
			count,
		});
	}
	Ok(target as usize)
}

fn parse_assign(pair: Pair<Rule>, index: usize, text: &str) -> Result<StmtKind> {
	let mut inner = pair.into_inner();
	let lhs = inner.next().map(|v| v.as_str().to_string()).unwrap_or_default();
	let mut operands = Vec::new();
	for word in inner.flat_map(|rhs| rhs.into_inner()) {
		let word = word.as_str();
		if has_bare_assign(word) {
			return Err(malformed(
				index,
				text,
				"second `=` on the right-hand side; statements must be separated",
			));
		}
		if is_identifier(word) {
			operands.push(word.to_string());
		}
	}
	Ok(StmtKind::Assignment { lhs, operands })
}

fn parse_kind(
	pair: Pair<Rule>,
	index: usize,
	text: &str,
	count: usize,
) -> Result<StmtKind> {
	match pair.as_rule() {
		Rule::branch => {
			let target = pair
				.into_inner()
				.find(|v| v.as_rule() == Rule::target)
				.ok_or_else(|| malformed(index, text, explain_failure(text)))?;
			Ok(StmtKind::ConditionalBranch {
				target: parse_target(target, index, count)?,
			})
		}
		Rule::jump => {
			let target = pair
				.into_inner()
				.find(|v| v.as_rule() == Rule::target)
				.ok_or_else(|| malformed(index, text, explain_failure(text)))?;
			Ok(StmtKind::UnconditionalJump {
				target: parse_target(target, index, count)?,
			})
		}
		Rule::ret => Ok(StmtKind::Return),
		Rule::assign => parse_assign(pair, index, text),
		Rule::other => Ok(StmtKind::Other),
		_ => Err(malformed(index, text, explain_failure(text))),
	}
}

/// Classifies one line of a program with `count` statements.
pub fn parse_statement(index: usize, text: &str, count: usize) -> Result<Statement> {
	let statement = TacParser::parse(Rule::statement, text)
		.map_err(|_| malformed(index, text, explain_failure(text)))?
		.next()
		.ok_or_else(|| malformed(index, text, explain_failure(text)))?;
	let body = statement
		.into_inner()
		.find(|v| v.as_rule() != Rule::EOI)
		.ok_or_else(|| malformed(index, text, explain_failure(text)))?;
	let kind = parse_kind(body, index, text, count)?;
	trace!("parsed statement {index}: {kind:?}");
	Ok(Statement::new(index, text.trim(), kind))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn kind(text: &str) -> StmtKind {
		parse_statement(1, text, 20).unwrap().kind
	}

	fn operands(v: &[&str]) -> Vec<String> {
		v.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn assignment_operands() {
		assert_eq!(
			kind("t4 = sum + t3"),
			StmtKind::Assignment {
				lhs: "t4".into(),
				operands: operands(&["sum", "t3"]),
			}
		);
		assert_eq!(
			kind("t3 = t1[t2]"),
			StmtKind::Assignment {
				lhs: "t3".into(),
				operands: operands(&["t1", "t2"]),
			}
		);
		assert_eq!(
			kind("t2 = i * 4"),
			StmtKind::Assignment {
				lhs: "t2".into(),
				operands: operands(&["i"]),
			}
		);
	}

	#[test]
	fn literal_assignment_has_no_operands() {
		assert_eq!(
			kind("sum = 0"),
			StmtKind::Assignment {
				lhs: "sum".into(),
				operands: vec![],
			}
		);
		assert_eq!(
			kind("x=-1"),
			StmtKind::Assignment {
				lhs: "x".into(),
				operands: vec![],
			}
		);
	}

	#[test]
	fn tokens_are_whitespace_delimited() {
		// `a+b` is one token and not an identifier.
		assert_eq!(
			kind("x = a+b"),
			StmtKind::Assignment {
				lhs: "x".into(),
				operands: vec![],
			}
		);
	}

	#[test]
	fn comparison_is_not_a_second_assignment() {
		assert_eq!(
			kind("f = a == b"),
			StmtKind::Assignment {
				lhs: "f".into(),
				operands: operands(&["a", "b"]),
			}
		);
		assert_eq!(
			kind("f = a<=b"),
			StmtKind::Assignment {
				lhs: "f".into(),
				operands: vec![],
			}
		);
	}

	#[test]
	fn branches() {
		assert_eq!(
			kind("If i > n GOTO 12"),
			StmtKind::ConditionalBranch { target: 12 }
		);
		assert_eq!(
			kind("If (b>100) GOTO 15"),
			StmtKind::ConditionalBranch { target: 15 }
		);
		assert_eq!(kind("GOTO 3"), StmtKind::UnconditionalJump { target: 3 });
		assert_eq!(kind("  GOTO   3  "), StmtKind::UnconditionalJump { target: 3 });
	}

	#[test]
	fn return_and_other() {
		assert_eq!(kind("return sum"), StmtKind::Return);
		assert_eq!(kind("return"), StmtKind::Return);
		assert_eq!(
			kind("return_value = 1"),
			StmtKind::Assignment {
				lhs: "return_value".into(),
				operands: vec![],
			}
		);
		assert_eq!(kind("param x"), StmtKind::Other);
	}

	#[test]
	fn out_of_range_targets() {
		assert_eq!(
			parse_statement(4, "GOTO 9", 8),
			Err(InvalidJumpTarget {
				stmt: 4,
				target: 9,
				count: 8
			})
		);
		assert_eq!(
			parse_statement(2, "If x GOTO 0", 8),
			Err(InvalidJumpTarget {
				stmt: 2,
				target: 0,
				count: 8
			})
		);
		assert!(matches!(
			parse_statement(2, "GOTO -3", 8),
			Err(InvalidJumpTarget { target: -3, .. })
		));
		assert_eq!(
			parse_statement(5, "GOTO 99999999999999999999", 8),
			Err(InvalidJumpTarget {
				stmt: 5,
				target: i64::MAX,
				count: 8
			})
		);
		assert!(matches!(
			parse_statement(5, "If x > 1 GOTO -99999999999999999999", 8),
			Err(InvalidJumpTarget {
				target: i64::MIN,
				..
			})
		));
	}

	#[test]
	fn malformed_lines() {
		for text in [
			"",
			"   ",
			"GOTO",
			"GOTO x",
			"If x > 0",
			"If GOTO 3",
			"x =",
			"a[i] = x",
			"x == y",
			"a = 0b = 1c = 2If (b>100) GOTO 15",
			"a = 0 b = 1",
			"x = y GOTO 3",
			"x = GOTO 3",
			"x = y GOTO",
			"return x GOTO 3",
		] {
			assert!(
				matches!(
					parse_statement(7, text, 20),
					Err(MalformedStatement { line: 7, .. })
				),
				"`{text}` should be malformed"
			);
		}
	}

	#[test]
	fn jump_is_never_an_operand() {
		assert_eq!(
			parse_statement(1, "x = y GOTO 3", 5),
			Err(MalformedStatement {
				line: 1,
				text: "x = y GOTO 3".into(),
				reason: "jump inside an assignment; statements must be separated".into(),
			})
		);
		assert_eq!(
			kind("x = GOTOx"),
			StmtKind::Assignment {
				lhs: "x".into(),
				operands: operands(&["GOTOx"]),
			}
		);
	}

	#[test]
	fn bare_assign_detection() {
		assert!(has_bare_assign("="));
		assert!(has_bare_assign("0b=1"));
		assert!(!has_bare_assign("=="));
		assert!(!has_bare_assign("a<=b"));
		assert!(!has_bare_assign("a!=b"));
		assert!(!has_bare_assign(">="));
	}
}
