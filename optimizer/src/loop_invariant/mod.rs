mod impls;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Loop-invariant statements and the pass on which each was found.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoopInvariants {
	pub stmts: BTreeSet<usize>,
	pub pass_of: BTreeMap<usize, usize>,
	/// Statements inside loop blocks that were considered.
	pub candidates: Vec<usize>,
	pub passes: usize,
}

impl LoopInvariants {
	pub fn contains(&self, stmt: usize) -> bool {
		self.stmts.contains(&stmt)
	}

	/// Statements in the order they were marked.
	pub fn discovery_order(&self) -> Vec<usize> {
		let mut order: Vec<(usize, usize)> =
			self.pass_of.iter().map(|(stmt, pass)| (*pass, *stmt)).collect();
		order.sort_unstable();
		order.into_iter().map(|(_, stmt)| stmt).collect()
	}
}

pub struct LoopInvariantAnalysis {
	inputs_are_invariant: bool,
	fixed_point_slack: usize,
}
