mod impls;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use utils::UndefinedUsePolicy;

/// Reaching definitions of every (use statement, variable) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UdChains {
	pub chains: BTreeMap<usize, BTreeMap<String, BTreeSet<usize>>>,
	/// Variables read somewhere with no reaching definition, kept only when
	/// such uses are treated as program inputs.
	pub free_vars: BTreeSet<String>,
}

impl UdChains {
	pub fn get(&self, stmt: usize, var: &str) -> Option<&BTreeSet<usize>> {
		self.chains.get(&stmt).and_then(|v| v.get(var))
	}

	/// Whether the chain of this use is exactly `{def}`.
	pub fn only_reached_by(&self, stmt: usize, var: &str, def: usize) -> bool {
		self
			.get(stmt, var)
			.is_some_and(|v| v.len() == 1 && v.contains(&def))
	}
}

pub struct UdChainBuilder {
	policy: UndefinedUsePolicy,
}
