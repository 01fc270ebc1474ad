mod impls;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use utils::BlockId;

/// Per-block GEN/KILL sets together with the program's definitions and uses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenKill {
	pub gen: BTreeMap<BlockId, BTreeSet<usize>>,
	pub kill: BTreeMap<BlockId, BTreeSet<usize>>,
	/// Assignment statement to the variable it defines.
	pub definitions: BTreeMap<usize, String>,
	/// Variable to the statements reading it, ascending.
	pub uses: BTreeMap<String, Vec<usize>>,
}

impl GenKill {
	pub fn defines(&self, stmt: usize, var: &str) -> bool {
		self.definitions.get(&stmt).is_some_and(|v| v == var)
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InOut {
	pub in_sets: BTreeMap<BlockId, BTreeSet<usize>>,
	pub out_sets: BTreeMap<BlockId, BTreeSet<usize>>,
	pub passes: usize,
}

pub struct GenKillSets {}

pub struct ReachingDefinitions {
	fixed_point_slack: usize,
}
