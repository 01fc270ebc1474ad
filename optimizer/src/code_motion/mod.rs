mod impls;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use utils::{BlockId, MotionPolicy};

/// Outcome of the code-motion test for one loop-invariant statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MotionVerdict {
	pub var: String,
	pub block: BlockId,
	/// The defining block dominates every loop exit.
	pub dominates_exits: bool,
	/// No other loop statement defines `var`.
	pub single_definition: bool,
	/// Every loop use of `var` is reached by this statement alone.
	pub exclusive_reach: bool,
	pub movable: bool,
}

/// Where a movable statement would go: a pre-header on each edge entering
/// the outermost loop holding it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HoistPlacement {
	pub stmt: usize,
	pub header: BlockId,
	pub tail: BlockId,
	pub entering_edges: Vec<(BlockId, BlockId)>,
	/// The header is the entry block, so the pre-header precedes the program.
	pub before_entry: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CodeMotion {
	pub verdicts: BTreeMap<usize, MotionVerdict>,
	pub movable: BTreeSet<usize>,
	/// Blocks outside the loop universe entered from inside it.
	pub exits: BTreeSet<BlockId>,
	pub placements: Vec<HoistPlacement>,
}

impl CodeMotion {
	pub fn placement_of(&self, stmt: usize) -> Option<&HoistPlacement> {
		self.placements.iter().find(|v| v.stmt == stmt)
	}
}

pub struct MotionAnalysis {
	policy: MotionPolicy,
}
