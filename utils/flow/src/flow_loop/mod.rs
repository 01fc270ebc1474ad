use std::{collections::BTreeSet, fmt::Display};

use serde::Serialize;
use utils::BlockId;

pub mod exits;
pub mod loop_analysis;

pub use exits::*;
pub use loop_analysis::*;

/// CFG edge `tail -> header` where `header` dominates `tail`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BackEdge {
	pub tail: BlockId,
	pub header: BlockId,
}

/// Natural loop of one back edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Loop {
	pub header: BlockId,
	pub tail: BlockId,
	/// Ascending, always holding both header and tail.
	pub blocks: Vec<BlockId>,
}

impl Loop {
	pub fn key(&self) -> (BlockId, BlockId) {
		(self.header, self.tail)
	}
	pub fn contains_block(&self, id: BlockId) -> bool {
		self.blocks.binary_search(&id).is_ok()
	}
}

impl Display for Loop {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let blocks = self
			.blocks
			.iter()
			.map(|v| v.to_string())
			.collect::<Vec<_>>()
			.join(", ");
		write!(f, "header: {}, tail: {}, blocks: [{}]", self.header, self.tail, blocks)
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoopInfo {
	pub back_edges: Vec<BackEdge>,
	/// One entry per back edge, ordered by (header, tail).
	pub loops: Vec<Loop>,
	/// Every block that belongs to some loop.
	pub loop_blocks: BTreeSet<BlockId>,
}
