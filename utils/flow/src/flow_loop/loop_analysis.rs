use std::collections::BTreeSet;

use log::{debug, trace};

use super::{BackEdge, Loop, LoopInfo};
use crate::{cfg::CFG, dominator::Dominators};
use utils::BlockId;

/// Successor edges whose target dominates their source, by tail then header.
pub fn identify_back_edges(cfg: &CFG, dom: &Dominators) -> Vec<BackEdge> {
	cfg
		.edges()
		.filter(|(tail, header)| dom.dominates(*header, *tail))
		.map(|(tail, header)| BackEdge { tail, header })
		.collect()
}

/// Blocks reaching `tail` backwards without passing through `header`, plus
/// `header` itself.
pub fn natural_loop(cfg: &CFG, edge: BackEdge) -> Loop {
	let mut blocks = BTreeSet::from([edge.header]);
	let mut stack = vec![edge.tail];
	while let Some(bb) = stack.pop() {
		if !blocks.insert(bb) {
			continue;
		}
		stack.extend(cfg.get_prev(bb).iter().filter(|v| !blocks.contains(*v)));
	}
	trace!("loop {} -> {}: {:?}", edge.tail, edge.header, blocks);
	Loop {
		header: edge.header,
		tail: edge.tail,
		blocks: blocks.into_iter().collect(),
	}
}

impl LoopInfo {
	pub fn analyse(cfg: &CFG, dom: &Dominators) -> Self {
		Self::from_back_edges(cfg, &identify_back_edges(cfg, dom))
	}

	pub fn from_back_edges(cfg: &CFG, back_edges: &[BackEdge]) -> Self {
		let mut loops: Vec<Loop> =
			back_edges.iter().map(|edge| natural_loop(cfg, *edge)).collect();
		loops.sort_by_key(|v| v.key());
		let loop_blocks = loops.iter().flat_map(|v| v.blocks.iter().copied()).collect();
		debug!("found {} back edges", back_edges.len());
		Self {
			back_edges: back_edges.to_vec(),
			loops,
			loop_blocks,
		}
	}

	pub fn get(&self, header: BlockId, tail: BlockId) -> Option<&Loop> {
		self.loops.iter().find(|v| v.key() == (header, tail))
	}

	pub fn in_loop(&self, id: BlockId) -> bool {
		self.loop_blocks.contains(&id)
	}

	pub fn loops_containing(&self, id: BlockId) -> impl Iterator<Item = &Loop> {
		self.loops.iter().filter(move |v| v.contains_block(id))
	}
}
