use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;
use tac::{Program, StmtKind};
use utils::BlockId;

use crate::basicblock::BasicBlocks;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CFG {
	pub succ: BTreeMap<BlockId, Vec<BlockId>>,
	pub prev: BTreeMap<BlockId, Vec<BlockId>>,
}

fn link_node(cfg: &mut CFG, from: BlockId, to: BlockId) {
	let succ = cfg.succ.entry(from).or_default();
	if !succ.contains(&to) {
		succ.push(to);
	}
	// The entry block never records predecessors.
	if !to.is_entry() {
		let prev = cfg.prev.entry(to).or_default();
		if !prev.contains(&from) {
			prev.push(from);
		}
	}
}

impl CFG {
	pub fn build(program: &Program, blocks: &BasicBlocks) -> Self {
		let mut cfg = Self {
			succ: blocks.ids().map(|id| (id, Vec::new())).collect(),
			prev: blocks.ids().map(|id| (id, Vec::new())).collect(),
		};
		for block in blocks.iter() {
			let next = Some(block.id.next()).filter(|v| blocks.get(*v).is_some());
			let Some(last) = program.get(block.last()) else {
				continue;
			};
			let target = last.jump_target().and_then(|t| blocks.block_of(t));
			match last.kind {
				StmtKind::UnconditionalJump { .. } => {
					target.into_iter().for_each(|t| link_node(&mut cfg, block.id, t));
				}
				StmtKind::ConditionalBranch { .. } => {
					target
						.into_iter()
						.chain(next)
						.for_each(|t| link_node(&mut cfg, block.id, t));
				}
				StmtKind::Return => {}
				_ => next.into_iter().for_each(|t| link_node(&mut cfg, block.id, t)),
			}
		}
		cfg.succ.values_mut().for_each(|v| v.sort_unstable());
		cfg.prev.values_mut().for_each(|v| v.sort_unstable());
		debug!("cfg has {} edges", cfg.edges().count());
		cfg
	}

	pub fn get_succ(&self, id: BlockId) -> &[BlockId] {
		self.succ.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
	}

	pub fn get_prev(&self, id: BlockId) -> &[BlockId] {
		self.prev.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
	}

	pub fn get_entry(&self) -> BlockId {
		BlockId::ENTRY
	}

	pub fn ids(&self) -> impl Iterator<Item = BlockId> + '_ {
		self.succ.keys().copied()
	}

	/// Every (source, target) successor edge, ordered by source then target.
	pub fn edges(&self) -> impl Iterator<Item = (BlockId, BlockId)> + '_ {
		self
			.succ
			.iter()
			.flat_map(|(from, tos)| tos.iter().map(move |to| (*from, *to)))
	}

	pub fn size(&self) -> usize {
		self.succ.len()
	}
}

#[cfg(test)]
mod tests {
	use tac::samples::ARRAY_SUM;

	use super::*;

	fn build(lines: &[&str]) -> CFG {
		let program = Program::parse(lines).unwrap();
		let blocks = BasicBlocks::build(&program);
		CFG::build(&program, &blocks)
	}

	#[test]
	fn array_sum_edges() {
		let cfg = build(ARRAY_SUM);
		assert_eq!(cfg.get_succ(BlockId(1)), &[BlockId(2)]);
		assert_eq!(cfg.get_succ(BlockId(2)), &[BlockId(3), BlockId(4)]);
		assert_eq!(cfg.get_succ(BlockId(3)), &[BlockId(2)]);
		assert!(cfg.get_succ(BlockId(4)).is_empty());
		assert_eq!(cfg.get_prev(BlockId(2)), &[BlockId(1), BlockId(3)]);
		assert_eq!(cfg.get_prev(BlockId(4)), &[BlockId(2)]);
		assert!(cfg.get_prev(BlockId(1)).is_empty());
	}

	#[test]
	fn entry_has_no_predecessors() {
		let cfg = build(&["x = 1", "If x > 3 GOTO 4", "GOTO 1", "return x"]);
		// B1 = {1, 2}, B2 = {3}, B3 = {4}
		assert_eq!(cfg.get_succ(BlockId(2)), &[BlockId(1)]);
		assert!(cfg.get_prev(BlockId(1)).is_empty());
	}

	#[test]
	fn branch_to_fall_through_is_one_edge() {
		let cfg = build(&["If x > 0 GOTO 2", "y = 1", "return y"]);
		assert_eq!(cfg.get_succ(BlockId(1)), &[BlockId(2)]);
		assert_eq!(cfg.get_prev(BlockId(2)), &[BlockId(1)]);
	}

	#[test]
	fn return_ends_flow() {
		let cfg = build(&["If a > 0 GOTO 3", "return a", "b = 1", "return b"]);
		assert!(cfg.get_succ(BlockId(2)).is_empty());
		assert_eq!(cfg.get_prev(BlockId(3)), &[BlockId(1)]);
	}

	#[test]
	fn predecessors_invert_successors() {
		let cfg = build(tac::samples::NESTED_LOOPS);
		for (from, to) in cfg.edges() {
			if !to.is_entry() {
				assert!(cfg.get_prev(to).contains(&from));
			}
		}
		for (to, froms) in cfg.prev.iter() {
			for from in froms {
				assert!(cfg.get_succ(*from).contains(to));
			}
		}
	}
}
