use std::collections::BTreeSet;

use log::debug;
use serde::Serialize;
use tac::Program;
use utils::BlockId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BasicBlock {
	pub id: BlockId,
	/// Contiguous statement indices, leader first.
	pub stmts: Vec<usize>,
}

impl BasicBlock {
	pub fn new(id: BlockId, leader: usize) -> Self {
		Self {
			id,
			stmts: vec![leader],
		}
	}
	pub fn leader(&self) -> usize {
		self.stmts[0]
	}
	pub fn last(&self) -> usize {
		self.stmts[self.stmts.len() - 1]
	}
	pub fn contains(&self, stmt: usize) -> bool {
		(self.leader()..=self.last()).contains(&stmt)
	}
	pub fn push(&mut self, stmt: usize) {
		self.stmts.push(stmt);
	}
}

/// Partition of a program into basic blocks, in leader order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BasicBlocks {
	pub leaders: Vec<usize>,
	pub blocks: Vec<BasicBlock>,
	#[serde(skip)]
	stmt_to_block: Vec<BlockId>,
}

/// Statement 1, every jump target, and the statement after each conditional
/// branch. The statement after an unconditional jump is not a leader unless
/// one of the other rules names it.
pub fn identify_leaders(program: &Program) -> Vec<usize> {
	let mut leaders = BTreeSet::from([1]);
	for stmt in program.iter() {
		if let Some(target) = stmt.jump_target() {
			leaders.insert(target);
			if stmt.is_conditional() && stmt.index < program.len() {
				leaders.insert(stmt.index + 1);
			}
		}
	}
	leaders.into_iter().collect()
}

impl BasicBlocks {
	pub fn build(program: &Program) -> Self {
		let leaders = identify_leaders(program);
		Self::form(program.len(), leaders)
	}

	/// `leaders` must be sorted, deduplicated, start at 1 and lie in `1..=len`.
	pub fn form(len: usize, leaders: Vec<usize>) -> Self {
		let mut blocks: Vec<BasicBlock> = Vec::with_capacity(leaders.len());
		let mut stmt_to_block = Vec::with_capacity(len);
		for (i, &leader) in leaders.iter().enumerate() {
			let end = leaders.get(i + 1).map_or(len + 1, |v| *v);
			let mut block = BasicBlock::new(BlockId::from_index(i), leader);
			for stmt in leader + 1..end {
				block.push(stmt);
			}
			stmt_to_block.extend(std::iter::repeat(block.id).take(end - leader));
			blocks.push(block);
		}
		debug!("formed {} blocks from {} statements", blocks.len(), len);
		Self {
			leaders,
			blocks,
			stmt_to_block,
		}
	}

	pub fn block_of(&self, stmt: usize) -> Option<BlockId> {
		stmt.checked_sub(1).and_then(|i| self.stmt_to_block.get(i)).copied()
	}

	pub fn get(&self, id: BlockId) -> Option<&BasicBlock> {
		id.0.checked_sub(1).and_then(|i| self.blocks.get(i))
	}

	pub fn ids(&self) -> impl Iterator<Item = BlockId> + '_ {
		self.blocks.iter().map(|b| b.id)
	}

	pub fn iter(&self) -> impl Iterator<Item = &BasicBlock> {
		self.blocks.iter()
	}

	pub fn size(&self) -> usize {
		self.blocks.len()
	}

	pub fn entry(&self) -> BlockId {
		BlockId::ENTRY
	}

	/// Statements of the given blocks, ascending.
	pub fn statements_of<'a>(
		&'a self,
		ids: impl IntoIterator<Item = &'a BlockId>,
	) -> Vec<usize> {
		let mut stmts: Vec<usize> = ids
			.into_iter()
			.filter_map(|id| self.get(*id))
			.flat_map(|b| b.stmts.iter().copied())
			.collect();
		stmts.sort_unstable();
		stmts
	}
}

#[cfg(test)]
mod tests {
	use tac::samples::{ARRAY_SUM, NESTED_LOOPS};

	use super::*;

	#[test]
	fn array_sum_leaders() {
		let program = Program::parse(ARRAY_SUM).unwrap();
		assert_eq!(identify_leaders(&program), vec![1, 3, 4, 12]);
		let blocks = BasicBlocks::build(&program);
		assert_eq!(blocks.size(), 4);
		assert_eq!(blocks.blocks[0].stmts, vec![1, 2]);
		assert_eq!(blocks.blocks[1].stmts, vec![3]);
		assert_eq!(blocks.blocks[2].stmts, (4..=11).collect::<Vec<_>>());
		assert_eq!(blocks.blocks[3].stmts, vec![12]);
		assert_eq!(blocks.block_of(7), Some(BlockId(3)));
		assert_eq!(blocks.block_of(13), None);
	}

	#[test]
	fn unconditional_fall_through_is_not_a_leader() {
		let program =
			Program::parse(&["GOTO 3", "x = 1", "y = 2", "return y"]).unwrap();
		assert_eq!(identify_leaders(&program), vec![1, 3]);
		let blocks = BasicBlocks::build(&program);
		assert_eq!(blocks.blocks[0].stmts, vec![1, 2]);
	}

	#[test]
	fn straight_line_is_one_block() {
		let program = Program::parse(&["a = 1", "b = a + 1", "return b"]).unwrap();
		let blocks = BasicBlocks::build(&program);
		assert_eq!(blocks.leaders, vec![1]);
		assert_eq!(blocks.size(), 1);
		assert_eq!(blocks.blocks[0].stmts, vec![1, 2, 3]);
	}

	#[test]
	fn trailing_conditional_adds_no_leader() {
		let program = Program::parse(&["x = 1", "If x > 0 GOTO 1"]).unwrap();
		assert_eq!(identify_leaders(&program), vec![1]);
	}

	#[test]
	fn blocks_partition_statements() {
		let program = Program::parse(NESTED_LOOPS).unwrap();
		let blocks = BasicBlocks::build(&program);
		let all: Vec<usize> = blocks.iter().flat_map(|b| b.stmts.clone()).collect();
		assert_eq!(all, (1..=program.len()).collect::<Vec<_>>());
		for block in blocks.iter() {
			assert_eq!(block.leader(), blocks.leaders[block.id.index()]);
			for stmt in block.stmts.iter() {
				assert_eq!(blocks.block_of(*stmt), Some(block.id));
			}
		}
	}
}
