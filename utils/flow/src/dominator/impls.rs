use std::collections::BTreeSet;

use utils::BlockId;

use super::Dominators;

impl Dominators {
	pub fn get(&self, id: BlockId) -> Option<&BTreeSet<BlockId>> {
		self.sets.get(&id)
	}

	/// Whether `a` dominates `b`.
	pub fn dominates(&self, a: BlockId, b: BlockId) -> bool {
		self.sets.get(&b).is_some_and(|v| v.contains(&a))
	}

	/// The strict dominator of `b` that every other strict dominator of `b`
	/// also dominates. `None` for the entry block and for blocks whose set
	/// never shrank.
	pub fn immediate_dominator(&self, b: BlockId) -> Option<BlockId> {
		let doms = self.sets.get(&b)?;
		let strict: Vec<BlockId> = doms.iter().copied().filter(|v| *v != b).collect();
		let candidates: Vec<BlockId> = strict
			.iter()
			.copied()
			.filter(|d| strict.iter().all(|other| self.dominates(*other, *d)))
			.collect();
		match candidates.as_slice() {
			[only] => Some(*only),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use super::*;

	fn dom(entries: &[(usize, &[usize])]) -> Dominators {
		Dominators {
			sets: entries
				.iter()
				.map(|(k, v)| (BlockId(*k), v.iter().map(|x| BlockId(*x)).collect()))
				.collect::<BTreeMap<_, _>>(),
		}
	}

	#[test]
	fn immediate_dominators() {
		let d = dom(&[(1, &[1]), (2, &[1, 2]), (3, &[1, 2, 3]), (4, &[1, 2, 4])]);
		assert_eq!(d.immediate_dominator(BlockId(1)), None);
		assert_eq!(d.immediate_dominator(BlockId(2)), Some(BlockId(1)));
		assert_eq!(d.immediate_dominator(BlockId(3)), Some(BlockId(2)));
		assert_eq!(d.immediate_dominator(BlockId(4)), Some(BlockId(2)));
		assert!(d.dominates(BlockId(2), BlockId(4)));
		assert!(!d.dominates(BlockId(3), BlockId(4)));
	}
}
