// Round-robin dominator computation: start every non-entry block at the full
// block set and shrink to {B} ∪ ⋂ Dom(P) until nothing changes.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use utils::{errors::Result, AnalysisConfig, BlockId, FixedPoint};

use super::Dominators;
use crate::cfg::CFG;

pub fn compute_dominator(cfg: &CFG, config: &AnalysisConfig) -> Result<Dominators> {
	let entry = cfg.get_entry();
	let all: BTreeSet<BlockId> = cfg.ids().collect();
	let mut sets: BTreeMap<BlockId, BTreeSet<BlockId>> = cfg
		.ids()
		.map(|id| {
			if id == entry {
				(id, BTreeSet::from([entry]))
			} else {
				(id, all.clone())
			}
		})
		.collect();

	// Each changing pass removes at least one block from some set.
	let n = all.len();
	let mut guard =
		FixedPoint::new("dominators", n * n, config.fixed_point_slack);
	loop {
		guard.tick()?;
		let mut changed = false;
		for id in cfg.ids() {
			if id == entry {
				continue;
			}
			let mut preds = cfg.get_prev(id).iter();
			let Some(first) = preds.next() else {
				continue;
			};
			let mut new_doms = sets[first].clone();
			for pred in preds {
				new_doms.retain(|v| sets[pred].contains(v));
			}
			new_doms.insert(id);
			if new_doms != sets[&id] {
				sets.insert(id, new_doms);
				changed = true;
			}
		}
		if !changed {
			break;
		}
	}
	guard.finish();
	debug!("dominators of {} blocks computed", n);
	Ok(Dominators { sets })
}

#[cfg(test)]
mod tests {
	use tac::{
		samples::{ARRAY_SUM, NESTED_LOOPS},
		Program,
	};

	use super::*;
	use crate::basicblock::BasicBlocks;

	fn dominators(lines: &[&str]) -> (CFG, Dominators) {
		let program = Program::parse(lines).unwrap();
		let blocks = BasicBlocks::build(&program);
		let cfg = CFG::build(&program, &blocks);
		let dom = compute_dominator(&cfg, &AnalysisConfig::default()).unwrap();
		(cfg, dom)
	}

	fn set(ids: &[usize]) -> BTreeSet<BlockId> {
		ids.iter().map(|v| BlockId(*v)).collect()
	}

	#[test]
	fn array_sum_dominators() {
		let (_, dom) = dominators(ARRAY_SUM);
		assert_eq!(dom.sets[&BlockId(1)], set(&[1]));
		assert_eq!(dom.sets[&BlockId(2)], set(&[1, 2]));
		assert_eq!(dom.sets[&BlockId(3)], set(&[1, 2, 3]));
		assert_eq!(dom.sets[&BlockId(4)], set(&[1, 2, 4]));
	}

	#[test]
	fn fixed_point_equation_holds() {
		let (cfg, dom) = dominators(NESTED_LOOPS);
		for id in cfg.ids() {
			let preds = cfg.get_prev(id);
			if id.is_entry() || preds.is_empty() {
				continue;
			}
			let mut expected = dom.sets[&preds[0]].clone();
			for pred in &preds[1..] {
				expected = expected.intersection(&dom.sets[pred]).copied().collect();
			}
			expected.insert(id);
			assert_eq!(dom.sets[&id], expected, "{id}");
		}
		assert_eq!(dom.sets[&BlockId::ENTRY], set(&[1]));
	}

	#[test]
	fn unreachable_block_keeps_full_set() {
		// `GOTO 5` sits inside B2 and is never inspected, so B4 = {5} has no
		// predecessors.
		let (cfg, dom) =
			dominators(&["If x > 0 GOTO 4", "GOTO 5", "y = 1", "return y", "return x"]);
		assert_eq!(dom.sets.len(), 4);
		assert!(cfg.get_prev(BlockId(4)).is_empty());
		assert_eq!(dom.sets[&BlockId(4)], set(&[1, 2, 3, 4]));
		assert_eq!(dom.sets[&BlockId(3)], set(&[1, 3]));
	}
}
