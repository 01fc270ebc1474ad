use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace};
use utils::{errors::Result, AnalysisConfig, BlockId, FixedPoint};

use super::{GenKill, GenKillSets, InOut, ReachingDefinitions};
use crate::{AnalysisPass, StagedAnalysis};

impl AnalysisPass for GenKillSets {
	type Output = GenKill;

	fn new(_config: &AnalysisConfig) -> Self {
		Self {}
	}

	fn apply(self, analysis: &StagedAnalysis) -> Result<GenKill> {
		let program = &analysis.program;
		let blocks = analysis.require_blocks()?;
		let definitions = program.definitions();

		let mut uses: BTreeMap<String, Vec<usize>> = BTreeMap::new();
		for stmt in program.iter() {
			for var in stmt.operands() {
				let list = uses.entry(var.clone()).or_default();
				if list.last() != Some(&stmt.index) {
					list.push(stmt.index);
				}
			}
		}

		let mut defs_of: BTreeMap<&str, BTreeSet<usize>> = BTreeMap::new();
		for (stmt, var) in definitions.iter() {
			defs_of.entry(var.as_str()).or_default().insert(*stmt);
		}

		let mut gen = BTreeMap::new();
		let mut kill = BTreeMap::new();
		for block in blocks.iter() {
			let mut block_gen = BTreeSet::new();
			let mut block_kill = BTreeSet::new();
			for stmt in block.stmts.iter() {
				let Some(var) = definitions.get(stmt) else {
					continue;
				};
				block_gen.insert(*stmt);
				// Every other definition of the variable, wherever it is.
				block_kill.extend(defs_of[var.as_str()].iter().filter(|v| *v != stmt));
			}
			trace!("{}: gen {:?} kill {:?}", block.id, block_gen, block_kill);
			gen.insert(block.id, block_gen);
			kill.insert(block.id, block_kill);
		}

		Ok(GenKill {
			gen,
			kill,
			definitions,
			uses,
		})
	}
}

impl AnalysisPass for ReachingDefinitions {
	type Output = InOut;

	fn new(config: &AnalysisConfig) -> Self {
		Self {
			fixed_point_slack: config.fixed_point_slack,
		}
	}

	fn apply(self, analysis: &StagedAnalysis) -> Result<InOut> {
		let blocks = analysis.require_blocks()?;
		let cfg = analysis.require_cfg()?;
		let GenKill { gen, kill, definitions, .. } = analysis.require_gen_kill()?;

		let empty: BTreeMap<BlockId, BTreeSet<usize>> =
			blocks.ids().map(|id| (id, BTreeSet::new())).collect();
		let mut in_sets = empty.clone();
		let mut out_sets = empty;

		// IN and OUT only grow; each changing pass adds at least one element.
		let height = 2 * blocks.size() * definitions.len() + 1;
		let mut guard = FixedPoint::new("reaching definitions", height, self.fixed_point_slack);
		loop {
			guard.tick()?;
			let mut changed = false;
			for id in blocks.ids() {
				let new_in: BTreeSet<usize> = if id.is_entry() {
					BTreeSet::new()
				} else {
					cfg
						.get_prev(id)
						.iter()
						.flat_map(|p| out_sets[p].iter().copied())
						.collect()
				};
				let new_out: BTreeSet<usize> = gen[&id]
					.iter()
					.copied()
					.chain(new_in.difference(&kill[&id]).copied())
					.collect();
				if new_in != in_sets[&id] || new_out != out_sets[&id] {
					changed = true;
				}
				in_sets.insert(id, new_in);
				out_sets.insert(id, new_out);
			}
			if !changed {
				break;
			}
		}
		guard.finish();
		debug!("reaching definitions settled in {} passes", guard.passes());

		Ok(InOut {
			in_sets,
			out_sets,
			passes: guard.passes(),
		})
	}
}
