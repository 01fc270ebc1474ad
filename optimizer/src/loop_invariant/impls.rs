use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace};
use utils::{errors::Result, AnalysisConfig, FixedPoint, UndefinedUsePolicy};

use super::{LoopInvariantAnalysis, LoopInvariants};
use crate::{AnalysisPass, StagedAnalysis};

impl AnalysisPass for LoopInvariantAnalysis {
	type Output = LoopInvariants;

	fn new(config: &AnalysisConfig) -> Self {
		Self {
			inputs_are_invariant: config.undefined_uses
				== UndefinedUsePolicy::TreatAsInput,
			fixed_point_slack: config.fixed_point_slack,
		}
	}

	fn apply(self, analysis: &StagedAnalysis) -> Result<LoopInvariants> {
		let program = &analysis.program;
		let blocks = analysis.require_blocks()?;
		let universe = &analysis.require_loops()?.loop_blocks;
		let ud = analysis.require_ud_chains()?;

		let candidates = blocks.statements_of(universe);
		let outside_loops = |def: usize| {
			blocks.block_of(def).is_some_and(|b| !universe.contains(&b))
		};

		let mut stmts = BTreeSet::new();
		let mut pass_of = BTreeMap::new();
		let mut guard = FixedPoint::new(
			"loop invariants",
			candidates.len() + 1,
			self.fixed_point_slack,
		);
		loop {
			guard.tick()?;
			let mut changed = false;
			for &index in candidates.iter() {
				if stmts.contains(&index) {
					continue;
				}
				let Some(stmt) = program.get(index) else {
					continue;
				};
				if stmt.defines().is_none() {
					continue;
				}
				let invariant = stmt.operands().iter().all(|var| {
					match ud.get(index, var) {
						Some(chain) if !chain.is_empty() => chain
							.iter()
							.all(|def| outside_loops(*def) || stmts.contains(def)),
						_ => self.inputs_are_invariant,
					}
				});
				if invariant {
					trace!("statement {} is loop invariant", index);
					stmts.insert(index);
					pass_of.insert(index, guard.passes());
					changed = true;
				}
			}
			if !changed {
				break;
			}
		}
		guard.finish();
		debug!("{} of {} loop statements invariant", stmts.len(), candidates.len());

		Ok(LoopInvariants {
			stmts,
			pass_of,
			candidates,
			passes: guard.passes(),
		})
	}
}
