use std::{
	cmp::Reverse,
	collections::{BTreeMap, BTreeSet},
};

use flow::flow_loop::{entering_edges, exit_blocks};
use log::{debug, trace};
use utils::{errors::Result, AnalysisConfig};

use super::{CodeMotion, HoistPlacement, MotionAnalysis, MotionVerdict};
use crate::{AnalysisPass, StagedAnalysis};

impl AnalysisPass for MotionAnalysis {
	type Output = CodeMotion;

	fn new(config: &AnalysisConfig) -> Self {
		Self {
			policy: config.motion,
		}
	}

	fn apply(self, analysis: &StagedAnalysis) -> Result<CodeMotion> {
		let blocks = analysis.require_blocks()?;
		let cfg = analysis.require_cfg()?;
		let dom = analysis.require_dominators()?;
		let loops = analysis.require_loops()?;
		let gen_kill = analysis.require_gen_kill()?;
		let ud = analysis.require_ud_chains()?;
		let invariants = analysis.require_invariants()?;

		let universe = &loops.loop_blocks;
		let exits = exit_blocks(cfg, universe);
		let in_universe =
			|stmt: usize| blocks.block_of(stmt).is_some_and(|b| universe.contains(&b));

		let mut verdicts = BTreeMap::new();
		let mut movable = BTreeSet::new();
		let mut placements = Vec::new();

		for &stmt in invariants.stmts.iter() {
			let (Some(var), Some(block)) =
				(gen_kill.definitions.get(&stmt), blocks.block_of(stmt))
			else {
				continue;
			};

			let dominates_exits = exits.iter().all(|exit| dom.dominates(block, *exit));
			let single_definition = gen_kill
				.definitions
				.iter()
				.all(|(other, v)| *other == stmt || v != var || !in_universe(*other));
			let exclusive_reach = gen_kill.uses.get(var).map_or(true, |uses| {
				uses
					.iter()
					.filter(|u| in_universe(**u))
					.all(|u| ud.only_reached_by(*u, var, stmt))
			});
			let gated = dominates_exits || !self.policy.require_exit_dominance;
			let verdict = MotionVerdict {
				var: var.clone(),
				block,
				dominates_exits,
				single_definition,
				exclusive_reach,
				movable: gated && single_definition && exclusive_reach,
			};
			trace!("statement {}: {:?}", stmt, verdict);

			if verdict.movable {
				movable.insert(stmt);
				let outermost = loops
					.loops_containing(block)
					.max_by_key(|lp| (lp.blocks.len(), Reverse(lp.key())));
				if let Some(lp) = outermost {
					placements.push(HoistPlacement {
						stmt,
						header: lp.header,
						tail: lp.tail,
						entering_edges: entering_edges(cfg, lp),
						before_entry: lp.header.is_entry(),
					});
				}
			}
			verdicts.insert(stmt, verdict);
		}
		debug!(
			"{} of {} invariants movable",
			movable.len(),
			invariants.stmts.len()
		);

		Ok(CodeMotion {
			verdicts,
			movable,
			exits,
			placements,
		})
	}
}
