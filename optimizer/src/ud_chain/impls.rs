use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace};
use utils::{
	errors::Result, AnalysisConfig, TacError::EmptyUdChain, UndefinedUsePolicy,
};

use super::{UdChainBuilder, UdChains};
use crate::{AnalysisPass, StagedAnalysis};

impl AnalysisPass for UdChainBuilder {
	type Output = UdChains;

	fn new(config: &AnalysisConfig) -> Self {
		Self {
			policy: config.undefined_uses,
		}
	}

	fn apply(self, analysis: &StagedAnalysis) -> Result<UdChains> {
		let blocks = analysis.require_blocks()?;
		let gen_kill = analysis.require_gen_kill()?;
		let in_out = analysis.require_in_out()?;

		let mut chains: BTreeMap<usize, BTreeMap<String, BTreeSet<usize>>> =
			BTreeMap::new();
		let mut free_vars = BTreeSet::new();

		for stmt in analysis.program.iter() {
			if stmt.operands().is_empty() {
				continue;
			}
			let Some(block) = blocks.block_of(stmt.index).and_then(|id| blocks.get(id))
			else {
				continue;
			};
			let Some(in_set) = in_out.in_sets.get(&block.id) else {
				continue;
			};
			for var in stmt.operands() {
				if chains.get(&stmt.index).is_some_and(|v| v.contains_key(var)) {
					continue;
				}
				let mut pool = in_set.clone();
				// Earlier definitions in the same block shadow inherited ones.
				for prior in block.stmts.iter().take_while(|v| **v != stmt.index) {
					if gen_kill.defines(*prior, var) {
						pool.retain(|d| !gen_kill.defines(*d, var));
						pool.insert(*prior);
					}
				}
				let chain: BTreeSet<usize> =
					pool.into_iter().filter(|d| gen_kill.defines(*d, var)).collect();
				if chain.is_empty() {
					match self.policy {
						UndefinedUsePolicy::Reject => {
							return Err(EmptyUdChain {
								stmt: stmt.index,
								var: var.clone(),
							});
						}
						UndefinedUsePolicy::TreatAsInput => {
							trace!("{} read at {} as program input", var, stmt.index);
							free_vars.insert(var.clone());
						}
					}
				}
				chains.entry(stmt.index).or_default().insert(var.clone(), chain);
			}
		}
		debug!("built ud-chains for {} statements", chains.len());

		Ok(UdChains { chains, free_vars })
	}
}
