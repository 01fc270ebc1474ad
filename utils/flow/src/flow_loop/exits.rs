use std::collections::BTreeSet;

use utils::BlockId;

use super::Loop;
use crate::cfg::CFG;

/// Blocks outside `body` that some block inside `body` branches to.
pub fn exit_blocks(cfg: &CFG, body: &BTreeSet<BlockId>) -> BTreeSet<BlockId> {
	body
		.iter()
		.flat_map(|bb| cfg.get_succ(*bb).iter().copied())
		.filter(|succ| !body.contains(succ))
		.collect()
}

/// Edges entering the loop header from outside the loop; a pre-header would
/// be split into each of them.
pub fn entering_edges(cfg: &CFG, lp: &Loop) -> Vec<(BlockId, BlockId)> {
	cfg
		.get_prev(lp.header)
		.iter()
		.filter(|prev| !lp.contains_block(**prev))
		.map(|prev| (*prev, lp.header))
		.collect()
}
