mod impls;
mod iterative;

use std::collections::{BTreeMap, BTreeSet};

pub use iterative::*;
use serde::Serialize;
use utils::BlockId;

/// Dominator set of every block; each set contains the block itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dominators {
	pub sets: BTreeMap<BlockId, BTreeSet<BlockId>>,
}
