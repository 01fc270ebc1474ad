use std::fmt::Display;

use serde::{Serialize, Serializer};

/// Basic block identifier, `B1` for the block starting at the first leader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub usize);

impl BlockId {
	/// The block starting at statement 1.
	pub const ENTRY: BlockId = BlockId(1);

	/// Zero-based position in leader order.
	pub fn index(self) -> usize {
		self.0 - 1
	}

	pub fn from_index(index: usize) -> Self {
		BlockId(index + 1)
	}

	pub fn next(self) -> Self {
		BlockId(self.0 + 1)
	}

	pub fn is_entry(self) -> bool {
		self == Self::ENTRY
	}
}

impl Display for BlockId {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "B{}", self.0)
	}
}

impl Serialize for BlockId {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}
