use log::trace;

use crate::errors::{Result, TacError};

/// Pass counter for a monotone fixed-point loop.
///
/// `height` is an upper bound on the number of passes that can change
/// something; `tick` fails once the loop runs past `height + slack`.
pub struct FixedPoint {
	analysis: &'static str,
	bound: usize,
	passes: usize,
}

impl FixedPoint {
	pub fn new(analysis: &'static str, height: usize, slack: usize) -> Self {
		Self {
			analysis,
			bound: height.saturating_add(slack).max(1),
			passes: 0,
		}
	}

	/// Call at the top of every pass.
	pub fn tick(&mut self) -> Result<()> {
		if self.passes >= self.bound {
			return Err(TacError::NonTerminatingFixedPoint {
				analysis: self.analysis,
				bound: self.bound,
			});
		}
		self.passes += 1;
		Ok(())
	}

	pub fn passes(&self) -> usize {
		self.passes
	}

	pub fn finish(&self) {
		trace!("{} converged after {} passes", self.analysis, self.passes);
	}
}
