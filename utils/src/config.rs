use serde::Serialize;

use crate::constants::FIXED_POINT_SLACK;

/// Which code-motion conditions must hold for an invariant to be movable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MotionPolicy {
	/// Gate movability on the defining block dominating every loop exit.
	/// Off by default: the exit check is still computed and reported.
	pub require_exit_dominance: bool,
}

impl Default for MotionPolicy {
	fn default() -> Self {
		Self {
			require_exit_dominance: false,
		}
	}
}

/// What to do with a use that no definition reaches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum UndefinedUsePolicy {
	/// Abort the run with `EmptyUdChain`.
	#[default]
	Reject,
	/// Treat the variable as an input defined before the program starts.
	TreatAsInput,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AnalysisConfig {
	pub motion: MotionPolicy,
	pub undefined_uses: UndefinedUsePolicy,
	pub fixed_point_slack: usize,
}

impl Default for AnalysisConfig {
	fn default() -> Self {
		Self {
			motion: MotionPolicy::default(),
			undefined_uses: UndefinedUsePolicy::default(),
			fixed_point_slack: FIXED_POINT_SLACK,
		}
	}
}

impl AnalysisConfig {
	pub fn strict_motion(mut self, on: bool) -> Self {
		self.motion.require_exit_dominance = on;
		self
	}

	pub fn allow_free_vars(mut self, on: bool) -> Self {
		self.undefined_uses = if on {
			UndefinedUsePolicy::TreatAsInput
		} else {
			UndefinedUsePolicy::Reject
		};
		self
	}
}
