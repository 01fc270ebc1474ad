use std::{fmt::Display, str::FromStr};

use serde::Serialize;

/// Steps of the analysis, in the order they run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
	Leaders,
	Blocks,
	Cfg,
	Dominators,
	BackEdges,
	Loops,
	GenKill,
	InOut,
	UdChains,
	LoopInvariants,
	Movable,
}

impl Stage {
	pub const ALL: [Stage; 11] = [
		Stage::Leaders,
		Stage::Blocks,
		Stage::Cfg,
		Stage::Dominators,
		Stage::BackEdges,
		Stage::Loops,
		Stage::GenKill,
		Stage::InOut,
		Stage::UdChains,
		Stage::LoopInvariants,
		Stage::Movable,
	];

	pub fn name(self) -> &'static str {
		match self {
			Stage::Leaders => "leaders",
			Stage::Blocks => "blocks",
			Stage::Cfg => "cfg",
			Stage::Dominators => "dominators",
			Stage::BackEdges => "back_edges",
			Stage::Loops => "loops",
			Stage::GenKill => "gen_kill",
			Stage::InOut => "in_out",
			Stage::UdChains => "ud_chains",
			Stage::LoopInvariants => "loop_invariants",
			Stage::Movable => "movable",
		}
	}

	/// 1-based step number.
	pub fn step(self) -> usize {
		self as usize + 1
	}

	pub fn from_step(step: usize) -> Option<Self> {
		step.checked_sub(1).and_then(|i| Self::ALL.get(i)).copied()
	}

	pub fn last() -> Self {
		Stage::Movable
	}
}

impl Display for Stage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.name())
	}
}

impl FromStr for Stage {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let key = s.trim().to_ascii_lowercase().replace('-', "_");
		if let Ok(step) = key.parse::<usize>() {
			return Self::from_step(step).ok_or_else(|| format!("no step {step}"));
		}
		Self::ALL
			.iter()
			.find(|v| v.name() == key)
			.copied()
			.ok_or_else(|| format!("unknown stage `{s}`"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn steps_follow_declaration_order() {
		for (i, stage) in Stage::ALL.iter().enumerate() {
			assert_eq!(stage.step(), i + 1);
			assert_eq!(Stage::from_step(i + 1), Some(*stage));
		}
		assert_eq!(Stage::from_step(0), None);
		assert_eq!(Stage::from_step(12), None);
		assert!(Stage::Leaders < Stage::Movable);
	}

	#[test]
	fn parse_by_name_or_step() {
		assert_eq!("ud-chains".parse::<Stage>(), Ok(Stage::UdChains));
		assert_eq!("Dominators".parse::<Stage>(), Ok(Stage::Dominators));
		assert_eq!("4".parse::<Stage>(), Ok(Stage::Dominators));
		assert!("liveness".parse::<Stage>().is_err());
	}
}
