pub mod analysis;
pub mod code_motion;
pub mod loop_invariant;
pub mod reaching_definitions;
pub mod stage;
pub mod ud_chain;


use utils::{errors::Result, AnalysisConfig};

pub use analysis::{AnalysisResult, Analyzer, StagedAnalysis};
pub use code_motion::{CodeMotion, HoistPlacement, MotionVerdict};
pub use loop_invariant::LoopInvariants;
pub use reaching_definitions::{GenKill, InOut};
pub use stage::Stage;
pub use ud_chain::UdChains;

/// A data-flow pass reading the stages computed before it.
pub trait AnalysisPass {
	type Output;
	fn new(config: &AnalysisConfig) -> Self;
	fn apply(self, analysis: &StagedAnalysis) -> Result<Self::Output>;
}
