use std::collections::{BTreeMap, BTreeSet};

use flow::{
	basicblock::identify_leaders,
	dominator::compute_dominator,
	flow_loop::identify_back_edges,
	BackEdge, BasicBlock, BasicBlocks, Dominators, Loop, LoopInfo, CFG,
};
use log::{debug, trace};
use serde::Serialize;
use tac::Program;
use utils::{errors::Result, AnalysisConfig, BlockId, TacError::MissingStage};

use crate::{
	code_motion::{CodeMotion, MotionAnalysis, MotionVerdict},
	loop_invariant::{LoopInvariantAnalysis, LoopInvariants},
	reaching_definitions::{GenKill, GenKillSets, InOut, ReachingDefinitions},
	stage::Stage,
	ud_chain::{UdChainBuilder, UdChains},
	AnalysisPass,
};

fn require<T>(value: &Option<T>, stage: Stage) -> Result<&T> {
	value.as_ref().ok_or(MissingStage(stage.name()))
}

/// Outputs of every stage run so far. A stage's output never changes once
/// stored; later stages only read earlier ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StagedAnalysis {
	pub program: Program,
	#[serde(skip)]
	pub config: AnalysisConfig,
	pub reached: Option<Stage>,
	pub leaders: Option<Vec<usize>>,
	pub blocks: Option<BasicBlocks>,
	pub cfg: Option<CFG>,
	pub dominators: Option<Dominators>,
	pub back_edges: Option<Vec<BackEdge>>,
	pub loops: Option<LoopInfo>,
	pub gen_kill: Option<GenKill>,
	pub in_out: Option<InOut>,
	pub ud_chains: Option<UdChains>,
	pub invariants: Option<LoopInvariants>,
	pub motion: Option<CodeMotion>,
}

impl StagedAnalysis {
	pub fn new(program: Program, config: AnalysisConfig) -> Self {
		Self {
			program,
			config,
			reached: None,
			leaders: None,
			blocks: None,
			cfg: None,
			dominators: None,
			back_edges: None,
			loops: None,
			gen_kill: None,
			in_out: None,
			ud_chains: None,
			invariants: None,
			motion: None,
		}
	}

	pub fn require_leaders(&self) -> Result<&Vec<usize>> {
		require(&self.leaders, Stage::Leaders)
	}
	pub fn require_blocks(&self) -> Result<&BasicBlocks> {
		require(&self.blocks, Stage::Blocks)
	}
	pub fn require_cfg(&self) -> Result<&CFG> {
		require(&self.cfg, Stage::Cfg)
	}
	pub fn require_dominators(&self) -> Result<&Dominators> {
		require(&self.dominators, Stage::Dominators)
	}
	pub fn require_back_edges(&self) -> Result<&Vec<BackEdge>> {
		require(&self.back_edges, Stage::BackEdges)
	}
	pub fn require_loops(&self) -> Result<&LoopInfo> {
		require(&self.loops, Stage::Loops)
	}
	pub fn require_gen_kill(&self) -> Result<&GenKill> {
		require(&self.gen_kill, Stage::GenKill)
	}
	pub fn require_in_out(&self) -> Result<&InOut> {
		require(&self.in_out, Stage::InOut)
	}
	pub fn require_ud_chains(&self) -> Result<&UdChains> {
		require(&self.ud_chains, Stage::UdChains)
	}
	pub fn require_invariants(&self) -> Result<&LoopInvariants> {
		require(&self.invariants, Stage::LoopInvariants)
	}
	pub fn require_motion(&self) -> Result<&CodeMotion> {
		require(&self.motion, Stage::Movable)
	}

	pub fn has(&self, stage: Stage) -> bool {
		self.reached.is_some_and(|v| v >= stage)
	}

	/// Runs the stage after `reached`. Returns the stage run, or `None` when
	/// the analysis is already complete.
	pub fn advance(&mut self) -> Result<Option<Stage>> {
		let next = match self.reached {
			None => Stage::Leaders,
			Some(stage) => match Stage::from_step(stage.step() + 1) {
				Some(next) => next,
				None => return Ok(None),
			},
		};
		self.run(next)?;
		self.reached = Some(next);
		trace!("stage {} ({}) done", next.step(), next);
		Ok(Some(next))
	}

	fn run(&mut self, stage: Stage) -> Result<()> {
		let config = self.config;
		match stage {
			Stage::Leaders => self.leaders = Some(identify_leaders(&self.program)),
			Stage::Blocks => {
				let leaders = self.require_leaders()?.clone();
				self.blocks = Some(BasicBlocks::form(self.program.len(), leaders));
			}
			Stage::Cfg => {
				self.cfg = Some(CFG::build(&self.program, self.require_blocks()?));
			}
			Stage::Dominators => {
				self.dominators = Some(compute_dominator(self.require_cfg()?, &config)?);
			}
			Stage::BackEdges => {
				let edges =
					identify_back_edges(self.require_cfg()?, self.require_dominators()?);
				self.back_edges = Some(edges);
			}
			Stage::Loops => {
				let info =
					LoopInfo::from_back_edges(self.require_cfg()?, self.require_back_edges()?);
				self.loops = Some(info);
			}
			Stage::GenKill => {
				self.gen_kill = Some(GenKillSets::new(&config).apply(self)?);
			}
			Stage::InOut => {
				self.in_out = Some(ReachingDefinitions::new(&config).apply(self)?);
			}
			Stage::UdChains => {
				self.ud_chains = Some(UdChainBuilder::new(&config).apply(self)?);
			}
			Stage::LoopInvariants => {
				self.invariants = Some(LoopInvariantAnalysis::new(&config).apply(self)?);
			}
			Stage::Movable => {
				self.motion = Some(MotionAnalysis::new(&config).apply(self)?);
			}
		}
		Ok(())
	}

	/// Converts a complete run into the aggregate result.
	pub fn finish(self) -> Result<AnalysisResult> {
		let result = AnalysisResult {
			leaders: require(&self.leaders, Stage::Leaders)?.clone(),
			blocks: require(&self.blocks, Stage::Blocks)?.clone(),
			cfg: require(&self.cfg, Stage::Cfg)?.clone(),
			dominators: require(&self.dominators, Stage::Dominators)?.clone(),
			loops: require(&self.loops, Stage::Loops)?.clone(),
			gen_kill: require(&self.gen_kill, Stage::GenKill)?.clone(),
			in_out: require(&self.in_out, Stage::InOut)?.clone(),
			ud_chains: require(&self.ud_chains, Stage::UdChains)?.clone(),
			invariants: require(&self.invariants, Stage::LoopInvariants)?.clone(),
			motion: require(&self.motion, Stage::Movable)?.clone(),
			config: self.config,
			program: self.program,
		};
		Ok(result)
	}
}

/// Runs the pipeline over one program.
#[derive(Clone, Copy, Debug, Default)]
pub struct Analyzer {
	config: AnalysisConfig,
}

impl Analyzer {
	pub fn new(config: AnalysisConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &AnalysisConfig {
		&self.config
	}

	/// Runs every stage up to and including `stage`.
	pub fn run_until(&self, program: Program, stage: Stage) -> Result<StagedAnalysis> {
		let mut analysis = StagedAnalysis::new(program, self.config);
		while !analysis.has(stage) {
			if analysis.advance()?.is_none() {
				break;
			}
		}
		Ok(analysis)
	}

	pub fn analyze(&self, program: Program) -> Result<AnalysisResult> {
		let result = self.run_until(program, Stage::last())?.finish()?;
		debug!(
			"{} loops, {} invariant, {} movable",
			result.loops.loops.len(),
			result.invariants.stmts.len(),
			result.motion.movable.len()
		);
		Ok(result)
	}

	pub fn analyze_lines<S: AsRef<str>>(&self, lines: &[S]) -> Result<AnalysisResult> {
		self.analyze(Program::parse(lines)?)
	}
}

/// Every stage output of a complete run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
	pub program: Program,
	#[serde(skip)]
	pub config: AnalysisConfig,
	pub leaders: Vec<usize>,
	pub blocks: BasicBlocks,
	pub cfg: CFG,
	pub dominators: Dominators,
	pub loops: LoopInfo,
	pub gen_kill: GenKill,
	pub in_out: InOut,
	pub ud_chains: UdChains,
	pub invariants: LoopInvariants,
	pub motion: CodeMotion,
}

impl AnalysisResult {
	pub fn block_of(&self, stmt: usize) -> Option<BlockId> {
		self.blocks.block_of(stmt)
	}

	pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
		self.blocks.get(id)
	}

	pub fn successors(&self, id: BlockId) -> &[BlockId] {
		self.cfg.get_succ(id)
	}

	pub fn predecessors(&self, id: BlockId) -> &[BlockId] {
		self.cfg.get_prev(id)
	}

	pub fn dominators(&self, id: BlockId) -> Option<&BTreeSet<BlockId>> {
		self.dominators.get(id)
	}

	pub fn back_edges(&self) -> &[BackEdge] {
		&self.loops.back_edges
	}

	pub fn loop_of(&self, header: BlockId, tail: BlockId) -> Option<&Loop> {
		self.loops.get(header, tail)
	}

	pub fn gen(&self, id: BlockId) -> Option<&BTreeSet<usize>> {
		self.gen_kill.gen.get(&id)
	}

	pub fn kill(&self, id: BlockId) -> Option<&BTreeSet<usize>> {
		self.gen_kill.kill.get(&id)
	}

	pub fn in_set(&self, id: BlockId) -> Option<&BTreeSet<usize>> {
		self.in_out.in_sets.get(&id)
	}

	pub fn out_set(&self, id: BlockId) -> Option<&BTreeSet<usize>> {
		self.in_out.out_sets.get(&id)
	}

	pub fn ud_chain(&self, stmt: usize, var: &str) -> Option<&BTreeSet<usize>> {
		self.ud_chains.get(stmt, var)
	}

	/// Chains of every variable read by `stmt`.
	pub fn ud_chains_at(&self, stmt: usize) -> Option<&BTreeMap<String, BTreeSet<usize>>> {
		self.ud_chains.chains.get(&stmt)
	}

	pub fn is_invariant(&self, stmt: usize) -> bool {
		self.invariants.stmts.contains(&stmt)
	}

	pub fn is_movable(&self, stmt: usize) -> bool {
		self.motion.movable.contains(&stmt)
	}

	pub fn verdict(&self, stmt: usize) -> Option<&MotionVerdict> {
		self.motion.verdicts.get(&stmt)
	}
}
