use std::{
	collections::BTreeSet,
	fmt::{Display, Write},
};

use anyhow::Result;
use optimizer::{Stage, StagedAnalysis};

use crate::config::{REPORT_INDENT, SECTION_RULE};

/// Re-indents text written with four spaces per level to `n` spaces per level.
pub fn trans_indent(input: &str, n: usize) -> String {
	input
		.lines()
		.map(|line| {
			let indent_len = line.chars().take_while(|&c| c == ' ').count();
			let res = &line[indent_len..];
			let new_indent = " ".repeat((indent_len / 4) * n);
			format!("{}{}", new_indent, res)
		})
		.collect::<Vec<_>>()
		.join("\n")
}

fn join<T: Display>(items: impl IntoIterator<Item = T>) -> String {
	items.into_iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

fn braces<T: Display>(items: &BTreeSet<T>) -> String {
	format!("{{{}}}", join(items.iter()))
}

fn section(out: &mut String, stage: Stage, title: &str) -> std::fmt::Result {
	writeln!(
		out,
		"{} step {}: {} {}",
		SECTION_RULE,
		stage.step(),
		title,
		SECTION_RULE
	)
}

/// Text report of every stage `analysis` has reached.
pub fn render(analysis: &StagedAnalysis) -> Result<String> {
	let mut out = String::new();
	for stage in Stage::ALL.iter().copied().filter(|v| analysis.has(*v)) {
		render_stage(&mut out, analysis, stage)?;
		out.push('\n');
	}
	Ok(trans_indent(&out, REPORT_INDENT))
}

fn render_stage(out: &mut String, analysis: &StagedAnalysis, stage: Stage) -> Result<()> {
	match stage {
		Stage::Leaders => {
			section(out, stage, "leaders")?;
			writeln!(out, "    {}", join(analysis.require_leaders()?))?;
		}
		Stage::Blocks => {
			section(out, stage, "basic blocks")?;
			for block in analysis.require_blocks()?.iter() {
				writeln!(out, "    {}:", block.id)?;
				for index in block.stmts.iter() {
					if let Some(stmt) = analysis.program.get(*index) {
						writeln!(out, "        {}", stmt)?;
					}
				}
			}
		}
		Stage::Cfg => {
			section(out, stage, "control flow graph")?;
			let cfg = analysis.require_cfg()?;
			for id in cfg.ids() {
				writeln!(
					out,
					"    {}: succ [{}] pred [{}]",
					id,
					join(cfg.get_succ(id)),
					join(cfg.get_prev(id))
				)?;
			}
		}
		Stage::Dominators => {
			section(out, stage, "dominators")?;
			let dom = analysis.require_dominators()?;
			for (id, doms) in dom.sets.iter() {
				write!(out, "    Dom({}) = {}", id, braces(doms))?;
				match dom.immediate_dominator(*id) {
					Some(idom) => {
						writeln!(out, ", idom {}", idom)?;
					}
					None => out.push('\n'),
				}
			}
		}
		Stage::BackEdges => {
			section(out, stage, "back edges")?;
			let edges = analysis.require_back_edges()?;
			if edges.is_empty() {
				writeln!(out, "    none")?;
			}
			for edge in edges.iter() {
				writeln!(out, "    {}", edge)?;
			}
		}
		Stage::Loops => {
			section(out, stage, "natural loops")?;
			let loops = analysis.require_loops()?;
			let blocks = analysis.require_blocks()?;
			for lp in loops.loops.iter() {
				writeln!(out, "    {}", lp)?;
				writeln!(
					out,
					"        statements: {}",
					join(blocks.statements_of(&lp.blocks))
				)?;
			}
			writeln!(out, "    loop blocks: {}", braces(&loops.loop_blocks))?;
		}
		Stage::GenKill => {
			section(out, stage, "gen / kill")?;
			let gen_kill = analysis.require_gen_kill()?;
			for (id, gen) in gen_kill.gen.iter() {
				let kill = gen_kill.kill.get(id).cloned().unwrap_or_default();
				writeln!(out, "    {}: gen {} kill {}", id, braces(gen), braces(&kill))?;
			}
		}
		Stage::InOut => {
			section(out, stage, "reaching definitions")?;
			let in_out = analysis.require_in_out()?;
			for (id, in_set) in in_out.in_sets.iter() {
				let out_set = in_out.out_sets.get(id).cloned().unwrap_or_default();
				writeln!(
					out,
					"    {}: in {} out {}",
					id,
					braces(in_set),
					braces(&out_set)
				)?;
			}
			writeln!(out, "    converged after {} passes", in_out.passes)?;
		}
		Stage::UdChains => {
			section(out, stage, "ud-chains")?;
			let ud = analysis.require_ud_chains()?;
			for (stmt, chains) in ud.chains.iter() {
				for (var, defs) in chains.iter() {
					writeln!(out, "    ud({}, {}) = {}", stmt, var, braces(defs))?;
				}
			}
			if !ud.free_vars.is_empty() {
				writeln!(out, "    program inputs: {}", join(&ud.free_vars))?;
			}
		}
		Stage::LoopInvariants => {
			section(out, stage, "loop-invariant statements")?;
			let invariants = analysis.require_invariants()?;
			for stmt in invariants.discovery_order() {
				if let Some(s) = analysis.program.get(stmt) {
					let pass = invariants.pass_of.get(&stmt).copied().unwrap_or_default();
					writeln!(out, "    {} (pass {})", s, pass)?;
				}
			}
			if invariants.stmts.is_empty() {
				writeln!(out, "    none")?;
			}
		}
		Stage::Movable => {
			section(out, stage, "code motion")?;
			let motion = analysis.require_motion()?;
			writeln!(out, "    loop exits: {}", braces(&motion.exits))?;
			for (stmt, verdict) in motion.verdicts.iter() {
				writeln!(
					out,
					"    ({}) {} in {}: dominates exits {}, single definition {}, exclusive reach {} => {}",
					stmt,
					verdict.var,
					verdict.block,
					verdict.dominates_exits,
					verdict.single_definition,
					verdict.exclusive_reach,
					if verdict.movable { "movable" } else { "stays" }
				)?;
			}
			for placement in motion.placements.iter() {
				let edges = placement
					.entering_edges
					.iter()
					.map(|(from, to)| format!("{} -> {}", from, to));
				write!(
					out,
					"    hoist ({}) out of loop {} -> {}",
					placement.stmt, placement.tail, placement.header
				)?;
				if placement.before_entry {
					writeln!(out, ": pre-header before program start")?;
				} else {
					writeln!(out, ": pre-header on {}", join(edges))?;
				}
			}
		}
	}
	Ok(())
}
