pub use clap::Parser;
use optimizer::Stage;

/// Loop-invariant analysis of three-address code.
#[derive(Parser, Debug)]
#[command(name = "tacloop", version)]
pub struct Args {
	/// TAC source, one statement per line; stdin when absent.
	#[arg(value_parser)]
	pub input: Option<String>,

	/// Analyse a bundled program instead of reading input.
	#[arg(long, conflicts_with = "input")]
	pub example: Option<String>,

	#[arg(long)]
	pub list_examples: bool,

	/// Stop after this stage (name or step number 1-11).
	#[arg(long)]
	pub stage: Option<Stage>,

	#[arg(long)]
	pub json: bool,

	#[arg(short)]
	pub output: Option<String>,

	/// Only move invariants whose block dominates every loop exit.
	#[arg(long)]
	pub strict_motion: bool,

	/// Treat variables read before any definition as program inputs.
	#[arg(long)]
	pub allow_free_vars: bool,
}
