mod cli;
mod config;
mod logging;
mod printer;

use std::{
	fs::{self, File},
	io::{self, Read, Write},
};

use anyhow::Result;
use clap::Parser;
use cli::Args;
use log::{info, trace};
use optimizer::{Analyzer, Stage};
use printer::render;
use tac::{samples, Program};
use utils::{fatal_error, map_sys_err, warning, AnalysisConfig};

/// Loads the program to analyse. The flag is set for bundled samples that
/// read program inputs, which only analyse with free variables allowed.
fn step_load(args: &Args) -> Result<(Program, bool)> {
	if let Some(name) = &args.example {
		let sample = samples::sample(name).unwrap_or_else(|| {
			fatal_error(format!("unknown example `{name}`; try --list-examples"));
			unreachable!()
		});
		if sample.reads_inputs() && !args.allow_free_vars {
			info!(
				"example `{}` reads inputs {}; treating them as free variables",
				name,
				sample.inputs.join(", ")
			);
		}
		return Ok((Program::parse(sample.lines)?, sample.reads_inputs()));
	}
	let code = match args.input.as_deref() {
		Some(file_name) if file_name != "-" => {
			fs::read_to_string(file_name).map_err(map_sys_err)?
		}
		_ => {
			let mut code = String::new();
			io::stdin().read_to_string(&mut code).map_err(map_sys_err)?;
			code
		}
	};
	Ok((Program::from_source(&code)?, false))
}

fn main() -> Result<()> {
	logging::init();
	trace!("start");
	let args = Args::parse();

	let mut writer: Box<dyn Write> = if let Some(o) = &args.output {
		Box::new(File::create(o).map_err(map_sys_err)?)
	} else {
		Box::new(io::stdout())
	};

	if args.list_examples {
		for sample in samples::SAMPLES.iter() {
			write!(writer, "{} ({} statements)", sample.name, sample.lines.len())?;
			if sample.reads_inputs() {
				write!(writer, ", inputs: {}", sample.inputs.join(", "))?;
			}
			writeln!(writer)?;
		}
		return Ok(());
	}

	if args.input.is_none() && args.example.is_none() {
		warning("no input file; reading TAC from stdin");
	}
	let (program, reads_inputs) = step_load(&args).unwrap_or_else(|err| {
		fatal_error(err);
		unreachable!()
	});

	let config = AnalysisConfig::default()
		.strict_motion(args.strict_motion)
		.allow_free_vars(args.allow_free_vars || reads_inputs);
	let stage = args.stage.unwrap_or(Stage::last());
	let analysis = match Analyzer::new(config).run_until(program, stage) {
		Ok(analysis) => analysis,
		Err(err) => {
			fatal_error(err);
			unreachable!()
		}
	};

	if args.json {
		serde_json::to_writer_pretty(&mut writer, &analysis)?;
		writeln!(writer)?;
	} else {
		write!(writer, "{}", render(&analysis)?)?;
	}
	Ok(())
}
