pub mod config;
pub mod constants;
pub mod errors;
pub mod fixed_point;
pub mod label;

pub use config::*;
pub use errors::*;
pub use fixed_point::FixedPoint;
pub use label::*;

use std::fmt::Display;

pub fn fatal_error(str: impl Display) {
	eprintln!("{}: {}", console::style("fatal error").bold().red(), str);
	std::process::exit(1);
}

pub fn warning(str: impl Display) {
	eprintln!("{}: {}", console::style("warning").bold().yellow(), str);
}
