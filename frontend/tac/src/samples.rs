//! Example programs bundled with the command line tool.

pub const ARRAY_SUM: &[&str] = &[
	"sum = 0",
	"i = 0",
	"If i > n GOTO 12",
	"t1 = 0",
	"t2 = i * 4",
	"t3 = t1[t2]",
	"t4 = sum + t3",
	"sum = t4",
	"t5 = i + 1",
	"i = t5",
	"GOTO 3",
	"return sum",
];

pub const LOOP_WITH_INVARIANT: &[&str] = &[
	"count = 0",
	"result = 0",
	"If count > 20 GOTO 8",
	"count = count + 1",
	"increment = 2 * count",
	"result = result + increment",
	"GOTO 3",
	"return result",
];

pub const NESTED_LOOPS: &[&str] = &[
	"i = 1",
	"sum = 0",
	"If i > n GOTO 15",
	"j = 1",
	"If j > m GOTO 13",
	"t1 = i * m",
	"t2 = t1 + j",
	"t3 = t2 - 1",
	"t4 = a[t3]",
	"sum = sum + t4",
	"j = j + 1",
	"GOTO 5",
	"i = i + 1",
	"GOTO 3",
	"return sum",
];

/// A bundled program. `inputs` are variables it reads before defining them.
pub struct Sample {
	pub name: &'static str,
	pub lines: &'static [&'static str],
	pub inputs: &'static [&'static str],
}

impl Sample {
	pub fn reads_inputs(&self) -> bool {
		!self.inputs.is_empty()
	}
}

pub static SAMPLES: [Sample; 3] = [
	Sample {
		name: "array_sum",
		lines: ARRAY_SUM,
		inputs: &["n"],
	},
	Sample {
		name: "loop_with_invariant",
		lines: LOOP_WITH_INVARIANT,
		inputs: &[],
	},
	Sample {
		name: "nested_loops",
		lines: NESTED_LOOPS,
		inputs: &["a", "m", "n"],
	},
];

pub fn sample(name: &str) -> Option<&'static Sample> {
	SAMPLES.iter().find(|v| v.name == name)
}
