/// Spaces per nesting level in the text report.
pub const REPORT_INDENT: usize = 2;

pub const SECTION_RULE: &str = "==";
