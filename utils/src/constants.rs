/// Extra passes granted to every fixed point beyond its lattice height.
pub const FIXED_POINT_SLACK: usize = 2;

pub const BRANCH_MARKER: &str = "GOTO";
pub const GUARD_KEYWORD: &str = "If";
