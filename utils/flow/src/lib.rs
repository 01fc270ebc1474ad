pub mod basicblock;
pub mod cfg;
pub mod dominator;
pub mod flow_loop;
mod impls;

pub use basicblock::{BasicBlock, BasicBlocks};
pub use cfg::CFG;
pub use dominator::Dominators;
pub use flow_loop::{BackEdge, Loop, LoopInfo};
