mod accumulator;
mod block;


pub use accumulator::StreamAccumulator;
pub use block::{ContentBlock, ToolInvocation, ToolStatus, Transcript};
