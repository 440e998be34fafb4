pub mod decoder;
pub mod logging;

pub use decoder::{decode_chunk, FrameDecoder};
