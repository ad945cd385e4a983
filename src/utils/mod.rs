pub mod buffer;
pub mod timestamp;

pub use buffer::ScratchBuffer;
