//! Headless play: a memory-based player and a driver loop.

mod memory;

pub use memory::{play_to_completion, MemoryPlayer, PlayReport};
