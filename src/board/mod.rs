//! Board geometry: size normalization and grid layout.

pub mod dimensions;
pub mod layout;

pub use dimensions::BoardDimensions;
pub use layout::{GridLayout, Vec2};
