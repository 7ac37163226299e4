//! Song text parsing.

pub mod note;
pub mod song;
