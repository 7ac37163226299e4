//! Audio output.
//! Tone generation, the tone timeline and the cpal backend that plays it.

pub mod backend;
pub mod devices;
pub mod sequence;
pub mod tone;
