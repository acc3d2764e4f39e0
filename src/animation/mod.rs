//! Color wheel animation
//!
//! [`AnimationPhase`] holds the wheel position and is owned by the engine;
//! [`AnimationEngine`] drives it from the shared control state.

mod engine;
mod phase;

pub use engine::{AnimationEngine, TickResult};
pub use phase::AnimationPhase;
