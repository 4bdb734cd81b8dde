//! Property animation: eased scalar tweens written into property graphs.
//!
//! Animations never bind expressions. They overwrite static properties on
//! every [`Animator::update`], so bound properties downstream (view,
//! combined, viewport transforms) follow on the next read.

mod animator;
mod easing;

pub use animator::{Animator, LoopMode, ScalarAnimation};
pub use easing::EasingFunction;
