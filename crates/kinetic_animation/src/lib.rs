//! Kinetic Animation System
//!
//! Frame-driven animation scheduling and type-indexed interpolation.
//!
//! # Features
//!
//! - **Animator**: time-ordered scheduler sampled once per host tick, safe
//!   to mutate from inside the animations it drives
//! - **Time Sources**: always-advancing screen time and pausable world time
//! - **Lerper Registry**: process-wide, replaceable interpolation strategy
//!   per value type
//! - **Text Interpolation**: numeral-aware, glyph-safe string morphing
//! - **Tweens & Events**: eased value animations and one-shot callbacks
//!
//! # Example
//!
//! ```rust
//! use kinetic_animation::{Animator, AnimatorConfig, ManualClock, Tween};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let clock = ManualClock::new();
//! let animator = Animator::new(clock.clone(), AnimatorConfig::default());
//!
//! let label = Rc::new(RefCell::new(String::new()));
//! let sink = label.clone();
//! let tween = Tween::new("0%".to_string(), "100%".to_string(), move |s| {
//!     *sink.borrow_mut() = s;
//! })
//! .unwrap()
//! .into_animation(0.0, 20.0)
//! .unwrap();
//! animator.add(&tween).unwrap();
//!
//! clock.advance(5.0);
//! animator.advance();
//! assert_eq!(*label.borrow(), "25%");
//! ```

pub mod animation;
pub mod animator;
pub mod clock;
pub mod easing;
pub mod error;
pub mod lerp;
pub mod text;
pub mod values;

pub use animation::{Animate, Animation, Frame, ScheduledEvent, SubjectKey, Tween};
pub use animator::{Animator, AnimatorConfig, AnimatorHandle, AnimatorKey, AnimatorSet};
pub use clock::{Clock, ManualClock, SystemClock, TimeSource};
pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use lerp::{Lerper, LerperRegistry, SharedLerper};
pub use values::Interpolate;
