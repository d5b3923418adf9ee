//! Kinetic Core
//!
//! Plain value types shared by the Kinetic crates. They carry no behaviour
//! beyond construction and a few geometric helpers; interpolation lives in
//! `kinetic_animation`, which registers a lerper for each of them.
//!
//! # Example
//!
//! ```rust
//! use kinetic_core::{Color, Rect};
//!
//! let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
//! assert_eq!(rect.center().x, 50.0);
//!
//! let accent = Color::from_hex(0x3366ff);
//! assert_eq!(accent.a, 1.0);
//! ```

pub mod geometry;

pub use geometry::{Color, Point, Rect, Size, Vec2, Vec3};
