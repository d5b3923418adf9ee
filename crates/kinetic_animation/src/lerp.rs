//! Lerper registry
//!
//! Maps a value type to the strategy used to interpolate it. Lookups are
//! keyed by [`TypeId`] and return a shared, typed [`Lerper`] so callers never
//! downcast themselves.
//!
//! A process-wide registry, pre-populated with the bundled lerpers, backs the
//! free functions [`register_lerper`], [`lerper`], [`lerper_or_err`] and
//! [`lerp`]. Any bundled entry can be replaced at runtime.
//!
//! # Example
//!
//! ```rust
//! use kinetic_animation::lerp;
//!
//! let mid: f32 = lerp::lerp(&0.0_f32, &10.0, 0.5).unwrap();
//! assert_eq!(mid, 5.0);
//!
//! // Swap the text strategy for a hard cut at the halfway point
//! lerp::register_lerper::<String, _>(|from: &String, to: &String, t: f32| {
//!     if t < 0.5 { from.clone() } else { to.clone() }
//! });
//! let s = lerp::lerp(&"abc".to_string(), &"xyz".to_string(), 0.6).unwrap();
//! assert_eq!(s, "xyz");
//! # lerp::register_lerper::<String, _>(lerp::StringLerper);
//! ```

use crate::error::{AnimationError, Result};
use crate::values::Interpolate;
use kinetic_core::{Color, Point, Rect, Size, Vec2, Vec3};
use rustc_hash::FxHashMap;
use std::any::{type_name, Any, TypeId};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Interpolation strategy for values of type `T`
///
/// `fraction` is not guaranteed to lie in `0.0..=1.0`. Strategies that can
/// extrapolate should; the rest must clamp.
pub trait Lerper<T>: Send + Sync {
    /// Value at `fraction` between `from` (at 0) and `to` (at 1)
    fn lerp(&self, from: &T, to: &T, fraction: f32) -> T;
}

impl<T, F> Lerper<T> for F
where
    F: Fn(&T, &T, f32) -> T + Send + Sync,
{
    fn lerp(&self, from: &T, to: &T, fraction: f32) -> T {
        self(from, to, fraction)
    }
}

/// Lerper delegating to the value's own [`Interpolate`] implementation
#[derive(Clone, Copy, Debug, Default)]
pub struct InterpolateLerper;

impl<T: Interpolate> Lerper<T> for InterpolateLerper {
    fn lerp(&self, from: &T, to: &T, fraction: f32) -> T {
        Interpolate::lerp(from, to, fraction)
    }
}

/// Text lerper, see [`crate::text::interpolate`]
#[derive(Clone, Copy, Debug, Default)]
pub struct StringLerper;

impl Lerper<String> for StringLerper {
    fn lerp(&self, from: &String, to: &String, fraction: f32) -> String {
        crate::text::interpolate(from, to, fraction)
    }
}

/// Shared handle to a registered strategy
pub type SharedLerper<T> = Arc<dyn Lerper<T>>;

struct Entry {
    type_name: &'static str,
    // Always an `Arc<dyn Lerper<T>>` for the keyed `T`
    lerper: Box<dyn Any + Send + Sync>,
}

/// Type-indexed table of lerpers
#[derive(Default)]
pub struct LerperRegistry {
    entries: FxHashMap<TypeId, Entry>,
}

impl LerperRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the bundled lerpers for scalars, geometry, colors
    /// and text
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<f32, _>(InterpolateLerper);
        registry.register::<f64, _>(InterpolateLerper);
        registry.register::<i32, _>(InterpolateLerper);
        registry.register::<i64, _>(InterpolateLerper);
        registry.register::<u32, _>(InterpolateLerper);
        registry.register::<u8, _>(InterpolateLerper);
        registry.register::<Point, _>(InterpolateLerper);
        registry.register::<Size, _>(InterpolateLerper);
        registry.register::<Rect, _>(InterpolateLerper);
        registry.register::<Vec2, _>(InterpolateLerper);
        registry.register::<Vec3, _>(InterpolateLerper);
        registry.register::<Color, _>(InterpolateLerper);
        registry.register::<String, _>(StringLerper);
        registry
    }

    /// Set the lerper for `T`, replacing any existing one
    pub fn register<T, L>(&mut self, lerper: L)
    where
        T: 'static,
        L: Lerper<T> + 'static,
    {
        let shared: SharedLerper<T> = Arc::new(lerper);
        let replaced = self
            .entries
            .insert(
                TypeId::of::<T>(),
                Entry {
                    type_name: type_name::<T>(),
                    lerper: Box::new(shared),
                },
            )
            .is_some();
        tracing::debug!(type_name = type_name::<T>(), replaced, "lerper registered");
    }

    /// The lerper for `T`, if one is registered
    pub fn resolve<T: 'static>(&self) -> Option<SharedLerper<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.lerper.downcast_ref::<SharedLerper<T>>())
            .cloned()
    }

    /// The lerper for `T`, or [`AnimationError::UnsupportedType`]
    pub fn resolve_or_err<T: 'static>(&self) -> Result<SharedLerper<T>> {
        self.resolve::<T>()
            .ok_or(AnimationError::UnsupportedType {
                type_name: type_name::<T>(),
            })
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Remove the lerper for `T`, returning whether one was registered
    pub fn unregister<T: 'static>(&mut self) -> bool {
        self.entries.remove(&TypeId::of::<T>()).is_some()
    }

    /// Names of every registered type, for diagnostics
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.values().map(|e| e.type_name).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Interpolate with the registered lerper for `T`
    pub fn lerp<T: 'static>(&self, from: &T, to: &T, fraction: f32) -> Result<T> {
        Ok(self.resolve_or_err::<T>()?.lerp(from, to, fraction))
    }
}

// ============================================================================
// Global Registry
// ============================================================================

fn global() -> &'static RwLock<LerperRegistry> {
    static GLOBAL_LERPERS: OnceLock<RwLock<LerperRegistry>> = OnceLock::new();
    GLOBAL_LERPERS.get_or_init(|| {
        tracing::debug!("initializing global lerper registry");
        RwLock::new(LerperRegistry::with_defaults())
    })
}

/// Set the process-wide lerper for `T`
pub fn register_lerper<T, L>(lerper: L)
where
    T: 'static,
    L: Lerper<T> + 'static,
{
    global()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register::<T, L>(lerper);
}

/// The process-wide lerper for `T`, if any
pub fn lerper<T: 'static>() -> Option<SharedLerper<T>> {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .resolve::<T>()
}

/// The process-wide lerper for `T`, or [`AnimationError::UnsupportedType`]
pub fn lerper_or_err<T: 'static>() -> Result<SharedLerper<T>> {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .resolve_or_err::<T>()
}

/// Interpolate with the process-wide lerper for `T`
pub fn lerp<T: 'static>(from: &T, to: &T, fraction: f32) -> Result<T> {
    // Resolve first so the lock is not held while the lerper runs
    Ok(lerper_or_err::<T>()?.lerp(from, to, fraction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Opacity(f32);

    #[test]
    fn test_defaults_registered() {
        let registry = LerperRegistry::with_defaults();
        assert_eq!(registry.len(), 13);
        assert!(registry.contains::<f32>());
        assert!(registry.contains::<Color>());
        assert!(registry.contains::<String>());
        assert!(!registry.contains::<Opacity>());
    }

    #[test]
    fn test_resolve_typed() {
        let registry = LerperRegistry::with_defaults();
        let lerper = registry.resolve::<Vec2>().unwrap();
        let mid = lerper.lerp(&Vec2::ZERO, &Vec2::new(2.0, 4.0), 0.5);
        assert_eq!(mid, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_unsupported_type() {
        let registry = LerperRegistry::new();
        let err = registry.resolve_or_err::<Opacity>().err().unwrap();
        assert!(matches!(err, AnimationError::UnsupportedType { type_name } if type_name.ends_with("Opacity")));
        assert!(registry.lerp(&Opacity(0.0), &Opacity(1.0), 0.5).is_err());
    }

    #[test]
    fn test_register_closure_and_overwrite() {
        let mut registry = LerperRegistry::new();
        registry.register::<Opacity, _>(|a: &Opacity, b: &Opacity, t: f32| Opacity(a.0 + (b.0 - a.0) * t));
        assert_eq!(
            registry.lerp(&Opacity(0.0), &Opacity(1.0), 0.25).unwrap(),
            Opacity(0.25)
        );

        registry.register::<Opacity, _>(|_: &Opacity, b: &Opacity, _: f32| b.clone());
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.lerp(&Opacity(0.0), &Opacity(1.0), 0.25).unwrap(),
            Opacity(1.0)
        );

        assert!(registry.unregister::<Opacity>());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_string_lerper_dispatches_to_text_engine() {
        let registry = LerperRegistry::with_defaults();
        let out = registry
            .lerp(&"10%".to_string(), &"30%".to_string(), 0.5)
            .unwrap();
        assert_eq!(out, "20%");
    }

    #[test]
    fn test_global_registry_has_defaults() {
        assert!(lerper::<Rect>().is_some());
        assert_eq!(lerp(&0_i32, &10, 0.5).unwrap(), 5);
        assert!(lerper_or_err::<Opacity>().is_err());
    }
}
