//! Animations
//!
//! An [`Animation`] is a time window `[start, end]` plus a payload
//! implementing [`Animate`]. The handle is cheap to clone; every clone refers
//! to the same animation, so the host can keep one to terminate or remove it
//! after handing another to an [`Animator`](crate::Animator).
//!
//! Lifecycle:
//!
//! ```text
//! Unowned --add--> Owned --(remove | expiry | terminate)--> Finished
//! ```
//!
//! An animation is owned at most once in its life. Expiry invokes the
//! payload's completion hook after snapping it to its final frame; removal
//! and termination only detach it.

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::lerp::{self, SharedLerper};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_ANIMATION_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an animated object
///
/// Payloads report which subjects they touch so an animator can drop every
/// animation for an object at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubjectKey(u64);

impl SubjectKey {
    /// Key derived from the allocation behind an `Rc`
    pub fn of<T: ?Sized>(value: &Rc<T>) -> Self {
        Self(Rc::as_ptr(value) as *const () as usize as u64)
    }

    /// Key derived from the allocation behind an `Arc`
    pub fn of_arc<T: ?Sized>(value: &Arc<T>) -> Self {
        Self(Arc::as_ptr(value) as *const () as usize as u64)
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

/// Timing passed to [`Animate::update`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Current animator time
    pub time: f32,
    pub start: f32,
    pub end: f32,
    /// Position within the window, clamped to `0.0..=1.0`
    pub progress: f32,
}

impl Frame {
    pub fn new(time: f32, start: f32, end: f32) -> Self {
        let span = end - start;
        let progress = if span > 0.0 {
            ((time - start) / span).clamp(0.0, 1.0)
        } else if time >= start {
            1.0
        } else {
            0.0
        };
        Self {
            time,
            start,
            end,
            progress,
        }
    }
}

/// Payload driven by an animation
pub trait Animate {
    /// Apply the state for `frame`
    fn update(&mut self, frame: Frame);

    /// Called once after the final update of an animation that ran to its end
    fn complete(&mut self) {}

    /// The object this payload writes to, read once when its animation is
    /// created
    fn subject(&self) -> Option<SubjectKey> {
        None
    }

    /// Whether this payload writes to `subject`
    ///
    /// Override for payloads touching several objects. Answers from here are
    /// unavailable while the payload is running its own update.
    fn involves(&self, subject: SubjectKey) -> bool {
        self.subject() == Some(subject)
    }
}

impl<F: FnMut(Frame)> Animate for F {
    fn update(&mut self, frame: Frame) {
        self(frame)
    }
}

struct AnimationInner {
    id: u64,
    start: f32,
    end: f32,
    subject: Option<SubjectKey>,
    owner: Cell<Option<u64>>,
    sequence: Cell<u64>,
    terminated: Cell<bool>,
    finished: Cell<bool>,
    body: RefCell<Box<dyn Animate>>,
}

/// Shared handle to a scheduled unit of work
#[derive(Clone)]
pub struct Animation {
    inner: Rc<AnimationInner>,
}

impl Animation {
    /// Create an animation running over `[start, end]`
    ///
    /// Fails with [`AnimationError::InvalidWindow`] unless `start` is finite
    /// and `start <= end` (`end` may be infinite).
    pub fn new(start: f32, end: f32, body: impl Animate + 'static) -> Result<Self> {
        if !start.is_finite() || end.is_nan() || end < start {
            return Err(AnimationError::InvalidWindow { start, end });
        }
        Ok(Self {
            inner: Rc::new(AnimationInner {
                id: NEXT_ANIMATION_ID.fetch_add(1, Ordering::Relaxed),
                start,
                end,
                subject: body.subject(),
                owner: Cell::new(None),
                sequence: Cell::new(0),
                terminated: Cell::new(false),
                finished: Cell::new(false),
                body: RefCell::new(Box::new(body)),
            }),
        })
    }

    /// Create an animation starting at `start` and lasting `duration` ticks
    pub fn with_duration(start: f32, duration: f32, body: impl Animate + 'static) -> Result<Self> {
        Self::new(start, start + duration, body)
    }

    /// Process-unique identifier
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn start(&self) -> f32 {
        self.inner.start
    }

    pub fn end(&self) -> f32 {
        self.inner.end
    }

    pub fn duration(&self) -> f32 {
        self.inner.end - self.inner.start
    }

    /// Whether an animator has ever taken this animation
    pub fn is_owned(&self) -> bool {
        self.inner.owner.get().is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.inner.finished.get()
    }

    pub fn is_terminated(&self) -> bool {
        self.inner.terminated.get()
    }

    /// Ask the owning animator to drop this animation at its next prune
    ///
    /// Updates already due in the current frame still run; the completion
    /// hook is skipped.
    pub fn terminate(&self) {
        self.inner.terminated.set(true);
    }

    pub fn subject(&self) -> Option<SubjectKey> {
        self.inner.subject
    }

    /// Whether the payload writes to `subject`
    ///
    /// The payload's own [`Animate::subject`] always matches, including from
    /// inside its update.
    pub fn involves(&self, subject: SubjectKey) -> bool {
        self.inner.subject == Some(subject)
            || self
                .inner
                .body
                .try_borrow()
                .map(|body| body.involves(subject))
                .unwrap_or(false)
    }

    /// Whether both handles refer to the same animation
    pub fn ptr_eq(&self, other: &Animation) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn owner(&self) -> Option<u64> {
        self.inner.owner.get()
    }

    pub(crate) fn sequence(&self) -> u64 {
        self.inner.sequence.get()
    }

    /// Take ownership for `owner`, ordered after everything with a lower
    /// `sequence`
    pub(crate) fn claim(&self, owner: u64, sequence: u64) -> Result<()> {
        if self.inner.owner.get().is_some() {
            return Err(AnimationError::AlreadyOwned { id: self.inner.id });
        }
        self.inner.owner.set(Some(owner));
        self.inner.sequence.set(sequence);
        Ok(())
    }

    pub(crate) fn mark_finished(&self) {
        self.inner.finished.set(true);
    }

    fn run<R>(&self, f: impl FnOnce(&mut Box<dyn Animate>) -> R) -> Option<R> {
        match self.inner.body.try_borrow_mut() {
            Ok(mut body) => Some(f(&mut *body)),
            Err(_) => {
                tracing::trace!(id = self.inner.id, "animation re-entered its own payload");
                None
            }
        }
    }

    /// Drive the payload for animator time `time`
    pub(crate) fn update(&self, time: f32) {
        if self.is_finished() {
            return;
        }
        let frame = Frame::new(time, self.inner.start, self.inner.end);
        self.run(|body| body.update(frame));
    }

    /// Snap to the final frame, run the completion hook, retire
    pub(crate) fn complete(&self) {
        if self.is_finished() {
            return;
        }
        let end = self.inner.end;
        let frame = Frame::new(end, self.inner.start, end);
        self.run(|body| {
            body.update(frame);
            body.complete();
        });
        self.mark_finished();
    }
}

impl PartialEq for Animation {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Animation {}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("id", &self.inner.id)
            .field("start", &self.inner.start)
            .field("end", &self.inner.end)
            .field("owned", &self.is_owned())
            .field("terminated", &self.is_terminated())
            .field("finished", &self.is_finished())
            .finish()
    }
}

// ============================================================================
// Tween
// ============================================================================

/// Animates a value from `from` to `to`, handing each frame's value to a
/// setter
///
/// ```rust
/// use kinetic_animation::{Easing, Tween};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let opacity = Rc::new(Cell::new(0.0_f32));
/// let sink = opacity.clone();
/// let animation = Tween::new(0.0_f32, 1.0, move |v| sink.set(v))
///     .unwrap()
///     .easing(Easing::EaseOut)
///     .into_animation(0.0, 10.0)
///     .unwrap();
/// assert_eq!(animation.duration(), 10.0);
/// ```
pub struct Tween<T: 'static> {
    from: T,
    to: T,
    easing: Easing,
    lerper: SharedLerper<T>,
    apply: Box<dyn FnMut(T)>,
    subject: Option<SubjectKey>,
}

impl<T: 'static> Tween<T> {
    /// Tween using the process-wide lerper for `T`
    ///
    /// Fails with [`AnimationError::UnsupportedType`] if none is registered.
    pub fn new(from: T, to: T, apply: impl FnMut(T) + 'static) -> Result<Self> {
        Ok(Self::with_lerper(from, to, lerp::lerper_or_err::<T>()?, apply))
    }

    /// Tween using an explicit lerper
    pub fn with_lerper(
        from: T,
        to: T,
        lerper: SharedLerper<T>,
        apply: impl FnMut(T) + 'static,
    ) -> Self {
        Self {
            from,
            to,
            easing: Easing::Linear,
            lerper,
            apply: Box::new(apply),
            subject: None,
        }
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Mark the object this tween writes to
    pub fn subject(mut self, subject: SubjectKey) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Wrap into an animation over `[start, start + duration]`
    pub fn into_animation(self, start: f32, duration: f32) -> Result<Animation> {
        Animation::with_duration(start, duration, self)
    }
}

impl<T: 'static> Animate for Tween<T> {
    fn update(&mut self, frame: Frame) {
        let t = self.easing.apply(frame.progress);
        let value = self.lerper.lerp(&self.from, &self.to, t);
        (self.apply)(value);
    }

    fn subject(&self) -> Option<SubjectKey> {
        self.subject
    }
}

// ============================================================================
// Scheduled Event
// ============================================================================

/// Runs a callback once, the first frame its animation is reached
pub struct ScheduledEvent {
    callback: Option<Box<dyn FnOnce()>>,
    subject: Option<SubjectKey>,
}

impl ScheduledEvent {
    pub fn new(callback: impl FnOnce() + 'static) -> Self {
        Self {
            callback: Some(Box::new(callback)),
            subject: None,
        }
    }

    pub fn subject(mut self, subject: SubjectKey) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Zero-length animation firing `callback` at `time`
    pub fn at(time: f32, callback: impl FnOnce() + 'static) -> Result<Animation> {
        Animation::new(time, time, Self::new(callback))
    }
}

impl Animate for ScheduledEvent {
    fn update(&mut self, _frame: Frame) {
        if let Some(callback) = self.callback.take() {
            callback();
        }
    }

    fn subject(&self) -> Option<SubjectKey> {
        self.subject
    }
}
