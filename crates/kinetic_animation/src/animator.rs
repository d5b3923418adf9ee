//! Animator
//!
//! Drives a set of [`Animation`]s from a [`TimeSource`], once per external
//! tick. Each call to [`Animator::advance`]:
//!
//! 1. samples the clock and derives the animator time
//!    (`ticks * speed - offset`)
//! 2. prunes terminated animations and those whose window has closed,
//!    running completion hooks for the latter
//! 3. updates, in `(start, insertion order)` order, every animation whose
//!    window has opened
//!
//! Payloads may freely add or remove animations from inside their update or
//! completion hooks. While a pass is running those requests are staged and
//! applied once the phase ends. An animation added by a completion hook
//! joins the same frame's updates; one added from an update waits for the
//! next frame.

use crate::animation::{Animation, SubjectKey};
use crate::clock::{Clock, TimeSource};
use crate::error::Result;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

static NEXT_ANIMATOR_ID: AtomicU64 = AtomicU64::new(1);

// ============================================================================
// Configuration
// ============================================================================

/// Animator settings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatorConfig {
    /// Animator ticks per clock tick
    pub speed: f32,
    /// Drop animations once their window has closed
    pub delete_past_animations: bool,
    /// Tick stream to follow
    pub clock: Clock,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            delete_past_animations: true,
            clock: Clock::Screen,
        }
    }
}

impl AnimatorConfig {
    /// Follows pausable world time
    pub fn world() -> Self {
        Self {
            clock: Clock::World,
            ..Self::default()
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_delete_past_animations(mut self, delete: bool) -> Self {
        self.delete_past_animations = delete;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

// ============================================================================
// Internal State
// ============================================================================

/// Position of an animation in the schedule
#[derive(Clone, Copy, Debug)]
struct ScheduleKey {
    start: f32,
    sequence: u64,
}

impl ScheduleKey {
    fn of(animation: &Animation) -> Self {
        Self {
            start: animation.start(),
            sequence: animation.sequence(),
        }
    }
}

impl PartialEq for ScheduleKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduleKey {}

impl PartialOrd for ScheduleKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduleKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .total_cmp(&other.start)
            .then(self.sequence.cmp(&other.sequence))
    }
}

/// Requests made while a pass is running
#[derive(Default)]
struct Staging {
    adds: Vec<Animation>,
    removals: Vec<Animation>,
}

struct AnimatorInner {
    id: u64,
    source: Rc<dyn TimeSource>,
    clock: Cell<Clock>,
    speed: Cell<f32>,
    time_offset: Cell<f32>,
    delete_past: Cell<bool>,
    guarded: Cell<bool>,
    next_sequence: Cell<u64>,
    live: RefCell<BTreeMap<ScheduleKey, Animation>>,
    staging: RefCell<Staging>,
}

impl AnimatorInner {
    fn raw_time(&self) -> f32 {
        self.source.ticks(self.clock.get()) * self.speed.get()
    }

    fn time(&self) -> f32 {
        self.raw_time() - self.time_offset.get()
    }

    /// Apply staged requests: adds first, then removals
    fn flush(&self) {
        let Staging { adds, removals } = std::mem::take(&mut *self.staging.borrow_mut());
        if adds.is_empty() && removals.is_empty() {
            return;
        }
        tracing::trace!(
            animator = self.id,
            adds = adds.len(),
            removals = removals.len(),
            "flushing staged animations"
        );

        let mut live = self.live.borrow_mut();
        for animation in adds {
            live.insert(ScheduleKey::of(&animation), animation);
        }
        for animation in removals {
            live.remove(&ScheduleKey::of(&animation));
            animation.mark_finished();
        }
    }
}

/// Holds the reentrancy flag for one phase of a pass
///
/// Dropping it clears the flag and applies staged requests.
struct PassGuard<'a> {
    inner: &'a AnimatorInner,
}

impl<'a> PassGuard<'a> {
    fn acquire(inner: &'a AnimatorInner) -> Self {
        inner.guarded.set(true);
        Self { inner }
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.inner.guarded.set(false);
        self.inner.flush();
    }
}

// ============================================================================
// Animator
// ============================================================================

/// Time-ordered scheduler for animations
///
/// Cloning yields another handle to the same animator. Payloads that need to
/// reach their animator should capture an [`AnimatorHandle`] instead, which
/// does not keep it alive.
///
/// ```rust
/// use kinetic_animation::{Animation, Animator, AnimatorConfig, Frame, ManualClock};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let clock = ManualClock::new();
/// let animator = Animator::new(clock.clone(), AnimatorConfig::default());
///
/// let progress = Rc::new(Cell::new(0.0));
/// let sink = progress.clone();
/// let animation = Animation::new(0.0, 10.0, move |f: Frame| sink.set(f.progress)).unwrap();
/// animator.add(&animation).unwrap();
///
/// clock.advance(5.0);
/// animator.advance();
/// assert_eq!(progress.get(), 0.5);
/// ```
#[derive(Clone)]
pub struct Animator {
    inner: Rc<AnimatorInner>,
}

impl Animator {
    /// Create an animator whose time starts at zero
    pub fn new(source: impl TimeSource + 'static, config: AnimatorConfig) -> Self {
        Self::with_shared_source(Rc::new(source), config)
    }

    /// Create an animator reading from a source shared with other animators
    pub fn with_shared_source(source: Rc<dyn TimeSource>, config: AnimatorConfig) -> Self {
        let id = NEXT_ANIMATOR_ID.fetch_add(1, AtomicOrdering::Relaxed);
        let inner = AnimatorInner {
            id,
            source,
            clock: Cell::new(config.clock),
            speed: Cell::new(config.speed),
            time_offset: Cell::new(0.0),
            delete_past: Cell::new(config.delete_past_animations),
            guarded: Cell::new(false),
            next_sequence: Cell::new(0),
            live: RefCell::new(BTreeMap::new()),
            staging: RefCell::new(Staging::default()),
        };
        inner.time_offset.set(inner.raw_time());
        tracing::debug!(animator = id, ?config, "animator created");
        Self {
            inner: Rc::new(inner),
        }
    }

    /// Process-unique identifier
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Weak handle for payloads and callbacks
    pub fn handle(&self) -> AnimatorHandle {
        AnimatorHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Current animator time, sampled from the clock
    pub fn time(&self) -> f32 {
        self.inner.time()
    }

    /// Shift the timeline so that [`time`](Self::time) reads `time` now
    pub fn set_time(&self, time: f32) {
        self.inner.time_offset.set(self.inner.raw_time() - time);
    }

    pub fn speed(&self) -> f32 {
        self.inner.speed.get()
    }

    /// Change the rate of time without a jump in the current time
    pub fn set_speed(&self, speed: f32) {
        let now = self.time();
        self.inner.speed.set(speed);
        self.set_time(now);
    }

    pub fn clock(&self) -> Clock {
        self.inner.clock.get()
    }

    /// Switch tick streams without a jump in the current time
    pub fn set_clock(&self, clock: Clock) {
        let now = self.time();
        self.inner.clock.set(clock);
        self.set_time(now);
    }

    pub fn uses_pausable_time(&self) -> bool {
        self.clock() == Clock::World
    }

    pub fn set_uses_pausable_time(&self, pausable: bool) {
        self.set_clock(if pausable { Clock::World } else { Clock::Screen });
    }

    pub fn delete_past_animations(&self) -> bool {
        self.inner.delete_past.get()
    }

    /// Keep or drop animations whose window has closed
    ///
    /// Terminated animations are pruned either way.
    pub fn set_delete_past_animations(&self, delete: bool) {
        self.inner.delete_past.set(delete);
    }

    // ========================================================================
    // Membership
    // ========================================================================

    /// Take ownership of `animation` and schedule it
    ///
    /// Fails with [`AlreadyOwned`](crate::AnimationError::AlreadyOwned) if any
    /// animator has ever owned it. During a pass the animation is claimed
    /// immediately but joins the schedule when the pass ends.
    pub fn add(&self, animation: &Animation) -> Result<()> {
        let sequence = self.inner.next_sequence.get();
        animation.claim(self.inner.id, sequence)?;
        self.inner.next_sequence.set(sequence + 1);

        if self.inner.guarded.get() {
            self.inner.staging.borrow_mut().adds.push(animation.clone());
        } else {
            self.inner
                .live
                .borrow_mut()
                .insert(ScheduleKey::of(animation), animation.clone());
        }
        tracing::trace!(
            animator = self.inner.id,
            animation = animation.id(),
            start = animation.start(),
            end = animation.end(),
            "animation added"
        );
        Ok(())
    }

    /// Add each animation in order, stopping at the first failure
    ///
    /// Animations before the failing one stay added.
    pub fn add_all<'a>(&self, animations: impl IntoIterator<Item = &'a Animation>) -> Result<()> {
        animations.into_iter().try_for_each(|a| self.add(a))
    }

    /// Drop `animation` without running its completion hook
    ///
    /// Returns `false` if this animator does not own it. During a pass the
    /// removal is applied when the pass ends.
    pub fn remove(&self, animation: &Animation) -> bool {
        if animation.owner() != Some(self.inner.id) || animation.is_finished() {
            return false;
        }
        if self.inner.guarded.get() {
            self.inner
                .staging
                .borrow_mut()
                .removals
                .push(animation.clone());
        } else {
            self.inner
                .live
                .borrow_mut()
                .remove(&ScheduleKey::of(animation));
            animation.mark_finished();
        }
        true
    }

    /// Remove each animation; returns how many this animator owned
    pub fn remove_animations<'a>(
        &self,
        animations: impl IntoIterator<Item = &'a Animation>,
    ) -> usize {
        animations
            .into_iter()
            .filter(|animation| self.remove(animation))
            .count()
    }

    /// Remove every animation whose payload writes to `subject`
    ///
    /// Values already written stay as last applied.
    pub fn remove_animations_for(&self, subject: SubjectKey) -> usize {
        let mut matching: Vec<Animation> = self
            .inner
            .live
            .borrow()
            .values()
            .filter(|a| a.involves(subject))
            .cloned()
            .collect();
        matching.extend(
            self.inner
                .staging
                .borrow()
                .adds
                .iter()
                .filter(|a| a.involves(subject))
                .cloned(),
        );
        tracing::trace!(
            animator = self.inner.id,
            subject = subject.to_raw(),
            count = matching.len(),
            "removing animations for subject"
        );
        self.remove_animations(&matching)
    }

    /// Remove every scheduled animation, including ones staged mid-pass
    pub fn remove_all(&self) -> usize {
        let mut all = self.scheduled();
        all.extend(self.inner.staging.borrow().adds.iter().cloned());
        self.remove_animations(&all)
    }

    /// Number of scheduled animations, not counting staged adds
    pub fn len(&self) -> usize {
        self.inner.live.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.live.borrow().is_empty()
    }

    pub fn contains(&self, animation: &Animation) -> bool {
        animation.owner() == Some(self.inner.id)
            && self
                .inner
                .live
                .borrow()
                .contains_key(&ScheduleKey::of(animation))
    }

    /// Scheduled animations in update order
    pub fn scheduled(&self) -> Vec<Animation> {
        self.inner.live.borrow().values().cloned().collect()
    }

    /// Scheduled animations whose window has opened at the current time
    pub fn current(&self) -> Vec<Animation> {
        let now = self.time();
        self.inner
            .live
            .borrow()
            .values()
            .take_while(|a| a.start() <= now)
            .cloned()
            .collect()
    }

    /// Whether a pass is running on this animator
    pub fn is_advancing(&self) -> bool {
        self.inner.guarded.get()
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Run one frame; returns how many animations were updated
    ///
    /// A call made from inside a running pass is ignored and returns zero.
    pub fn advance(&self) -> usize {
        let inner = &*self.inner;
        if inner.guarded.get() {
            tracing::warn!(animator = inner.id, "advance called during a pass; ignored");
            return 0;
        }
        let now = inner.time();

        {
            let _guard = PassGuard::acquire(inner);
            self.prune(now, inner.delete_past.get());
        }

        let due: SmallVec<[Animation; 16]> = inner
            .live
            .borrow()
            .values()
            .take_while(|a| a.start() <= now)
            .cloned()
            .collect();

        {
            let _guard = PassGuard::acquire(inner);
            for animation in &due {
                animation.update(now);
            }
        }

        tracing::trace!(animator = inner.id, time = now, updated = due.len(), "frame");
        due.len()
    }

    /// Drop terminated animations, and expired ones when `expire` is set;
    /// must run under a guard
    fn prune(&self, now: f32, expire: bool) {
        let mut expired = Vec::new();
        let mut terminated = Vec::new();
        self.inner.live.borrow_mut().retain(|_, animation| {
            if animation.is_terminated() {
                terminated.push(animation.clone());
                false
            } else if expire && animation.end() < now {
                expired.push(animation.clone());
                false
            } else {
                true
            }
        });

        if !(expired.is_empty() && terminated.is_empty()) {
            tracing::debug!(
                animator = self.inner.id,
                expired = expired.len(),
                terminated = terminated.len(),
                "pruning animations"
            );
        }

        for animation in terminated {
            animation.mark_finished();
        }
        // Hooks run with no borrow held so they can schedule more work
        for animation in expired {
            animation.complete();
        }
    }
}

impl std::fmt::Debug for Animator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animator")
            .field("id", &self.inner.id)
            .field("clock", &self.inner.clock.get())
            .field("speed", &self.inner.speed.get())
            .field("len", &self.inner.live.borrow().len())
            .finish()
    }
}

// ============================================================================
// Animator Handle
// ============================================================================

/// A weak handle to an animator
///
/// Captured by payloads and callbacks; it won't keep the animator alive.
#[derive(Clone)]
pub struct AnimatorHandle {
    inner: Weak<AnimatorInner>,
}

impl AnimatorHandle {
    pub fn upgrade(&self) -> Option<Animator> {
        self.inner.upgrade().map(|inner| Animator { inner })
    }

    /// Check if the animator is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Add to the animator; `Ok(false)` if it has been dropped
    pub fn add(&self, animation: &Animation) -> Result<bool> {
        match self.upgrade() {
            Some(animator) => animator.add(animation).map(|()| true),
            None => Ok(false),
        }
    }

    pub fn remove(&self, animation: &Animation) -> bool {
        self.upgrade()
            .map(|animator| animator.remove(animation))
            .unwrap_or(false)
    }
}

// ============================================================================
// Animator Set
// ============================================================================

new_key_type! {
    /// Handle to an animator registered in an [`AnimatorSet`]
    pub struct AnimatorKey;
}

/// Animators driven together from one host tick
#[derive(Default)]
pub struct AnimatorSet {
    animators: SlotMap<AnimatorKey, Animator>,
}

impl AnimatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, animator: Animator) -> AnimatorKey {
        let id = animator.id();
        let key = self.animators.insert(animator);
        tracing::debug!(animator = id, "animator registered");
        key
    }

    pub fn unregister(&mut self, key: AnimatorKey) -> Option<Animator> {
        self.animators.remove(key)
    }

    pub fn get(&self, key: AnimatorKey) -> Option<&Animator> {
        self.animators.get(key)
    }

    /// Advance every animator; returns the total number of updates
    pub fn advance_all(&self) -> usize {
        self.animators.values().map(Animator::advance).sum()
    }

    pub fn len(&self) -> usize {
        self.animators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animators.is_empty()
    }
}
