//! End-to-end flows through the animator, tweens and the lerper registry

use kinetic_animation::lerp;
use kinetic_animation::{
    Animate, Animation, Animator, AnimatorConfig, AnimationError, Easing, Frame, ManualClock,
    ScheduledEvent, SubjectKey, Tween,
};
use kinetic_core::{Color, Point};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn setup() -> (ManualClock, Animator) {
    init_tracing();
    let clock = ManualClock::new();
    let animator = Animator::new(clock.clone(), AnimatorConfig::default());
    (clock, animator)
}

#[test]
fn text_tween_counts_up() {
    let (clock, animator) = setup();
    let label = Rc::new(RefCell::new(String::new()));
    let sink = label.clone();

    let tween = Tween::new("Score: 0".to_string(), "Score: 200".to_string(), move |s| {
        *sink.borrow_mut() = s
    })
    .unwrap()
    .into_animation(0.0, 10.0)
    .unwrap();
    animator.add(&tween).unwrap();

    let mut seen = Vec::new();
    for _ in 0..12 {
        clock.advance(1.0);
        animator.advance();
        seen.push(label.borrow().clone());
    }

    assert_eq!(seen[0], "Score: 20");
    assert_eq!(seen[4], "Score: 100");
    // Expiry snaps to the final value and drops the animation
    assert_eq!(seen[11], "Score: 200");
    assert!(animator.is_empty());
}

#[test]
fn text_tween_morphs_words() {
    let (clock, animator) = setup();
    let label = Rc::new(RefCell::new(String::new()));
    let sink = label.clone();

    let tween = Tween::new("Loading".to_string(), "Ready".to_string(), move |s| {
        *sink.borrow_mut() = s
    })
    .unwrap()
    .into_animation(0.0, 4.0)
    .unwrap();
    animator.add(&tween).unwrap();

    animator.advance();
    assert_eq!(*label.borrow(), "Loading");

    clock.advance(4.0);
    animator.advance();
    assert_eq!(*label.borrow(), "Ready");
}

#[test]
fn staggered_tweens_start_in_order() {
    let (clock, animator) = setup();
    let positions: Vec<Rc<Cell<Point>>> = (0..3).map(|_| Rc::new(Cell::new(Point::ZERO))).collect();

    for (i, position) in positions.iter().enumerate() {
        let sink = position.clone();
        let animation = Tween::new(Point::ZERO, Point::new(100.0, 0.0), move |p| sink.set(p))
            .unwrap()
            .easing(Easing::Linear)
            .subject(SubjectKey::of(position))
            .into_animation(i as f32 * 2.0, 4.0)
            .unwrap();
        animator.add(&animation).unwrap();
    }

    clock.advance(2.0);
    assert_eq!(animator.advance(), 2);
    assert_eq!(positions[0].get().x, 50.0);
    assert_eq!(positions[1].get().x, 0.0);
    assert_eq!(positions[2].get().x, 0.0);

    assert_eq!(animator.remove_animations_for(SubjectKey::of(&positions[1])), 1);
    clock.advance(1.0);
    assert_eq!(animator.advance(), 1);
    assert_eq!(positions[0].get().x, 75.0);
    // Removal leaves the last applied value in place
    assert_eq!(positions[1].get().x, 0.0);
}

#[test]
fn completion_hook_chains_next_animation() {
    struct Fade {
        color: Rc<Cell<Color>>,
        next: Option<Animation>,
        animator: kinetic_animation::AnimatorHandle,
    }

    impl Animate for Fade {
        fn update(&mut self, frame: Frame) {
            let color = lerp::lerp(&Color::WHITE, &Color::BLACK, frame.progress).unwrap();
            self.color.set(color);
        }

        fn complete(&mut self) {
            if let Some(next) = self.next.take() {
                self.animator.add(&next).unwrap();
            }
        }
    }

    let (clock, animator) = setup();
    let color = Rc::new(Cell::new(Color::WHITE));
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    let event = ScheduledEvent::at(3.0, move || flag.set(true)).unwrap();

    let fade = Animation::new(
        0.0,
        2.0,
        Fade {
            color: color.clone(),
            next: Some(event.clone()),
            animator: animator.handle(),
        },
    )
    .unwrap();
    animator.add(&fade).unwrap();

    clock.advance(1.0);
    animator.advance();
    assert!((color.get().r - 0.5).abs() < 1e-6);

    clock.advance(2.0);
    animator.advance();
    assert_eq!(color.get(), Color::BLACK);
    assert!(fade.is_finished());
    // Hooks run during pruning, so the chained event joins this frame's updates
    assert!(event.is_owned());
    assert!(fired.get());
    assert_eq!(animator.scheduled(), vec![event]);
}

#[test]
fn one_animation_one_owner() {
    let (_clock, first) = setup();
    let second = Animator::new(ManualClock::new(), AnimatorConfig::world());
    let tween = Tween::new(0.0_f32, 1.0, |_| {})
        .unwrap()
        .into_animation(0.0, 1.0)
        .unwrap();

    first.add(&tween).unwrap();
    let err = second.add(&tween).unwrap_err();
    assert!(matches!(err, AnimationError::AlreadyOwned { id } if id == tween.id()));
    assert!(second.is_empty());
}

#[test]
fn custom_type_needs_a_lerper() {
    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Angle(f32);

    assert!(matches!(
        Tween::new(Angle(0.0), Angle(1.0), |_| {}),
        Err(AnimationError::UnsupportedType { .. })
    ));

    lerp::register_lerper::<Angle, _>(|a: &Angle, b: &Angle, t: f32| Angle(a.0 + (b.0 - a.0) * t));

    let (clock, animator) = setup();
    let out = Rc::new(Cell::new(Angle(0.0)));
    let sink = out.clone();
    let animation = Tween::new(Angle(0.0), Angle(90.0), move |a| sink.set(a))
        .unwrap()
        .into_animation(0.0, 4.0)
        .unwrap();
    animator.add(&animation).unwrap();

    clock.advance(1.0);
    animator.advance();
    assert_eq!(out.get(), Angle(22.5));
}
