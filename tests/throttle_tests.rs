// Host-side tests for the leading-edge throttle, driven by virtual time.

#![allow(dead_code)]
use pointer_fx_core::{Throttle, TimerScheduler, VirtualClock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::rc::Rc;

type Calls = Rc<RefCell<Vec<(f64, u32)>>>;

fn throttled(interval_ms: f64) -> (Rc<VirtualClock>, Throttle<u32>, Calls) {
    let clock = Rc::new(VirtualClock::new());
    let calls: Calls = Rc::new(RefCell::new(Vec::new()));
    let (c, log) = (clock.clone(), calls.clone());
    let throttle = Throttle::new(clock.clone(), interval_ms, move |v: u32| {
        log.borrow_mut().push((c.now(), v));
    });
    (clock, throttle, calls)
}

#[test]
fn second_call_inside_window_runs_at_the_boundary() {
    let (clock, throttle, calls) = throttled(16.0);
    throttle.call(1);
    clock.advance(5.0);
    throttle.call(2);
    // Nothing at t=5.
    assert_eq!(*calls.borrow(), vec![(0.0, 1)]);
    assert!(throttle.has_pending());
    clock.advance(20.0);
    assert_eq!(*calls.borrow(), vec![(0.0, 1), (16.0, 2)]);
    assert!(!throttle.has_pending());
}

#[test]
fn intermediate_calls_are_overwritten_not_queued() {
    let (clock, throttle, calls) = throttled(16.0);
    throttle.call(1);
    for (t, v) in [(2.0, 2), (6.0, 3), (12.0, 4)] {
        clock.advance_to(t);
        throttle.call(v);
    }
    assert_eq!(clock.pending_timers(), 1);
    clock.advance(100.0);
    assert_eq!(*calls.borrow(), vec![(0.0, 1), (16.0, 4)]);
}

#[test]
fn call_after_a_quiet_period_runs_immediately() {
    let (clock, throttle, calls) = throttled(16.0);
    throttle.call(1);
    clock.advance(40.0);
    throttle.call(2);
    assert_eq!(*calls.borrow(), vec![(0.0, 1), (40.0, 2)]);
    assert_eq!(clock.pending_timers(), 0);
}

#[test]
fn window_restarts_from_the_trailing_call() {
    let (clock, throttle, calls) = throttled(16.0);
    throttle.call(1);
    clock.advance(5.0);
    throttle.call(2);
    clock.advance(11.0); // trailing fires at 16
    clock.advance(4.0);
    throttle.call(3); // t=20, only 4ms after the trailing call
    assert_eq!(calls.borrow().len(), 2);
    clock.advance(100.0);
    assert_eq!(calls.borrow()[2], (32.0, 3));
}

#[test]
fn dispose_cancels_pending_and_ignores_later_calls() {
    let (clock, throttle, calls) = throttled(16.0);
    throttle.call(1);
    clock.advance(5.0);
    throttle.call(2);
    throttle.dispose();
    throttle.dispose();
    assert!(throttle.is_disposed());
    assert_eq!(clock.pending_timers(), 0);
    clock.advance(100.0);
    throttle.call(3);
    assert_eq!(*calls.borrow(), vec![(0.0, 1)]);
}

#[test]
fn dropping_the_throttle_clears_its_timer() {
    let (clock, throttle, calls) = throttled(16.0);
    throttle.call(1);
    throttle.call(2);
    assert_eq!(clock.pending_timers(), 1);
    drop(throttle);
    assert_eq!(clock.pending_timers(), 0);
    clock.advance(100.0);
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn non_finite_interval_means_no_throttling() {
    let (_clock, throttle, calls) = throttled(f64::NAN);
    assert_eq!(throttle.interval_ms(), 0.0);
    throttle.call(1);
    throttle.call(2);
    assert_eq!(calls.borrow().len(), 2);
}

#[test]
fn random_call_patterns_respect_the_rate_bound() {
    let mut rng = StdRng::seed_from_u64(7);
    for interval in [8.0, 16.0, 33.0] {
        let (clock, throttle, calls) = throttled(interval);
        let mut last_arg = 0;
        for i in 0..400u32 {
            clock.advance(rng.gen_range(0..12) as f64);
            throttle.call(i);
            last_arg = i;
        }
        clock.advance(interval * 2.0);

        let calls = calls.borrow();
        let first = calls.first().map(|c| c.0).unwrap_or(0.0);
        let last = calls.last().map(|c| c.0).unwrap_or(0.0);
        let span = last - first;
        for pair in calls.windows(2) {
            assert!(
                pair[1].0 - pair[0].0 >= interval - 1e-6,
                "calls at {} and {} closer than {}",
                pair[0].0,
                pair[1].0,
                interval
            );
        }
        assert!(calls.len() as f64 <= (span / interval).ceil() + 1.0);
        assert_eq!(calls.last().map(|c| c.1), Some(last_arg));
        assert!(clock.now() > 0.0);
        assert_eq!(clock.now_ms(), clock.now());
    }
}
