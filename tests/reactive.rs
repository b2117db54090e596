use std::cell::{Cell, RefCell};
use std::rc::Rc;

use weft::{batch, computed, effect, signal, untrack, watch, Value};

#[test]
fn effect_runs_eagerly() {
	let runs = Rc::new(Cell::new(0));

	let _handle = effect({
		let runs = runs.clone();
		move || {
			runs.set(runs.get() + 1);
		}
	});

	assert_eq!(runs.get(), 1);
}

#[test]
fn unchanged_write_is_a_noop() {
	let value = signal(7);
	let runs = Rc::new(Cell::new(0));

	let _handle = effect({
		let value = value.clone();
		let runs = runs.clone();
		move || {
			let _ = *value.get();
			runs.set(runs.get() + 1);
		}
	});

	assert_eq!(runs.get(), 1);

	value.set(7);
	assert_eq!(runs.get(), 1);

	value.set(8);
	assert_eq!(runs.get(), 2);
}

#[test]
fn computed_recomputes_lazily() {
	let a = signal(1);
	let computes = Rc::new(Cell::new(0));

	let b = computed({
		let a = a.clone();
		let computes = computes.clone();
		move || {
			computes.set(computes.get() + 1);
			*a.get() * 2
		}
	});

	assert_eq!(*b.get(), 2);
	assert_eq!(computes.get(), 1);

	// Repeated reads hit the cache.
	assert_eq!(*b.get(), 2);
	assert_eq!(computes.get(), 1);

	// Writes mark dirty but never recompute by themselves.
	a.set(5);
	a.set(9);
	assert_eq!(computes.get(), 1);

	assert_eq!(*b.get(), 18);
	assert_eq!(computes.get(), 2);
}

#[test]
fn computed_stays_recomputable_after_a_panicking_compute() {
	let a = signal(1);
	let attempts = Rc::new(Cell::new(0));

	let b = computed({
		let a = a.clone();
		let attempts = attempts.clone();
		move || {
			attempts.set(attempts.get() + 1);
			let value = *a.get();
			if attempts.get() == 1 {
				panic!("first pass fails");
			}
			value * 2
		}
	});

	let first = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| *b.get()));
	assert!(first.is_err());

	// The failed pass must leave the computed dirty, not cached-empty.
	assert_eq!(*b.get(), 2);
	assert_eq!(attempts.get(), 2);
}

#[test]
fn peek_does_not_subscribe_but_recomputes() {
	let a = signal(3);
	let b = a.map(|value| value + 1);

	assert_eq!(*b.peek(), 4);

	let runs = Rc::new(Cell::new(0));
	let _handle = effect({
		let b = b.clone();
		let runs = runs.clone();
		move || {
			let _ = *b.peek();
			runs.set(runs.get() + 1);
		}
	});

	assert_eq!(runs.get(), 1);

	// The effect only peeked, so the change does not reach it.
	a.set(10);
	assert_eq!(runs.get(), 1);
	assert_eq!(*b.peek(), 11);
}

#[test]
fn batching_collapses_notifications() {
	let x = signal(0);
	let y = signal(0);
	let z = signal(0);
	let runs = Rc::new(Cell::new(0));

	let _handle = effect({
		let x = x.clone();
		let y = y.clone();
		let z = z.clone();
		let runs = runs.clone();
		move || {
			let _ = *x.get() + *y.get() + *z.get();
			runs.set(runs.get() + 1);
		}
	});

	assert_eq!(runs.get(), 1);

	x.set(1);
	y.set(1);
	z.set(1);
	assert_eq!(runs.get(), 4);

	batch(|| {
		x.set(2);
		y.set(2);
		z.set(2);
	});
	assert_eq!(runs.get(), 5);
}

#[test]
fn nested_batches_flush_once_at_outermost_exit() {
	let value = signal(0);
	let runs = Rc::new(Cell::new(0));

	let _handle = effect({
		let value = value.clone();
		let runs = runs.clone();
		move || {
			let _ = *value.get();
			runs.set(runs.get() + 1);
		}
	});

	batch(|| {
		value.set(1);
		batch(|| {
			value.set(2);
		});
		// The inner batch must not flush while the outer one is open.
		assert_eq!(runs.get(), 1);
		value.set(3);
	});

	assert_eq!(runs.get(), 2);
}

#[test]
fn observers_scheduled_mid_flush_run_before_batch_returns() {
	let input = signal(0);
	let relay = signal(0);
	let downstream_runs = Rc::new(Cell::new(0));

	let _forward = effect({
		let input = input.clone();
		let relay = relay.clone();
		move || {
			let next = *input.get() * 10;
			relay.set(next);
		}
	});

	let _downstream = effect({
		let relay = relay.clone();
		let downstream_runs = downstream_runs.clone();
		move || {
			let _ = *relay.get();
			downstream_runs.set(downstream_runs.get() + 1);
		}
	});

	assert_eq!(downstream_runs.get(), 1);

	batch(|| {
		input.set(5);
		assert_eq!(downstream_runs.get(), 1);
	});

	assert_eq!(downstream_runs.get(), 2);
	assert_eq!(*relay.peek(), 50);
}

#[test]
fn cleanup_runs_before_each_rerun_and_on_dispose() {
	let value = signal(0);
	let cleanups = Rc::new(Cell::new(0));

	let handle = effect({
		let value = value.clone();
		let cleanups = cleanups.clone();
		move || {
			let _ = *value.get();
			let cleanups = cleanups.clone();
			Some(move || {
				cleanups.set(cleanups.get() + 1);
			})
		}
	});

	assert_eq!(cleanups.get(), 0);

	value.set(1);
	assert_eq!(cleanups.get(), 1);

	value.set(2);
	assert_eq!(cleanups.get(), 2);

	handle.dispose();
	assert_eq!(cleanups.get(), 3);

	// Disposal is final: no more runs, no more cleanups.
	value.set(3);
	assert_eq!(cleanups.get(), 3);
}

#[test]
fn disposed_effect_ignores_later_writes() {
	let value = signal(0);
	let runs = Rc::new(Cell::new(0));

	let handle = effect({
		let value = value.clone();
		let runs = runs.clone();
		move || {
			let _ = *value.get();
			runs.set(runs.get() + 1);
		}
	});

	value.set(1);
	assert_eq!(runs.get(), 2);

	handle.dispose();
	value.set(2);
	value.set(3);
	assert_eq!(runs.get(), 2);
}

#[test]
fn cleanup_may_write_a_source_of_its_own_effect() {
	let value = signal(0);
	let runs = Rc::new(Cell::new(0));

	let _handle = effect({
		let value = value.clone();
		let runs = runs.clone();
		move || {
			let seen = *value.get();
			runs.set(runs.get() + 1);
			let value = value.clone();
			Some(move || {
				value.set(seen + 100);
			})
		}
	});

	assert_eq!(runs.get(), 1);

	// The cleanup fires first and writes the source back; the effect
	// must re-run instead of panicking on its own state.
	value.set(5);

	assert_eq!(*value.peek(), 100);
	assert_eq!(runs.get(), 3);
}

#[test]
fn dropping_the_handle_stops_the_effect_and_fires_cleanup() {
	let value = signal(0);
	let runs = Rc::new(Cell::new(0));
	let cleanups = Rc::new(Cell::new(0));

	let handle = effect({
		let value = value.clone();
		let runs = runs.clone();
		let cleanups = cleanups.clone();
		move || {
			let _ = *value.get();
			runs.set(runs.get() + 1);
			let cleanups = cleanups.clone();
			Some(move || {
				cleanups.set(cleanups.get() + 1);
			})
		}
	});

	assert_eq!(runs.get(), 1);
	drop(handle);
	assert_eq!(cleanups.get(), 1);

	value.set(1);
	assert_eq!(runs.get(), 1);
}

#[test]
fn untracked_reads_do_not_subscribe() {
	let tracked = signal(0);
	let ignored = signal(0);
	let runs = Rc::new(Cell::new(0));

	let _handle = effect({
		let tracked = tracked.clone();
		let ignored = ignored.clone();
		let runs = runs.clone();
		move || {
			let _ = *tracked.get();
			let _ = untrack(|| *ignored.get());
			runs.set(runs.get() + 1);
		}
	});

	assert_eq!(runs.get(), 1);

	ignored.set(1);
	assert_eq!(runs.get(), 1);

	tracked.set(1);
	assert_eq!(runs.get(), 2);
}

#[test]
fn untrack_restores_tracking_for_nested_recomputation() {
	let source = signal(1);
	let doubled = source.map(|value| value * 2);

	// First read happens inside untrack: the recomputation must still
	// bind the computed to its source.
	let initial = untrack(|| *doubled.get());
	assert_eq!(initial, 2);

	source.set(4);
	assert_eq!(*doubled.get(), 8);
}

#[test]
fn signal_update_replace_and_toggle() {
	let count = signal(10);
	count.update(|value| *value += 5);
	assert_eq!(*count.peek(), 15);

	let old = count.replace(40);
	assert_eq!(old, 15);
	assert_eq!(*count.peek(), 40);

	let flag = signal(false);
	flag.toggle();
	assert_eq!(*flag.peek(), true);
}

#[test]
fn watch_reports_previous_values() {
	let value = signal(1);
	let seen: Rc<RefCell<Vec<(i32, Option<i32>)>>> = Rc::new(RefCell::new(Vec::new()));

	let _watcher = watch(
		value.clone(),
		{
			let seen = seen.clone();
			move |new: &i32, old: Option<&i32>| {
				seen.borrow_mut().push((*new, old.copied()));
			}
		},
		false,
	);

	assert!(seen.borrow().is_empty());

	value.set(2);
	value.set(5);

	assert_eq!(*seen.borrow(), vec![(2, Some(1)), (5, Some(2))]);
}

#[test]
fn watch_immediate_fires_with_no_previous_value() {
	let value = signal(3);
	let seen: Rc<RefCell<Vec<(i32, Option<i32>)>>> = Rc::new(RefCell::new(Vec::new()));

	let _watcher = watch(
		value.clone(),
		{
			let seen = seen.clone();
			move |new: &i32, old: Option<&i32>| {
				seen.borrow_mut().push((*new, old.copied()));
			}
		},
		true,
	);

	assert_eq!(*seen.borrow(), vec![(3, None)]);
}

#[test]
fn value_erases_signals_and_computeds() {
	let count = signal(2);
	let doubled = count.map(|value| value * 2);

	let as_signal: Value<i32> = count.clone().into();
	let as_computed: Value<i32> = doubled.into();

	assert_eq!(*as_signal.get(), 2);
	assert_eq!(*as_computed.get(), 4);

	count.set(6);
	assert_eq!(*as_computed.peek(), 12);
}

#[test]
fn capture_macros() {
	let count = weft::signal(2);
	let doubled = weft::computed!((count) => *count.get() * 2);
	assert_eq!(*doubled.get(), 4);

	let log: Rc<RefCell<Vec<i32>>> = Rc::new(RefCell::new(Vec::new()));
	let _handle = weft::effect!((doubled, log) => {
		log.borrow_mut().push(*doubled.get());
	});

	count.set(5);
	assert_eq!(*log.borrow(), vec![4, 10]);
}
