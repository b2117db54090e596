use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use crate::addr::WeakAddr;
use crate::track::WeakObserver;

thread_local! {
	static DEPTH: Cell<usize> = Cell::new(0);
	static PENDING: RefCell<BTreeSet<WeakAddr<dyn Fn()>>> =
		RefCell::new(BTreeSet::new());
}

/// True while a [`batch`] call is on the stack.
pub fn in_batch() -> bool {
	DEPTH.with(|depth| depth.get() > 0)
}

/// Runs `observer` now or, inside a batch, defers it until the
/// outermost batch exits. Redundant schedules of the same observer
/// before the flush collapse into one run.
pub(crate) fn schedule(observer: WeakObserver) {
	if in_batch() {
		tracing::trace!("deferring observer until batch exit");
		PENDING.with(|pending| {
			pending.borrow_mut().insert(WeakAddr::new(observer));
		});
		return;
	}
	if let Some(observer) = observer.upgrade() {
		observer();
	}
}

/// Defers every notification triggered inside `func` and runs each
/// affected observer once when the outermost batch exits. Nested calls
/// compose; the depth counter is restored even when `func` unwinds,
/// though the flush itself is skipped during a panic.
pub fn batch(func: impl FnOnce()) {
	DEPTH.with(|depth| depth.set(depth.get() + 1));
	let _exit = Exit;
	func();
}

struct Exit;

impl Drop for Exit {
	fn drop(&mut self) {
		let outermost = DEPTH.with(|depth| {
			let next = depth.get() - 1;
			depth.set(next);
			next == 0
		});
		if outermost && !std::thread::panicking() {
			flush();
		}
	}
}

/// Drains the pending set to fixpoint: observers scheduled while the
/// drain is running (an effect writing another signal mid-flush) run
/// before the flush returns. An observer that reschedules itself on
/// every run will keep this loop alive; that is the application's bug.
fn flush() {
	loop {
		let next = PENDING.with(|pending| pending.borrow_mut().pop_first());
		let Some(entry) = next else {
			break;
		};
		if let Some(observer) = entry.upgrade() {
			observer();
		}
	}
}
