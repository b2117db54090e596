use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

/// A callable representing "re-run this reactive computation". Identity
/// is the allocation address; two observers are distinct unless they are
/// literally the same `Rc`.
pub(crate) type Observer = Rc<dyn Fn()>;
pub(crate) type WeakObserver = Weak<dyn Fn()>;

thread_local! {
	static OBSERVERS: RefCell<SmallVec<[WeakObserver; 4]>> =
		RefCell::new(SmallVec::new_const());
	static TRACKING: Cell<bool> = Cell::new(true);
}

/// Runs `func` with `observer` as the current observer. The frame is
/// popped even when `func` unwinds, and suspended tracking (see
/// [`untrack`]) is re-enabled for the duration of the frame so that a
/// recomputation always rebinds to its sources.
pub(crate) fn tracked<T>(observer: &Observer, func: impl FnOnce() -> T) -> T {
	OBSERVERS.with(|stack| stack.borrow_mut().push(Rc::downgrade(observer)));
	let _frame = Frame {
		was_tracking: TRACKING.with(|tracking| tracking.replace(true)),
	};
	func()
}

struct Frame {
	was_tracking: bool,
}

impl Drop for Frame {
	fn drop(&mut self) {
		OBSERVERS.with(|stack| {
			stack.borrow_mut().pop();
		});
		TRACKING.with(|tracking| tracking.set(self.was_tracking));
	}
}

/// Top of the observer stack, or `None` outside any tracked evaluation
/// (including inside [`untrack`]). Reads that see `None` establish no
/// subscription.
pub(crate) fn current_observer() -> Option<WeakObserver> {
	if !TRACKING.with(|tracking| tracking.get()) {
		return None;
	}
	OBSERVERS.with(|stack| stack.borrow().last().cloned())
}

/// Runs `func` with dependency registration suspended: signals and
/// computed values read inside do not subscribe the enclosing observer.
/// Re-entrant; the previous tracking state is restored on exit or unwind.
pub fn untrack<T>(func: impl FnOnce() -> T) -> T {
	let _restore = Restore {
		was_tracking: TRACKING.with(|tracking| tracking.replace(false)),
	};
	func()
}

struct Restore {
	was_tracking: bool,
}

impl Drop for Restore {
	fn drop(&mut self) {
		TRACKING.with(|tracking| tracking.set(self.was_tracking));
	}
}
