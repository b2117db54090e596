use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::track::{self, Observer};

/// Cleanup returned by an effect run; invoked before the next run and
/// once on disposal.
pub type Cleanup = Box<dyn FnOnce()>;

/// Conversion for effect-closure return values. Effects that need no
/// cleanup return `()`; effects that do return `Some(closure)` or a
/// boxed [`Cleanup`].
pub trait IntoCleanup {
	fn into_cleanup(self) -> Option<Cleanup>;
}

impl IntoCleanup for () {
	fn into_cleanup(self) -> Option<Cleanup> {
		None
	}
}

impl IntoCleanup for Cleanup {
	fn into_cleanup(self) -> Option<Cleanup> {
		Some(self)
	}
}

impl<F> IntoCleanup for Option<F>
where
	F: FnOnce() + 'static,
{
	fn into_cleanup(self) -> Option<Cleanup> {
		self.map(|func| Box::new(func) as Cleanup)
	}
}

/// An eager terminal subscriber: runs once synchronously at construction
/// and again whenever a source it read changes. The handle owns the
/// effect; dropping it stops re-runs and fires the pending cleanup.
#[must_use]
pub struct Effect {
	body: Rc<EffectBody>,
}

struct EffectBody {
	disposed: Cell<bool>,
	cleanup: RefCell<Option<Cleanup>>,
	run: Box<dyn Fn() -> Option<Cleanup>>,
	/// The observer registered with sources; holds only a weak handle
	/// back to this body.
	observer: Observer,
}

impl Clone for Effect {
	fn clone(&self) -> Self {
		Self {
			body: self.body.clone(),
		}
	}
}

impl Effect {
	pub fn new<C>(func: impl Fn() -> C + 'static) -> Self
	where
		C: IntoCleanup,
	{
		let body = Rc::new_cyclic(|this: &Weak<EffectBody>| {
			let weak = this.clone();
			EffectBody {
				disposed: Cell::new(false),
				cleanup: RefCell::new(None),
				run: Box::new(move || func().into_cleanup()),
				observer: Rc::new(move || {
					if let Some(body) = weak.upgrade() {
						body.invoke();
					}
				}),
			}
		});

		body.invoke();
		Effect { body }
	}

	/// Permanently stops the effect and runs its pending cleanup once.
	/// Later scheduling attempts are no-ops; calling `dispose` again
	/// does nothing.
	pub fn dispose(&self) {
		self.body.dispose();
	}
}

impl EffectBody {
	fn invoke(&self) {
		if self.disposed.get() {
			return;
		}
		// The borrow must end before the cleanup runs: a cleanup that
		// writes one of this effect's sources re-enters `invoke`.
		let cleanup = self.cleanup.borrow_mut().take();
		if let Some(cleanup) = cleanup {
			cleanup();
		}
		let next = track::tracked(&self.observer, || (self.run)());
		*self.cleanup.borrow_mut() = next;
	}

	fn dispose(&self) {
		self.disposed.set(true);
		let cleanup = self.cleanup.borrow_mut().take();
		if let Some(cleanup) = cleanup {
			cleanup();
		}
	}
}

impl Drop for EffectBody {
	fn drop(&mut self) {
		let cleanup = self.cleanup.borrow_mut().take();
		if let Some(cleanup) = cleanup {
			cleanup();
		}
	}
}
