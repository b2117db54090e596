use std::cell::{Cell, Ref, RefCell};
use std::rc::{Rc, Weak};

use crate::subscribers::Subscribers;
use crate::track::{self, Observer};
use crate::value::{Source, Value};

/// A derived reactive value, recomputed lazily. An upstream change only
/// marks it dirty and notifies its own subscribers; the new value is
/// produced on the next read, so a computed nobody reads after a change
/// never recomputes.
pub struct Computed<T> {
	body: Rc<ComputedBody<T>>,
}

pub(crate) struct ComputedBody<T> {
	value: RefCell<Option<T>>,
	dirty: Cell<bool>,
	subscribers: Subscribers,
	compute: Box<dyn Fn() -> T>,
	/// Fixed observer registered with upstream sources. Held strongly
	/// here so it lives exactly as long as this computed; sources only
	/// keep a weak address to it.
	mark_dirty: Observer,
}

impl<T> Clone for Computed<T> {
	fn clone(&self) -> Self {
		Self {
			body: self.body.clone(),
		}
	}
}

impl<T> Computed<T>
where
	T: 'static,
{
	pub fn new(compute: impl Fn() -> T + 'static) -> Self {
		Computed {
			body: Rc::new_cyclic(|this: &Weak<ComputedBody<T>>| {
				let weak = this.clone();
				ComputedBody {
					value: RefCell::new(None),
					dirty: Cell::new(true),
					subscribers: Subscribers::new(),
					compute: Box::new(compute),
					mark_dirty: Rc::new(move || {
						if let Some(body) = weak.upgrade() {
							body.invalidate();
						}
					}),
				}
			}),
		}
	}

	/// Cached value, recomputed first if a source changed since the
	/// last read. Subscribes the active observer, if any.
	#[inline]
	pub fn get(&self) -> Ref<'_, T> {
		self.body.get()
	}

	/// Same recompute-if-dirty read, without subscribing the caller.
	#[inline]
	pub fn peek(&self) -> Ref<'_, T> {
		self.body.peek()
	}
}

impl<T> ComputedBody<T>
where
	T: 'static,
{
	fn get(&self) -> Ref<'_, T> {
		self.subscribers.track_current();
		self.ensure();
		Ref::map(self.value.borrow(), |value| value.as_ref().unwrap())
	}

	fn peek(&self) -> Ref<'_, T> {
		self.ensure();
		Ref::map(self.value.borrow(), |value| value.as_ref().unwrap())
	}

	/// Recomputes if dirty, inside a tracking frame of `mark_dirty`, so
	/// reads during recomputation bind this computed to its current
	/// sources. Stale source subscriptions are left in place; they cost
	/// one redundant dirty-marking and nothing else.
	fn ensure(&self) {
		if !self.dirty.get() {
			return;
		}
		self.dirty.set(false);
		// A panic in `compute` leaves the cache unset; re-arm the flag
		// on unwind so the next read retries the computation.
		let rearm = Rearm { dirty: &self.dirty };
		let value = track::tracked(&self.mark_dirty, || (self.compute)());
		std::mem::forget(rearm);
		*self.value.borrow_mut() = Some(value);
	}

	/// An upstream source changed: mark stale and pass the change on to
	/// our own subscribers. No eager recomputation.
	fn invalidate(&self) {
		self.dirty.set(true);
		self.subscribers.notify();
	}
}

struct Rearm<'a> {
	dirty: &'a Cell<bool>,
}

impl Drop for Rearm<'_> {
	fn drop(&mut self) {
		self.dirty.set(true);
	}
}

impl<T> Source<T> for ComputedBody<T>
where
	T: 'static,
{
	fn get(&self) -> Ref<'_, T> {
		ComputedBody::get(self)
	}

	fn peek(&self) -> Ref<'_, T> {
		ComputedBody::peek(self)
	}
}

impl<T> From<Computed<T>> for Value<T>
where
	T: 'static,
{
	fn from(computed: Computed<T>) -> Self {
		Value::new(computed.body)
	}
}
