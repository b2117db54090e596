use std::cell::{Ref, RefCell};
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use crate::computed::Computed;
use crate::hashed::Hashed;
use crate::subscribers::Subscribers;
use crate::value::{Source, Value};

/// A mutable reactive cell. Reading it inside an effect or a computed
/// registers that computation as a subscriber; writing a changed value
/// hands every subscriber to the scheduler. Writing an unchanged value
/// is a no-op.
pub struct Signal<T> {
	body: Rc<SignalBody<T>>,
}

pub(crate) struct SignalBody<T> {
	value: RefCell<Hashed<T>>,
	subscribers: Subscribers,
}

impl<T> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			body: self.body.clone(),
		}
	}
}

impl<T> Default for Signal<T>
where
	T: Default + Hash + 'static,
{
	fn default() -> Self {
		Signal::new(Default::default())
	}
}

pub trait Toggle {
	fn toggle(&mut self);
}

impl Toggle for bool {
	fn toggle(&mut self) {
		*self = !*self
	}
}

impl<T> Signal<T>
where
	T: 'static,
{
	pub fn new(value: T) -> Self
	where
		T: Hash,
	{
		Signal {
			body: Rc::new(SignalBody {
				value: RefCell::new(Hashed::new(value)),
				subscribers: Subscribers::new(),
			}),
		}
	}

	/// Derives a computed value from this signal.
	pub fn map<F, R>(&self, func: F) -> Computed<R>
	where
		F: Fn(&T) -> R + 'static,
		R: 'static,
	{
		let this = self.clone();
		Computed::new(move || func(&this.get()))
	}

	/// Current value; subscribes the active observer, if any. The
	/// returned guard must not be held across a write.
	#[inline]
	pub fn get(&self) -> Ref<'_, T> {
		self.body.get()
	}

	/// Current value without registering a subscription.
	#[inline]
	pub fn peek(&self) -> Ref<'_, T> {
		self.body.peek()
	}

	#[inline]
	pub fn set(&self, value: T)
	where
		T: Hash,
	{
		let _ = self.body.replace(value);
	}

	/// Stores `value` and returns the previous one. Subscribers are only
	/// notified when the stored value actually changed.
	#[inline]
	pub fn replace(&self, value: T) -> T
	where
		T: Hash,
	{
		self.body.replace(value)
	}

	/// Mutates the value in place, then notifies if it changed.
	#[inline]
	pub fn update(&self, func: impl FnOnce(&mut T))
	where
		T: Hash,
	{
		self.body.update(func)
	}

	#[inline]
	pub fn toggle(&self)
	where
		T: Toggle + Hash,
	{
		self.update(T::toggle)
	}
}

impl<T> SignalBody<T>
where
	T: 'static,
{
	fn get(&self) -> Ref<'_, T> {
		self.subscribers.track_current();
		Ref::map(self.value.borrow(), |hashed| &hashed.value)
	}

	fn peek(&self) -> Ref<'_, T> {
		Ref::map(self.value.borrow(), |hashed| &hashed.value)
	}

	fn replace(&self, value: T) -> T
	where
		T: Hash,
	{
		let next = Hashed::new(value);
		let mut current = self.value.borrow_mut();
		let changed = next.hash != current.hash;
		let old = std::mem::replace(&mut *current, next);
		drop(current);

		if changed {
			self.subscribers.notify();
		}
		old.value
	}

	fn update(&self, func: impl FnOnce(&mut T))
	where
		T: Hash,
	{
		let mut current = self.value.borrow_mut();
		func(&mut current.value);
		let changed = current.rehash();
		drop(current);

		if changed {
			self.subscribers.notify();
		}
	}
}

impl<T> Source<T> for SignalBody<T>
where
	T: 'static,
{
	fn get(&self) -> Ref<'_, T> {
		SignalBody::get(self)
	}

	fn peek(&self) -> Ref<'_, T> {
		SignalBody::peek(self)
	}
}

impl<T> From<Signal<T>> for Value<T>
where
	T: 'static,
{
	fn from(signal: Signal<T>) -> Self {
		Value::new(signal.body)
	}
}

impl<T> Hash for Signal<T>
where
	T: Hash,
{
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		state.write_u64(self.body.value.borrow().hash);
	}
}

impl<T> Debug for Signal<T>
where
	T: 'static + Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.peek().fmt(f)
	}
}
