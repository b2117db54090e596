use std::cell::Ref;
use std::rc::Rc;

/// Read access shared by signals and computed values.
pub(crate) trait Source<T> {
	/// Tracked read: subscribes the current observer, if any.
	fn get(&self) -> Ref<'_, T>;

	/// Untracked read.
	fn peek(&self) -> Ref<'_, T>;
}

/// A type-erased, read-only handle over either a [`Signal`] or a
/// [`Computed`]. Lets helpers like [`watch`] accept both.
///
/// [`Signal`]: crate::Signal
/// [`Computed`]: crate::Computed
/// [`watch`]: crate::watch
pub struct Value<T> {
	source: Rc<dyn Source<T>>,
}

impl<T> Clone for Value<T> {
	fn clone(&self) -> Self {
		Value {
			source: self.source.clone(),
		}
	}
}

impl<T> Value<T> {
	pub(crate) fn new(source: Rc<dyn Source<T>>) -> Self {
		Value { source }
	}

	/// Current value; subscribes the active observer, if any.
	pub fn get(&self) -> Ref<'_, T> {
		self.source.get()
	}

	/// Current value without registering a subscription.
	pub fn peek(&self) -> Ref<'_, T> {
		self.source.peek()
	}
}
