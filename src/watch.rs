use std::cell::{Cell, RefCell};

use crate::effect::Effect;
use crate::value::Value;

/// Observes one source and invokes `callback(new, previous)` whenever it
/// changes. Unlike a plain effect, the previous value is available. With
/// `immediate`, the callback also fires for the initial value, with no
/// previous one. The returned [`Effect`] handle keeps the watcher alive.
pub fn watch<T>(
	source: impl Into<Value<T>>,
	callback: impl Fn(&T, Option<&T>) + 'static,
	immediate: bool,
) -> Effect
where
	T: Clone + 'static,
{
	let source = source.into();
	let previous: RefCell<Option<T>> = RefCell::new(None);
	let first = Cell::new(true);

	Effect::new(move || {
		let current = source.get().clone();
		let last = previous.borrow_mut().replace(current.clone());

		if first.replace(false) {
			if immediate {
				callback(&current, None);
			}
		} else {
			callback(&current, last.as_ref());
		}
	})
}
