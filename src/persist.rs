use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Deref;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::effect::Effect;
use crate::signal::Signal;

/// Synchronous key-value storage a persisted signal mirrors into.
/// Implementations swallow their own backend failures: a `set_item`
/// that cannot complete simply drops the write.
pub trait Storage {
	fn get_item(&self, key: &str) -> Option<String>;
	fn set_item(&self, key: &str, value: &str);
}

/// In-memory [`Storage`] backend, for tests and headless targets.
#[derive(Default)]
pub struct MemoryStorage {
	items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Storage for MemoryStorage {
	fn get_item(&self, key: &str) -> Option<String> {
		self.items.borrow().get(key).cloned()
	}

	fn set_item(&self, key: &str, value: &str) {
		self.items
			.borrow_mut()
			.insert(key.to_owned(), value.to_owned());
	}
}

/// A [`Signal`] mirrored into durable storage as JSON. The handle owns
/// the mirroring effect, so the mirror lives exactly as long as the
/// signal handle; there is no separate disposal path.
pub struct Persisted<T> {
	signal: Signal<T>,
	_mirror: Effect,
}

impl<T> Clone for Persisted<T> {
	fn clone(&self) -> Self {
		Persisted {
			signal: self.signal.clone(),
			_mirror: self._mirror.clone(),
		}
	}
}

impl<T> Deref for Persisted<T> {
	type Target = Signal<T>;
	fn deref(&self) -> &Signal<T> {
		&self.signal
	}
}

impl<T> Persisted<T> {
	pub fn signal(&self) -> &Signal<T> {
		&self.signal
	}
}

/// Creates a signal hydrated once from `storage[key]` and mirrored back
/// on every change. A missing key or unparsable payload falls back to
/// `initial`; serialization failures skip the mirror. Either way the
/// in-memory signal keeps working.
pub fn persisted<T>(
	storage: Rc<dyn Storage>,
	key: impl Into<String>,
	initial: T,
) -> Persisted<T>
where
	T: Serialize + DeserializeOwned + Hash + 'static,
{
	let key = key.into();

	let stored = match storage.get_item(&key) {
		Some(raw) => match serde_json::from_str(&raw) {
			Ok(value) => value,
			Err(error) => {
				tracing::debug!(%key, %error, "stored value unreadable, using initial");
				initial
			}
		},
		None => initial,
	};

	let signal = Signal::new(stored);

	let mirror = Effect::new({
		let signal = signal.clone();
		let storage = storage.clone();
		let key = key.clone();
		move || {
			let value = signal.get();
			match serde_json::to_string(&*value) {
				Ok(json) => {
					drop(value);
					storage.set_item(&key, &json);
				}
				Err(error) => {
					tracing::debug!(%key, %error, "value not serializable, skipping mirror");
				}
			}
		}
	});

	Persisted {
		signal,
		_mirror: mirror,
	}
}
