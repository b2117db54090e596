use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Deref;

/// A value paired with its `fxhash` digest. Change detection compares
/// digests, which gives bitwise-identity semantics for plain data.
pub struct Hashed<T> {
	pub value: T,
	pub hash: u64,
}

impl<T> Hashed<T> {
	pub fn new(value: T) -> Self
	where
		T: Hash,
	{
		let hash = fxhash::hash64(&value);
		Self { value, hash }
	}

	/// Recomputes the digest after in-place mutation. Returns true when
	/// the value actually changed.
	pub fn rehash(&mut self) -> bool
	where
		T: Hash,
	{
		let hash = fxhash::hash64(&self.value);
		let changed = hash != self.hash;
		self.hash = hash;
		changed
	}
}

impl<T> Deref for Hashed<T> {
	type Target = T;
	fn deref(&self) -> &Self::Target {
		&self.value
	}
}

impl<T> Debug for Hashed<T>
where
	T: Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.value.fmt(f)
	}
}
