//! Fine-grained reactivity: [`Signal`] cells, lazily recomputed
//! [`Computed`] values, eager [`Effect`]s with per-run cleanup, and
//! [`batch`]ed notification flushing. Single-threaded by design; the
//! tracking context and the scheduler live in thread-local state.

pub mod macros;

mod addr;
mod batch;
mod computed;
mod effect;
mod hashed;
mod persist;
mod signal;
mod subscribers;
mod track;
mod value;
mod watch;

use std::hash::Hash;

pub use batch::{batch, in_batch};
pub use computed::Computed;
pub use effect::{Cleanup, Effect, IntoCleanup};
pub use hashed::Hashed;
pub use persist::{persisted, MemoryStorage, Persisted, Storage};
pub use signal::{Signal, Toggle};
pub use track::untrack;
pub use value::Value;
pub use watch::watch;

/// Creates a mutable reactive cell holding `value`.
pub fn signal<T>(value: T) -> Signal<T>
where
	T: Hash + 'static,
{
	Signal::new(value)
}

/// Creates a derived value, recomputed lazily when its sources change.
pub fn computed<T>(func: impl Fn() -> T + 'static) -> Computed<T>
where
	T: 'static,
{
	Computed::new(func)
}

/// Creates an eager side effect. The returned handle keeps it alive;
/// dropping or disposing the handle stops further runs.
#[must_use]
pub fn effect<C>(func: impl Fn() -> C + 'static) -> Effect
where
	C: IntoCleanup,
{
	Effect::new(func)
}
