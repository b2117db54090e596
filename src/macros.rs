pub use enclose::*;

/// Builds a [`Computed`](crate::Computed) from an expression. The
/// optional capture list clones each named handle into the closure.
///
/// ```
/// use weft::{computed, signal};
///
/// let count = signal(2);
/// let doubled = computed!((count) => *count.get() * 2);
/// assert_eq!(*doubled.get(), 4);
/// ```
#[macro_export]
macro_rules! computed {
	(( $($d_tt:tt)* ) => $($b:tt)*) => {
		$crate::Computed::new($crate::macros::enclose!(($( $d_tt )*) move || { $($b)* }))
	};
	($($b:tt)*) => {
		$crate::Computed::new(move || { $($b)* })
	};
}

/// Builds an [`Effect`](crate::Effect) with the same capture-list
/// convention as [`computed!`].
#[macro_export]
macro_rules! effect {
	(( $($d_tt:tt)* ) => $($b:tt)*) => {
		$crate::Effect::new($crate::macros::enclose!(($( $d_tt )*) move || { $($b)* }))
	};
	($($b:tt)*) => {
		$crate::Effect::new(move || { $($b)* })
	};
}
