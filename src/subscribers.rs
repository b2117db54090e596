use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::addr::WeakAddr;
use crate::batch;
use crate::track;

/// The observers attached to one reactive source. Entries are weak and
/// keyed by address; a dropped observer is skipped and pruned on the
/// next notification, so a source never keeps its readers alive.
pub(crate) struct Subscribers {
	set: RefCell<BTreeSet<WeakAddr<dyn Fn()>>>,
}

impl Subscribers {
	pub fn new() -> Self {
		Subscribers {
			set: RefCell::new(BTreeSet::new()),
		}
	}

	/// Registers the current observer, if a tracked evaluation is in
	/// progress. Re-adding an existing observer is a no-op.
	pub fn track_current(&self) {
		if let Some(observer) = track::current_observer() {
			self.set.borrow_mut().insert(WeakAddr::new(observer));
		}
	}

	/// Hands every live subscriber to the scheduler exactly once. The
	/// set is snapshotted first: observers running synchronously may
	/// re-subscribe while we iterate.
	pub fn notify(&self) {
		let snapshot: Vec<WeakAddr<dyn Fn()>> =
			self.set.borrow().iter().cloned().collect();

		let mut dead = Vec::new();
		for entry in &snapshot {
			if entry.upgrade().is_none() {
				dead.push(entry.clone());
				continue;
			}
			batch::schedule((**entry).clone());
		}

		if !dead.is_empty() {
			let mut set = self.set.borrow_mut();
			for entry in dead {
				set.remove(&entry);
			}
		}
	}
}
