use log::debug;

use super::types::ConnectionKey;

/// At most one active connection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightState {
	active: Option<ConnectionKey>,
}

impl HighlightState {
	/// Makes `key` the only active connection.
	pub fn activate(&mut self, key: ConnectionKey) {
		debug!("highlight {key}");
		self.active = Some(key);
	}

	/// Clears the highlight only if `key` is the active one, so a late leave
	/// event cannot undo a newer enter. Returns whether anything changed.
	pub fn clear(&mut self, key: &ConnectionKey) -> bool {
		if self.active.as_ref() != Some(key) {
			return false;
		}
		debug!("clear highlight {key}");
		self.active = None;
		true
	}

	pub fn reset(&mut self) {
		self.active = None;
	}

	pub fn active(&self) -> Option<&ConnectionKey> {
		self.active.as_ref()
	}

	pub fn is_active(&self, key: &ConnectionKey) -> bool {
		self.active.as_ref() == Some(key)
	}
}
