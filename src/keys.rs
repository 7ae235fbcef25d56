use bitflags::bitflags;
use thiserror::Error;

use crate::navigator::Command;

bitflags! {
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct Modifiers: u8 {
		const ALT = 1 << 0;
		const CTRL = 1 << 1;
		const SHIFT = 1 << 2;
	}
}

/// Abstract key code, toolkit-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
	Char(char),
	Up,
	Down,
	Left,
	Right,
	Home,
	End,
	PageUp,
	PageDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
	pub key: Key,
	pub mods: Modifiers,
}

impl KeyChord {
	#[must_use]
	pub const fn new(key: Key) -> Self {
		Self { key, mods: Modifiers::empty() }
	}

	#[must_use]
	pub const fn with_mods(key: Key, mods: Modifiers) -> Self {
		Self { key, mods }
	}

	#[must_use]
	pub const fn ctrl(key: Key) -> Self {
		Self { key, mods: Modifiers::CTRL }
	}
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
	#[error("duplicate binding for {0:?}")]
	DuplicateChord(KeyChord),
}

/// Chord-to-command table. At most one command per chord; duplicates are a
/// configuration error, rejected at construction.
#[derive(Debug, Clone)]
pub struct KeyBindings {
	bindings: Vec<(KeyChord, Command)>,
}

impl KeyBindings {
	/// # Errors
	///
	/// Returns [`BindingError::DuplicateChord`] when two entries share a
	/// chord, even if they map to the same command.
	pub fn new(bindings: Vec<(KeyChord, Command)>) -> Result<Self, BindingError> {
		for (index, (chord, _)) in bindings.iter().enumerate() {
			if bindings[..index].iter().any(|(existing, _)| existing == chord) {
				return Err(BindingError::DuplicateChord(*chord));
			}
		}
		Ok(Self { bindings })
	}

	#[must_use]
	pub fn lookup(&self, chord: KeyChord) -> Option<Command> {
		self.bindings.iter().find(|(bound, _)| *bound == chord).map(|(_, command)| *command)
	}

	#[must_use]
	pub fn commands(&self) -> impl Iterator<Item = (KeyChord, Command)> + '_ {
		self.bindings.iter().copied()
	}
}

impl Default for KeyBindings {
	fn default() -> Self {
		// Known duplicate-free, so no validation pass.
		Self {
			bindings: vec![
				(KeyChord::new(Key::Down), Command::PageNext),
				(KeyChord::new(Key::Up), Command::PagePrevious),
				(KeyChord::new(Key::Right), Command::PageSkipForward),
				(KeyChord::new(Key::Left), Command::PageSkipBackward),
				(KeyChord::new(Key::Home), Command::PageFirst),
				(KeyChord::new(Key::End), Command::PageLast),
				(KeyChord::ctrl(Key::PageDown), Command::ArchiveNext),
				(KeyChord::ctrl(Key::PageUp), Command::ArchivePrevious),
			],
		}
	}
}
