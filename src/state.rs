use std::path::{Path, PathBuf};

use bitflags::bitflags;

pub const DEFAULT_SKIP_STEP: usize = 10;

bitflags! {
	/// Display-mode flags carried across archive loads.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
	pub struct ModeFlags: u8 {
		const DOUBLE_PAGE = 1 << 0;
		const SEAMLESS = 1 << 1;
		const MANGA = 1 << 2;
		const RANDOM = 1 << 3;
	}
}

/// The currently open archive: its opaque source handle plus identity.
#[derive(Debug)]
pub struct OpenArchive<H> {
	handle: H,
	path: PathBuf,
	name: String,
}

impl<H> OpenArchive<H> {
	fn new(handle: H, path: &Path) -> Self {
		let name = path.file_stem().map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
		Self { handle, path: path.to_path_buf(), name }
	}

	pub const fn handle(&self) -> &H {
		&self.handle
	}

	pub fn into_handle(self) -> H {
		self.handle
	}
}

/// Position and display state of the reader.
///
/// Holds at most one open archive at a time. Page bounds are not enforced
/// here; the navigator clamps before writing.
#[derive(Debug)]
pub struct NavigationState<H> {
	archive: Option<OpenArchive<H>>,
	page: usize,
	modes: ModeFlags,
	skip_step: usize,
}

impl<H> Default for NavigationState<H> {
	fn default() -> Self {
		Self::new()
	}
}

impl<H> NavigationState<H> {
	#[must_use]
	pub const fn new() -> Self {
		Self { archive: None, page: 0, modes: ModeFlags::empty(), skip_step: DEFAULT_SKIP_STEP }
	}

	#[must_use]
	pub fn with_modes(modes: ModeFlags, skip_step: usize) -> Self {
		Self { archive: None, page: 0, modes, skip_step: skip_step.max(1) }
	}

	#[must_use]
	pub const fn is_loaded(&self) -> bool {
		self.archive.is_some()
	}

	#[must_use]
	pub const fn handle(&self) -> Option<&H> {
		match self.archive {
			Some(ref open) => Some(open.handle()),
			None => None,
		}
	}

	#[must_use]
	pub fn archive_path(&self) -> Option<&Path> {
		self.archive.as_ref().map(|open| open.path.as_path())
	}

	#[must_use]
	pub fn archive_name(&self) -> Option<&str> {
		self.archive.as_ref().map(|open| open.name.as_str())
	}

	/// Installs a freshly opened archive and resets the page to 0, returning
	/// the previously open archive (if any) so its handle can be released.
	pub fn load(&mut self, handle: H, path: &Path) -> Option<OpenArchive<H>> {
		let previous = self.archive.replace(OpenArchive::new(handle, path));
		self.page = 0;
		previous
	}

	/// Clears the open archive and resets the page, returning it for release.
	pub fn unload(&mut self) -> Option<OpenArchive<H>> {
		self.page = 0;
		self.archive.take()
	}

	#[must_use]
	pub const fn page(&self) -> usize {
		self.page
	}

	pub const fn set_page(&mut self, page: usize) {
		self.page = page;
	}

	#[must_use]
	pub const fn modes(&self) -> ModeFlags {
		self.modes
	}

	pub const fn set_modes(&mut self, modes: ModeFlags) {
		self.modes = modes;
	}

	pub fn set_mode(&mut self, mode: ModeFlags, enabled: bool) {
		self.modes.set(mode, enabled);
	}

	pub fn toggle_mode(&mut self, mode: ModeFlags) {
		self.modes.toggle(mode);
	}

	#[must_use]
	pub const fn double_page(&self) -> bool {
		self.modes.contains(ModeFlags::DOUBLE_PAGE)
	}

	#[must_use]
	pub const fn seamless(&self) -> bool {
		self.modes.contains(ModeFlags::SEAMLESS)
	}

	#[must_use]
	pub const fn manga(&self) -> bool {
		self.modes.contains(ModeFlags::MANGA)
	}

	#[must_use]
	pub const fn random(&self) -> bool {
		self.modes.contains(ModeFlags::RANDOM)
	}

	#[must_use]
	pub const fn skip_step(&self) -> usize {
		self.skip_step
	}

	pub fn set_skip_step(&mut self, step: usize) {
		self.skip_step = step.max(1);
	}
}
