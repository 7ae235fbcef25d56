use std::{
	fmt,
	fs::{self, File},
	io::{self, BufReader},
	path::{Path, PathBuf},
};

use anyhow::Error as AnyError;
use log::warn;
use zip::ZipArchive;

use crate::error::ArchiveError;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "cbz"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Forward,
	Backward,
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Forward => write!(f, "forward"),
			Self::Backward => write!(f, "backward"),
		}
	}
}

/// Supplier of archives on disk: open/close handles, page counts, and the
/// lexicographic neighbors of an archive within its directory.
pub trait ArchiveSource {
	type Handle;

	/// # Errors
	///
	/// Returns an error if the archive is missing, unreadable, or corrupt.
	fn open(&mut self, path: &Path) -> Result<Self::Handle, ArchiveError>;

	/// Releases a handle. Idempotent: releasing an already closed handle is
	/// impossible by construction since handles are moved in.
	fn close(&mut self, handle: Self::Handle);

	fn len(&self, handle: &Self::Handle) -> usize;

	/// # Errors
	///
	/// Returns [`ArchiveError::SiblingNotFound`] at the ends of the
	/// directory's sorted archive sequence.
	fn sibling_path(&self, path: &Path, direction: Direction) -> Result<PathBuf, ArchiveError>;
}

/// An opened zip archive: the sorted names of its image entries.
#[derive(Debug)]
pub struct ZipHandle {
	pages: Vec<String>,
}

impl ZipHandle {
	#[must_use]
	pub fn page_name(&self, index: usize) -> Option<&str> {
		self.pages.get(index).map(String::as_str)
	}
}

/// Filesystem-backed source reading zip/cbz files.
#[derive(Debug, Default)]
pub struct FsArchiveSource;

impl FsArchiveSource {
	#[must_use]
	pub const fn new() -> Self {
		Self
	}
}

impl ArchiveSource for FsArchiveSource {
	type Handle = ZipHandle;

	fn open(&mut self, path: &Path) -> Result<ZipHandle, ArchiveError> {
		let file = File::open(path).map_err(|err| open_error(path, &err))?;
		let archive = ZipArchive::new(BufReader::new(file))
			.map_err(|err| ArchiveError::Corrupt { path: path.to_path_buf(), source: AnyError::new(err) })?;
		let mut pages: Vec<String> =
			archive.file_names().filter(|name| is_image_entry(name)).map(String::from).collect();
		pages.sort();
		Ok(ZipHandle { pages })
	}

	fn close(&mut self, handle: ZipHandle) {
		drop(handle);
	}

	fn len(&self, handle: &ZipHandle) -> usize {
		handle.pages.len()
	}

	fn sibling_path(&self, path: &Path, direction: Direction) -> Result<PathBuf, ArchiveError> {
		let not_found = || ArchiveError::SiblingNotFound { path: path.to_path_buf(), direction };
		let parent = path.parent().ok_or_else(not_found)?;
		let entries = fs::read_dir(parent).map_err(|err| {
			warn!("cannot list {}: {err}", parent.display());
			not_found()
		})?;
		let mut archives: Vec<PathBuf> =
			entries.filter_map(Result::ok).map(|entry| entry.path()).filter(|p| is_archive_file(p)).collect();
		archives.sort();
		let position = archives.iter().position(|p| p == path).ok_or_else(not_found)?;
		let sibling = match direction {
			Direction::Forward => archives.get(position + 1),
			Direction::Backward => position.checked_sub(1).and_then(|i| archives.get(i)),
		};
		sibling.cloned().ok_or_else(not_found)
	}
}

fn open_error(path: &Path, err: &io::Error) -> ArchiveError {
	match err.kind() {
		io::ErrorKind::NotFound => ArchiveError::NotFound { path: path.to_path_buf() },
		io::ErrorKind::PermissionDenied => ArchiveError::PermissionDenied { path: path.to_path_buf() },
		_ => ArchiveError::Corrupt { path: path.to_path_buf(), source: AnyError::msg(err.to_string()) },
	}
}

fn is_image_entry(name: &str) -> bool {
	let lower = name.to_ascii_lowercase();
	IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(&format!(".{ext}")))
}

fn is_archive_file(path: &Path) -> bool {
	path.extension()
		.map(|ext| ext.to_string_lossy().to_ascii_lowercase())
		.is_some_and(|ext| ARCHIVE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
	use std::{
		io::Write,
		time::{SystemTime, UNIX_EPOCH},
	};

	use rstest::rstest;
	use zip::{ZipWriter, write::FileOptions};

	use super::*;

	fn unique_temp_dir() -> PathBuf {
		let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
		let dir = std::env::temp_dir().join(format!("comica_test_{nanos}"));
		fs::create_dir_all(&dir).expect("create temp dir");
		dir
	}

	fn write_archive(path: &Path, entries: &[&str]) {
		let file = File::create(path).expect("create archive");
		let mut writer = ZipWriter::new(file);
		for entry in entries {
			writer.start_file(*entry, FileOptions::<()>::default()).expect("start file");
			writer.write_all(b"x").expect("write entry");
		}
		writer.finish().expect("finish zip");
	}

	#[test]
	fn open_counts_only_image_entries() {
		let dir = unique_temp_dir();
		let path = dir.join("a.cbz");
		write_archive(&path, &["02.png", "01.jpg", "info.txt", "cover.webp"]);
		let mut source = FsArchiveSource::new();
		let handle = source.open(&path).expect("open archive");
		assert_eq!(source.len(&handle), 3);
		assert_eq!(handle.page_name(0), Some("01.jpg"));
		assert_eq!(handle.page_name(1), Some("02.png"));
		source.close(handle);
	}

	#[test]
	fn open_missing_archive_reports_not_found() {
		let dir = unique_temp_dir();
		let mut source = FsArchiveSource::new();
		let err = source.open(&dir.join("nope.cbz")).expect_err("missing archive");
		assert!(matches!(err, ArchiveError::NotFound { .. }));
	}

	#[test]
	fn open_garbage_reports_corrupt() {
		let dir = unique_temp_dir();
		let path = dir.join("bad.zip");
		fs::write(&path, b"not a zip at all").expect("seed file");
		let mut source = FsArchiveSource::new();
		let err = source.open(&path).expect_err("corrupt archive");
		assert!(matches!(err, ArchiveError::Corrupt { .. }));
	}

	#[test]
	fn sibling_path_follows_lexicographic_order() {
		let dir = unique_temp_dir();
		for name in ["b.cbz", "a.cbz", "c.zip", "notes.txt"] {
			write_archive(&dir.join(name), &["01.png"]);
		}
		let source = FsArchiveSource::new();
		let next = source.sibling_path(&dir.join("a.cbz"), Direction::Forward).expect("next sibling");
		assert_eq!(next, dir.join("b.cbz"));
		let prev = source.sibling_path(&dir.join("c.zip"), Direction::Backward).expect("previous sibling");
		assert_eq!(prev, dir.join("b.cbz"));
	}

	#[rstest]
	#[case(Direction::Backward, "a.cbz")]
	#[case(Direction::Forward, "c.cbz")]
	fn sibling_path_stops_at_directory_ends(#[case] direction: Direction, #[case] edge: &str) {
		let dir = unique_temp_dir();
		for name in ["a.cbz", "b.cbz", "c.cbz"] {
			write_archive(&dir.join(name), &["01.png"]);
		}
		let source = FsArchiveSource::new();
		let err = source.sibling_path(&dir.join(edge), direction).expect_err("no sibling");
		assert!(err.is_sibling_not_found());
	}

	#[rstest]
	#[case("page.PNG", true)]
	#[case("dir/page.jpeg", true)]
	#[case("thumbs.db", false)]
	#[case("readme", false)]
	fn image_entry_filter(#[case] name: &str, #[case] expected: bool) {
		assert_eq!(is_image_entry(name), expected);
	}
}
