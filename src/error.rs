use std::path::PathBuf;

use thiserror::Error;

use crate::archive::Direction;

/// Failures reported by archive sources and archive transitions.
#[derive(Debug, Error)]
pub enum ArchiveError {
	#[error("archive not found: {}", path.display())]
	NotFound { path: PathBuf },
	#[error("permission denied opening archive: {}", path.display())]
	PermissionDenied { path: PathBuf },
	#[error("cannot read archive {}: {source}", path.display())]
	Corrupt { path: PathBuf, source: anyhow::Error },
	#[error("no {direction} archive from {}", path.display())]
	SiblingNotFound { path: PathBuf, direction: Direction },
}

impl ArchiveError {
	#[must_use]
	pub const fn is_sibling_not_found(&self) -> bool {
		matches!(self, Self::SiblingNotFound { .. })
	}
}
