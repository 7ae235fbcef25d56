#![warn(clippy::all, clippy::nursery, clippy::pedantic)]

pub mod archive;
pub mod config;
pub mod error;
pub mod keys;
pub mod navigator;
pub mod state;

pub use archive::{ArchiveSource, Direction, FsArchiveSource};
pub use error::ArchiveError;
pub use keys::{Key, KeyBindings, KeyChord, Modifiers};
pub use navigator::{Command, Navigator};
pub use state::{ModeFlags, NavigationState};
