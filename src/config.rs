use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::state::{DEFAULT_SKIP_STEP, ModeFlags, NavigationState};

/// User configuration persisted between runs. The display-mode flags seed
/// [`NavigationState`] at startup and are written back on toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	pub double_page: bool,
	pub seamless: bool,
	pub manga: bool,
	pub random: bool,
	pub skip_step: usize,
	pub window_width: u32,
	pub window_height: u32,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			double_page: false,
			seamless: false,
			manga: false,
			random: false,
			skip_step: DEFAULT_SKIP_STEP,
			window_width: 900,
			window_height: 700,
		}
	}
}

impl Config {
	/// Loads the config from `path`, falling back to defaults when the file
	/// does not exist.
	///
	/// # Errors
	///
	/// Returns an error if the file exists but cannot be read or parsed.
	pub fn load(path: &Path) -> Result<Self> {
		if !path.exists() {
			return Ok(Self::default());
		}
		let contents =
			fs::read_to_string(path).with_context(|| format!("Failed to read config '{}'", path.display()))?;
		toml::from_str(&contents).with_context(|| format!("Failed to parse config '{}'", path.display()))
	}

	/// # Errors
	///
	/// Returns an error if the file or its parent directory cannot be written.
	pub fn save(&self, path: &Path) -> Result<()> {
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
		}
		let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
		fs::write(path, contents).with_context(|| format!("Failed to write config '{}'", path.display()))
	}

	#[must_use]
	pub fn mode_flags(&self) -> ModeFlags {
		let mut modes = ModeFlags::empty();
		modes.set(ModeFlags::DOUBLE_PAGE, self.double_page);
		modes.set(ModeFlags::SEAMLESS, self.seamless);
		modes.set(ModeFlags::MANGA, self.manga);
		modes.set(ModeFlags::RANDOM, self.random);
		modes
	}

	#[must_use]
	pub fn navigation_state<H>(&self) -> NavigationState<H> {
		NavigationState::with_modes(self.mode_flags(), self.skip_step)
	}
}

#[cfg(test)]
mod tests {
	use std::{
		path::PathBuf,
		time::{SystemTime, UNIX_EPOCH},
	};

	use super::*;

	fn unique_temp_path(name: &str) -> PathBuf {
		let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
		std::env::temp_dir().join(format!("comica_config_{nanos}")).join(name)
	}

	#[test]
	fn missing_file_yields_defaults() {
		let config = Config::load(&unique_temp_path("absent.toml")).expect("defaults");
		assert_eq!(config, Config::default());
	}

	#[test]
	fn partial_file_fills_remaining_defaults() {
		let config: Config = toml::from_str("seamless = true\nskip_step = 5\n").expect("parse");
		assert!(config.seamless);
		assert_eq!(config.skip_step, 5);
		assert!(!config.double_page);
		assert_eq!(config.window_width, Config::default().window_width);
	}

	#[test]
	fn unknown_keys_are_tolerated() {
		let config: Config = toml::from_str("seamless = true\nfuture_option = 42\n").expect("parse");
		assert!(config.seamless);
		assert_eq!(config.skip_step, Config::default().skip_step);
	}

	#[test]
	fn save_creates_parent_directories() {
		let path = unique_temp_path("nested/config.toml");
		let config = Config { manga: true, ..Config::default() };
		config.save(&path).expect("save config");
		let loaded = Config::load(&path).expect("load config");
		assert!(loaded.manga);
	}

	#[test]
	fn mode_flags_mirror_the_booleans() {
		let config = Config { double_page: true, random: true, ..Config::default() };
		let modes = config.mode_flags();
		assert!(modes.contains(ModeFlags::DOUBLE_PAGE));
		assert!(modes.contains(ModeFlags::RANDOM));
		assert!(!modes.contains(ModeFlags::SEAMLESS));
	}

	#[test]
	fn navigation_state_seeds_modes_and_skip_step() {
		let config = Config { seamless: true, skip_step: 3, ..Config::default() };
		let state: NavigationState<u32> = config.navigation_state();
		assert!(state.seamless());
		assert_eq!(state.skip_step(), 3);
		assert!(!state.is_loaded());
	}
}
