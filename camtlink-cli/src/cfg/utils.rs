//! Utilities to locate the configuration.

use clap::crate_name;
use dirs_next::{config_dir, home_dir};
use std::path::PathBuf;

/// Name of the directory holding the configuration, derived from the package name
fn app_dir_name() -> String {
    crate_name!()
        .trim_end_matches("_cli")
        .to_lowercase()
}

pub(crate) fn get_config_dir() -> Option<PathBuf> {
    // get config from within $XDG_CONFIG_HOME
    match config_dir() {
        Some(mut dir) => {
            dir.push(app_dir_name());

            Some(dir)
        }
        // if not set, make it the default $HOME/.config
        None => home_dir().map(|mut dir| {
            dir.push(".config");
            dir.push(app_dir_name());

            dir
        }),
    }
}

/// Check multiple locations for a configuration file and return the highest priority one
pub fn get_config_path() -> PathBuf {
    match get_config_dir() {
        Some(mut cfg_path) => {
            cfg_path.push("config.toml");
            match cfg_path.exists() {
                true => cfg_path,
                false => PathBuf::from("config.toml"),
            }
        }
        None => PathBuf::from("config.toml"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_name() {
        assert_eq!("camtlink", app_dir_name());
    }

    #[test]
    fn config_dir_ends_with_app_name() {
        if let Some(dir) = get_config_dir() {
            assert!(dir.ends_with("camtlink"));
        }
    }

    #[test]
    fn config_file_name() {
        assert!(get_config_path().ends_with("config.toml"));
    }
}
