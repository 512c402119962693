//! Subcommand handlers for config actions.

use std::path::Path;

use super::args::ConfigAction;
use crate::config::{default_path, Config, ConfigError, DEFAULT_CONFIG_TEMPLATE};

/// Handle a config subcommand.
///
/// `config` is the effective configuration (file, environment and flags
/// already applied); `path` is the file it was read from, if given.
pub fn handle_config_action(
    action: ConfigAction,
    config: &Config,
    path: Option<&Path>,
) -> Result<(), ConfigError> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!("  Upload endpoint: {}", config.upload.endpoint);
            match config.upload.timeout_secs {
                Some(secs) => println!("  Upload timeout: {}s", secs),
                None => println!("  Upload timeout: none"),
            }
            println!("  JPEG quality: {}", config.capture.jpeg_quality);
            println!(
                "  Preview: {} ({} columns, {} charset{})",
                if config.preview.enabled { "on" } else { "off" },
                config.preview.columns,
                config.preview.charset.name(),
                if config.preview.invert { ", inverted" } else { "" }
            );
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            Ok(())
        }
        ConfigAction::Init => init_config(&config_path),
    }
}

/// Write the default config file, refusing to overwrite an existing one.
pub fn init_config(config_path: &Path) -> Result<(), ConfigError> {
    let io_error = |source| ConfigError::IoError {
        path: config_path.to_path_buf(),
        source,
    };

    if config_path.exists() {
        return Err(io_error(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "config file already exists",
        )));
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(config_path, DEFAULT_CONFIG_TEMPLATE).map_err(io_error)?;

    println!("Created config file: {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        init_config(&path).unwrap();
        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[capture]\njpeg_quality = 70\n").unwrap();

        assert!(matches!(
            init_config(&path),
            Err(ConfigError::IoError { .. })
        ));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[capture]\njpeg_quality = 70\n"
        );
    }
}
