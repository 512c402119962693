//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

/// Capture a still from the camera, caption it and post it
#[derive(Parser, Debug)]
#[command(name = "snapcap")]
#[command(version, about = "Capture, caption and upload camera stills", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Upload endpoint (overrides config and SNAPCAP_UPLOAD_URL)
    #[arg(long, short)]
    pub endpoint: Option<String>,

    /// JPEG quality for captured stills (1-100)
    #[arg(long, short, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Don't print the ASCII preview after a capture
    #[arg(long)]
    pub no_preview: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Create default config file
    Init,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(endpoint) = &self.endpoint {
            config.upload.endpoint = endpoint.clone();
        }
        if let Some(quality) = self.quality {
            config.capture.jpeg_quality = quality;
        }
        if self.no_preview {
            config.preview.enabled = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["snapcap"]);
        assert!(args.command.is_none());
        assert!(args.config.is_none());
        assert!(args.endpoint.is_none());
        assert!(args.quality.is_none());
        assert!(!args.no_preview);
    }

    #[test]
    fn test_args_overrides_apply() {
        let args = Args::parse_from([
            "snapcap",
            "--endpoint",
            "https://photos.example.com/upload",
            "-q",
            "90",
            "--no-preview",
        ]);
        let mut config = Config::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.upload.endpoint, "https://photos.example.com/upload");
        assert_eq!(config.capture.jpeg_quality, 90);
        assert!(!config.preview.enabled);
    }

    #[test]
    fn test_args_quality_range() {
        assert!(Args::try_parse_from(["snapcap", "--quality", "0"]).is_err());
        assert!(Args::try_parse_from(["snapcap", "--quality", "101"]).is_err());
        assert!(Args::try_parse_from(["snapcap", "--quality", "100"]).is_ok());
    }

    #[test]
    fn test_args_config_subcommands() {
        let args = Args::parse_from(["snapcap", "config", "show"]);
        assert!(matches!(
            args.command,
            Some(Command::Config {
                action: ConfigAction::Show
            })
        ));

        let args = Args::parse_from(["snapcap", "-c", "/tmp/snapcap.toml", "config", "init"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/snapcap.toml")));
        assert!(matches!(
            args.command,
            Some(Command::Config {
                action: ConfigAction::Init
            })
        ));
    }
}
