// CLI module for argument parsing and configuration

use crate::domain::DeleteMode;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// PicCull - cull the images of a directory from the terminal
///
/// Step through the pictures in a folder and move the ones you don't want
/// into a pic-culled/ folder next to them, or delete them outright.
#[derive(Parser, Debug, Clone)]
#[command(name = "piccull")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory of images to load
    ///
    /// If not specified, PicCull starts with the load-directory prompt.
    pub directory: Option<PathBuf>,

    /// Delete culled images instead of moving them to pic-culled/
    ///
    /// Applies to this run only. The saved preference is left alone.
    #[arg(short = 'd', long = "delete", action = ArgAction::SetTrue)]
    pub delete: bool,

    /// Send deleted images to the system trash instead of removing them
    #[arg(long = "trash", action = ArgAction::SetTrue)]
    pub trash: bool,

    /// Skip the confirmation dialog before a permanent delete
    #[arg(short = 'y', long = "yes", action = ArgAction::SetTrue)]
    pub yes: bool,

    /// Show the welcome screen even if it has been seen before
    #[arg(long = "welcome", action = ArgAction::SetTrue)]
    pub welcome: bool,

    /// Write the log to this file instead of the cache directory
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if let Some(dir) = &self.directory {
            if !dir.exists() {
                return Err(format!("Directory does not exist: {}", dir.display()));
            }

            if !dir.is_dir() {
                return Err(format!("Path is not a directory: {}", dir.display()));
            }
        }

        Ok(())
    }

    pub fn delete_mode(&self) -> DeleteMode {
        if self.trash {
            DeleteMode::Trash
        } else {
            DeleteMode::Permanent
        }
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub directory: Option<PathBuf>,
    pub delete_on_cull: bool,
    pub delete_mode: DeleteMode,
    pub skip_confirm: bool,
    pub show_welcome: bool,
    pub log_file: Option<PathBuf>,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            delete_mode: args.delete_mode(),
            directory: args.directory,
            delete_on_cull: args.delete,
            skip_confirm: args.yes,
            show_welcome: args.welcome,
            log_file: args.log_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    mod args_tests {
        use super::*;

        #[test]
        fn test_args_default_values() {
            let args = parse(&["piccull"]);

            assert!(args.directory.is_none());
            assert!(!args.delete);
            assert!(!args.trash);
            assert!(!args.yes);
            assert!(!args.welcome);
            assert!(args.log_file.is_none());
            assert_eq!(args.delete_mode(), DeleteMode::Permanent);
        }

        #[test]
        fn test_args_all_flags() {
            let args = parse(&[
                "piccull",
                "/photos",
                "-d",
                "--trash",
                "-y",
                "--welcome",
                "--log-file",
                "/tmp/piccull.log",
            ]);

            assert_eq!(args.directory, Some(PathBuf::from("/photos")));
            assert!(args.delete);
            assert!(args.yes);
            assert!(args.welcome);
            assert_eq!(args.log_file, Some(PathBuf::from("/tmp/piccull.log")));
            assert_eq!(args.delete_mode(), DeleteMode::Trash);
        }

        #[test]
        fn test_args_long_flags() {
            let args = parse(&["piccull", "--delete", "--yes"]);
            assert!(args.delete);
            assert!(args.yes);
        }

        #[test]
        fn test_args_unknown_flag() {
            assert!(Args::try_parse_from(["piccull", "--sort", "name"]).is_err());
        }

        #[test]
        fn test_args_validate_no_directory() {
            assert!(parse(&["piccull"]).validate().is_ok());
        }

        #[test]
        fn test_args_validate_nonexistent_directory() {
            let args = parse(&["piccull", "/nonexistent/path/12345"]);

            let result = args.validate();
            assert!(result.is_err());
            assert!(result.unwrap_err().contains("does not exist"));
        }

        #[test]
        fn test_args_validate_file_instead_of_directory() {
            let temp_dir = tempfile::TempDir::new().unwrap();
            let file = temp_dir.path().join("a.jpg");
            std::fs::write(&file, b"x").unwrap();
            let args = parse(&["piccull", file.to_str().unwrap()]);

            let result = args.validate();
            assert!(result.unwrap_err().contains("not a directory"));
        }

        #[test]
        fn test_args_validate_success() {
            let temp_dir = tempfile::TempDir::new().unwrap();
            let args = parse(&["piccull", temp_dir.path().to_str().unwrap()]);
            assert!(args.validate().is_ok());
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_app_config_from_args() {
            let args = parse(&["piccull", "/test/path", "--delete", "--trash", "--yes"]);

            let config: AppConfig = args.into();

            assert_eq!(config.directory, Some(PathBuf::from("/test/path")));
            assert!(config.delete_on_cull);
            assert_eq!(config.delete_mode, DeleteMode::Trash);
            assert!(config.skip_confirm);
            assert!(!config.show_welcome);
        }

        #[test]
        fn test_app_config_default() {
            let config = AppConfig::default();

            assert!(config.directory.is_none());
            assert!(!config.delete_on_cull);
            assert_eq!(config.delete_mode, DeleteMode::Permanent);
            assert!(!config.skip_confirm);
            assert!(!config.show_welcome);
            assert!(config.log_file.is_none());
        }
    }
}
