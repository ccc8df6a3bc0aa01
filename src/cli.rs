//! Command line interface for Panoview

use clap::Parser;
use std::fmt;
use std::path::Path;

use crate::config::ViewerConfig;
use crate::states::ControlMode;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

/// CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Configuration file could not be loaded
    ConfigLoad(String),
    /// Configuration could not be printed
    ConfigPrint(String),
    /// Configuration could not be written
    ConfigSave(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ConfigLoad(msg) => write!(f, "Failed to load configuration: {msg}"),
            CliError::ConfigPrint(msg) => write!(f, "Failed to print configuration: {msg}"),
            CliError::ConfigSave(msg) => write!(f, "Failed to save configuration: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Panoview - 360° panorama viewer
#[derive(Parser, Debug, Default)]
#[command(version = VERSION, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Equirectangular image to show, relative to the asset directory (overrides config file)
    #[arg(short, long, value_name = "PATH")]
    pub image: Option<String>,

    /// Camera control mode to start in (overrides config file)
    #[arg(short, long, value_enum, value_name = "MODE")]
    pub mode: Option<ControlMode>,

    /// Start in fullscreen
    #[arg(short, long)]
    pub fullscreen: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Write the effective configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<String>,
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<ViewerConfig, CliError> {
    let mut config = if let Some(config_path) = &args.config {
        println!("Loading configuration from: {config_path}");
        let path = Path::new(config_path);
        if !path.exists() {
            return Err(CliError::ConfigLoad(format!("{config_path} does not exist")));
        }
        ViewerConfig::load_layered(Some(path))
            .map_err(|err| CliError::ConfigLoad(err.to_string()))?
    } else {
        ViewerConfig::load_from_user_config()
    };

    if let Some(image) = &args.image {
        println!("Showing panorama: {image}");
        config.panorama.image_path = image.clone();
    }

    if let Some(mode) = args.mode {
        println!("Starting in {} mode", mode.label());
        config.controls.initial_mode = mode;
    }

    if args.fullscreen {
        config.window.start_fullscreen = true;
    }

    Ok(config)
}

/// Handles the --print-config flag
pub fn handle_print_config(config: &ViewerConfig) -> Result<(), CliError> {
    let toml = config
        .to_toml()
        .map_err(|err| CliError::ConfigPrint(err.to_string()))?;
    println!("{toml}");
    Ok(())
}

/// Handles the --save-config flag
pub fn handle_save_config(config: &ViewerConfig, path: &str) -> Result<(), CliError> {
    config
        .save(Path::new(path))
        .map_err(|err| CliError::ConfigSave(err.to_string()))?;
    println!("Configuration saved to: {path}");
    Ok(())
}
