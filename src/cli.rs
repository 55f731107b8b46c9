// ============================================================================
// PixelScribe startup configuration — command-line flags and environment
// ============================================================================
//
// Usage examples:
//   pixelscribe                                  (64×64 grid, 8px cells)
//   pixelscribe --width 32 --height 16 --cell-size 16
//   LOG_LEVEL=debug pixelscribe --log-stderr

use clap::Parser;

use crate::error::PixelError;
use crate::logger::Level;
use crate::session::SessionConfig;

/// PixelScribe pixel-art editor.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "pixelscribe", about = "PixelScribe pixel-art editor")]
pub struct CliArgs {
    /// Canvas width in grid cells.
    #[arg(long, default_value_t = 64, value_name = "CELLS")]
    pub width: u32,

    /// Canvas height in grid cells.
    #[arg(long, default_value_t = 64, value_name = "CELLS")]
    pub height: u32,

    /// Display pixels per grid cell at 1× zoom.
    #[arg(long, default_value_t = 8, value_name = "PX")]
    pub cell_size: u32,

    /// Log level: trace, debug, info, warn, error.
    #[arg(long, env = "LOG_LEVEL", default_value = "info", value_name = "LEVEL")]
    pub log_level: String,

    /// Mirror session log lines to stderr.
    #[arg(long)]
    pub log_stderr: bool,
}

impl CliArgs {
    /// Validated canvas geometry.
    pub fn session_config(&self) -> Result<SessionConfig, PixelError> {
        let config = SessionConfig {
            width: self.width,
            height: self.height,
            cell_pixel_size: self.cell_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parsed log level.  Unknown names fall back to INFO.
    pub fn level(&self) -> Level {
        self.log_level.parse().unwrap_or_default()
    }
}
