//! PixelScribe — pixel-art raster engine.
//!
//! [`canvas::RasterBuffer`] is the pixel store, [`brush`] maps display-space
//! pointer positions onto grid cells, and [`session::EditorSession`] ties
//! them to the active tool and palette.  The window in the binary only
//! forwards normalised input and renders the buffer.

pub mod brush;
pub mod canvas;
pub mod cli;
pub mod components;
pub mod error;
pub mod logger;
pub mod session;

pub use canvas::RasterBuffer;
pub use error::PixelError;
pub use session::EditorSession;
