//! Printable AprilTag calibration boards
//!
//! [`TagBoardLayout`] turns board parameters and a [`CodeTable`] into fill
//! calls on a [`Surface`]. [`ImageSurface`] renders them to a raster and
//! [`RecordingSurface`] records them for inspection.

pub mod decorations;
pub mod error;
pub mod layout;
pub mod raster;
pub mod surface;
pub mod tag_codes;

pub use error::{BoardError, Result};
pub use layout::{BoardGeometry, TagBoardLayout, TagPlacement};
pub use raster::ImageSurface;
pub use surface::{with_saved, DrawCommand, Rect, RecordingSurface, Surface};
pub use tag_codes::{CodeTable, StaticCodeTable, Tag36h11, TagCode};
pub use tagboard_common::{BoardConfig, Color, Palette};
