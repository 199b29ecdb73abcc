//! PDF rendering of bingo card sets using lopdf.
//!
//! [`CardRenderer`] lays out every page first ([`layout`]), then streams the
//! document through [`PdfWriter`]. Names are set in the standard Helvetica
//! faces, so no font files are embedded; photos are re-encoded as JPEG and
//! shared between pages.

pub mod error;
pub mod fonts;
pub mod layout;
pub mod options;
pub mod photo;
mod renderer;
mod writer;

pub use error::RenderError;
pub use layout::{orientation_for, FontScale, PageGeometry};
pub use options::RenderOptions;
pub use renderer::{render, CardRenderer};
pub use writer::PdfWriter;
