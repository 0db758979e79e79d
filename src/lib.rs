//! Profile editor for a small "About Me" card: three text fields that can
//! be edited one at a time and shared as a QR code.

mod errors;

pub mod editor;
pub mod link;
pub mod overlay;
pub mod payload;
pub mod profile;
pub mod qr;

pub use editor::{FieldRow, ProfileEditor, RowDisplay};
pub use errors::{AboutError, Result};
pub use link::{is_valid_link, link_target};
pub use overlay::{ShareCard, ShareOverlay};
pub use payload::{deserialize, serialize, Payload};
pub use profile::{Field, Profile};
pub use qr::{render, render_with, Correction, QrBitmap, QrOptions};
