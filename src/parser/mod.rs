//! Parsers turning gallery payloads into raw ad dictionaries.
//!
//! Both parsers emit `serde_json::Value` objects in the shape the domain layer
//! consumes (`adLibraryUrl`, `regionStats`, `targeting`, `variations`, ...), so
//! HTML scraping and structured payloads share one normalization path.

pub mod api_payload;
pub mod gallery_html;

pub use api_payload::ApiPayloadParser;
pub use gallery_html::GalleryHtmlParser;

use crate::error::Result;
use serde_json::Value;

/// A raw ad dictionary as produced by a parser.
pub type RawAd = Value;

/// Turns a source body (HTML or JSON bytes) into raw ad dictionaries.
pub trait Parser: Send + Sync {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<RawAd>>;
}
