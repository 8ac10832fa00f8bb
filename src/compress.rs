//! Gzip compression for response bodies.

use std::io::{self, Write};

use flate2::write::GzEncoder;
use flate2::Compression;

/// Content coding token for gzip.
pub const GZIP: &str = "gzip";

/// Compress `data` into a complete gzip stream.
pub fn gzip(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Whether an `Accept-Encoding` value lists `gzip` as one of its tokens.
///
/// Tokens are compared exactly after trimming, so `gzip;q=0.5` or `x-gzip`
/// do not count.
pub fn accepts_gzip(accept_encoding: &str) -> bool {
    accept_encoding.split(',').any(|token| token.trim() == GZIP)
}
