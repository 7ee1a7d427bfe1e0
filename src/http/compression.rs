//! Response compression module
//!
//! Picks a content coding from `Accept-Encoding` and compresses buffered
//! bodies with `flate2`.

use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use std::io::{self, Write};

/// Content coding applied to a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Identity,
    Gzip,
    Deflate,
}

impl Encoding {
    /// Value for the `Content-Encoding` header; `None` for identity
    pub const fn header_value(self) -> Option<&'static str> {
        match self {
            Self::Identity => None,
            Self::Gzip => Some("gzip"),
            Self::Deflate => Some("deflate"),
        }
    }
}

/// Choose the encoding advertised by the client
///
/// Tokens are compared case-insensitively. A coding with `q=0` is refused
/// and skipped; other weights are ignored. gzip wins over deflate whatever
/// the order in the header.
pub fn choose(accept_encoding: Option<&str>) -> Encoding {
    let Some(header) = accept_encoding else {
        return Encoding::Identity;
    };

    let mut deflate = false;
    for token in header.split(',') {
        let mut params = token.split(';');
        let coding = params.next().unwrap_or_default().trim();
        if params.any(is_zero_weight) {
            continue;
        }
        if coding.eq_ignore_ascii_case("gzip") || coding.eq_ignore_ascii_case("x-gzip") {
            return Encoding::Gzip;
        }
        deflate |= coding.eq_ignore_ascii_case("deflate");
    }

    if deflate {
        Encoding::Deflate
    } else {
        Encoding::Identity
    }
}

/// Whether a parameter is `q=0` (also `q=0.0`, `q=0.000`)
fn is_zero_weight(param: &str) -> bool {
    let Some((name, value)) = param.split_once('=') else {
        return false;
    };
    name.trim().eq_ignore_ascii_case("q")
        && value.trim().parse::<f32>().is_ok_and(|q| q == 0.0)
}

/// Run a buffered body through the chosen encoder
pub fn compress(data: &[u8], encoding: Encoding) -> io::Result<Vec<u8>> {
    match encoding {
        Encoding::Identity => Ok(data.to_vec()),
        Encoding::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data)?;
            encoder.finish()
        }
        // HTTP "deflate" is the zlib container (RFC 9110 §8.4.1.2)
        Encoding::Deflate => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data)?;
            encoder.finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::{GzDecoder, ZlibDecoder};
    use std::io::Read;

    #[test]
    fn test_choose_gzip_over_deflate() {
        assert_eq!(choose(Some("gzip, deflate")), Encoding::Gzip);
        assert_eq!(choose(Some("deflate, gzip")), Encoding::Gzip);
        assert_eq!(choose(Some("GZIP")), Encoding::Gzip);
    }

    #[test]
    fn test_choose_deflate_only() {
        assert_eq!(choose(Some("deflate;q=0.5, br")), Encoding::Deflate);
    }

    #[test]
    fn test_choose_skips_refused_codings() {
        assert_eq!(choose(Some("gzip;q=0, deflate")), Encoding::Deflate);
        assert_eq!(choose(Some("gzip; q=0.0, deflate;q=0")), Encoding::Identity);
        assert_eq!(choose(Some("gzip;q=0.5, deflate")), Encoding::Gzip);
    }

    #[test]
    fn test_choose_identity() {
        assert_eq!(choose(None), Encoding::Identity);
        assert_eq!(choose(Some("br, zstd")), Encoding::Identity);
        assert_eq!(choose(Some("")), Encoding::Identity);
    }

    #[test]
    fn test_header_value() {
        assert_eq!(Encoding::Identity.header_value(), None);
        assert_eq!(Encoding::Gzip.header_value(), Some("gzip"));
        assert_eq!(Encoding::Deflate.header_value(), Some("deflate"));
    }

    #[test]
    fn test_compress_identity() {
        let data = b"Hello, World!";
        assert_eq!(compress(data, Encoding::Identity).unwrap(), data);
    }

    #[test]
    fn test_compress_gzip_decodes_to_original() {
        let data = b"Hello, World! This is a test string for compression.".repeat(8);
        let compressed = compress(&data, Encoding::Gzip).unwrap();
        assert_eq!(&compressed[0..2], &[0x1f, 0x8b]);

        let mut decoded = Vec::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_compress_deflate_decodes_to_original() {
        let data = vec![b'A'; 10_000];
        let compressed = compress(&data, Encoding::Deflate).unwrap();
        assert!(compressed.len() < data.len());

        let mut decoded = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, data);
    }
}
