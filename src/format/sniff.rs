//! Byte-signature sniffing for fetched payloads.
//!
//! Classifies an untrusted byte buffer into one of the supported image
//! formats by inspecting a fixed-length prefix for magic numbers:
//!
//! - **JPEG**: `FF D8`
//! - **PNG**: the 8-byte PNG signature
//! - **WEBP**: `RIFF` at offset 0 and `WEBP` at offset 8
//! - **AVIF**: ISO-BMFF `ftyp` box with an AVIF major or compatible brand
//!
//! Signature inspection takes precedence over the transport's declared
//! content-type. The declared type is consulted only when the buffer is
//! too short for the signature checks to be conclusive; it never
//! overrides a definitive match, and a definitive non-match on a
//! full-length prefix returns `None` regardless of what the transport
//! claimed.

use super::ImageFormat;

/// Prefix length needed for all signature checks to be conclusive.
///
/// WEBP and AVIF both need 12 bytes; JPEG and PNG need fewer. A buffer
/// shorter than this cannot definitively rule out every format.
pub const SNIFF_PREFIX_LEN: usize = 12;

/// 8-byte PNG file signature.
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Brands that identify an ISO-BMFF container as AVIF.
const AVIF_BRANDS: [&[u8; 4]; 2] = [b"avif", b"avis"];

/// How far into the `ftyp` box to scan for compatible brands.
const MAX_FTYP_SCAN: usize = 64;

/// Classify a byte buffer into a supported image format.
///
/// # Arguments
/// * `bytes` - The fetched payload (only a short prefix is inspected)
/// * `declared_content_type` - Optional `Content-Type` from the transport
///
/// # Returns
/// The matching format, or `None` when the bytes match no known
/// signature. `None` is not an error; it signals "pass the bytes through
/// unmodified."
pub fn detect_format(bytes: &[u8], declared_content_type: Option<&str>) -> Option<ImageFormat> {
    if let Some(format) = match_signature(bytes) {
        return Some(format);
    }

    // Tie-break: a short buffer cannot rule every signature out, so fall
    // back to whatever the transport declared. A full-length prefix that
    // matched nothing is a definitive non-match.
    if bytes.len() < SNIFF_PREFIX_LEN {
        return declared_content_type.and_then(ImageFormat::from_content_type);
    }

    None
}

/// Check the buffer prefix against all known signatures.
fn match_signature(bytes: &[u8]) -> Option<ImageFormat> {
    if is_jpeg(bytes) {
        Some(ImageFormat::Jpeg)
    } else if is_png(bytes) {
        Some(ImageFormat::Png)
    } else if is_webp(bytes) {
        Some(ImageFormat::Webp)
    } else if is_avif(bytes) {
        Some(ImageFormat::Avif)
    } else {
        None
    }
}

fn is_jpeg(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xD8
}

fn is_png(bytes: &[u8]) -> bool {
    bytes.len() >= PNG_SIGNATURE.len() && bytes[..PNG_SIGNATURE.len()] == PNG_SIGNATURE
}

fn is_webp(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP"
}

/// Check for an ISO-BMFF `ftyp` box carrying an AVIF brand.
///
/// The major brand sits at offset 8. When the major brand is something
/// generic (e.g. `mif1`), the compatible brand list that follows the
/// minor version is scanned for an AVIF brand instead.
fn is_avif(bytes: &[u8]) -> bool {
    if bytes.len() < 12 || &bytes[4..8] != b"ftyp" {
        return false;
    }

    let major = &bytes[8..12];
    if AVIF_BRANDS.iter().any(|brand| major == *brand) {
        return true;
    }

    // Compatible brands start after the 4-byte minor version at offset 12,
    // i.e. at offset 16, and run to the end of the ftyp box.
    let box_size = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    let scan_end = box_size.min(bytes.len()).min(MAX_FTYP_SCAN);

    let mut offset = 16;
    while offset + 4 <= scan_end {
        let brand = &bytes[offset..offset + 4];
        if AVIF_BRANDS.iter().any(|known| brand == *known) {
            return true;
        }
        offset += 4;
    }

    false
}

// =============================================================================
// Tests
// =============================================================================
