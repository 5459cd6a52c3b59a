//! Container format detection from leading bytes.

use crimp::prelude::*;

struct Signature {
    name: &'static str,
    /// Extra literals at fixed offsets that must also match.
    also: &'static [(usize, &'static [u8])],
    magic: &'static [u8],
}

const SIGNATURES: &[Signature] = &[
    Signature { name: "png", magic: b"\x89PNG\r\n\x1a\n", also: &[] },
    Signature { name: "gif", magic: b"GIF87a", also: &[] },
    Signature { name: "gif", magic: b"GIF89a", also: &[] },
    Signature { name: "jpeg", magic: b"\xFF\xD8\xFF", also: &[] },
    Signature { name: "tiff", magic: b"II*\x00", also: &[] },
    Signature { name: "tiff", magic: b"MM\x00*", also: &[] },
    Signature { name: "webp", magic: b"RIFF", also: &[(8, b"WEBP")] },
    Signature { name: "sun", magic: b"\x59\xA6\x6A\x95", also: &[] },
    Signature { name: "sgi", magic: b"\x01\xDA", also: &[] },
    Signature { name: "bmp", magic: b"BM", also: &[] },
];

/// Identify the format of `data`, if known.
pub fn sniff(data: &[u8]) -> Option<&'static str> {
    let mut cursor = ByteCursor::new(data);

    for signature in SIGNATURES {
        if matches_at(&mut cursor, 0, signature.magic)
            && signature
                .also
                .iter()
                .all(|&(offset, literal)| matches_at(&mut cursor, offset, literal))
        {
            return Some(signature.name);
        }
    }

    cursor.seek(0).ok()?;
    pnm(&cursor).or_else(|| pcx(&mut cursor).then_some("pcx"))
}

fn matches_at(cursor: &mut ByteCursor<'_>, offset: usize, literal: &[u8]) -> bool {
    cursor.seek(offset).is_ok() && cursor.match_literal(literal)
}

/// `P1`..`P6` followed by whitespace.
fn pnm(cursor: &ByteCursor<'_>) -> Option<&'static str> {
    let header = cursor.peek_bytes(3).ok()?;
    if header[0] != b'P' || !header[2].is_ascii_whitespace() {
        return None;
    }
    match header[1] {
        b'1' | b'4' => Some("pbm"),
        b'2' | b'5' => Some("pgm"),
        b'3' | b'6' => Some("ppm"),
        _ => None,
    }
}

/// Manufacturer byte, known version, RLE encoding, sane bit depth.
fn pcx(cursor: &mut ByteCursor<'_>) -> bool {
    cursor
        .rollback_on_error(|c| -> crimp::buffer::Result<bool> {
            if c.read_u8()? != 0x0A {
                return Ok(false);
            }
            let version = c.read_u8()?;
            let encoding = c.read_u8()?;
            let bits = c.read_u8()?;
            Ok(matches!(version, 0 | 2 | 3 | 4 | 5) && encoding == 1 && matches!(bits, 1 | 2 | 4 | 8))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_signatures() {
        assert_eq!(sniff(b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR"), Some("png"));
        assert_eq!(sniff(b"GIF89a\x01\x00"), Some("gif"));
        assert_eq!(sniff(b"\xFF\xD8\xFF\xE0"), Some("jpeg"));
        assert_eq!(sniff(b"MM\x00*\x00\x00\x00\x08"), Some("tiff"));
        assert_eq!(sniff(b"RIFF\x10\x00\x00\x00WEBPVP8 "), Some("webp"));
        assert_eq!(sniff(b"BM\x36\x00"), Some("bmp"));
        assert_eq!(sniff(b"P6\n3 2\n255\n"), Some("ppm"));
        assert_eq!(sniff(b"P5 1 1 255 "), Some("pgm"));
        assert_eq!(sniff(&[0x0A, 0x05, 0x01, 0x08, 0x00]), Some("pcx"));
    }

    #[test]
    fn test_secondary_literal_required() {
        assert_eq!(sniff(b"RIFF\x10\x00\x00\x00WAVEfmt "), None);
        assert_eq!(sniff(b"RIFF"), None);
    }

    #[test]
    fn test_unknown_and_truncated() {
        assert_eq!(sniff(b""), None);
        assert_eq!(sniff(b"\x89PN"), None);
        assert_eq!(sniff(b"P7\n"), None);
        assert_eq!(sniff(b"P6"), None);
        assert_eq!(sniff(&[0x0A, 0x05]), None);
        assert_eq!(sniff(&[0x0A, 0x01, 0x01, 0x08]), None);
        assert_eq!(sniff(b"hello world"), None);
    }
}
