//! Binary PPM/PGM file I/O: the frame source and mask sink of the client.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use airkeys_vision::{Frame, Mask};

/// Reads a binary (P6, 8-bit) PPM frame.
pub fn read_ppm(path: &Path) -> Result<Frame> {
    let bytes = fs::read(path).with_context(|| format!("reading frame {}", path.display()))?;
    parse_ppm(&bytes).with_context(|| format!("parsing frame {}", path.display()))
}

/// Writes a frame as binary PPM.
pub fn write_ppm(path: &Path, frame: &Frame) -> Result<()> {
    let mut bytes = format!("P6\n{} {}\n255\n", frame.width(), frame.height()).into_bytes();
    bytes.extend_from_slice(&frame.data()[..frame.width() * frame.height() * 3]);
    fs::write(path, bytes).with_context(|| format!("writing frame {}", path.display()))
}

/// Writes a mask as binary PGM so segmentation output can be inspected
/// offline while tuning the thresholds.
pub fn write_pgm(path: &Path, mask: &Mask) -> Result<()> {
    let mut bytes = format!("P5\n{} {}\n255\n", mask.width(), mask.height()).into_bytes();
    bytes.extend_from_slice(&mask.data()[..mask.width() * mask.height()]);
    fs::write(path, bytes).with_context(|| format!("writing mask {}", path.display()))
}

fn parse_ppm(bytes: &[u8]) -> Result<Frame> {
    let mut cursor = 0usize;

    let magic = next_token(bytes, &mut cursor);
    if magic != Some(b"P6".as_slice()) {
        bail!("not a binary PPM (P6) file");
    }
    let width = parse_number(bytes, &mut cursor).context("bad width")?;
    let height = parse_number(bytes, &mut cursor).context("bad height")?;
    let maxval = parse_number(bytes, &mut cursor).context("bad maxval")?;
    if maxval != 255 {
        bail!("unsupported maxval {maxval}, only 8-bit frames are handled");
    }

    // A single whitespace byte separates the header from the raster.
    let start = cursor + 1;
    let needed = width * height * 3;
    if bytes.len() < start + needed {
        bail!("truncated pixel data");
    }
    Frame::from_rgb(width, height, bytes[start..start + needed].to_vec())
        .context("inconsistent frame dimensions")
}

/// The next whitespace-delimited header token, skipping `#` comments.
fn next_token<'a>(bytes: &'a [u8], cursor: &mut usize) -> Option<&'a [u8]> {
    loop {
        while *cursor < bytes.len() && bytes[*cursor].is_ascii_whitespace() {
            *cursor += 1;
        }
        if *cursor < bytes.len() && bytes[*cursor] == b'#' {
            while *cursor < bytes.len() && bytes[*cursor] != b'\n' {
                *cursor += 1;
            }
            continue;
        }
        break;
    }
    let start = *cursor;
    while *cursor < bytes.len() && !bytes[*cursor].is_ascii_whitespace() {
        *cursor += 1;
    }
    (*cursor > start).then(|| &bytes[start..*cursor])
}

fn parse_number(bytes: &[u8], cursor: &mut usize) -> Result<usize> {
    let token = next_token(bytes, cursor).context("unexpected end of header")?;
    std::str::from_utf8(token)?
        .parse()
        .context("not a number")
}

#[cfg(test)]
mod tests {
    use super::*;
    use airkeys_vision::Rgb;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("airkeys-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_ppm_round_trip() {
        let mut frame = Frame::new(3, 2);
        frame.set_rgb(1, 0, Rgb::new(10, 20, 30));
        frame.set_rgb(2, 1, Rgb::new(200, 100, 50));

        let path = temp_path("roundtrip.ppm");
        write_ppm(&path, &frame).unwrap();
        let read_back = read_ppm(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(read_back, frame);
    }

    #[test]
    fn test_parse_rejects_wrong_magic() {
        assert!(parse_ppm(b"P5\n2 2\n255\n____").is_err());
    }

    #[test]
    fn test_parse_rejects_truncated_raster() {
        assert!(parse_ppm(b"P6\n2 2\n255\n123").is_err());
    }

    #[test]
    fn test_parse_skips_comments() {
        let mut bytes = b"P6\n# a comment\n1 1\n255\n".to_vec();
        bytes.extend_from_slice(&[9, 8, 7]);
        let frame = parse_ppm(&bytes).unwrap();
        assert_eq!(frame.rgb_at(0, 0), Rgb::new(9, 8, 7));
    }

    #[test]
    fn test_pgm_mask_snapshot() {
        let mut mask = Mask::new(2, 2);
        mask.set(0, 1, true);
        let path = temp_path("mask.pgm");
        write_pgm(&path, &mask).unwrap();
        let bytes = fs::read(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(bytes.starts_with(b"P5\n2 2\n255\n"));
        assert_eq!(&bytes[bytes.len() - 4..], &[0, 0, 255, 0]);
    }
}
