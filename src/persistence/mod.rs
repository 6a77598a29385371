//! Snapshot persistence and image export
//!
//! Snapshot wire format (version 1, little-endian):
//!
//! ```text
//! magic   [u8; 4]  = b"CHSL"
//! version u16      = 1
//! height  u32
//! width   u32
//! pixels  [u8; height * width * 4]   row-major RGBA, bottom-left origin
//! ```
//!
//! The payload is the raster's exact byte layout, so save -> load is
//! bit-exact. All writes go to a tmp sibling first and rename into place:
//! an I/O failure never leaves a partial file at the final path.

use std::fs;
use std::path::Path;

use crate::ChiselError;
use crate::sim::raster::Boulder;

pub const SNAPSHOT_MAGIC: [u8; 4] = *b"CHSL";
pub const SNAPSHOT_VERSION: u16 = 1;

const HEADER_LEN: usize = 4 + 2 + 4 + 4;

/// Serialize a boulder into the snapshot wire format.
pub fn encode_snapshot(boulder: &Boulder) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + boulder.raw_pixels().len());
    out.extend_from_slice(&SNAPSHOT_MAGIC);
    out.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
    out.extend_from_slice(&(boulder.height() as u32).to_le_bytes());
    out.extend_from_slice(&(boulder.width() as u32).to_le_bytes());
    out.extend_from_slice(boulder.raw_pixels());
    out
}

/// Deserialize a snapshot blob. Any structural mismatch (magic, version,
/// shape, truncation, trailing bytes) is a `SnapshotFormat` error.
pub fn decode_snapshot(bytes: &[u8]) -> Result<Boulder, ChiselError> {
    if bytes.len() < HEADER_LEN {
        return Err(ChiselError::SnapshotFormat(format!(
            "blob is {} bytes, shorter than the {HEADER_LEN}-byte header",
            bytes.len()
        )));
    }
    if bytes[0..4] != SNAPSHOT_MAGIC {
        return Err(ChiselError::SnapshotFormat("bad magic".into()));
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != SNAPSHOT_VERSION {
        return Err(ChiselError::SnapshotFormat(format!(
            "unsupported snapshot version {version} (expected {SNAPSHOT_VERSION})"
        )));
    }
    let height = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]) as usize;
    let width = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]) as usize;

    let payload = &bytes[HEADER_LEN..];
    let expected = height
        .checked_mul(width)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| ChiselError::SnapshotFormat("dimensions overflow".into()))?;
    if payload.len() != expected {
        return Err(ChiselError::SnapshotFormat(format!(
            "payload is {} bytes, expected {expected} for {width}x{height} RGBA",
            payload.len()
        )));
    }
    Boulder::from_raw(width, height, payload.to_vec())
}

/// Serialize the boulder to a snapshot file. Returns bytes written.
pub fn save_snapshot<P: AsRef<Path>>(path: P, boulder: &Boulder) -> Result<u64, ChiselError> {
    let bytes = encode_snapshot(boulder);
    write_atomic(path.as_ref(), &bytes)?;
    log::info!(
        "saved {}x{} snapshot ({} bytes)",
        boulder.width(),
        boulder.height(),
        bytes.len()
    );
    Ok(bytes.len() as u64)
}

/// Read a snapshot file into a fresh boulder. Touches no session state;
/// callers swap the result in only on success.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Boulder, ChiselError> {
    let bytes = fs::read(path)?;
    decode_snapshot(&bytes)
}

/// Render the visible composition to a PNG file.
pub fn export_png<P: AsRef<Path>>(
    path: P,
    boulder: &Boulder,
    transparent_background: bool,
) -> Result<(), ChiselError> {
    let img = boulder.composite(transparent_background);
    // Encode to memory first so filename problems surface as our own I/O
    // error and a bad encode never creates a file at all
    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)?;
    write_atomic(path.as_ref(), &buf)?;
    log::info!("exported {} bytes of PNG", buf.len());
    Ok(())
}

/// Write via a tmp sibling + rename so the final path never holds a partial
/// file.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ChiselError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    if let Err(err) = fs::write(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    Ok(())
}
