//! Container file type detection

use crate::error::Result;
use byteorder::{BigEndian, ReadBytesExt};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Smallest file that can carry either header.
const MIN_HEADER_LEN: u64 = 0x20;
/// Format version from which the engine version string moved to 0x30.
const FORMAT_WIDE_HEADER: i32 = 0x16;
const MAX_VERSION_LEN: usize = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedFileType {
    Unknown,
    AssetsFile,
    BundleFile,
}

impl fmt::Display for DetectedFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DetectedFileType::Unknown => "unknown",
            DetectedFileType::AssetsFile => "serialized assets file",
            DetectedFileType::BundleFile => "UnityFS bundle",
        };
        f.write_str(label)
    }
}

/// Detect the type of the file at `path`.
///
/// # Errors
/// Returns an error if the file cannot be opened or read.
pub fn detect_file_type_path<P: AsRef<Path>>(path: P) -> Result<DetectedFileType> {
    let mut reader = BufReader::new(File::open(path)?);
    detect_file_type(&mut reader, 0)
}

/// Detect the container type of the data starting at `start`.
///
/// # Errors
/// Returns an error on IO failure; short or unrecognised data is `Unknown`.
pub fn detect_file_type<R: Read + Seek>(reader: &mut R, start: u64) -> Result<DetectedFileType> {
    let len = reader.seek(SeekFrom::End(0))?;
    if len < MIN_HEADER_LEN {
        return Ok(DetectedFileType::Unknown);
    }

    reader.seek(SeekFrom::Start(start))?;
    let mut signature = [0u8; 7];
    reader.read_exact(&mut signature)?;
    if &signature == b"UnityFS" {
        return Ok(DetectedFileType::BundleFile);
    }

    reader.seek(SeekFrom::Start(start + 0x08))?;
    let format = reader.read_i32::<BigEndian>()?;

    let version_offset = if format >= FORMAT_WIDE_HEADER { 0x30 } else { 0x14 };
    reader.seek(SeekFrom::Start(start + version_offset))?;
    let version = read_version_string(reader)?;

    let printable = version
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'\n'));

    if format < 0xFF && printable && version.len() >= 5 {
        Ok(DetectedFileType::AssetsFile)
    } else {
        Ok(DetectedFileType::Unknown)
    }
}

/// Raw version bytes up to the terminator, capped one past `MAX_VERSION_LEN`.
fn read_version_string<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut version = Vec::new();
    for byte in reader.bytes() {
        let byte = byte?;
        if byte == 0 {
            break;
        }
        version.push(byte);
        if version.len() > MAX_VERSION_LEN {
            break;
        }
    }
    Ok(version)
}
