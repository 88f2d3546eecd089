//! Little-endian readers for serialized Unity object data

use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

/// Primitive reads used by object layouts, with short reads mapped to
/// [`Error::UnexpectedEof`].
pub trait AssetReadExt: Read {
    fn read_i32_le(&mut self) -> Result<i32> {
        self.read_i32::<LittleEndian>().map_err(Error::from_read)
    }

    fn read_i64_le(&mut self) -> Result<i64> {
        self.read_i64::<LittleEndian>().map_err(Error::from_read)
    }

    fn read_f32_le(&mut self) -> Result<f32> {
        self.read_f32::<LittleEndian>().map_err(Error::from_read)
    }

    fn read_bool_u8(&mut self) -> Result<bool> {
        Ok(self.read_u8().map_err(Error::from_read)? != 0)
    }

    /// Read exactly `len` bytes as UTF-8.
    fn read_utf8(&mut self, len: usize) -> Result<String> {
        let mut bytes = Vec::new();
        // take() keeps a corrupt length from allocating the whole claim up front
        Read::take(&mut *self, len as u64)
            .read_to_end(&mut bytes)
            .map_err(Error::from_read)?;
        if bytes.len() != len {
            return Err(Error::UnexpectedEof);
        }
        Ok(String::from_utf8(bytes)?)
    }

    /// Read an `i32` length followed by that many UTF-8 bytes.
    fn read_count_string(&mut self) -> Result<String> {
        let len = self.read_i32_le()?;
        let len = usize::try_from(len).map_err(|_| Error::InvalidCount(i64::from(len)))?;
        self.read_utf8(len)
    }
}

impl<R: Read + ?Sized> AssetReadExt for R {}

/// Advance the stream position to the next 4-byte boundary.
pub fn align4<S: Seek + ?Sized>(stream: &mut S) -> Result<()> {
    let pos = stream.stream_position()?;
    let pad = (4 - pos % 4) % 4;
    if pad != 0 {
        stream.seek(SeekFrom::Current(pad as i64))?;
    }
    Ok(())
}

/// Skip `count` bytes forward.
pub fn skip<S: Seek + ?Sized>(stream: &mut S, count: u64) -> Result<()> {
    let offset = i64::try_from(count).map_err(|_| Error::InvalidCount(i64::MAX))?;
    stream.seek(SeekFrom::Current(offset))?;
    Ok(())
}
