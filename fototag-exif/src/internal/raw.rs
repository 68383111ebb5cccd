use std::io::{Cursor, Read, Seek, SeekFrom};

use crate::error::{Error, Result};

/// Endianness-aware reader over the raw Exif payload
#[derive(Debug)]
pub struct Raw {
    pub big_endian: bool,
    cursor: Cursor<Vec<u8>>,
}

impl Raw {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            big_endian: false,
            cursor: Cursor::new(data),
        }
    }

    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    pub fn position(&self) -> Result<u32> {
        self.cursor
            .position()
            .try_into()
            .map_err(|_| Error::OffsetTooLarge)
    }

    pub fn seek_start(&mut self, seek: u32) -> Result<()> {
        self.cursor.seek(SeekFrom::Start(seek.into()))?;

        Ok(())
    }

    pub fn read_exact<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes: [u8; N] = [0; N];
        self.cursor
            .read_exact(&mut bytes)
            .map_err(|_| Error::UnexpectedEof)?;
        Ok(bytes)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0; len];
        self.cursor
            .read_exact(&mut buf)
            .map_err(|_| Error::UnexpectedEof)?;
        Ok(buf)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_exact()?;
        Ok(if self.big_endian {
            u16::from_be_bytes(bytes)
        } else {
            u16::from_le_bytes(bytes)
        })
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_exact()?;
        Ok(if self.big_endian {
            u32::from_be_bytes(bytes)
        } else {
            u32::from_le_bytes(bytes)
        })
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.read_exact()?;
        Ok(if self.big_endian {
            i32::from_be_bytes(bytes)
        } else {
            i32::from_le_bytes(bytes)
        })
    }
}
