//! Compact binary form
//!
//! Little-endian integers, `u32` length-prefixed UTF-8 strings, a presence
//! byte in front of optional strings and a `u32` count in front of lists.
//! Field names are not stored; the declared field order is the format.

use std::io::Write;

use super::ObjectReadWriter;
use crate::error::SchemaError;

/// Upper bound on a single string or list length, guards against corrupt input
const MAX_LENGTH: usize = 1 << 30;

/// Writer half of the binary form
pub struct BinaryWriter<W: Write> {
    inner: W,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn write_len(&mut self, len: usize) -> Result<(), SchemaError> {
        let len = u32::try_from(len)
            .map_err(|_| SchemaError::serialization(format!("length {} exceeds u32", len)))?;
        self.inner.write_all(&len.to_le_bytes())?;
        Ok(())
    }
}

impl<W: Write> ObjectReadWriter for BinaryWriter<W> {
    fn is_reading(&self) -> bool {
        false
    }

    fn read_write_u8(&mut self, _name: &str, value: &mut u8) -> Result<(), SchemaError> {
        self.inner.write_all(&[*value])?;
        Ok(())
    }

    fn read_write_i32(&mut self, _name: &str, value: &mut i32) -> Result<(), SchemaError> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    fn read_write_i64(&mut self, _name: &str, value: &mut i64) -> Result<(), SchemaError> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    fn read_write_bool(&mut self, _name: &str, value: &mut bool) -> Result<(), SchemaError> {
        self.inner.write_all(&[u8::from(*value)])?;
        Ok(())
    }

    fn read_write_string(&mut self, _name: &str, value: &mut String) -> Result<(), SchemaError> {
        self.write_len(value.len())?;
        self.inner.write_all(value.as_bytes())?;
        Ok(())
    }

    fn read_write_string_opt(
        &mut self,
        name: &str,
        value: &mut Option<String>,
    ) -> Result<(), SchemaError> {
        match value {
            Some(s) => {
                self.inner.write_all(&[1])?;
                self.read_write_string(name, s)
            }
            None => {
                self.inner.write_all(&[0])?;
                Ok(())
            }
        }
    }

    fn begin_object(&mut self, _name: &str) -> Result<(), SchemaError> {
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), SchemaError> {
        Ok(())
    }

    fn begin_list(&mut self, _name: &str, len: usize) -> Result<usize, SchemaError> {
        self.write_len(len)?;
        Ok(len)
    }

    fn end_list(&mut self) -> Result<(), SchemaError> {
        Ok(())
    }
}

/// Reader half of the binary form, over an in-memory buffer
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Fail if unread bytes remain
    pub fn finish(&self) -> Result<(), SchemaError> {
        if self.pos != self.data.len() {
            return Err(SchemaError::serialization(format!(
                "{} trailing bytes after catalog",
                self.data.len() - self.pos
            )));
        }
        Ok(())
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, count: usize, field: &str) -> Result<&'a [u8], SchemaError> {
        let end = self
            .pos
            .checked_add(count)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                SchemaError::serialization(format!(
                    "unexpected end of data reading {} at offset {}",
                    field, self.pos
                ))
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self, field: &str) -> Result<[u8; N], SchemaError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N, field)?);
        Ok(buf)
    }

    fn read_len(&mut self, field: &str) -> Result<usize, SchemaError> {
        let len = u32::from_le_bytes(self.take_array::<4>(field)?) as usize;
        if len > MAX_LENGTH {
            return Err(SchemaError::serialization(format!(
                "length {} of {} exceeds limit",
                len, field
            )));
        }
        Ok(len)
    }
}

impl ObjectReadWriter for BinaryReader<'_> {
    fn is_reading(&self) -> bool {
        true
    }

    fn read_write_u8(&mut self, name: &str, value: &mut u8) -> Result<(), SchemaError> {
        *value = self.take_array::<1>(name)?[0];
        Ok(())
    }

    fn read_write_i32(&mut self, name: &str, value: &mut i32) -> Result<(), SchemaError> {
        *value = i32::from_le_bytes(self.take_array::<4>(name)?);
        Ok(())
    }

    fn read_write_i64(&mut self, name: &str, value: &mut i64) -> Result<(), SchemaError> {
        *value = i64::from_le_bytes(self.take_array::<8>(name)?);
        Ok(())
    }

    fn read_write_bool(&mut self, name: &str, value: &mut bool) -> Result<(), SchemaError> {
        *value = match self.take_array::<1>(name)?[0] {
            0 => false,
            1 => true,
            other => {
                return Err(SchemaError::serialization(format!(
                    "invalid bool byte {} for {}",
                    other, name
                )))
            }
        };
        Ok(())
    }

    fn read_write_string(&mut self, name: &str, value: &mut String) -> Result<(), SchemaError> {
        let len = self.read_len(name)?;
        let bytes = self.take(len, name)?;
        *value = std::str::from_utf8(bytes)
            .map_err(|e| SchemaError::serialization(format!("{} is not UTF-8: {}", name, e)))?
            .to_string();
        Ok(())
    }

    fn read_write_string_opt(
        &mut self,
        name: &str,
        value: &mut Option<String>,
    ) -> Result<(), SchemaError> {
        let mut present = false;
        self.read_write_bool(name, &mut present)?;
        *value = if present {
            let mut s = String::new();
            self.read_write_string(name, &mut s)?;
            Some(s)
        } else {
            None
        };
        Ok(())
    }

    fn begin_object(&mut self, _name: &str) -> Result<(), SchemaError> {
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), SchemaError> {
        Ok(())
    }

    fn begin_list(&mut self, name: &str, _len: usize) -> Result<usize, SchemaError> {
        let count = self.read_len(name)?;
        // Every item holds at least its version byte.
        if count > self.remaining() {
            return Err(SchemaError::serialization(format!(
                "{} declares {} items but only {} bytes remain",
                name,
                count,
                self.remaining()
            )));
        }
        Ok(count)
    }

    fn end_list(&mut self) -> Result<(), SchemaError> {
        Ok(())
    }
}
