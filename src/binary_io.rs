//! Byte-order-aware primitive I/O over in-memory buffers.
//!
//! Readers and writers carry a selectable [`ByteOrder`] (little-endian by
//! default, matching the 3DS) and the 4-bit "nibble" packing state used by
//! the sub-byte pixel formats.

use std::io::{self, Cursor, Read};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ByteOrder {
    #[default]
    LittleEndian,
    BigEndian,
}

fn eof(what: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("End of buffer reached, not enough bytes for {}", what),
    )
}

/// Cursor over a byte slice with endian-aware integer reads.
pub struct BinaryReader<'a> {
    cursor: Cursor<&'a [u8]>,
    byte_order: ByteOrder,
    // Buffered byte for nibble reads; low nibble is handed out first.
    nibble: Option<u8>,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8], byte_order: ByteOrder) -> Self {
        BinaryReader {
            cursor: Cursor::new(data),
            byte_order,
            nibble: None,
        }
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    pub fn len(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.position() >= self.len()
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.cursor.read_exact(&mut buf).map_err(|_| eof("u8"))?;
        Ok(buf[0])
    }

    pub fn read_u16(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.cursor.read_exact(&mut buf).map_err(|_| eof("u16"))?;
        Ok(match self.byte_order {
            ByteOrder::LittleEndian => u16::from_le_bytes(buf),
            ByteOrder::BigEndian => u16::from_be_bytes(buf),
        })
    }

    pub fn read_u32(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.cursor.read_exact(&mut buf).map_err(|_| eof("u32"))?;
        Ok(match self.byte_order {
            ByteOrder::LittleEndian => u32::from_le_bytes(buf),
            ByteOrder::BigEndian => u32::from_be_bytes(buf),
        })
    }

    pub fn read_u64(&mut self) -> io::Result<u64> {
        let mut buf = [0u8; 8];
        self.cursor.read_exact(&mut buf).map_err(|_| eof("u64"))?;
        Ok(match self.byte_order {
            ByteOrder::LittleEndian => u64::from_le_bytes(buf),
            ByteOrder::BigEndian => u64::from_be_bytes(buf),
        })
    }

    pub fn read_bytes(&mut self, length: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; length];
        self.cursor
            .read_exact(&mut buf)
            .map_err(|_| eof("read_bytes"))?;
        Ok(buf)
    }

    /// Reads a 4-bit value. The first call on a byte returns its low nibble
    /// and buffers the high one for the next call.
    pub fn read_nibble(&mut self) -> io::Result<u8> {
        match self.nibble.take() {
            Some(high) => Ok(high),
            None => {
                let byte = self.read_u8()?;
                self.nibble = Some(byte >> 4);
                Ok(byte & 0xF)
            }
        }
    }
}

/// Growable byte buffer with endian-aware integer writes.
pub struct BinaryWriter {
    data: Vec<u8>,
    byte_order: ByteOrder,
    // First half of a nibble pair, waiting for its partner.
    nibble: Option<u8>,
}

impl BinaryWriter {
    pub fn new(byte_order: ByteOrder) -> Self {
        BinaryWriter {
            data: Vec::new(),
            byte_order,
            nibble: None,
        }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.data.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        match self.byte_order {
            ByteOrder::LittleEndian => self.data.extend_from_slice(&value.to_le_bytes()),
            ByteOrder::BigEndian => self.data.extend_from_slice(&value.to_be_bytes()),
        }
    }

    pub fn write_u32(&mut self, value: u32) {
        match self.byte_order {
            ByteOrder::LittleEndian => self.data.extend_from_slice(&value.to_le_bytes()),
            ByteOrder::BigEndian => self.data.extend_from_slice(&value.to_be_bytes()),
        }
    }

    pub fn write_u64(&mut self, value: u64) {
        match self.byte_order {
            ByteOrder::LittleEndian => self.data.extend_from_slice(&value.to_le_bytes()),
            ByteOrder::BigEndian => self.data.extend_from_slice(&value.to_be_bytes()),
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Writes a 4-bit value. The first of each pair is buffered; the second
    /// flushes a combined `first + 16 * second` byte. Callers must pair
    /// their nibble writes: an unpaired trailing nibble is dropped when the
    /// writer is consumed.
    pub fn write_nibble(&mut self, value: u8) {
        let value = value & 0xF;
        match self.nibble.take() {
            None => self.nibble = Some(value),
            Some(first) => self.data.push(first + 16 * value),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

/// Fixed-layout record, serialized field by field in declaration order with
/// the reader/writer's byte order applied to every multi-byte field.
pub trait Record: Sized {
    fn read_from(reader: &mut BinaryReader) -> io::Result<Self>;
    fn write_to(&self, writer: &mut BinaryWriter);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_honour_byte_order() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut le = BinaryReader::new(&data, ByteOrder::LittleEndian);
        assert_eq!(le.read_u32().unwrap(), 0x04030201);
        let mut be = BinaryReader::new(&data, ByteOrder::BigEndian);
        assert_eq!(be.read_u32().unwrap(), 0x01020304);
    }

    #[test]
    fn writes_honour_byte_order() {
        let mut le = BinaryWriter::new(ByteOrder::LittleEndian);
        le.write_u16(0x1234);
        assert_eq!(le.into_bytes(), vec![0x34, 0x12]);

        let mut be = BinaryWriter::new(ByteOrder::BigEndian);
        be.write_u16(0x1234);
        assert_eq!(be.into_bytes(), vec![0x12, 0x34]);
    }

    #[test]
    fn read_past_end_is_unexpected_eof() {
        let data = [0x01];
        let mut reader = BinaryReader::new(&data, ByteOrder::LittleEndian);
        let err = reader.read_u32().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn nibble_reads_low_then_high() {
        let data = [0xA3, 0x5C];
        let mut reader = BinaryReader::new(&data, ByteOrder::LittleEndian);
        assert_eq!(reader.read_nibble().unwrap(), 0x3);
        assert_eq!(reader.read_nibble().unwrap(), 0xA);
        assert_eq!(reader.read_nibble().unwrap(), 0xC);
        assert_eq!(reader.read_nibble().unwrap(), 0x5);
    }

    #[test]
    fn nibble_writes_pack_in_pairs() {
        let mut writer = BinaryWriter::new(ByteOrder::LittleEndian);
        writer.write_nibble(0x3);
        writer.write_nibble(0xA);
        writer.write_nibble(0xC);
        writer.write_nibble(0x5);
        assert_eq!(writer.into_bytes(), vec![0xA3, 0x5C]);
    }

    #[test]
    fn trailing_nibble_is_dropped() {
        let mut writer = BinaryWriter::new(ByteOrder::LittleEndian);
        writer.write_nibble(0x1);
        writer.write_nibble(0x2);
        writer.write_nibble(0x3);
        assert_eq!(writer.into_bytes(), vec![0x21]);
    }
}
