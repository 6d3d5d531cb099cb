// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::layout::Endian;

/// Bounds-checked cursor over a TPM-marshalled buffer.  Reads never go
/// past the end of the underlying slice.
pub(crate) struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn bytes(&mut self, n: usize, what: &str) -> Result<&'a [u8], Error> {
        if self.remaining() < n {
            return Err(Error::TruncatedInput(format!(
                "{what}: expecting {n} bytes, got {}",
                self.remaining()
            )));
        }

        let buf: &'a [u8] = self.buf;
        let v = &buf[self.pos..self.pos + n];
        self.pos += n;

        Ok(v)
    }

    pub fn u16(&mut self, order: Endian, what: &str) -> Result<u16, Error> {
        let b = self.bytes(2, what)?;
        Ok(order.read_u16([b[0], b[1]]))
    }

    pub fn u32_be(&mut self, what: &str) -> Result<u32, Error> {
        let b = self.bytes(4, what)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a TPM2B-style buffer: a u16 size followed by that many bytes
    pub fn sized(&mut self, order: Endian, what: &str) -> Result<&'a [u8], Error> {
        let n = self.u16(order, &format!("{what} size"))?;
        self.bytes(n as usize, what)
    }

    /// Fail if anything is left unread
    pub fn finish(&self, what: &str) -> Result<(), Error> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(Error::TrailingData(format!(
                "{what}: {n} unexpected byte(s) at offset {}",
                self.pos
            ))),
        }
    }
}

/// Append a TPM2B-style buffer: a u16 size followed by the bytes
pub(crate) fn put_sized(
    out: &mut Vec<u8>,
    order: Endian,
    v: &[u8],
    what: &str,
) -> Result<(), Error> {
    let n = u16::try_from(v.len()).map_err(|_| {
        Error::Oversized(format!("{what}: {} bytes do not fit a u16 size", v.len()))
    })?;

    out.extend_from_slice(&order.write_u16(n));
    out.extend_from_slice(v);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sized_ok() {
        let buf = [0x00, 0x02, 0xaa, 0xbb];
        let mut r = WireReader::new(&buf);

        assert_eq!(r.sized(Endian::Big, "x").unwrap(), &[0xaa, 0xbb]);
        assert!(r.finish("x").is_ok());
    }

    #[test]
    fn sized_truncated() {
        let buf = [0x00, 0x03, 0xaa, 0xbb];
        let mut r = WireReader::new(&buf);

        let e = r.sized(Endian::Big, "x").unwrap_err();
        assert!(matches!(e, Error::TruncatedInput(_)));
    }

    #[test]
    fn short_prefix() {
        let mut r = WireReader::new(&[0x00]);

        assert!(matches!(
            r.u16(Endian::Little, "x"),
            Err(Error::TruncatedInput(_))
        ));
        assert!(matches!(r.u32_be("y"), Err(Error::TruncatedInput(_))));
    }

    #[test]
    fn put_sized_oversized() {
        let mut out = vec![];
        let big = vec![0u8; 0x10000];

        assert!(matches!(
            put_sized(&mut out, Endian::Big, &big, "x"),
            Err(Error::Oversized(_))
        ));
    }

    #[test]
    fn leftover() {
        let mut r = WireReader::new(&[0x01, 0x02, 0x03]);
        r.u16(Endian::Big, "x").unwrap();

        assert!(matches!(r.finish("x"), Err(Error::TrailingData(_))));
    }
}
