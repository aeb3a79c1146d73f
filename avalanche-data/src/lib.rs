// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Core data types for avalanche proofs: stakes, proofs, their canonical
//! wire encoding and identity derivation, and the signing-side builder.

pub mod amount;
pub mod builder;
pub mod encoding;
pub mod hash;
pub mod proof;
pub mod schnorr;
pub mod script;
pub mod stake;

use std::io::{self, Read, Write};

pub trait Serializable {
    fn write<W: Write>(&self, writer: &mut W) -> io::Result<()>;
    fn read<R: Read>(reader: &mut R) -> io::Result<Self>
    where
        Self: Sized;

    fn read_u8<R: Read>(r: &mut R) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        r.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_u32_le<R: Read>(r: &mut R) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        r.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_u64_le<R: Read>(r: &mut R) -> io::Result<u64> {
        let mut buf = [0u8; 8];
        r.read_exact(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    fn read_i64_le<R: Read>(r: &mut R) -> io::Result<i64> {
        let mut buf = [0u8; 8];
        r.read_exact(&mut buf)?;
        Ok(i64::from_le_bytes(buf))
    }

    fn read_bytes<R: Read, const N: usize>(r: &mut R) -> io::Result<[u8; N]> {
        let mut buf = [0u8; N];
        r.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Write a compact size prefix (1, 3, 5 or 9 bytes by magnitude).
    fn write_varint<W: Write>(w: &mut W, v: u64) -> io::Result<()> {
        if v < 0xfd {
            w.write_all(&[v as u8])?;
        } else if v <= 0xffff {
            w.write_all(&[0xfd])?;
            w.write_all(&(v as u16).to_le_bytes())?;
        } else if v <= 0xffff_ffff {
            w.write_all(&[0xfe])?;
            w.write_all(&(v as u32).to_le_bytes())?;
        } else {
            w.write_all(&[0xff])?;
            w.write_all(&v.to_le_bytes())?;
        }
        Ok(())
    }

    /// Read a compact size prefix. Non-minimal encodings are rejected so
    /// that every value has a single canonical representation.
    fn read_varint<R: Read>(r: &mut R) -> io::Result<u64> {
        let d = Self::read_u8(r)?;

        let v = match d {
            0xff => {
                let v = Self::read_u64_le(r)?;
                if v <= 0xffff_ffff {
                    return Err(non_canonical());
                }
                v
            }
            0xfe => {
                let v = Self::read_u32_le(r)?;
                if v <= 0xffff {
                    return Err(non_canonical());
                }
                u64::from(v)
            }
            0xfd => {
                let mut buf = [0u8; 2];
                r.read_exact(&mut buf)?;
                let v = u16::from_le_bytes(buf);
                if v < 0xfd {
                    return Err(non_canonical());
                }
                u64::from(v)
            }
            val => u64::from(val),
        };

        Ok(v)
    }

    /// Write a length-prefixed byte string.
    fn write_var_bytes<W: Write>(w: &mut W, buf: &[u8]) -> io::Result<()> {
        Self::write_varint(w, buf.len() as u64)?;
        w.write_all(buf)
    }

    /// Read a length-prefixed byte string of at most `max` bytes.
    fn read_var_bytes<R: Read>(r: &mut R, max: usize) -> io::Result<Vec<u8>> {
        let len = Self::read_varint(r)?;
        if len > max as u64 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("byte string of {len} exceeds {max}"),
            ));
        }

        let mut buf = vec![0u8; len as usize];
        r.read_exact(&mut buf)?;

        Ok(buf)
    }
}

fn non_canonical() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "non-canonical compact size")
}

/// Encode a byte array into a shortened HEX representation.
pub fn to_str<const N: usize>(bytes: &[u8; N]) -> String {
    let e = hex::encode(bytes);
    if e.len() != bytes.len() * 2 {
        return String::from("invalid hex");
    }

    const OFFSET: usize = 16;
    let (first, last) = e.split_at(OFFSET);
    let (_, second) = last.split_at(e.len() - 2 * OFFSET);
    first.to_owned() + "..." + second
}
