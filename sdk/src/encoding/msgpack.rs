//! Strict MessagePack codec for [`Value`] trees.
//!
//! The writer always picks the shortest form for every integer and length
//! prefix and drops zero-valued map entries. The reader accepts exactly the
//! writer's output and nothing else, so `encode(decode(b)) == b` for every
//! `b` that decodes at all.

use std::collections::BTreeMap;

use super::value::Value;
use super::DecodeError;
use crate::config::MAX_DECODE_DEPTH;

// Format markers used by the canonical subset.
const NIL: u8 = 0xc0;
const FALSE: u8 = 0xc2;
const TRUE: u8 = 0xc3;
const BIN8: u8 = 0xc4;
const BIN16: u8 = 0xc5;
const BIN32: u8 = 0xc6;
const UINT8: u8 = 0xcc;
const UINT16: u8 = 0xcd;
const UINT32: u8 = 0xce;
const UINT64: u8 = 0xcf;
const INT8: u8 = 0xd0;
const INT16: u8 = 0xd1;
const INT32: u8 = 0xd2;
const INT64: u8 = 0xd3;
const STR8: u8 = 0xd9;
const STR16: u8 = 0xda;
const STR32: u8 = 0xdb;
const ARRAY16: u8 = 0xdc;
const ARRAY32: u8 = 0xdd;
const MAP16: u8 = 0xde;
const MAP32: u8 = 0xdf;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encodes a value into its canonical bytes.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut out = Vec::with_capacity(128);
    encode_into(value, &mut out);
    out
}

/// Appends the canonical encoding of `value` to `out`.
pub fn encode_into(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Uint(n) => write_uint(*n, out),
        Value::Int(n) => {
            if *n >= 0 {
                write_uint(*n as u64, out);
            } else {
                write_negative(*n, out);
            }
        }
        Value::Bool(b) => out.push(if *b { TRUE } else { FALSE }),
        Value::Str(s) => {
            write_str_header(s.len(), out);
            out.extend_from_slice(s.as_bytes());
        }
        Value::Bytes(b) => {
            write_bin_header(b.len(), out);
            out.extend_from_slice(b);
        }
        Value::Array(items) => {
            write_container_header(items.len(), 0x90, ARRAY16, ARRAY32, out);
            for item in items {
                encode_into(item, out);
            }
        }
        Value::Map(entries) => {
            // BTreeMap iterates in ascending byte order of the key, which is
            // exactly the canonical key order.
            let kept: Vec<(&String, &Value)> =
                entries.iter().filter(|(_, v)| !v.is_zero()).collect();
            write_container_header(kept.len(), 0x80, MAP16, MAP32, out);
            for (key, item) in kept {
                write_str_header(key.len(), out);
                out.extend_from_slice(key.as_bytes());
                encode_into(item, out);
            }
        }
    }
}

fn write_uint(n: u64, out: &mut Vec<u8>) {
    if n < 0x80 {
        out.push(n as u8);
    } else if n <= u8::MAX as u64 {
        out.push(UINT8);
        out.push(n as u8);
    } else if n <= u16::MAX as u64 {
        out.push(UINT16);
        out.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= u32::MAX as u64 {
        out.push(UINT32);
        out.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        out.push(UINT64);
        out.extend_from_slice(&n.to_be_bytes());
    }
}

fn write_negative(n: i64, out: &mut Vec<u8>) {
    if n >= -32 {
        out.push(n as i8 as u8);
    } else if n >= i8::MIN as i64 {
        out.push(INT8);
        out.push(n as i8 as u8);
    } else if n >= i16::MIN as i64 {
        out.push(INT16);
        out.extend_from_slice(&(n as i16).to_be_bytes());
    } else if n >= i32::MIN as i64 {
        out.push(INT32);
        out.extend_from_slice(&(n as i32).to_be_bytes());
    } else {
        out.push(INT64);
        out.extend_from_slice(&n.to_be_bytes());
    }
}

fn write_str_header(len: usize, out: &mut Vec<u8>) {
    if len < 32 {
        out.push(0xa0 | len as u8);
    } else if len <= u8::MAX as usize {
        out.push(STR8);
        out.push(len as u8);
    } else if len <= u16::MAX as usize {
        out.push(STR16);
        out.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        out.push(STR32);
        out.extend_from_slice(&(len as u32).to_be_bytes());
    }
}

fn write_bin_header(len: usize, out: &mut Vec<u8>) {
    if len <= u8::MAX as usize {
        out.push(BIN8);
        out.push(len as u8);
    } else if len <= u16::MAX as usize {
        out.push(BIN16);
        out.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        out.push(BIN32);
        out.extend_from_slice(&(len as u32).to_be_bytes());
    }
}

fn write_container_header(len: usize, fix: u8, m16: u8, m32: u8, out: &mut Vec<u8>) {
    if len < 16 {
        out.push(fix | len as u8);
    } else if len <= u16::MAX as usize {
        out.push(m16);
        out.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        out.push(m32);
        out.extend_from_slice(&(len as u32).to_be_bytes());
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decodes exactly one canonical value occupying all of `bytes`.
pub fn decode(bytes: &[u8]) -> Result<Value, DecodeError> {
    let mut reader = Reader { bytes, pos: 0 };
    let value = reader.value(0)?;
    if reader.pos != bytes.len() {
        return Err(DecodeError::TrailingBytes {
            count: bytes.len() - reader.pos,
        });
    }
    Ok(value)
}

/// Decodes a concatenation of canonical values, as used when several signed
/// transactions are submitted in one payload. Empty input gives no values.
pub fn decode_concatenated(bytes: &[u8]) -> Result<Vec<Value>, DecodeError> {
    let mut reader = Reader { bytes, pos: 0 };
    let mut values = Vec::new();
    while reader.pos < bytes.len() {
        values.push(reader.value(0)?);
    }
    Ok(values)
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(DecodeError::Truncated { offset: self.pos })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn be<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn non_canonical(&self, offset: usize, reason: &'static str) -> DecodeError {
        DecodeError::NonCanonical { offset, reason }
    }

    fn value(&mut self, depth: usize) -> Result<Value, DecodeError> {
        if depth > MAX_DECODE_DEPTH {
            return Err(DecodeError::DepthExceeded {
                max: MAX_DECODE_DEPTH,
            });
        }
        let start = self.pos;
        let marker = self.u8()?;
        match marker {
            0x00..=0x7f => Ok(Value::Uint(marker as u64)),
            0x80..=0x8f => self.map((marker & 0x0f) as usize, depth),
            0x90..=0x9f => self.array((marker & 0x0f) as usize, depth),
            0xa0..=0xbf => self.string((marker & 0x1f) as usize, start),
            0xe0..=0xff => Ok(Value::Int(marker as i8 as i64)),
            FALSE => Ok(Value::Bool(false)),
            TRUE => Ok(Value::Bool(true)),
            UINT8 => {
                let n = self.u8()? as u64;
                if n < 0x80 {
                    return Err(self.non_canonical(start, "uint8 below fixint range"));
                }
                Ok(Value::Uint(n))
            }
            UINT16 => {
                let n = u16::from_be_bytes(self.be()?) as u64;
                if n <= u8::MAX as u64 {
                    return Err(self.non_canonical(start, "uint16 fits in uint8"));
                }
                Ok(Value::Uint(n))
            }
            UINT32 => {
                let n = u32::from_be_bytes(self.be()?) as u64;
                if n <= u16::MAX as u64 {
                    return Err(self.non_canonical(start, "uint32 fits in uint16"));
                }
                Ok(Value::Uint(n))
            }
            UINT64 => {
                let n = u64::from_be_bytes(self.be()?);
                if n <= u32::MAX as u64 {
                    return Err(self.non_canonical(start, "uint64 fits in uint32"));
                }
                Ok(Value::Uint(n))
            }
            INT8 => {
                let n = self.u8()? as i8 as i64;
                if n >= -32 {
                    return Err(self.non_canonical(start, "int8 inside fixint range"));
                }
                Ok(Value::Int(n))
            }
            INT16 => {
                let n = i16::from_be_bytes(self.be()?) as i64;
                if n >= i8::MIN as i64 {
                    return Err(self.non_canonical(start, "int16 fits in a shorter form"));
                }
                Ok(Value::Int(n))
            }
            INT32 => {
                let n = i32::from_be_bytes(self.be()?) as i64;
                if n >= i16::MIN as i64 {
                    return Err(self.non_canonical(start, "int32 fits in a shorter form"));
                }
                Ok(Value::Int(n))
            }
            INT64 => {
                let n = i64::from_be_bytes(self.be()?);
                if n >= i32::MIN as i64 {
                    return Err(self.non_canonical(start, "int64 fits in a shorter form"));
                }
                Ok(Value::Int(n))
            }
            STR8 => {
                let len = self.u8()? as usize;
                if len < 32 {
                    return Err(self.non_canonical(start, "str8 below fixstr range"));
                }
                self.string(len, start)
            }
            STR16 => {
                let len = u16::from_be_bytes(self.be()?) as usize;
                if len <= u8::MAX as usize {
                    return Err(self.non_canonical(start, "str16 fits in str8"));
                }
                self.string(len, start)
            }
            STR32 => {
                let len = u32::from_be_bytes(self.be()?) as usize;
                if len <= u16::MAX as usize {
                    return Err(self.non_canonical(start, "str32 fits in str16"));
                }
                self.string(len, start)
            }
            BIN8 => {
                let len = self.u8()? as usize;
                Ok(Value::Bytes(self.take(len)?.to_vec()))
            }
            BIN16 => {
                let len = u16::from_be_bytes(self.be()?) as usize;
                if len <= u8::MAX as usize {
                    return Err(self.non_canonical(start, "bin16 fits in bin8"));
                }
                Ok(Value::Bytes(self.take(len)?.to_vec()))
            }
            BIN32 => {
                let len = u32::from_be_bytes(self.be()?) as usize;
                if len <= u16::MAX as usize {
                    return Err(self.non_canonical(start, "bin32 fits in bin16"));
                }
                Ok(Value::Bytes(self.take(len)?.to_vec()))
            }
            ARRAY16 => {
                let len = u16::from_be_bytes(self.be()?) as usize;
                if len < 16 {
                    return Err(self.non_canonical(start, "array16 below fixarray range"));
                }
                self.array(len, depth)
            }
            ARRAY32 => {
                let len = u32::from_be_bytes(self.be()?) as usize;
                if len <= u16::MAX as usize {
                    return Err(self.non_canonical(start, "array32 fits in array16"));
                }
                self.array(len, depth)
            }
            MAP16 => {
                let len = u16::from_be_bytes(self.be()?) as usize;
                if len < 16 {
                    return Err(self.non_canonical(start, "map16 below fixmap range"));
                }
                self.map(len, depth)
            }
            MAP32 => {
                let len = u32::from_be_bytes(self.be()?) as usize;
                if len <= u16::MAX as usize {
                    return Err(self.non_canonical(start, "map32 fits in map16"));
                }
                self.map(len, depth)
            }
            NIL | 0xc1 | 0xc7..=0xcb | 0xd4..=0xd8 => Err(DecodeError::UnsupportedMarker {
                marker,
                offset: start,
            }),
        }
    }

    fn string(&mut self, len: usize, start: usize) -> Result<Value, DecodeError> {
        let raw = self.take(len)?;
        let s = std::str::from_utf8(raw).map_err(|_| DecodeError::InvalidUtf8 { offset: start })?;
        Ok(Value::Str(s.to_owned()))
    }

    fn array(&mut self, len: usize, depth: usize) -> Result<Value, DecodeError> {
        // Every element takes at least one byte; refuse counts the input
        // cannot possibly back before allocating for them.
        if len > self.remaining() {
            return Err(DecodeError::Truncated { offset: self.pos });
        }
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(self.value(depth + 1)?);
        }
        Ok(Value::Array(items))
    }

    fn map(&mut self, len: usize, depth: usize) -> Result<Value, DecodeError> {
        if len.saturating_mul(2) > self.remaining() {
            return Err(DecodeError::Truncated { offset: self.pos });
        }
        let mut entries = BTreeMap::new();
        let mut previous: Option<String> = None;
        for _ in 0..len {
            let key_offset = self.pos;
            let key = match self.value(depth + 1)? {
                Value::Str(s) => s,
                _ => return Err(DecodeError::NonStringKey { offset: key_offset }),
            };
            if let Some(prev) = &previous {
                if key.as_bytes() <= prev.as_bytes() {
                    return Err(DecodeError::KeyOrder { key });
                }
            }
            let item = self.value(depth + 1)?;
            if item.is_zero() {
                return Err(DecodeError::ExplicitZero { key });
            }
            previous = Some(key.clone());
            entries.insert(key, item);
        }
        Ok(Value::Map(entries))
    }
}
