//! Block framing and payload assembly.

use crate::error::{DecodeError, EncodeError, LimitKind, WireResult};
use crate::header::{decode_header, encode_header, u16_at, PayloadHeader, HEADER_SIZE};
use crate::limits::Limits;
use crate::registry::{BlockRegistry, BlockRule, ElementKind, Layout, Section};

/// Size of a block tag in bytes.
pub const TAG_SIZE: usize = 2;

/// Size of the `kind:u16, count:u16` head of an array body.
pub const ARRAY_HEAD_SIZE: usize = 4;

/// A framed block within a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireBlock<'a> {
    pub tag: u16,
    /// Section the block was framed in.
    pub section: Section,
    /// Offset of the tag within the framed buffer.
    pub offset: usize,
    pub body: &'a [u8],
}

impl WireBlock<'_> {
    /// Bytes the block occupies including its tag.
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        TAG_SIZE + self.body.len()
    }
}

/// A decoded payload: header plus framed blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirePayload<'a> {
    pub header: PayloadHeader,
    pub blocks: Vec<WireBlock<'a>>,
}

/// Body length of an array block with `count` elements of `kind`.
#[must_use]
pub const fn array_body_len(kind: ElementKind, count: usize) -> usize {
    let data = count * kind.size();
    ARRAY_HEAD_SIZE + data + data % 2
}

fn check_payload_len(buf: &[u8], limits: &Limits) -> WireResult<()> {
    if buf.len() > limits.max_payload_bytes {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::PayloadBytes,
            limit: limits.max_payload_bytes,
            actual: buf.len(),
        });
    }
    Ok(())
}

/// Decodes a payload into its header and framed blocks.
///
/// Block offsets are relative to the start of `buf`, so they include the
/// header. Header length fields are not checked.
pub fn read_payload<'a>(
    buf: &'a [u8],
    registry: &BlockRegistry,
    limits: &Limits,
) -> WireResult<WirePayload<'a>> {
    check_payload_len(buf, limits)?;
    let (header, _) = decode_header(buf)?;
    let blocks = frame_from(buf, HEADER_SIZE, registry, limits)?;
    Ok(WirePayload { header, blocks })
}

/// Splits a block sequence (no header) into framed blocks.
///
/// Consumes the whole input; trailing bytes that do not form a block are an
/// error.
pub fn frame<'a>(
    bytes: &'a [u8],
    registry: &BlockRegistry,
    limits: &Limits,
) -> WireResult<Vec<WireBlock<'a>>> {
    check_payload_len(bytes, limits)?;
    frame_from(bytes, 0, registry, limits)
}

fn frame_from<'a>(
    buf: &'a [u8],
    start: usize,
    registry: &BlockRegistry,
    limits: &Limits,
) -> WireResult<Vec<WireBlock<'a>>> {
    let mut offset = start;
    let mut section = Section::Objects;
    let mut blocks = Vec::new();

    while offset < buf.len() {
        if blocks.len() >= limits.max_blocks {
            return Err(DecodeError::LimitsExceeded {
                kind: LimitKind::BlockCount,
                limit: limits.max_blocks,
                actual: blocks.len() + 1,
            });
        }

        let tag = u16_at(buf, offset).ok_or(DecodeError::TruncatedTag { offset })?;
        let rule = registry
            .lookup(section, tag)
            .ok_or(DecodeError::UnknownBlockTag {
                tag,
                section,
                offset,
            })?;
        let body_start = offset + TAG_SIZE;
        let end = body_start + body_len(rule, buf, offset, limits)?;
        if end > buf.len() {
            return Err(DecodeError::TruncatedBlock {
                tag,
                offset,
                needed: end,
                available: buf.len(),
            });
        }

        section = rule.section;
        blocks.push(WireBlock {
            tag,
            section,
            offset,
            body: &buf[body_start..end],
        });
        offset = end;
    }

    Ok(blocks)
}

fn body_len(rule: &BlockRule, buf: &[u8], offset: usize, limits: &Limits) -> WireResult<usize> {
    let body_start = offset + TAG_SIZE;
    let truncated = |needed| DecodeError::TruncatedBlock {
        tag: rule.tag,
        offset,
        needed,
        available: buf.len(),
    };

    match rule.layout {
        Layout::Fixed(len) => Ok(len),
        Layout::LengthPrefixed => {
            let len = u16_at(buf, body_start).ok_or_else(|| truncated(body_start + 2))?;
            Ok(2 + usize::from(len))
        }
        Layout::Array => {
            let head_end = body_start + ARRAY_HEAD_SIZE;
            let raw_kind = u16_at(buf, body_start).ok_or_else(|| truncated(head_end))?;
            let count = u16_at(buf, body_start + 2).ok_or_else(|| truncated(head_end))?;
            let kind = ElementKind::from_raw(raw_kind).ok_or(DecodeError::UnknownElementKind {
                tag: rule.tag,
                kind: raw_kind,
                offset,
            })?;
            let count = usize::from(count);
            if count > limits.max_array_len {
                return Err(DecodeError::LimitsExceeded {
                    kind: LimitKind::ArrayLength,
                    limit: limits.max_array_len,
                    actual: count,
                });
            }
            Ok(array_body_len(kind, count))
        }
    }
}

/// Appends one block (tag then body) to `out`.
pub fn write_block(tag: u16, body: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(body);
}

/// Concatenates blocks back into a block sequence.
///
/// The inverse of [`frame`] for any sequence it produced.
#[must_use]
pub fn unframe(blocks: &[WireBlock<'_>]) -> Vec<u8> {
    let mut out = Vec::with_capacity(blocks.iter().map(WireBlock::encoded_len).sum());
    for block in blocks {
        write_block(block.tag, block.body, &mut out);
    }
    out
}

/// Builds a payload block by block.
///
/// The header's length fields are filled in by [`finish`](Self::finish);
/// every other header field is written as given.
#[derive(Debug)]
pub struct PayloadWriter {
    header: PayloadHeader,
    buf: Vec<u8>,
}

impl PayloadWriter {
    #[must_use]
    pub fn new(header: PayloadHeader) -> Self {
        Self {
            header,
            buf: vec![0; HEADER_SIZE],
        }
    }

    /// Appends one block.
    pub fn push_block(&mut self, tag: u16, body: &[u8]) {
        write_block(tag, body, &mut self.buf);
    }

    /// Bytes written so far, header included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.len() == HEADER_SIZE
    }

    /// Writes the header and returns the finished payload.
    pub fn finish(mut self) -> Result<Vec<u8>, EncodeError> {
        let header = self.header.with_lengths(self.buf.len())?;
        encode_header(&header, &mut self.buf)?;
        Ok(self.buf)
    }
}

/// Encodes a header and block sequence into a payload.
///
/// Length fields are recomputed from the result.
pub fn write_payload(header: &PayloadHeader, blocks: &[WireBlock<'_>]) -> Result<Vec<u8>, EncodeError> {
    let mut writer = PayloadWriter::new(*header);
    for block in blocks {
        writer.push_block(block.tag, block.body);
    }
    writer.finish()
}
