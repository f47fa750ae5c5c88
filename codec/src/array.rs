//! Shared decoding for array-layout block bodies.

use wire::{ElementKind, ARRAY_HEAD_SIZE};

use crate::angle::{decode_angle, encode_angle};
use crate::error::{CodecError, CodecResult, ModelFault};
use crate::types::{Point, Rgba};

/// A fixed-size array element.
pub(crate) trait Element: Sized + Copy {
    const KIND: ElementKind;

    /// Reads one element from exactly `KIND.size()` bytes.
    fn read(bytes: &[u8]) -> Self;

    fn write(self, out: &mut Vec<u8>);
}

impl Element for u8 {
    const KIND: ElementKind = ElementKind::Byte;

    fn read(bytes: &[u8]) -> Self {
        bytes[0]
    }

    fn write(self, out: &mut Vec<u8>) {
        out.push(self);
    }
}

impl Element for u16 {
    const KIND: ElementKind = ElementKind::Word;

    fn read(bytes: &[u8]) -> Self {
        Self::from_le_bytes([bytes[0], bytes[1]])
    }

    fn write(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl Element for i16 {
    const KIND: ElementKind = ElementKind::Word;

    fn read(bytes: &[u8]) -> Self {
        decode_angle(u16::read(bytes))
    }

    fn write(self, out: &mut Vec<u8>) {
        encode_angle(self).write(out);
    }
}

impl Element for Point {
    const KIND: ElementKind = ElementKind::Point;

    fn read(bytes: &[u8]) -> Self {
        Self::new(
            i16::from_le_bytes([bytes[0], bytes[1]]),
            i16::from_le_bytes([bytes[2], bytes[3]]),
        )
    }

    fn write(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.x.to_le_bytes());
        out.extend_from_slice(&self.y.to_le_bytes());
    }
}

impl Element for Rgba {
    const KIND: ElementKind = ElementKind::Quad;

    fn read(bytes: &[u8]) -> Self {
        Self {
            r: bytes[0],
            g: bytes[1],
            b: bytes[2],
            a: bytes[3],
        }
    }

    fn write(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.r, self.g, self.b, self.a]);
    }
}

/// A decoded array body.
#[derive(Debug)]
pub(crate) struct ArrayBody<T> {
    pub values: Vec<T>,
    /// The pad byte, present when the element bytes are odd.
    pub pad: Option<u8>,
}

pub(crate) fn decode_array<T: Element>(tag: u16, body: &[u8]) -> CodecResult<ArrayBody<T>> {
    if body.len() < ARRAY_HEAD_SIZE {
        return Err(CodecError::BodyLength {
            tag,
            expected: ARRAY_HEAD_SIZE,
            actual: body.len(),
        });
    }
    let kind = u16::from_le_bytes([body[0], body[1]]);
    let count = u16::from_le_bytes([body[2], body[3]]);
    if kind != T::KIND.raw() {
        return Err(CodecError::ElementKindMismatch {
            tag,
            expected: T::KIND,
            found: kind,
        });
    }

    let size = T::KIND.size();
    let data = &body[ARRAY_HEAD_SIZE..];
    let data_len = usize::from(count) * size;
    if data.len() < data_len {
        return Err(CodecError::ElementCountMismatch {
            tag,
            count,
            available: data.len() / size,
        });
    }
    let expected = wire::array_body_len(T::KIND, usize::from(count));
    if body.len() != expected {
        return Err(CodecError::BodyLength {
            tag,
            expected,
            actual: body.len(),
        });
    }

    let values = data[..data_len].chunks_exact(size).map(T::read).collect();
    let pad = data.get(data_len).copied();
    Ok(ArrayBody { values, pad })
}

pub(crate) fn encode_array<T: Element>(
    tag: u16,
    values: &[T],
    pad: u8,
    out: &mut Vec<u8>,
) -> CodecResult<()> {
    let count = u16::try_from(values.len()).map_err(|_| ModelFault::TooLong {
        tag,
        len: values.len(),
    })?;
    out.extend_from_slice(&T::KIND.raw().to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    for value in values {
        value.write(out);
    }
    if (values.len() * T::KIND.size()) % 2 == 1 {
        out.push(pad);
    }
    Ok(())
}
