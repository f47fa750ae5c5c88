//! Inspection and debugging tools for strategy codes.
//!
//! This crate provides utilities for looking inside `[stgy:...]` tokens:
//!
//! - Decode and print the board (title, objects, positions, styles)
//! - Break a token down by stage and by block
//! - Hex dump the inflated payload
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to understand what the codec is doing.

use std::fmt::Write as _;

use codec::{
    inflate, Block, CodecResult, Container, DecodeOptions, ObjectKind, PayloadHeader, Strategy,
    Symbol,
};
use serde::Serialize;
use text::TextQuirks;
use wire::Section;

/// One framed block as seen by [`inspect_token`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockSummary {
    pub tag: u16,
    pub section: Section,
    /// Offset of the tag within the payload, header included.
    pub offset: usize,
    /// Bytes the block occupies, tag included.
    pub len: usize,
    pub name: &'static str,
}

/// Sizes and structure of a token at every stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub token_len: usize,
    pub key: Symbol,
    /// Data symbols after the key.
    pub symbols: usize,
    pub quirks: TextQuirks,
    pub compressed_len: usize,
    pub container: Container,
    pub canonical_compression: bool,
    pub payload_len: usize,
    pub header: PayloadHeader,
    pub header_lengths_match: bool,
    pub blocks: Vec<BlockSummary>,
}

/// Decodes a token down to its inflated payload bytes.
///
/// The same token and compressed size limits as a full decode apply.
pub fn payload_bytes(token: &str, options: &DecodeOptions) -> CodecResult<Vec<u8>> {
    options.limits.check_token(token)?;
    let decoded = text::decode_token(token, options.policy)?;
    options.limits.check_compressed(decoded.bytes.len())?;
    let inflated = inflate(
        &decoded.bytes,
        options.policy,
        options.wire_limits.max_payload_bytes,
    )?;
    Ok(inflated.bytes)
}

/// Breaks a token down stage by stage without building the typed model.
pub fn inspect_token(token: &str, options: &DecodeOptions) -> CodecResult<InspectReport> {
    options.limits.check_token(token)?;
    let payload_text = text::unwrap(token)?;
    let decoded = text::decode_text(payload_text, options.policy)?;
    options.limits.check_compressed(decoded.bytes.len())?;
    let inflated = inflate(
        &decoded.bytes,
        options.policy,
        options.wire_limits.max_payload_bytes,
    )?;
    let payload = wire::read_payload(&inflated.bytes, &options.registry, &options.wire_limits)?;

    let blocks = payload
        .blocks
        .iter()
        .map(|block| BlockSummary {
            tag: block.tag,
            section: block.section,
            offset: block.offset,
            len: block.encoded_len(),
            name: options
                .registry
                .lookup(block.section, block.tag)
                .map_or("unknown", |rule| rule.name),
        })
        .collect();

    Ok(InspectReport {
        token_len: token.len(),
        key: decoded.key,
        symbols: payload_text.chars().count().saturating_sub(1),
        quirks: decoded.quirks,
        compressed_len: decoded.bytes.len(),
        container: inflated.container,
        canonical_compression: inflated.canonical,
        payload_len: inflated.bytes.len(),
        header: payload.header,
        header_lengths_match: payload.header.check_lengths(inflated.bytes.len()).is_ok(),
        blocks,
    })
}

/// Formats `data[start..start + length]` as rows of 16 hex bytes, each
/// prefixed with its offset.
pub fn format_hex_dump(data: &[u8], start: usize, length: usize) -> String {
    let end = start.saturating_add(length).min(data.len());
    let Some(window) = data.get(start..end) else {
        return String::new();
    };

    let mut out = String::new();
    for (row, chunk) in window.chunks(16).enumerate() {
        if row > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{:4}:", start + row * 16);
        for byte in chunk {
            let _ = write!(out, " {byte:02x}");
        }
    }
    out
}

/// Display name for an object type id.
pub fn object_name(kind: ObjectKind) -> String {
    let name = match kind.raw() {
        0x01 => "Line AOE",
        0x04 => "Checkered Circle",
        0x08 => "Checkered Square",
        0x09 => "General Marker",
        0x0A => "Circle AOE",
        0x0B => "Fan AOE",
        0x0C => "Line",
        0x0D => "Gaze",
        0x0E => "Stack",
        0x0F => "Line Stack",
        0x10 => "Proximity",
        0x11 => "Donut AOE",
        0x12 => "Gladiator",
        0x1B => "Paladin",
        0x1D => "Warrior",
        0x20 => "White Mage",
        0x23 => "Scholar",
        0x26 => "Dark Knight",
        0x27 => "Astrologian",
        0x2B => "Gunbreaker",
        0x2E => "Sage",
        0x2F => "Tank",
        0x32 => "Healer",
        0x35 => "DPS",
        0x3C => "Small Enemy",
        0x3E => "Medium Enemy",
        0x40 => "Large Enemy",
        0x41..=0x45 => return format!("Attack {}", kind.raw() - 0x40),
        0x46..=0x48 => return format!("Bind {}", kind.raw() - 0x45),
        0x4F => "Waymark A",
        0x50 => "Waymark B",
        0x51 => "Waymark C",
        0x52 => "Waymark D",
        0x53..=0x56 => return format!("Waymark {}", kind.raw() - 0x52),
        0x57 => "Circle Sign",
        0x58 => "X Sign",
        0x59 => "Triangle Sign",
        0x5A => "Square Sign",
        0x5E => "Up Arrow",
        0x64 => "Text",
        0x67 => "Rotate",
        0x6A => "Stack Multi",
        0x6B => "Proximity Player",
        0x6C => "Tankbuster",
        0x6D => "Radial KB",
        0x6E => "Linear KB",
        0x6F => "Tower",
        0x70 => "Target",
        0x71 => "Enhancement",
        0x72 => "Enfeeblement",
        0x73..=0x75 => return format!("Attack {}", kind.raw() - 0x6D),
        0x7C => "Grey Circle",
        0x7D => "Grey Square",
        0x7E => "Moving AOE",
        0x7F..=0x82 => return format!("{}P AOE", kind.raw() - 0x7E),
        0x83 => "Red Lock",
        0x84 => "Blue Lock",
        0x85 => "Purple Lock",
        0x86 => "Green Lock",
        0x87 => "HL Circle",
        0x88 => "HL X",
        0x89 => "HL Square",
        0x8A => "HL Triangle",
        0x8B => "Rotate CW",
        0x8C => "Rotate CCW",
        raw => return format!("Type 0x{raw:02x}"),
    };
    name.to_string()
}

/// Formats the board as a title line and one table row per object.
pub fn format_pretty(strategy: &Strategy) -> String {
    let mut out = String::new();
    let title = strategy.title().unwrap_or_default();
    let kinds: Vec<ObjectKind> = strategy.objects().collect();
    let labels = strategy.labels();
    let positions = strategy.positions().unwrap_or_default();
    let angles = strategy.angles().map_or(&[][..], |a| a.angles.as_slice());
    let sizes = strategy.sizes().unwrap_or_default();
    let colors = strategy.colors().unwrap_or_default();

    let _ = writeln!(out, "Title: {title}");
    let _ = writeln!(out, "Object Count: {}", kinds.len());
    let rule = "-".repeat(72);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "{:<4} {:<20} {:>8} {:>8} {:>6} {:>5}  {}",
        "#", "Type", "X", "Y", "Angle", "Size", "Color"
    );
    let _ = writeln!(out, "{rule}");
    for (index, kind) in kinds.iter().enumerate() {
        let (x, y) = positions
            .get(index)
            .map_or((0.0, 0.0), |point| point.to_units());
        let angle = angles.get(index).copied().unwrap_or_default();
        let size = sizes.get(index).copied().unwrap_or_default();
        let color = colors
            .get(index)
            .map_or_else(|| "-".to_string(), |c| format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b));
        let mut name = object_name(*kind);
        if let Some(Some(label)) = labels.get(index) {
            let _ = write!(name, " \"{label}\"");
        }
        let _ = writeln!(
            out,
            "{:<4} {:<20} {:>8.1} {:>8.1} {:>6} {:>5}  {}",
            index + 1,
            name,
            x,
            y,
            angle,
            size,
            color
        );
    }
    let _ = write!(out, "{rule}");
    out
}

/// Counts blocks per tag name, in first-seen order.
pub fn block_histogram(strategy: &Strategy) -> Vec<(&'static str, usize)> {
    let mut counts: Vec<(&'static str, usize)> = Vec::new();
    for block in &strategy.blocks {
        match counts.iter_mut().find(|(name, _)| *name == block.name()) {
            Some((_, count)) => *count += 1,
            None => counts.push((block.name(), 1)),
        }
    }
    counts
}

/// Short one-line description of a decoded board for scan listings.
pub fn summarize(strategy: &Strategy) -> String {
    let title = strategy.title().unwrap_or_default();
    let opaque = strategy
        .blocks
        .iter()
        .filter(|block| matches!(block, Block::Opaque(_)))
        .count();
    let mut line = format!("\"{title}\" ({} objects)", strategy.object_count());
    if opaque > 0 {
        let _ = write!(line, ", {opaque} opaque blocks");
    }
    line
}
