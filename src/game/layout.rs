//! Per-game menu layout, loaded from the game's `offset.json` descriptor.
//!
//! The descriptor is a flat JSON object: a handful of named layout fields
//! plus one entry per drawable character, keyed by its decimal character
//! code (`"65": {"x": 0, "w": 8}`). Everything is checked here, once, so the
//! generator and compositor can assume a consistent layout.

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::game::words::{WordBank, apply_case, normalize};

/* ======================= DESCRIPTOR (RAW JSON) ======================= */

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub x: i64,
    pub y: i64,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetrics {
    /// Left edge of the glyph cell in the font sheet.
    #[serde(rename = "x")]
    pub sheet_x: u32,
    /// Cell width, which is also the pen advance.
    #[serde(rename = "w")]
    pub width: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LayoutDescriptor {
    pub height: u32,
    pub linespace: u32,
    pub listlength: usize,
    pub columns: usize,
    pub origin: Vec<Origin>,
    #[serde(rename = "add-item")]
    pub add_item: bool,
    pub blanks: bool,
    #[serde(rename = "blanks-at-end")]
    pub blanks_at_end: bool,
    pub uppercase: bool,
    pub commandlength: usize,
    #[serde(flatten)]
    pub glyphs: BTreeMap<String, serde_json::Value>,
}

/* ======================= LAYOUT SPEC ======================= */

#[derive(Debug, Clone)]
pub struct LayoutSpec {
    pub rows: usize,
    pub columns: usize,
    /// Last grid slot is pre-filled with "item" and never drawn at random.
    pub reserved_item_slot: bool,
    pub allows_blank_slots: bool,
    /// When blanks are allowed, they shrink the list instead of leaving gaps.
    pub blanks_collapse_list: bool,
    pub max_command_length: usize,
    pub force_uppercase: bool,
    pub glyph_height: u32,
    pub line_spacing: u32,
    /// One cursor start per column, consumed in order.
    pub origins: Vec<Origin>,
    pub glyph_metrics: HashMap<char, GlyphMetrics>,
}

impl LayoutSpec {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let descriptor: LayoutDescriptor = serde_json::from_str(text)?;
        Self::try_from(descriptor)
    }

    /// Total grid positions.
    #[inline(always)]
    pub const fn slot_count(&self) -> usize {
        self.rows * self.columns
    }

    /// Grid positions filled by the generator.
    #[inline(always)]
    pub const fn target_count(&self) -> usize {
        if self.reserved_item_slot {
            self.slot_count().saturating_sub(1)
        } else {
            self.slot_count()
        }
    }

    #[inline(always)]
    pub const fn line_advance(&self) -> i64 {
        self.glyph_height as i64 + self.line_spacing as i64
    }

    pub fn glyph(&self, ch: char) -> Result<&GlyphMetrics, ConfigError> {
        self.glyph_metrics
            .get(&ch)
            .ok_or(ConfigError::MissingGlyph { ch, code: ch as u32 })
    }

    /// Fails on the first character the generator could emit but the font
    /// can't draw. Words that can never pass the length filter are skipped.
    pub fn check_coverage(&self, words: &WordBank) -> Result<(), ConfigError> {
        let fixed = [super::menu::FIRST_NOUN_COMMAND, super::menu::ITEM_COMMAND];
        let candidates = words
            .all_words()
            .map(normalize)
            .filter(|w| !w.is_empty() && w.chars().count() <= self.max_command_length)
            .chain(fixed.iter().map(|w| (*w).to_string()));

        let mut checked = 0usize;
        for word in candidates {
            for ch in apply_case(&word, self.force_uppercase).chars() {
                self.glyph(ch)?;
            }
            checked += 1;
        }
        debug!("Glyph coverage verified for {checked} candidate command(s).");
        Ok(())
    }
}

impl TryFrom<LayoutDescriptor> for LayoutSpec {
    type Error = ConfigError;

    fn try_from(desc: LayoutDescriptor) -> Result<Self, Self::Error> {
        if desc.listlength == 0 {
            return Err(ConfigError::InvalidLayout("listlength must be at least 1".into()));
        }
        if desc.columns == 0 {
            return Err(ConfigError::InvalidLayout("columns must be at least 1".into()));
        }
        if desc.height == 0 {
            return Err(ConfigError::InvalidLayout("height must be at least 1".into()));
        }
        if desc.origin.len() < desc.columns {
            return Err(ConfigError::MissingOrigin {
                column: desc.origin.len(),
                available: desc.origin.len(),
            });
        }

        let mut glyph_metrics = HashMap::with_capacity(desc.glyphs.len());
        for (key, value) in desc.glyphs {
            let Ok(code) = key.parse::<u32>() else {
                warn!("Ignoring unknown layout key '{key}'.");
                continue;
            };
            let ch = char::from_u32(code).ok_or_else(|| {
                ConfigError::InvalidLayout(format!("glyph key {code} is not a valid character"))
            })?;
            let metrics: GlyphMetrics = serde_json::from_value(value)?;
            glyph_metrics.insert(ch, metrics);
        }

        Ok(Self {
            rows: desc.listlength,
            columns: desc.columns,
            reserved_item_slot: desc.add_item,
            allows_blank_slots: desc.blanks,
            blanks_collapse_list: desc.blanks_at_end,
            max_command_length: desc.commandlength,
            force_uppercase: desc.uppercase,
            glyph_height: desc.height,
            line_spacing: desc.linespace,
            origins: desc.origin,
            glyph_metrics,
        })
    }
}
