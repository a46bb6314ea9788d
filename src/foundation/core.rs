use serde::{Deserialize, Serialize};

pub use kurbo::Rect;

/// Host-supplied monotonic timestamp in milliseconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimeMs(pub u64);

impl TimeMs {
    pub fn saturating_add(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }

    pub fn elapsed_since(self, earlier: TimeMs) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Opaque 8-bit sRGB color. Serializes as `"#rrggbb"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const SLATE_900: Self = Self::new(15, 23, 42);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn parse_hex(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return Err("hex color must be #RRGGBB (case-insensitive)".to_owned());
        }

        fn hex_byte(pair: &str) -> Result<u8, String> {
            u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
        }

        Ok(Self::new(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        ))
    }
}

impl Serialize for Rgb8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr([u8; 3]),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Self::parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Arr([r, g, b]) => Ok(Self::new(r, g, b)),
        }
    }
}

/// Layout snapshot supplied by the host on each scroll notification.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollGeometry {
    /// Tracked region's layout box, relative to the viewport's top edge.
    pub region: Rect,
    pub viewport_height: f64,
    /// Document scroll offset at the time `region` was measured.
    pub scroll_y: f64,
}

impl ScrollGeometry {
    pub fn new(region: Rect, viewport_height: f64, scroll_y: f64) -> Self {
        Self {
            region,
            viewport_height,
            scroll_y,
        }
    }

    /// Geometry for a region whose document top is `region_doc_top`, seen at `scroll_y`.
    pub fn at_scroll(
        region_doc_top: f64,
        region_height: f64,
        viewport_height: f64,
        scroll_y: f64,
    ) -> Self {
        let top = region_doc_top - scroll_y;
        Self::new(
            Rect::new(0.0, top, 0.0, top + region_height),
            viewport_height,
            scroll_y,
        )
    }

    pub fn is_usable(&self) -> bool {
        self.region.y0.is_finite()
            && self.region.y1.is_finite()
            && self.viewport_height.is_finite()
            && self.scroll_y.is_finite()
            && self.viewport_height >= 0.0
    }

    pub fn top(&self) -> f64 {
        self.region.y0
    }

    pub fn region_height(&self) -> f64 {
        self.region.height()
    }

    /// Scroll distance over which progress runs from 0 to 1 (may be <= 0).
    pub fn scroll_span(&self) -> f64 {
        self.region_height() - self.viewport_height
    }

    /// Document scroll offset at which this region would report `progress`.
    pub fn scroll_y_for_progress(&self, progress: f64) -> f64 {
        let doc_top = self.scroll_y + self.top();
        doc_top + progress * self.scroll_span().max(0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
