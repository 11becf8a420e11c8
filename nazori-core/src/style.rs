//! # Drawing style
//!
//! The pen the user is holding: width, color, whether only a stylus may draw, and the eraser toggle.
//! The eraser is session state - it is deliberately absent from [`DrawingStyleRecord`], so a persisted
//! record cannot encode eraser-on.

use crate::{color::HexColor, state::ProfileId};

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct DrawingStyle {
    pub line_width: f32,
    pub line_color: HexColor,
    pub pen_only: bool,
    pub is_eraser: bool,
}
impl Default for DrawingStyle {
    fn default() -> Self {
        Self {
            line_width: LineWidthOption::Medium.value(),
            line_color: LineColorOption::Black.value(),
            pen_only: false,
            is_eraser: false,
        }
    }
}
impl DrawingStyle {
    /// The persistable part of this style.
    #[must_use]
    pub fn preferences(&self) -> StylePreferences {
        StylePreferences {
            line_width: self.line_width,
            line_color: self.line_color,
            pen_only: self.pen_only,
        }
    }
}

/// Every field of [`DrawingStyle`] that survives a reload.
#[derive(Clone, Copy, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreferences {
    pub line_width: f32,
    pub line_color: HexColor,
    pub pen_only: bool,
}
impl Default for StylePreferences {
    fn default() -> Self {
        DrawingStyle::default().preferences()
    }
}
impl StylePreferences {
    #[must_use]
    pub fn with_eraser(self, is_eraser: bool) -> DrawingStyle {
        DrawingStyle {
            line_width: self.line_width,
            line_color: self.line_color,
            pen_only: self.pen_only,
            is_eraser,
        }
    }
}

/// A partial style update. `None` fields are left as they are.
#[derive(Clone, Copy, PartialEq, Debug, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct StylePatch {
    pub line_width: Option<f32>,
    pub line_color: Option<HexColor>,
    pub pen_only: Option<bool>,
    pub is_eraser: Option<bool>,
}
impl StylePatch {
    #[must_use]
    pub fn eraser(on: bool) -> Self {
        Self {
            is_eraser: Some(on),
            ..Self::default()
        }
    }
    /// Split off the eraser flag, leaving only the persisted fields.
    /// The remainder is `None` if it would change nothing.
    #[must_use]
    pub fn split_eraser(self) -> (Option<bool>, Option<Self>) {
        let rest = Self {
            is_eraser: None,
            ..self
        };
        let rest_is_empty =
            rest.line_width.is_none() && rest.line_color.is_none() && rest.pen_only.is_none();
        (self.is_eraser, (!rest_is_empty).then_some(rest))
    }
    /// Apply the persisted fields onto a set of preferences. The eraser flag is ignored.
    #[must_use]
    pub fn merge_into(&self, mut preferences: StylePreferences) -> StylePreferences {
        if let Some(width) = self.line_width {
            preferences.line_width = width;
        }
        if let Some(color) = self.line_color {
            preferences.line_color = color;
        }
        if let Some(pen_only) = self.pen_only {
            preferences.pen_only = pen_only;
        }
        preferences
    }
}

pub type StyleRecordId = crate::Id<DrawingStyleRecord>;

/// One per profile, upserted whenever the preferences change.
#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingStyleRecord {
    pub id: StyleRecordId,
    pub profile_id: ProfileId,
    #[serde(flatten)]
    pub style: StylePreferences,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Colors offered by the picker.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, strum::EnumIter, strum::AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum LineColorOption {
    Black,
    Red,
    Orange,
    Amber,
    Yellow,
    Lime,
    Green,
    Emerald,
    Teal,
    Cyan,
    Sky,
    Blue,
    Indigo,
    Violet,
    Purple,
    Fuchsia,
    Pink,
    Rose,
}
impl LineColorOption {
    #[must_use]
    pub const fn value(self) -> HexColor {
        match self {
            Self::Black => HexColor::rgb(0x00, 0x00, 0x00),
            Self::Red => HexColor::rgb(0xef, 0x44, 0x44),
            Self::Orange => HexColor::rgb(0xf9, 0x73, 0x16),
            Self::Amber => HexColor::rgb(0xf5, 0x9e, 0x0b),
            Self::Yellow => HexColor::rgb(0xea, 0xb3, 0x08),
            Self::Lime => HexColor::rgb(0x84, 0xcc, 0x16),
            Self::Green => HexColor::rgb(0x22, 0xc5, 0x5e),
            Self::Emerald => HexColor::rgb(0x10, 0xb9, 0x81),
            Self::Teal => HexColor::rgb(0x14, 0xb8, 0xa6),
            Self::Cyan => HexColor::rgb(0x06, 0xb6, 0xd4),
            Self::Sky => HexColor::rgb(0x0e, 0xa5, 0xe9),
            Self::Blue => HexColor::rgb(0x3b, 0x82, 0xf6),
            Self::Indigo => HexColor::rgb(0x63, 0x66, 0xf1),
            Self::Violet => HexColor::rgb(0x8b, 0x5c, 0xf6),
            Self::Purple => HexColor::rgb(0xa8, 0x55, 0xf7),
            Self::Fuchsia => HexColor::rgb(0xd9, 0x46, 0xef),
            Self::Pink => HexColor::rgb(0xec, 0x48, 0x99),
            Self::Rose => HexColor::rgb(0xf4, 0x3f, 0x5e),
        }
    }
    /// Find the picker entry showing this color, if any.
    #[must_use]
    pub fn from_value(color: HexColor) -> Option<Self> {
        <Self as strum::IntoEnumIterator>::iter().find(|option| option.value() == color)
    }
}

/// Widths offered by the picker, in canvas pixels.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, strum::EnumIter, strum::AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum LineWidthOption {
    Thin,
    Medium,
    Thick,
    ExtraThick,
}
impl LineWidthOption {
    #[must_use]
    pub const fn value(self) -> f32 {
        match self {
            Self::Thin => 4.0,
            Self::Medium => 8.0,
            Self::Thick => 20.0,
            Self::ExtraThick => 40.0,
        }
    }
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn from_value(width: f32) -> Option<Self> {
        <Self as strum::IntoEnumIterator>::iter().find(|option| option.value() == width)
    }
}
