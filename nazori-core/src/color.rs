use std::str::FromStr;

/// A straight-alpha sRGB color, as written in CSS hex notation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}
impl HexColor {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }
    #[must_use]
    pub fn as_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.a == 0xff
    }
}
impl Default for HexColor {
    fn default() -> Self {
        Self::BLACK
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color must start with '#'")]
    MissingHash,
    #[error("expected 3, 6 or 8 hex digits, found {0}")]
    BadLength(usize),
    #[error("invalid hex digit {0:?}")]
    BadDigit(char),
}

impl FromStr for HexColor {
    type Err = ColorParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').ok_or(ColorParseError::MissingHash)?;
        let nibbles = digits
            .chars()
            .map(|c| {
                c.to_digit(16)
                    // to_digit(16) is always < 16
                    .map(|d| d as u8)
                    .ok_or(ColorParseError::BadDigit(c))
            })
            .collect::<Result<smallvec::SmallVec<[u8; 8]>, _>>()?;
        let byte = |hi: u8, lo: u8| hi << 4 | lo;

        match nibbles.as_slice() {
            // #rgb shorthand, each digit doubled.
            &[r, g, b] => Ok(Self::rgb(byte(r, r), byte(g, g), byte(b, b))),
            &[r1, r0, g1, g0, b1, b0] => Ok(Self::rgb(byte(r1, r0), byte(g1, g0), byte(b1, b0))),
            &[r1, r0, g1, g0, b1, b0, a1, a0] => Ok(Self {
                r: byte(r1, r0),
                g: byte(g1, g0),
                b: byte(b1, b0),
                a: byte(a1, a0),
            }),
            other => Err(ColorParseError::BadLength(other.len())),
        }
    }
}
/// Canonical lowercase `#rrggbb`, or `#rrggbbaa` when not opaque.
impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if !self.is_opaque() {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}
impl serde::Serialize for HexColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
impl<'de> serde::Deserialize<'de> for HexColor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let string = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        string.parse().map_err(serde::de::Error::custom)
    }
}
