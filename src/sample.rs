use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// The width of a single color channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelDepth {
    Eight,
    Sixteen,
}

impl ChannelDepth {
    /// Channels are read as single bytes only for a bit depth of exactly 8, every other depth reads two.
    pub fn from_bit_depth(bit_depth: u8) -> Self {
        if bit_depth == 8 {
            ChannelDepth::Eight
        } else {
            ChannelDepth::Sixteen
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            ChannelDepth::Eight => 1,
            ChannelDepth::Sixteen => 2,
        }
    }

    /// The fully opaque alpha value.
    pub fn max_value(self) -> u16 {
        match self {
            ChannelDepth::Eight => u8::MAX as u16,
            ChannelDepth::Sixteen => u16::MAX,
        }
    }
}

/// A single decoded color along with where it was first seen and how often it occurs.
///
/// Two samples are equal when their channels are equal, regardless of position, frequency or whether they've been
/// merged away as a duplicate.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorSample {
    x: u32,
    y: u32,
    red: u16,
    green: u16,
    blue: u16,
    alpha: u16,
    depth: ChannelDepth,
    freq: u32,
    duplicate: bool,
}

impl ColorSample {
    pub fn new((x, y): (u32, u32), (red, green, blue, alpha): (u16, u16, u16, u16), depth: ChannelDepth) -> Self {
        Self {
            x,
            y,
            red,
            green,
            blue,
            alpha,
            depth,
            freq: 1,
            duplicate: false,
        }
    }

    /// A sample from a source without an alpha channel, which is always fully opaque.
    pub fn opaque(position: (u32, u32), (red, green, blue): (u16, u16, u16), depth: ChannelDepth) -> Self {
        Self::new(position, (red, green, blue, depth.max_value()), depth)
    }

    pub fn position(self) -> (u32, u32) {
        (self.x, self.y)
    }

    pub fn rgba(self) -> (u16, u16, u16, u16) {
        (self.red, self.green, self.blue, self.alpha)
    }

    pub fn alpha(self) -> u16 {
        self.alpha
    }

    pub fn depth(self) -> ChannelDepth {
        self.depth
    }

    pub fn frequency(self) -> u32 {
        self.freq
    }

    pub fn is_duplicate(self) -> bool {
        self.duplicate
    }

    pub(crate) fn set_frequency(&mut self, freq: u32) {
        self.freq = freq;
    }

    pub(crate) fn mark_duplicate(&mut self) {
        self.duplicate = true;
    }

    /// Distance between two colors, with every channel normalized against the largest value `bit_depth` bits can
    /// hold. The result lies between 0 (identical) and 1 (transparent black against opaque white).
    pub fn distance(&self, other: &ColorSample, bit_depth: u8) -> f64 {
        let max = ((1u64 << bit_depth) - 1) as f64;
        let channel = |lhs: u16, rhs: u16| (lhs as f64 - rhs as f64) / max;

        let red = channel(self.red, other.red);
        let green = channel(self.green, other.green);
        let blue = channel(self.blue, other.blue);
        let alpha = channel(self.alpha, other.alpha);

        (red * red + green * green + blue * blue + alpha * alpha).sqrt() / 2.0
    }
}

impl Eq for ColorSample {}
impl PartialEq for ColorSample {
    fn eq(&self, other: &Self) -> bool {
        self.rgba() == other.rgba()
    }
}

impl Hash for ColorSample {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rgba().hash(state);
    }
}

impl fmt::Display for ColorSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.depth.bytes() * 2;
        write!(
            f,
            "#{:0w$x}{:0w$x}{:0w$x}{:0w$x} ({})",
            self.red,
            self.green,
            self.blue,
            self.alpha,
            self.freq,
            w = width
        )
    }
}
