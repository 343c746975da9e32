use crate::error::MatError;

/// Storage depth of a single matrix channel.
///
/// The discriminants follow the OpenCV depth numbering, which is what the
/// serialized `type` tag of a calibration matrix is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Depth {
    /// 8-bit unsigned integer.
    U8 = 0,
    /// 8-bit signed integer.
    I8 = 1,
    /// 16-bit unsigned integer.
    U16 = 2,
    /// 16-bit signed integer.
    I16 = 3,
    /// 32-bit signed integer.
    I32 = 4,
    /// 32-bit float.
    F32 = 5,
    /// 64-bit float.
    F64 = 6,
}

impl Depth {
    /// Size in bytes of one channel value.
    pub const fn size(self) -> usize {
        match self {
            Depth::U8 | Depth::I8 => 1,
            Depth::U16 | Depth::I16 => 2,
            Depth::I32 | Depth::F32 => 4,
            Depth::F64 => 8,
        }
    }

    /// Short name used in textual representations, e.g. `64F`.
    pub const fn name(self) -> &'static str {
        match self {
            Depth::U8 => "8U",
            Depth::I8 => "8S",
            Depth::U16 => "16U",
            Depth::I16 => "16S",
            Depth::I32 => "32S",
            Depth::F32 => "32F",
            Depth::F64 => "64F",
        }
    }

    fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Depth::U8,
            1 => Depth::I8,
            2 => Depth::U16,
            3 => Depth::I16,
            4 => Depth::I32,
            5 => Depth::F32,
            6 => Depth::F64,
            _ => return None,
        })
    }
}

/// Maximum number of channels an element type tag may carry.
pub const MAX_CHANNELS: usize = 4;

const CHANNEL_SHIFT: i32 = 3;

/// Element type tag of a matrix: a depth plus a channel count.
///
/// Encoded as `depth + ((channels - 1) << 3)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MatType {
    depth: Depth,
    channels: usize,
}

impl MatType {
    /// 8-bit unsigned, single channel.
    pub const CV_8UC1: MatType = MatType::new_unchecked(Depth::U8, 1);
    /// 32-bit float, single channel.
    pub const CV_32FC1: MatType = MatType::new_unchecked(Depth::F32, 1);
    /// 64-bit float, single channel. The only tag calibration matrices use.
    pub const CV_64FC1: MatType = MatType::new_unchecked(Depth::F64, 1);
    /// 64-bit float, two channels.
    pub const CV_64FC2: MatType = MatType::new_unchecked(Depth::F64, 2);

    const fn new_unchecked(depth: Depth, channels: usize) -> Self {
        Self { depth, channels }
    }

    /// Creates a tag from a depth and a channel count in `1..=4`.
    pub fn new(depth: Depth, channels: usize) -> Result<Self, MatError> {
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(MatError::UnsupportedChannels(channels));
        }
        Ok(Self { depth, channels })
    }

    /// Decodes a numeric tag.
    pub fn from_code(code: i32) -> Result<Self, MatError> {
        if code < 0 {
            return Err(MatError::UnsupportedType(code));
        }
        let depth = Depth::from_code(code & ((1 << CHANNEL_SHIFT) - 1))
            .ok_or(MatError::UnsupportedType(code))?;
        let channels = ((code >> CHANNEL_SHIFT) + 1) as usize;
        if channels > MAX_CHANNELS {
            return Err(MatError::UnsupportedType(code));
        }
        Ok(Self { depth, channels })
    }

    /// Numeric tag of this type.
    pub const fn code(&self) -> i32 {
        self.depth as i32 + (((self.channels as i32) - 1) << CHANNEL_SHIFT)
    }

    /// Channel depth.
    pub const fn depth(&self) -> Depth {
        self.depth
    }

    /// Number of channels per element.
    pub const fn channels(&self) -> usize {
        self.channels
    }

    /// Size in bytes of one element, all channels included.
    pub const fn elem_size(&self) -> usize {
        self.depth.size() * self.channels
    }
}

impl std::fmt::Display for MatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CV_{}C{}", self.depth.name(), self.channels)
    }
}

/// A scalar type that can be stored in a [`crate::Mat`].
pub trait Element: Copy + Default + std::fmt::Debug + 'static {
    /// Depth tag matching this type.
    const DEPTH: Depth;

    /// Widens the value to `f64`.
    fn to_f64(self) -> f64;

    /// Narrows an `f64`, rounding to nearest and saturating for integer depths.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_element_int {
    ($($t:ty => $depth:ident),* $(,)?) => {
        $(
            impl Element for $t {
                const DEPTH: Depth = Depth::$depth;

                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn from_f64(value: f64) -> Self {
                    value.round() as $t
                }
            }
        )*
    };
}

impl_element_int!(u8 => U8, i8 => I8, u16 => U16, i16 => I16, i32 => I32);

impl Element for f32 {
    const DEPTH: Depth = Depth::F32;

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Element for f64 {
    const DEPTH: Depth = Depth::F64;

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }
}
