use fototag_common::geography::Rational;

use super::type_::Type;

/// Typed tag value
///
/// The ASCII variant keeps the raw bytes including NULL terminators so that
/// a decode/encode cycle reproduces the field byte-exact.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(Vec<u8>),
    Ascii(Vec<u8>),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<Rational>),
    Undefined(Vec<u8>),
    SLong(Vec<i32>),
    SRational(Vec<(i32, i32)>),
}

impl Value {
    /// ASCII value with a trailing NULL as the standard requires
    pub fn ascii(text: &str) -> Self {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        Self::Ascii(bytes)
    }

    pub fn data_type(&self) -> Type {
        match self {
            Self::Byte(_) => Type::Byte,
            Self::Ascii(_) => Type::Ascii,
            Self::Short(_) => Type::Short,
            Self::Long(_) => Type::Long,
            Self::Rational(_) => Type::Rational,
            Self::Undefined(_) => Type::Undefined,
            Self::SLong(_) => Type::SLong,
            Self::SRational(_) => Type::SRational,
        }
    }

    /// Element count as stored in the entry
    pub fn count(&self) -> u32 {
        let count = match self {
            Self::Byte(v) | Self::Ascii(v) | Self::Undefined(v) => v.len(),
            Self::Short(v) => v.len(),
            Self::Long(v) => v.len(),
            Self::Rational(v) => v.len(),
            Self::SLong(v) => v.len(),
            Self::SRational(v) => v.len(),
        };
        count as u32
    }

    pub fn byte_len(&self) -> usize {
        self.count() as usize * self.data_type().size() as usize
    }

    /// Serialized element data, little-endian
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            Self::Byte(v) | Self::Ascii(v) | Self::Undefined(v) => v.clone(),
            Self::Short(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            Self::Long(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            Self::Rational(v) => v
                .iter()
                .flat_map(|(n, d)| [n.to_le_bytes(), d.to_le_bytes()])
                .flatten()
                .collect(),
            Self::SLong(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            Self::SRational(v) => v
                .iter()
                .flat_map(|(n, d)| [n.to_le_bytes(), d.to_le_bytes()])
                .flatten()
                .collect(),
        }
    }

    /// ASCII content with all NULL bytes stripped
    ///
    /// Deviates from the standard in stripping all NULLs instead of just the
    /// trailing one, since many Exif writers put NULLs in odd places.
    pub fn as_string(&self) -> Option<String> {
        match self {
            Self::Ascii(bytes) => {
                let data: Vec<u8> = bytes.iter().copied().filter(|x| *x != 0).collect();
                Some(String::from_utf8_lossy(&data).to_string())
            }
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Self::Short(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        }
    }

    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            Self::Rational(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        }
    }

    pub fn as_rationals<const N: usize>(&self) -> Option<[Rational; N]> {
        match self {
            Self::Rational(v) => v.as_slice().try_into().ok(),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Byte(v) | Self::Undefined(v) => Some(v),
            _ => None,
        }
    }
}
