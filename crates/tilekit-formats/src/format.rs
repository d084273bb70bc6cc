//! The closed table of data formats.
//!
//! Class and width are attached to each format as data in [`DataFormat::info`];
//! every rule in this crate reads those attributes instead of branching on
//! individual formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tilekit_common::{DatumWidth, TileError};

/// Minimum shared exponents stored for a block-float tile, regardless of size.
pub const MIN_BFP_EXPONENTS: usize = 16;

/// Datums sharing one exponent in block-float formats.
const BFP_BLOCK: usize = 16;

// ---------------------------------------------------------------------------
// Numeric class
// ---------------------------------------------------------------------------

/// Families of formats that can be mixed inside one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[non_exhaustive]
pub enum NumericClass {
    /// Floats with a 5-bit exponent.
    FloatGroupA,
    /// Floats with an 8-bit exponent.
    FloatGroupB,
    Integer,
}

impl NumericClass {
    pub const ALL: &'static [NumericClass] =
        &[NumericClass::FloatGroupA, NumericClass::FloatGroupB, NumericClass::Integer];
}

impl fmt::Display for NumericClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FloatGroupA => write!(f, "float-exponent-a"),
            Self::FloatGroupB => write!(f, "float-exponent-b"),
            Self::Integer => write!(f, "integer"),
        }
    }
}

// ---------------------------------------------------------------------------
// Format table
// ---------------------------------------------------------------------------

/// Static attributes of one data format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub name: &'static str,
    pub class: NumericClass,
    /// Bits per datum as held in the source or dest registers.
    pub held_bits: u32,
    /// Bits per datum the format was defined with. Differs from `held_bits`
    /// only for reduced-width views of a 32-bit format.
    pub origin_bits: u32,
    /// One exponent shared per 16 datums.
    pub block_float: bool,
}

/// Every data format the pipeline stages can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataFormat {
    Float16,
    #[serde(rename = "Float16_b")]
    Float16B,
    Bfp8,
    #[serde(rename = "Bfp8_b")]
    Bfp8B,
    Float32,
    Tf32,
    Int8,
    UInt8,
    UInt16,
    Int32,
    UInt32,
}

impl DataFormat {
    pub const ALL: &'static [DataFormat] = &[
        DataFormat::Float16,
        DataFormat::Float16B,
        DataFormat::Bfp8,
        DataFormat::Bfp8B,
        DataFormat::Float32,
        DataFormat::Tf32,
        DataFormat::Int8,
        DataFormat::UInt8,
        DataFormat::UInt16,
        DataFormat::Int32,
        DataFormat::UInt32,
    ];

    pub const fn info(self) -> FormatInfo {
        use NumericClass::*;
        let (name, class, held_bits, origin_bits, block_float) = match self {
            Self::Float16 => ("Float16", FloatGroupA, 16, 16, false),
            Self::Float16B => ("Float16_b", FloatGroupB, 16, 16, false),
            Self::Bfp8 => ("Bfp8", FloatGroupA, 8, 8, true),
            Self::Bfp8B => ("Bfp8_b", FloatGroupB, 8, 8, true),
            Self::Float32 => ("Float32", FloatGroupB, 32, 32, false),
            Self::Tf32 => ("Tf32", FloatGroupB, 19, 32, false),
            Self::Int8 => ("Int8", Integer, 8, 8, false),
            Self::UInt8 => ("UInt8", Integer, 8, 8, false),
            Self::UInt16 => ("UInt16", Integer, 16, 16, false),
            Self::Int32 => ("Int32", Integer, 32, 32, false),
            Self::UInt32 => ("UInt32", Integer, 32, 32, false),
        };
        FormatInfo { name, class, held_bits, origin_bits, block_float }
    }

    pub const fn name(self) -> &'static str {
        self.info().name
    }

    pub const fn class(self) -> NumericClass {
        self.info().class
    }

    pub fn is_integer(self) -> bool {
        self.class() == NumericClass::Integer
    }

    /// Held at full 32-bit width.
    pub const fn is_32_bit(self) -> bool {
        self.info().held_bits == 32
    }

    /// A 32-bit format held at reduced width.
    pub const fn is_reduced_32_bit(self) -> bool {
        let info = self.info();
        info.origin_bits == 32 && info.held_bits < 32
    }

    /// 32 bits wide in origin, whatever width it is currently held at.
    pub const fn is_32_bit_origin(self) -> bool {
        self.info().origin_bits == 32
    }

    /// 8-bit integer formats.
    pub fn is_8_bit_integer(self) -> bool {
        self.is_integer() && self.info().held_bits == 8
    }

    /// Narrow float formats with an 8-bit exponent. `Float32` carries an 8-bit
    /// exponent as well but is not treated as one by the pack gasket.
    pub const fn is_exponent_b(self) -> bool {
        matches!(self, Self::Float16B | Self::Bfp8B | Self::Tf32)
    }

    /// Width of one datum of this format in the dest register.
    pub fn datum_width(self) -> DatumWidth {
        DatumWidth::from_bits(self.info().held_bits)
    }

    /// Bytes occupied by one tile of `tile_elements` datums in L1.
    ///
    /// Block-float tiles store one exponent byte per 16 datums, padded to at
    /// least [`MIN_BFP_EXPONENTS`], ahead of one mantissa byte per datum.
    pub fn tile_size_bytes(self, tile_elements: usize) -> usize {
        let info = self.info();
        if info.block_float {
            let exponents = (tile_elements / BFP_BLOCK).max(MIN_BFP_EXPONENTS);
            return exponents + tile_elements;
        }
        tile_elements * (info.origin_bits as usize).div_ceil(8)
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataFormat {
    type Err = TileError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|fmt| fmt.name().to_lowercase() == wanted)
            .ok_or_else(|| TileError::UnknownFormat(s.to_string()))
    }
}
