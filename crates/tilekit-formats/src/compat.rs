//! Format compatibility rules.
//!
//! Pure queries over [`DataFormat::ALL`]: whether a conversion is legal inside
//! one pipeline stage, which dest accumulation mode it needs, and the valid
//! pairs and reconfiguration transitions that exhaustive sweeps iterate.

use crate::format::{DataFormat, NumericClass};
use serde::{Deserialize, Serialize};
use std::fmt;
use tilekit_common::{DestAccumulation, Result, TileError};
use tracing::debug;

// ---------------------------------------------------------------------------
// Accumulation mode
// ---------------------------------------------------------------------------

/// Dest accumulation requirement of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccumMode {
    /// Only legal with 32-bit dest accumulation.
    MustAccumulate,
    /// Legal with either dest width.
    EitherMode,
}

impl AccumMode {
    /// Dest accumulation settings this requirement admits.
    pub fn allowed(self) -> &'static [DestAccumulation] {
        match self {
            Self::MustAccumulate => &[DestAccumulation::Yes],
            Self::EitherMode => DestAccumulation::ALL,
        }
    }

    pub fn permits(self, dest_acc: DestAccumulation) -> bool {
        self.allowed().contains(&dest_acc)
    }
}

impl fmt::Display for AccumMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MustAccumulate => write!(f, "must-accumulate"),
            Self::EitherMode => write!(f, "either"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pair rules
// ---------------------------------------------------------------------------

/// A legal same-class conversion with its accumulation requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormatPair {
    pub src: DataFormat,
    pub dst: DataFormat,
}

impl FormatPair {
    /// Build a pair, rejecting formats from different numeric classes.
    pub fn new(src: DataFormat, dst: DataFormat) -> Result<Self> {
        if !is_convertible(src, dst) {
            return Err(incompatible(src, dst, "formats belong to different numeric classes"));
        }
        Ok(Self { src, dst })
    }

    pub fn class(&self) -> NumericClass {
        self.src.class()
    }

    pub fn accumulation(&self) -> AccumMode {
        required_accumulation_mode(self.src, self.dst)
    }

    pub fn touches_integer(&self) -> bool {
        self.src.is_integer() || self.dst.is_integer()
    }
}

impl fmt::Display for FormatPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src, self.dst)
    }
}

fn incompatible(src: DataFormat, dst: DataFormat, reason: impl Into<String>) -> TileError {
    TileError::IncompatibleFormats {
        src: src.to_string(),
        dst: dst.to_string(),
        reason: reason.into(),
    }
}

/// Formats of different numeric classes never mix inside a stage.
pub fn is_convertible(src: DataFormat, dst: DataFormat) -> bool {
    src.class() == dst.class()
}

/// Accumulation mode a `src -> dst` conversion needs.
///
/// Accumulation is required when either side is an 8-bit integer, or when a
/// non-identity conversion touches a format that is 32-bit in origin. `Tf32`
/// counts as 32-bit here even though it is held at reduced width.
pub fn required_accumulation_mode(src: DataFormat, dst: DataFormat) -> AccumMode {
    if src.is_8_bit_integer() || dst.is_8_bit_integer() {
        return AccumMode::MustAccumulate;
    }
    if src != dst && (src.is_32_bit_origin() || dst.is_32_bit_origin()) {
        return AccumMode::MustAccumulate;
    }
    AccumMode::EitherMode
}

/// Reject a stage configuration the hardware cannot run.
pub fn validate_pair(src: DataFormat, dst: DataFormat, dest_acc: DestAccumulation) -> Result<()> {
    let pair = FormatPair::new(src, dst)?;
    let mode = pair.accumulation();
    if !mode.permits(dest_acc) {
        return Err(incompatible(
            src,
            dst,
            format!("conversion is {mode} but dest accumulation is {dest_acc}"),
        ));
    }
    Ok(())
}

/// Dest accumulation settings a whole `input -> output` pipeline may use.
///
/// 8-bit-exponent input packed to `Float16` must pass through 32-bit dest,
/// and 32-bit integers cannot be unpacked into the source registers.
pub fn valid_dest_accumulation_modes(
    input: DataFormat,
    output: DataFormat,
) -> &'static [DestAccumulation] {
    let forced = (matches!(input, DataFormat::Bfp8B | DataFormat::Float16B)
        && output == DataFormat::Float16)
        || matches!(input, DataFormat::Int32 | DataFormat::UInt32);
    if forced { &[DestAccumulation::Yes] } else { DestAccumulation::ALL }
}

// ---------------------------------------------------------------------------
// Enumeration
// ---------------------------------------------------------------------------

/// Valid pairs partitioned by numeric class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidPairs {
    /// One entry per class in [`NumericClass::ALL`] order, possibly empty.
    pub by_class: Vec<(NumericClass, Vec<FormatPair>)>,
}

impl ValidPairs {
    pub fn get(&self, class: NumericClass) -> &[FormatPair] {
        self.by_class
            .iter()
            .find(|(c, _)| *c == class)
            .map(|(_, pairs)| pairs.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormatPair> {
        self.by_class.iter().flat_map(|(_, pairs)| pairs.iter())
    }

    pub fn len(&self) -> usize {
        self.by_class.iter().map(|(_, pairs)| pairs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `formats x formats` filtered by [`is_convertible`], grouped by class.
///
/// Duplicates in `formats` are ignored and output order is deterministic:
/// classes in [`NumericClass::ALL`] order, pairs in table order.
pub fn enumerate_valid_pairs(formats: &[DataFormat]) -> ValidPairs {
    let mut unique: Vec<DataFormat> = formats.to_vec();
    unique.sort();
    unique.dedup();

    let by_class: Vec<(NumericClass, Vec<FormatPair>)> = NumericClass::ALL
        .iter()
        .map(|&class| {
            let members: Vec<DataFormat> =
                unique.iter().copied().filter(|f| f.class() == class).collect();
            let pairs = members
                .iter()
                .flat_map(|&src| members.iter().map(move |&dst| FormatPair { src, dst }))
                .collect();
            (class, pairs)
        })
        .collect();
    let pairs = ValidPairs { by_class };
    debug!(formats = formats.len(), pairs = pairs.len(), "enumerated valid format pairs");
    pairs
}

/// One reconfiguration step: a stage configured for `previous` is
/// reprogrammed for `next`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconfigCase {
    pub previous: FormatPair,
    pub next: FormatPair,
    /// Dest accumulation settings both configurations accept.
    pub dest_acc: Vec<DestAccumulation>,
}

/// Every transition between two valid pairs of `formats`.
///
/// A transition that touches an integer format, or where either side must
/// accumulate, only runs with 32-bit dest.
pub fn enumerate_reconfig_cases(formats: &[DataFormat]) -> Vec<ReconfigCase> {
    let pairs: Vec<FormatPair> = enumerate_valid_pairs(formats).iter().copied().collect();
    let mut cases = Vec::with_capacity(pairs.len() * pairs.len());
    for &previous in &pairs {
        for &next in &pairs {
            let forced = previous.touches_integer()
                || next.touches_integer()
                || previous.accumulation() == AccumMode::MustAccumulate
                || next.accumulation() == AccumMode::MustAccumulate;
            let dest_acc = if forced {
                vec![DestAccumulation::Yes]
            } else {
                DestAccumulation::ALL.to_vec()
            };
            cases.push(ReconfigCase { previous, next, dest_acc });
        }
    }
    debug!(cases = cases.len(), "enumerated reconfiguration cases");
    cases
}
