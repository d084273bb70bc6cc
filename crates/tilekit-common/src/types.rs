//! Vocabulary enums for architecture and dest register modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target chip architecture. Passed explicitly wherever rules differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipArchitecture {
    Wormhole,
    Blackhole,
    Quasar,
}

impl ChipArchitecture {
    pub const ALL: &'static [ChipArchitecture] =
        &[ChipArchitecture::Wormhole, ChipArchitecture::Blackhole, ChipArchitecture::Quasar];
}

impl fmt::Display for ChipArchitecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wormhole => write!(f, "wormhole"),
            Self::Blackhole => write!(f, "blackhole"),
            Self::Quasar => write!(f, "quasar"),
        }
    }
}

impl FromStr for ChipArchitecture {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wormhole" | "wormhole_b0" => Ok(Self::Wormhole),
            "blackhole" => Ok(Self::Blackhole),
            "quasar" => Ok(Self::Quasar),
            other => Err(format!("unknown chip architecture: {other}")),
        }
    }
}

/// Dest register synchronisation mode.
///
/// `Half` double-buffers the register: one half is drained by the packer while
/// math fills the other, so only half the capacity is usable per block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestSync {
    Half,
    Full,
}

impl DestSync {
    pub const ALL: &'static [DestSync] = &[DestSync::Half, DestSync::Full];
}

impl fmt::Display for DestSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Half => write!(f, "half"),
            Self::Full => write!(f, "full"),
        }
    }
}

impl FromStr for DestSync {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "half" | "synchalf" => Ok(Self::Half),
            "full" | "syncfull" => Ok(Self::Full),
            other => Err(format!("unknown dest sync mode: {other}")),
        }
    }
}

/// Whether the dest register holds 32-bit datums (FP32 dest accumulation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestAccumulation {
    No,
    Yes,
}

impl DestAccumulation {
    pub const ALL: &'static [DestAccumulation] = &[DestAccumulation::No, DestAccumulation::Yes];

    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for DestAccumulation {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Yes } else { Self::No }
    }
}

impl fmt::Display for DestAccumulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::No => write!(f, "no"),
            Self::Yes => write!(f, "yes"),
        }
    }
}

impl FromStr for DestAccumulation {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "no" | "false" | "0" => Ok(Self::No),
            "yes" | "true" | "1" => Ok(Self::Yes),
            other => Err(format!("unknown dest accumulation mode: {other}")),
        }
    }
}

/// Width of one datum as stored in the dest register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DatumWidth {
    Bits16,
    Bits32,
}

impl DatumWidth {
    pub fn bits(self) -> u32 {
        match self {
            Self::Bits16 => 16,
            Self::Bits32 => 32,
        }
    }

    /// Map a raw bit count to the dest storage width. Anything wider than 16
    /// bits occupies a 32-bit slot.
    pub fn from_bits(bits: u32) -> Self {
        if bits > 16 { Self::Bits32 } else { Self::Bits16 }
    }
}

impl fmt::Display for DatumWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arch_display_roundtrip() {
        for arch in ChipArchitecture::ALL {
            let parsed: ChipArchitecture = arch.to_string().parse().unwrap();
            assert_eq!(*arch, parsed);
        }
        assert_eq!("WORMHOLE_B0".parse::<ChipArchitecture>().unwrap(), ChipArchitecture::Wormhole);
    }

    #[test]
    fn dest_sync_display_roundtrip() {
        for sync in DestSync::ALL {
            let parsed: DestSync = sync.to_string().parse().unwrap();
            assert_eq!(*sync, parsed);
        }
        assert!("quarter".parse::<DestSync>().is_err());
    }

    #[test]
    fn dest_acc_parses_boolean_spellings() {
        assert_eq!("true".parse::<DestAccumulation>().unwrap(), DestAccumulation::Yes);
        assert_eq!("0".parse::<DestAccumulation>().unwrap(), DestAccumulation::No);
        assert_eq!(DestAccumulation::from(true), DestAccumulation::Yes);
        assert!(!DestAccumulation::No.is_enabled());
    }

    #[test]
    fn datum_width_from_bits() {
        assert_eq!(DatumWidth::from_bits(8), DatumWidth::Bits16);
        assert_eq!(DatumWidth::from_bits(16), DatumWidth::Bits16);
        assert_eq!(DatumWidth::from_bits(19), DatumWidth::Bits32);
        assert_eq!(DatumWidth::from_bits(32), DatumWidth::Bits32);
        assert_eq!(DatumWidth::Bits32.to_string(), "32-bit");
    }
}
