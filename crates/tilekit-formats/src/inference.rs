//! Per-stage format inference for unpack, math and pack.
//!
//! Given the L1 input and output formats, picks the register formats each
//! stage must be programmed with so that every conversion along the pipeline
//! is one the hardware can perform. Architecture is an explicit argument.

use crate::format::DataFormat;
use serde::{Deserialize, Serialize};
use tilekit_common::{ChipArchitecture, DatumWidth, DestAccumulation};
use tracing::debug;

/// Formats programmed into each pipeline stage for one L1-to-L1 run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormatConfig {
    pub unpack_a_src: DataFormat,
    pub unpack_a_dst: DataFormat,
    pub unpack_b_src: DataFormat,
    pub unpack_b_dst: DataFormat,
    pub math: DataFormat,
    pub pack_src: DataFormat,
    pub pack_dst: DataFormat,
}

impl FormatConfig {
    /// A config where both source registers share one format.
    pub fn same_src(
        unpack_src: DataFormat,
        unpack_dst: DataFormat,
        math: DataFormat,
        pack_src: DataFormat,
        pack_dst: DataFormat,
    ) -> Self {
        Self {
            unpack_a_src: unpack_src,
            unpack_a_dst: unpack_dst,
            unpack_b_src: unpack_src,
            unpack_b_dst: unpack_dst,
            math,
            pack_src,
            pack_dst,
        }
    }
}

/// 8-bit-exponent input packed to `Float16` without 32-bit dest.
///
/// The pack gasket cannot perform that conversion from 16-bit dest, so such
/// pipelines hold 32-bit datums in dest anyway.
pub fn is_format_combination_outlier(
    input: DataFormat,
    output: DataFormat,
    dest_acc: DestAccumulation,
) -> bool {
    input.is_exponent_b() && output == DataFormat::Float16 && !dest_acc.is_enabled()
}

/// Format the unpacker writes into the source (or dest) register.
pub fn infer_unpack_out(
    input: DataFormat,
    output: DataFormat,
    dest_acc: DestAccumulation,
    unpack_to_dest: bool,
) -> DataFormat {
    if input == DataFormat::Float32 && !unpack_to_dest {
        // Source registers hold at most 19 bits.
        if dest_acc.is_enabled() {
            return DataFormat::Tf32;
        }
        if output.is_exponent_b() || output == DataFormat::Float32 {
            return DataFormat::Float16B;
        }
        return DataFormat::Float16;
    }
    input
}

/// Format the packer reads out of dest.
pub fn infer_pack_in(
    input: DataFormat,
    output: DataFormat,
    unpack_out: DataFormat,
    dest_acc: DestAccumulation,
    unpack_to_dest: bool,
    arch: ChipArchitecture,
) -> DataFormat {
    let wormhole = arch == ChipArchitecture::Wormhole;
    if wormhole && dest_acc.is_enabled() && output == DataFormat::Float16 {
        // Wormhole's gasket cannot narrow Float32 to Float16; the packer does it.
        return DataFormat::Float32;
    }
    if input == DataFormat::Float32 && !unpack_to_dest {
        return if dest_acc.is_enabled() || output.is_exponent_b() { output } else { unpack_out };
    }
    if input == DataFormat::Float16 && output == DataFormat::Bfp8B && !dest_acc.is_enabled() {
        // The gasket goes Float16 -> Bfp8, then the packer Bfp8 -> Bfp8_b.
        return DataFormat::Bfp8;
    }
    if is_format_combination_outlier(input, output, dest_acc) {
        return if wormhole { DataFormat::Float32 } else { output };
    }
    if dest_acc.is_enabled() { output } else { input }
}

/// Infer every stage format for one `input -> output` run.
pub fn infer_data_formats(
    input: DataFormat,
    output: DataFormat,
    dest_acc: DestAccumulation,
    unpack_to_dest: bool,
    arch: ChipArchitecture,
) -> FormatConfig {
    let unpack_out = infer_unpack_out(input, output, dest_acc, unpack_to_dest);
    let pack_in = infer_pack_in(input, output, unpack_out, dest_acc, unpack_to_dest, arch);
    FormatConfig::same_src(input, unpack_out, unpack_out, pack_in, output)
}

/// Stage formats for a single run producing `output`.
///
/// Quasar has no format inference: the input format is carried unchanged
/// through to the packer, which writes `output`.
pub fn stage_formats(
    input: DataFormat,
    output: DataFormat,
    dest_acc: DestAccumulation,
    unpack_to_dest: bool,
    arch: ChipArchitecture,
) -> FormatConfig {
    if arch == ChipArchitecture::Quasar {
        return FormatConfig::same_src(input, input, input, input, output);
    }
    infer_data_formats(input, output, dest_acc, unpack_to_dest, arch)
}

/// Stage formats for `runs` chained L1-to-L1 runs.
///
/// Every run but the last writes back in the input format; the last produces
/// `output`. Quasar always gets a single config.
pub fn data_formats(
    input: DataFormat,
    output: DataFormat,
    dest_acc: DestAccumulation,
    runs: usize,
    unpack_to_dest: bool,
    arch: ChipArchitecture,
) -> Vec<FormatConfig> {
    if arch == ChipArchitecture::Quasar {
        return vec![stage_formats(input, output, dest_acc, unpack_to_dest, arch)];
    }
    let intermediate = stage_formats(input, input, dest_acc, unpack_to_dest, arch);
    let last = stage_formats(input, output, dest_acc, unpack_to_dest, arch);
    let mut configs = vec![intermediate; runs.saturating_sub(1)];
    if runs > 0 {
        configs.push(last);
    }
    debug!(%input, %output, %dest_acc, runs, %arch, "inferred stage formats");
    configs
}

/// Width of the datums dest holds for this pipeline.
pub fn dest_datum_width(
    input: DataFormat,
    output: DataFormat,
    dest_acc: DestAccumulation,
) -> DatumWidth {
    if dest_acc.is_enabled()
        || input.is_32_bit()
        || is_format_combination_outlier(input, output, dest_acc)
    {
        DatumWidth::Bits32
    } else {
        DatumWidth::Bits16
    }
}
