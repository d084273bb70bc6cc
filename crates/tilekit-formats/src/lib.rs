//! Data formats, compatibility rules and per-stage format inference.
//!
//! The format set is closed: [`DataFormat::ALL`] is the whole table, and every
//! query here is a pure function over it.

pub mod compat;
pub mod format;
pub mod inference;

pub use compat::{
    AccumMode, FormatPair, ReconfigCase, ValidPairs, enumerate_reconfig_cases,
    enumerate_valid_pairs, is_convertible, required_accumulation_mode,
    valid_dest_accumulation_modes, validate_pair,
};
pub use format::{DataFormat, FormatInfo, MIN_BFP_EXPONENTS, NumericClass};
pub use inference::{
    FormatConfig, data_formats, dest_datum_width, infer_data_formats, infer_pack_in,
    infer_unpack_out, is_format_combination_outlier, stage_formats,
};
