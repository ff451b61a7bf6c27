//! Quality-assurance bit flag masking

pub mod flags;
pub mod mask;

pub use flags::{encoding_names, get_encoding, QaEncoding, QaFlag, DEFAULT_ENCODING};
pub use mask::QualityMask;
