//! QA code evaluation command
//!
//! Tells for each QA code whether the pixel would be kept and, if not,
//! which flags reject it.

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::qa::{self, QualityMask, DEFAULT_ENCODING};
use crate::raster::errors::{RasterError, RasterResult};
use crate::utils::logger::Logger;

/// Command explaining QA codes
pub struct QaCommand<'a> {
    codes: Vec<u64>,
    mask: QualityMask,
    logger: &'a Logger,
}

impl<'a> QaCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> RasterResult<Self> {
        let values = args.get_one::<String>("qa")
            .ok_or_else(|| RasterError::GenericError("Missing QA values".to_string()))?;
        let codes = parse_codes(values)?;

        let encoding_name = args.get_one::<String>("encoding")
            .map(String::as_str)
            .unwrap_or(DEFAULT_ENCODING);
        let mask = QualityMask::new(qa::get_encoding(encoding_name)?);
        info!("Evaluating {} QA codes with encoding '{}'", codes.len(), encoding_name);

        Ok(QaCommand { codes, mask, logger })
    }
}

/// Parse comma-separated codes; `0b` and `0x` prefixes are accepted
pub fn parse_codes(values: &str) -> RasterResult<Vec<u64>> {
    values.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            let parsed = if let Some(bits) = v.strip_prefix("0b") {
                u64::from_str_radix(bits, 2)
            } else if let Some(hex) = v.strip_prefix("0x") {
                u64::from_str_radix(hex, 16)
            } else {
                v.parse::<u64>()
            };
            parsed.map_err(|_| RasterError::GenericError(format!("Invalid QA value '{}'", v)))
        })
        .collect()
}

impl<'a> Command for QaCommand<'a> {
    fn execute(&self) -> RasterResult<()> {
        let lines: Vec<String> = self.codes.iter().map(|code| self.mask.explain(*code)).collect();
        for line in &lines {
            println!("{}", line);
        }
        self.logger.log_section(&format!("QA codes ({})", self.mask.encoding().name), &lines)?;
        Ok(())
    }
}
