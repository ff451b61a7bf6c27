//! Library interface
//!
//! `CompKit` bundles catalog loading, the workflow run, QA code
//! explanations and catalog inspection behind one logger.

use std::path::Path;
use log::info;

use crate::raster::errors::RasterResult;
use crate::utils::logger::Logger;
use crate::qa::{self, QualityMask};
use crate::service::{Catalog, LocalImageryService};
use crate::visualization::{LayerRegistry, RecordingOutput};
use crate::workflow::{Workflow, WorkflowConfig, WorkflowReport};

/// Outcome of a workflow run through the library interface
pub struct RunOutcome {
    /// Products of the run
    pub report: WorkflowReport,
    /// Layers added to the map, in order
    pub map: LayerRegistry,
    /// Lines the workflow printed
    pub printed: Vec<String>,
}

/// Main interface to the CompKit library
pub struct CompKit {
    logger: Logger,
}

impl CompKit {
    /// Create a new CompKit instance
    ///
    /// # Arguments
    /// * `log_file` - Optional path to log file, defaults to "compkit.log"
    ///
    /// # Returns
    /// A CompKit instance or an error if initialization fails
    pub fn new(log_file: Option<&str>) -> RasterResult<Self> {
        let log_path = log_file.unwrap_or("compkit.log");
        let logger = Logger::new(log_path)?;
        Ok(CompKit { logger })
    }

    /// Load a scene catalog from a JSON file
    pub fn load_catalog<P: AsRef<Path>>(&self, path: P) -> RasterResult<Catalog> {
        let catalog = Catalog::from_file(path.as_ref())?;
        self.logger.log(&format!(
            "Loaded catalog {} with {} archives",
            path.as_ref().display(),
            catalog.archive_ids().len()
        ))?;
        Ok(catalog)
    }

    /// Run the workflow over a catalog
    ///
    /// Layers are collected in a registry and printed values are
    /// recorded instead of written to stdout.
    ///
    /// # Arguments
    /// * `catalog` - Scenes to process
    /// * `config` - Workflow parameters
    ///
    /// # Returns
    /// The report, the map layers and the printed lines, or an error
    pub fn run(&self, catalog: Catalog, config: &WorkflowConfig) -> RasterResult<RunOutcome> {
        info!("Running workflow on archive {}", config.collection.archive);

        let service = LocalImageryService::new(catalog);
        let mut map = LayerRegistry::new();
        let mut output = RecordingOutput::default();

        let report = Workflow::new(&service, config).run(&mut map, &mut output)?;

        self.logger.log_section("Workflow output", &output.lines)?;
        Ok(RunOutcome { report, map, printed: output.lines })
    }

    /// Explain QA codes under a named encoding
    ///
    /// # Arguments
    /// * `codes` - QA codes to evaluate
    /// * `encoding` - Encoding name, e.g. "landsat8_sr_pixel_qa"
    ///
    /// # Returns
    /// One line per code telling whether it is kept and which flags reject it
    pub fn explain_qa(&self, codes: &[u64], encoding: &str) -> RasterResult<Vec<String>> {
        let mask = QualityMask::new(qa::get_encoding(encoding)?);
        let lines: Vec<String> = codes.iter().map(|code| mask.explain(*code)).collect();
        self.logger.log_section(&format!("QA codes ({})", encoding), &lines)?;
        Ok(lines)
    }

    /// Describe the archives and scenes of a catalog file
    pub fn inspect<P: AsRef<Path>>(&self, path: P) -> RasterResult<Vec<String>> {
        let lines = self.load_catalog(path)?.describe();
        self.logger.log_section("Catalog", &lines)?;
        Ok(lines)
    }
}
