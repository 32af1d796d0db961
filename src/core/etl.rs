use crate::core::selector::SkipReason;
use crate::core::{InputRecord, Pipeline};
use crate::utils::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub rows_read: usize,
    pub selected: Vec<InputRecord>,
    pub skipped: BTreeMap<SkipReason, usize>,
    /// `None` when the run was a dry run.
    pub output_path: Option<String>,
}

pub struct ExportEngine<P: Pipeline> {
    pipeline: P,
    dry_run: bool,
}

impl<P: Pipeline> ExportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run(&self) -> Result<ExportSummary> {
        tracing::info!("Starting draft export");

        let records = self.pipeline.extract()?;
        tracing::info!("Extracted {} records", records.len());

        let result = self.pipeline.transform(records)?;
        tracing::info!(
            "Selected {} records for draft listing",
            result.selected.len()
        );
        for (reason, count) in &result.skipped {
            tracing::info!("Skipped {} records: {}", count, reason);
        }

        let output_path = if self.dry_run {
            tracing::info!("Dry run, upload file not written");
            None
        } else {
            let path = self.pipeline.load(&result)?;
            tracing::info!("Upload file saved to: {}", path);
            Some(path)
        };

        Ok(ExportSummary {
            rows_read: result.rows_read,
            selected: result.selected,
            skipped: result.skipped,
            output_path,
        })
    }
}
