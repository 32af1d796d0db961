use crate::config::toml_config::ExportConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Command-line options. Anything given here overrides the TOML file.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "draft-export")]
#[command(about = "Turn an inventory CSV export into a marketplace draft-listing upload file")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory scanned for the newest inventory CSV
    #[arg(long)]
    pub input_dir: Option<String>,

    /// Read this CSV file instead of scanning the input directory
    #[arg(short, long)]
    pub input: Option<String>,

    /// Directory the upload file is written to
    #[arg(long)]
    pub output_dir: Option<String>,

    /// File name of the upload file
    #[arg(long)]
    pub output_name: Option<String>,

    /// Exclude SKUs less than or equal to this value
    #[arg(short, long, allow_negative_numbers = true)]
    pub threshold: Option<i64>,

    /// SKU substrings that exclude a row (replaces the configured list)
    #[arg(long = "exclude-marker", value_delimiter = ',')]
    pub exclusion_markers: Vec<String>,

    /// Only export rows whose Listed column equals the sentinel
    #[arg(long)]
    pub require_unlisted: bool,

    /// Listed value meaning "not yet listed"
    #[arg(long)]
    pub listed_sentinel: Option<String>,

    /// Description used when a row has none
    #[arg(long)]
    pub description: Option<String>,

    /// Leave other CSV files in the output directory untouched
    #[arg(long)]
    pub keep_stale: bool,

    /// Print the selected records as JSON on stdout
    #[arg(long)]
    pub print_selected: bool,

    /// Select and render, but do not write the upload file
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl CliConfig {
    /// 載入 TOML 配置 (若有指定) 並套用命令列覆蓋設定
    pub fn load_config(&self) -> Result<ExportConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                ExportConfig::from_file(path)?
            }
            None => ExportConfig::default(),
        };

        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut ExportConfig) {
        if let Some(dir) = &self.input_dir {
            config.source.input_dir = dir.clone();
        }
        if let Some(file) = &self.input {
            config.source.input_file = Some(file.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.output.output_dir = dir.clone();
        }
        if let Some(name) = &self.output_name {
            config.output.file_name = name.clone();
        }
        if let Some(threshold) = self.threshold {
            config.selection.threshold = threshold;
        }
        if !self.exclusion_markers.is_empty() {
            config.selection.exclusion_markers = self.exclusion_markers.clone();
        }
        if self.require_unlisted {
            config.selection.require_unlisted = true;
        }
        if let Some(sentinel) = &self.listed_sentinel {
            config.selection.listed_sentinel = sentinel.clone();
        }
        if let Some(description) = &self.description {
            config.projection.default_description = description.clone();
        }
        if self.keep_stale {
            config.output.clean_stale = false;
        }
    }
}
