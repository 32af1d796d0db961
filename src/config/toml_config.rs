use crate::core::projector::{
    FieldDefaults, DEFAULT_CONDITION_ID, DEFAULT_DESCRIPTION, DEFAULT_PRICE, DEFAULT_QUANTITY,
    DEFAULT_TITLE,
};
use crate::core::selector::{
    ListedFilter, SelectionRule, DEFAULT_EXCLUSION_MARKER, DEFAULT_LISTED_SENTINEL,
    DEFAULT_THRESHOLD,
};
use crate::core::ConfigProvider;
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_INPUT_DIR: &str = "./input";
pub const DEFAULT_OUTPUT_DIR: &str = "./output";
pub const DEFAULT_OUTPUT_FILE: &str = "ebay_draft_listings.csv";

/// Full export configuration. Every section and key is optional in the TOML
/// file; anything left out keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub source: SourceConfig,
    pub selection: SelectionConfig,
    pub projection: ProjectionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Scanned for the newest `.csv` when no explicit file is given.
    pub input_dir: String,
    pub input_file: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            input_dir: DEFAULT_INPUT_DIR.to_string(),
            input_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub threshold: i64,
    pub exclusion_markers: Vec<String>,
    pub require_unlisted: bool,
    pub listed_sentinel: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            exclusion_markers: vec![DEFAULT_EXCLUSION_MARKER.to_string()],
            require_unlisted: false,
            listed_sentinel: DEFAULT_LISTED_SENTINEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub default_title: String,
    pub default_price: String,
    pub default_quantity: String,
    pub default_condition_id: String,
    pub default_description: String,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_TITLE.to_string(),
            default_price: DEFAULT_PRICE.to_string(),
            default_quantity: DEFAULT_QUANTITY.to_string(),
            default_condition_id: DEFAULT_CONDITION_ID.to_string(),
            default_description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_dir: String,
    pub file_name: String,
    /// Remove other `.csv` files from `output_dir` before writing.
    pub clean_stale: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            file_name: DEFAULT_OUTPUT_FILE.to_string(),
            clean_stale: true,
        }
    }
}

impl ExportConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExportError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${INPUT_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExportError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("source.input_dir", &self.source.input_dir)?;
        if let Some(file) = &self.source.input_file {
            validation::validate_path("source.input_file", file)?;
        }

        for marker in &self.selection.exclusion_markers {
            validation::validate_non_empty_string("selection.exclusion_markers", marker)?;
        }
        if self.selection.require_unlisted {
            validation::validate_non_empty_string(
                "selection.listed_sentinel",
                &self.selection.listed_sentinel,
            )?;
        }

        validation::validate_path("output.output_dir", &self.output.output_dir)?;
        validation::validate_file_name("output.file_name", &self.output.file_name, &["csv"])?;

        if self.output.clean_stale {
            self.validate_input_outside_output()?;
        }

        Ok(())
    }

    /// Stale cleanup removes every other `.csv` in the output directory, so
    /// the input must not live there while it is enabled.
    fn validate_input_outside_output(&self) -> Result<()> {
        let output_dir = validation::resolve_path(Path::new(&self.output.output_dir));
        let input_dir = match &self.source.input_file {
            Some(file) => Path::new(file)
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or(Path::new(".")),
            None => Path::new(&self.source.input_dir),
        };

        if validation::resolve_path(input_dir) == output_dir {
            return Err(ExportError::InvalidConfigValueError {
                field: "output.output_dir".to_string(),
                value: self.output.output_dir.clone(),
                reason: "Output directory also holds the input export; use a separate \
                         directory or set output.clean_stale = false"
                    .to_string(),
            });
        }

        Ok(())
    }
}

impl ConfigProvider for ExportConfig {
    fn input_dir(&self) -> &Path {
        Path::new(&self.source.input_dir)
    }

    fn input_file(&self) -> Option<&Path> {
        self.source.input_file.as_deref().map(Path::new)
    }

    fn output_dir(&self) -> &Path {
        Path::new(&self.output.output_dir)
    }

    fn output_file_name(&self) -> &str {
        &self.output.file_name
    }

    fn clean_stale_outputs(&self) -> bool {
        self.output.clean_stale
    }

    fn selection_rule(&self) -> SelectionRule {
        let listed = if self.selection.require_unlisted {
            ListedFilter::RequireSentinel(self.selection.listed_sentinel.clone())
        } else {
            ListedFilter::Ignore
        };

        SelectionRule::new(self.selection.threshold)
            .with_exclusion_markers(self.selection.exclusion_markers.clone())
            .with_listed(listed)
    }

    fn field_defaults(&self) -> FieldDefaults {
        FieldDefaults {
            title: self.projection.default_title.clone(),
            price: self.projection.default_price.clone(),
            quantity: self.projection.default_quantity.clone(),
            condition_id: self.projection.default_condition_id.clone(),
            description: self.projection.default_description.clone(),
        }
    }
}

impl Validate for ExportConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
