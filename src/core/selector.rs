use crate::domain::model::InputRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_THRESHOLD: i64 = 70;
pub const DEFAULT_EXCLUSION_MARKER: &str = "sf";
pub const DEFAULT_LISTED_SENTINEL: &str = "FALSE";

/// Whether the "Listed" column takes part in selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListedFilter {
    #[default]
    Ignore,
    /// Keep only rows whose Listed value equals the sentinel exactly.
    RequireSentinel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingSku,
    ExcludedMarker,
    UnparsableSku,
    AtOrBelowThreshold,
    AlreadyListed,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingSku => "missing SKU",
            Self::ExcludedMarker => "exclusion marker in SKU",
            Self::UnparsableSku => "SKU is not an integer",
            Self::AtOrBelowThreshold => "SKU at or below threshold",
            Self::AlreadyListed => "already listed",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Selected(i64),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRule {
    /// SKUs less than or equal to this value are excluded.
    pub threshold: i64,
    pub exclusion_markers: Vec<String>,
    pub listed: ListedFilter,
}

impl Default for SelectionRule {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            exclusion_markers: vec![DEFAULT_EXCLUSION_MARKER.to_string()],
            listed: ListedFilter::Ignore,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub selected: Vec<InputRecord>,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl SelectionRule {
    pub fn new(threshold: i64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn with_exclusion_markers(mut self, markers: Vec<String>) -> Self {
        self.exclusion_markers = markers;
        self
    }

    pub fn with_listed(mut self, listed: ListedFilter) -> Self {
        self.listed = listed;
        self
    }

    pub fn evaluate(&self, record: &InputRecord) -> Verdict {
        let Some(raw) = record.sku() else {
            return Verdict::Skipped(SkipReason::MissingSku);
        };

        if self
            .exclusion_markers
            .iter()
            .any(|marker| !marker.is_empty() && raw.contains(marker.as_str()))
        {
            return Verdict::Skipped(SkipReason::ExcludedMarker);
        }

        let sku = match raw.trim().parse::<i64>() {
            Ok(sku) => sku,
            Err(_) => return Verdict::Skipped(SkipReason::UnparsableSku),
        };

        if sku <= self.threshold {
            return Verdict::Skipped(SkipReason::AtOrBelowThreshold);
        }

        if let ListedFilter::RequireSentinel(sentinel) = &self.listed {
            if record.listed() != Some(sentinel.as_str()) {
                return Verdict::Skipped(SkipReason::AlreadyListed);
            }
        }

        Verdict::Selected(sku)
    }

    /// Keeps matching records in input order and tallies the rest by reason.
    pub fn select<I>(&self, records: I) -> Selection
    where
        I: IntoIterator<Item = InputRecord>,
    {
        let mut selection = Selection::default();

        for record in records {
            match self.evaluate(&record) {
                Verdict::Selected(sku) => {
                    tracing::trace!("Selected SKU {}", sku);
                    selection.selected.push(record);
                }
                Verdict::Skipped(reason) => {
                    tracing::debug!("Skipping SKU {:?}: {}", record.sku().unwrap_or(""), reason);
                    *selection.skipped.entry(reason).or_insert(0) += 1;
                }
            }
        }

        selection
    }
}
