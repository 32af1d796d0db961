use crate::core::projector::Projector;
use crate::core::selector::SelectionRule;
use crate::core::{
    ConfigProvider, InputRecord, ListingSink, Pipeline, RecordSource, TransformResult,
};
use crate::utils::error::Result;

pub struct DraftPipeline<S: RecordSource, K: ListingSink> {
    source: S,
    sink: K,
    rule: SelectionRule,
    projector: Projector,
}

impl<S: RecordSource, K: ListingSink> DraftPipeline<S, K> {
    pub fn new(source: S, sink: K, rule: SelectionRule, projector: Projector) -> Self {
        Self {
            source,
            sink,
            rule,
            projector,
        }
    }

    pub fn from_config<C: ConfigProvider>(source: S, sink: K, config: &C) -> Self {
        Self::new(
            source,
            sink,
            config.selection_rule(),
            Projector::new(config.field_defaults()),
        )
    }
}

impl<S: RecordSource, K: ListingSink> Pipeline for DraftPipeline<S, K> {
    fn extract(&self) -> Result<Vec<InputRecord>> {
        tracing::debug!("Reading records from {}", self.source.describe());
        self.source.read_records()
    }

    fn transform(&self, records: Vec<InputRecord>) -> Result<TransformResult> {
        let rows_read = records.len();
        let selection = self.rule.select(records);

        tracing::debug!(
            "Selected {} of {} records (threshold {})",
            selection.selected.len(),
            rows_read,
            self.rule.threshold
        );

        let document = self.projector.render(&selection.selected)?;

        Ok(TransformResult {
            rows_read,
            selected: selection.selected,
            skipped: selection.skipped,
            document,
        })
    }

    fn load(&self, result: &TransformResult) -> Result<String> {
        tracing::debug!("Writing upload file ({} bytes)", result.document.len());
        self.sink.write_document(&result.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::selector::{ListedFilter, SkipReason};
    use crate::domain::model::columns;
    use crate::utils::error::ExportError;
    use std::cell::RefCell;

    struct MockSource {
        records: Vec<InputRecord>,
    }

    impl RecordSource for MockSource {
        fn describe(&self) -> String {
            "memory".to_string()
        }

        fn read_records(&self) -> Result<Vec<InputRecord>> {
            Ok(self.records.clone())
        }
    }

    #[derive(Default)]
    struct MockSink {
        written: RefCell<Option<Vec<u8>>>,
        fail: bool,
    }

    impl ListingSink for MockSink {
        fn write_document(&self, document: &[u8]) -> Result<String> {
            if self.fail {
                return Err(ExportError::write_failure(
                    "memory.csv",
                    std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
                ));
            }
            *self.written.borrow_mut() = Some(document.to_vec());
            Ok("memory.csv".to_string())
        }
    }

    fn sku_record(sku: &str, listed: &str) -> InputRecord {
        [(columns::SKU, sku), (columns::LISTED, listed)]
            .into_iter()
            .collect()
    }

    fn source(skus: &[(&str, &str)]) -> MockSource {
        MockSource {
            records: skus.iter().map(|(s, l)| sku_record(s, l)).collect(),
        }
    }

    #[test]
    fn test_transform_selects_and_renders() {
        let pipeline = DraftPipeline::new(
            source(&[]),
            MockSink::default(),
            SelectionRule::new(70),
            Projector::default(),
        );
        let records = source(&[("70", "FALSE"), ("71", "TRUE"), ("sf80", "FALSE")]).records;

        let result = pipeline.transform(records).unwrap();

        assert_eq!(result.rows_read, 3);
        assert_eq!(result.selected.len(), 1);
        assert_eq!(result.selected[0].sku(), Some("71"));
        assert_eq!(result.skipped[&SkipReason::AtOrBelowThreshold], 1);
        assert_eq!(result.skipped[&SkipReason::ExcludedMarker], 1);

        let text = String::from_utf8(result.document).unwrap();
        assert_eq!(text.split_terminator("\r\n").count(), 6);
    }

    #[test]
    fn test_listed_filter_flows_through_pipeline() {
        let rule = SelectionRule::new(70)
            .with_listed(ListedFilter::RequireSentinel("FALSE".to_string()));
        let pipeline = DraftPipeline::new(
            source(&[("71", "TRUE"), ("72", "FALSE")]),
            MockSink::default(),
            rule,
            Projector::default(),
        );

        let records = pipeline.extract().unwrap();
        let result = pipeline.transform(records).unwrap();

        assert_eq!(result.selected.len(), 1);
        assert_eq!(result.selected[0].sku(), Some("72"));
        assert_eq!(result.skipped[&SkipReason::AlreadyListed], 1);
    }

    #[test]
    fn test_load_hands_document_to_sink() {
        let pipeline = DraftPipeline::new(
            source(&[("100", "FALSE")]),
            MockSink::default(),
            SelectionRule::default(),
            Projector::default(),
        );

        let records = pipeline.extract().unwrap();
        let result = pipeline.transform(records).unwrap();
        let location = pipeline.load(&result).unwrap();

        assert_eq!(location, "memory.csv");
        assert_eq!(
            pipeline.sink.written.borrow().as_deref(),
            Some(result.document.as_slice())
        );
    }

    #[test]
    fn test_load_propagates_write_failure() {
        let pipeline = DraftPipeline::new(
            source(&[]),
            MockSink {
                fail: true,
                ..MockSink::default()
            },
            SelectionRule::default(),
            Projector::default(),
        );

        let result = pipeline.transform(Vec::new()).unwrap();

        assert!(matches!(
            pipeline.load(&result),
            Err(ExportError::WriteFailure { .. })
        ));
    }
}
