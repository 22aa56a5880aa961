use crate::adapters::csv_io::{template_schema_from_path, CsvRecordReader, CsvRecordSink};
use crate::core::transformer::{RowTransformer, TransformOptions, DESTINATION_FIELDS, REQUIRED_SOURCE_FIELDS};
use crate::domain::model::{DestinationSchema, SourceRecord};
use crate::domain::ports::{ConfigProvider, Diagnostics, RecordSink};
use crate::utils::error::Result;

/// A row that was left out of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub position: u64,
    pub identifier: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub failures: Vec<RowFailure>,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Drives rows through the [`RowTransformer`] one at a time. A failing row is
/// reported and skipped; only fatal errors end the run.
pub struct EtlEngine<D: Diagnostics> {
    transformer: RowTransformer,
    diagnostics: D,
}

impl<D: Diagnostics> EtlEngine<D> {
    pub fn new(transformer: RowTransformer, diagnostics: D) -> Self {
        Self {
            transformer,
            diagnostics,
        }
    }

    pub fn with_options(options: TransformOptions, diagnostics: D) -> Self {
        Self::new(RowTransformer::new(options), diagnostics)
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Writes the header and then every transformable row of `source` to `sink`.
    pub fn run<I, S>(&self, source: I, schema: &DestinationSchema, sink: &mut S) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<SourceRecord>>,
        S: RecordSink,
    {
        let mut summary = RunSummary::default();
        sink.write_header(schema)?;

        let mut position = 0;
        for row in source {
            position += 1;
            let record = match row {
                Ok(record) => record,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    self.record_failure(&mut summary, position, format!("row {}", position), e.to_string());
                    continue;
                }
            };
            position = record.position;

            let identifier = record.identifier();
            self.diagnostics
                .info(&format!("processing item {}", identifier));

            match self.transformer.transform(&record, schema) {
                Ok(destination) => {
                    sink.write_record(&destination)?;
                    summary.processed += 1;
                }
                Err(e) => {
                    self.record_failure(&mut summary, record.position, identifier, e.to_string())
                }
            }
        }

        sink.finish()?;
        self.diagnostics
            .info(&format!("items converted: {}", summary.processed));
        Ok(summary)
    }

    fn record_failure(&self, summary: &mut RunSummary, position: u64, identifier: String, reason: String) {
        self.diagnostics
            .error(&format!("failed to process item {}: {}", identifier, reason));
        summary.failures.push(RowFailure {
            position,
            identifier,
            reason,
        });
    }

    /// Converts the files named by `config`. Missing or unreadable files abort the run.
    pub fn run_files<C: ConfigProvider>(&self, config: &C) -> Result<RunSummary> {
        self.diagnostics.info("conversion started");

        self.diagnostics.info(&format!(
            "opening input {}, template {} and output {}",
            config.input_path().display(),
            config.template_path().display(),
            config.output_path().display()
        ));
        let delimiter = config.delimiter()?;
        let source = CsvRecordReader::from_path(config.input_path(), delimiter)?;
        let schema = template_schema_from_path(config.template_path(), delimiter)?;
        let mut sink = CsvRecordSink::create(
            config.output_path(),
            delimiter,
            config.boolean_tokens().clone(),
        )?;

        let missing = source.missing_columns(&REQUIRED_SOURCE_FIELDS);
        if !missing.is_empty() {
            self.diagnostics.error(&format!(
                "input header lacks required columns, every row will be skipped: {}",
                missing.join(", ")
            ));
        }

        let coverage = schema.coverage(&DESTINATION_FIELDS);
        if !coverage.unmapped.is_empty() {
            tracing::warn!(
                "template columns without a rule will be left empty: {}",
                coverage.unmapped.join(", ")
            );
        }
        if !coverage.dropped.is_empty() {
            tracing::debug!(
                "derived fields not present in the template: {}",
                coverage.dropped.join(", ")
            );
        }

        self.diagnostics.info(&format!(
            "converting {} into {}",
            config.input_path().display(),
            config.output_path().display()
        ));
        let summary = self.run(source, &schema, &mut sink)?;

        self.diagnostics.info("conversion finished");
        Ok(summary)
    }
}
