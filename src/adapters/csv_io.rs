use crate::domain::model::{BooleanTokens, DestinationRecord, DestinationSchema, SourceRecord};
use crate::domain::ports::RecordSink;
use crate::utils::error::{EtlError, Result};
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

const BYTE_ORDER_MARK: char = '\u{feff}';

fn reader_builder(delimiter: u8) -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    // short rows must reach the transformer so the missing column can be reported
    builder.delimiter(delimiter).has_headers(true).flexible(true);
    builder
}

fn header_names(headers: &StringRecord) -> Vec<String> {
    headers
        .iter()
        .enumerate()
        .map(|(index, name)| {
            if index == 0 {
                name.trim_start_matches(BYTE_ORDER_MARK).to_string()
            } else {
                name.to_string()
            }
        })
        .collect()
}

/// Reads catalog rows as [`SourceRecord`]s keyed by the header row.
pub struct CsvRecordReader<R: Read> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    position: u64,
}

impl CsvRecordReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(file, delimiter)
    }
}

impl<R: Read> CsvRecordReader<R> {
    pub fn new(input: R, delimiter: u8) -> Result<Self> {
        let mut reader = reader_builder(delimiter).from_reader(input);
        let headers = header_names(reader.headers()?);
        Ok(Self {
            reader,
            headers,
            position: 0,
        })
    }

    /// Names from `required` that the header row lacks.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| !self.headers.iter().any(|header| header == *name))
            .map(|name| name.to_string())
            .collect()
    }
}

impl<R: Read> Iterator for CsvRecordReader<R> {
    type Item = Result<SourceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut row = StringRecord::new();
        match self.reader.read_record(&mut row) {
            Ok(false) => None,
            Ok(true) => {
                self.position += 1;
                let fields = self
                    .headers
                    .iter()
                    .cloned()
                    .zip(row.iter().map(str::to_string))
                    .collect();
                Some(Ok(SourceRecord::new(self.position, fields)))
            }
            Err(e) => {
                self.position += 1;
                Some(Err(EtlError::CsvError(e)))
            }
        }
    }
}

/// Reads only the header row of the template file.
pub fn read_template_schema<R: Read>(input: R, delimiter: u8) -> Result<DestinationSchema> {
    let mut reader = reader_builder(delimiter).from_reader(input);
    let names = header_names(reader.headers()?);

    if names.is_empty() || names.iter().all(|name| name.trim().is_empty()) {
        return Err(EtlError::ValidationError {
            message: "template file has no header row".to_string(),
        });
    }

    Ok(DestinationSchema::new(names))
}

pub fn template_schema_from_path<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<DestinationSchema> {
    let file = File::open(path)?;
    read_template_schema(file, delimiter)
}

/// Writes transformed rows as delimited text, one row per record.
pub struct CsvRecordSink<W: Write> {
    writer: csv::Writer<W>,
    tokens: BooleanTokens,
}

impl CsvRecordSink<File> {
    pub fn create<P: AsRef<Path>>(path: P, delimiter: u8, tokens: BooleanTokens) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(file, delimiter, tokens))
    }
}

impl<W: Write> CsvRecordSink<W> {
    pub fn new(output: W, delimiter: u8, tokens: BooleanTokens) -> Self {
        let writer = WriterBuilder::new()
            .delimiter(delimiter)
            .terminator(Terminator::CRLF)
            .flexible(false)
            .from_writer(output);
        Self { writer, tokens }
    }
}

impl<W: Write> RecordSink for CsvRecordSink<W> {
    fn write_header(&mut self, schema: &DestinationSchema) -> Result<()> {
        self.writer.write_record(schema.fields())?;
        Ok(())
    }

    fn write_record(&mut self, record: &DestinationRecord) -> Result<()> {
        self.writer.write_record(record.render(&self.tokens))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
