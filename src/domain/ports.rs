use crate::domain::model::{BooleanTokens, DestinationRecord, DestinationSchema};
use crate::utils::error::Result;
use std::path::Path;

/// Where run diagnostics go. Injected into the engine instead of a global logger.
pub trait Diagnostics {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    fn info(&self, message: &str) {
        (**self).info(message)
    }

    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

/// Destination for transformed rows.
pub trait RecordSink {
    fn write_header(&mut self, schema: &DestinationSchema) -> Result<()>;
    fn write_record(&mut self, record: &DestinationRecord) -> Result<()>;
    fn finish(&mut self) -> Result<()>;
}

pub trait ConfigProvider {
    fn input_path(&self) -> &Path;
    fn output_path(&self) -> &Path;
    fn template_path(&self) -> &Path;
    fn delimiter(&self) -> Result<u8>;
    fn boolean_tokens(&self) -> &BooleanTokens;
}
