pub mod etl;
pub mod transformer;

pub use crate::domain::model::{DestinationRecord, DestinationSchema, DestinationValue, SourceRecord};
pub use crate::domain::ports::{ConfigProvider, Diagnostics, RecordSink};
pub use crate::utils::error::Result;
