//! Bridge library for submitting typed record batches to the provincial
//! health reporting platform.
//!
//! A host process hands over a variant name, a target service name and an
//! array of raw data (positional rows or JSON objects). The bridge builds
//! sequence-numbered records from the registered variant shapes, posts the
//! batch in one request and returns a plain string: the platform response
//! as JSON, or an `"ERROR - "` prefixed reason.

pub mod api_contracts;
pub mod coerce;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod registry;
pub mod service_client;
pub mod uploader;

#[cfg(test)]
mod test_harness;

pub use api_contracts::ApiResponse;
pub use config::UploaderConfig;
pub use error::UploadError;
pub use record::{FieldType, FieldValue, Record, DATE_FORMAT};
pub use registry::{FieldDef, Shape, VariantDescriptor, VariantRegistry};
pub use service_client::ServiceClient;
pub use uploader::{Uploader, MAX_BATCH};
