//! Upload entry points.
//!
//! The two bridge calls: positional rows and JSON objects. Both validate
//! the batch, build sequence-numbered records, post them in one request and
//! hand back a plain string — the platform envelope as JSON on success, an
//! `"ERROR - "` prefixed reason on any failure. Nothing is raised across
//! this boundary; the caller can only string-match.

use serde_json::Value;
use tracing::{info, warn};

use crate::coerce::coerce;
use crate::config::{load_registry, UploaderConfig};
use crate::error::UploadError;
use crate::record::Record;
use crate::registry::{Shape, VariantRegistry};
use crate::service_client::ServiceClient;

/// Largest batch the platform accepts in one call.
pub const MAX_BATCH: usize = 1000;

/// Bridge facade: a variant registry plus a configured platform client.
pub struct Uploader {
    registry: VariantRegistry,
    client: ServiceClient,
}

impl Uploader {
    pub fn new(registry: VariantRegistry, client: ServiceClient) -> Self {
        Self { registry, client }
    }

    /// Build an uploader from a loaded configuration, reading the variant
    /// registry from the configured file if one is set.
    pub fn from_config(config: &UploaderConfig) -> Result<Self, String> {
        let registry = match &config.registry_file {
            Some(path) => load_registry(path)?,
            None => VariantRegistry::new(),
        };
        let client = ServiceClient::with_timeout(
            config.base_url.clone(),
            config.access_token.clone(),
            std::time::Duration::from_secs(config.timeout_secs),
        );
        Ok(Self::new(registry, client))
    }

    /// Build an uploader from the saved configuration file.
    ///
    /// Returns `Ok(None)` when no configuration has been saved yet.
    pub fn from_saved_config() -> Result<Option<Self>, String> {
        match UploaderConfig::load()? {
            Some(config) => Ok(Some(Self::from_config(&config)?)),
            None => Ok(None),
        }
    }

    /// Upload positional rows.
    ///
    /// Each element of `rows` must be a JSON array of field values in the
    /// variant's declared order; the first row's field count selects the
    /// shape. Returns the platform response as JSON text, or a string
    /// starting with `"ERROR - "` on failure.
    pub async fn upload_rows(&self, variant: &str, service: &str, rows: &[Value]) -> String {
        match self.try_upload_rows(variant, service, rows).await {
            Ok(text) => text,
            Err(e) => e.to_response_text(),
        }
    }

    /// Upload JSON objects.
    ///
    /// Each element of `objects` must be a JSON object keyed by field name;
    /// fields are matched against the variant's first-declared shape.
    /// Returns the same string contract as [`Uploader::upload_rows`].
    pub async fn upload_json(&self, variant: &str, service: &str, objects: &[Value]) -> String {
        match self.try_upload_json(variant, service, objects).await {
            Ok(text) => text,
            Err(e) => e.to_response_text(),
        }
    }

    async fn try_upload_rows(
        &self,
        variant: &str,
        service: &str,
        rows: &[Value],
    ) -> Result<String, UploadError> {
        check_batch_size(rows.len())?;
        let descriptor = self
            .registry
            .get(variant)
            .ok_or_else(|| UploadError::UnknownVariant(variant.to_string()))?;

        let first = rows[0].as_array().ok_or(UploadError::RowNotArray(1))?;
        let shape = descriptor
            .shape_for_arity(first.len())
            .ok_or_else(|| UploadError::NoMatchingShape {
                variant: variant.to_string(),
                arity: first.len(),
            })?;

        let mut batch = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let values = row.as_array().ok_or(UploadError::RowNotArray(index + 1))?;
            if values.len() != shape.arity() {
                // Mismatched rows are dropped, not fatal. The caller gets no
                // per-row signal in the response, only this log line.
                warn!(
                    variant,
                    row = index + 1,
                    expected = shape.arity(),
                    got = values.len(),
                    "dropping row with mismatched field count"
                );
                continue;
            }
            // Skipped rows still consume their sequence number.
            batch.push(build_positional(variant, shape, values, index + 1)?);
        }

        self.submit(variant, service, batch).await
    }

    async fn try_upload_json(
        &self,
        variant: &str,
        service: &str,
        objects: &[Value],
    ) -> Result<String, UploadError> {
        check_batch_size(objects.len())?;
        let descriptor = self
            .registry
            .get(variant)
            .ok_or_else(|| UploadError::UnknownVariant(variant.to_string()))?;
        let shape = descriptor
            .primary_shape()
            .ok_or_else(|| UploadError::NoMatchingShape {
                variant: variant.to_string(),
                arity: 0,
            })?;

        let mut batch = Vec::with_capacity(objects.len());
        for (index, element) in objects.iter().enumerate() {
            let object = element
                .as_object()
                .ok_or(UploadError::ElementNotObject(index + 1))?;
            let mut fields = Vec::with_capacity(shape.arity());
            for def in &shape.fields {
                // Absent fields stay null; unknown keys are ignored.
                let value = object.get(&def.name).unwrap_or(&Value::Null);
                fields.push((def.name.clone(), coerce(def, value)?));
            }
            batch.push(Record::new(variant, index + 1, fields));
        }

        self.submit(variant, service, batch).await
    }

    async fn submit(
        &self,
        variant: &str,
        service: &str,
        batch: Vec<Record>,
    ) -> Result<String, UploadError> {
        if batch.is_empty() {
            return Err(UploadError::NoRecords);
        }
        let response = self.client.post(service, &batch).await?;
        info!(
            variant,
            service,
            records = batch.len(),
            code = response.code,
            "batch accepted"
        );
        Ok(serde_json::to_string(&response)?)
    }
}

fn check_batch_size(len: usize) -> Result<(), UploadError> {
    if !(1..=MAX_BATCH).contains(&len) {
        return Err(UploadError::BatchSize(len));
    }
    Ok(())
}

fn build_positional(
    variant: &str,
    shape: &Shape,
    values: &[Value],
    seq_num: usize,
) -> Result<Record, UploadError> {
    let mut fields = Vec::with_capacity(shape.arity());
    for (def, value) in shape.fields.iter().zip(values) {
        fields.push((def.name.clone(), coerce(def, value)?));
    }
    Ok(Record::new(variant, seq_num, fields))
}
