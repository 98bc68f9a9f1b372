//! Upload entry point
//!
//! Orchestrates the ingestion pipeline: extension validation, fixed-width
//! parsing, batched concurrent persistence, and the aggregated response
//! summary. The CLI drives it directly; an HTTP front end would call
//! [`UploadOrders::execute`] the same way.

use std::path::Path;
use std::sync::Arc;

use crate::core::{group_and_sum, BatchConfig, BatchWriter};
use crate::io::parse_content;
use crate::repository::OrderRepository;
use crate::types::{OrderError, UploadSummary};

/// Message returned on a successful upload
const UPLOAD_OK_MESSAGE: &str = "TXT file processed and stored successfully";

/// Upload use case over an [`OrderRepository`]
#[derive(Clone)]
pub struct UploadOrders {
    writer: BatchWriter,
}

impl UploadOrders {
    /// Create the upload use case with the given batching configuration
    pub fn new(repository: Arc<dyn OrderRepository>, config: BatchConfig) -> Self {
        Self {
            writer: BatchWriter::new(repository, config),
        }
    }

    /// Ingest one uploaded file
    ///
    /// The returned summary's `data` is the aggregation of every
    /// successfully parsed record, not only the successfully saved ones;
    /// re-uploading an already ingested file reports zero saved orders
    /// but still returns the full aggregated view. This is intentional,
    /// preserved behavior.
    ///
    /// # Arguments
    ///
    /// * `file_name` - Original name of the uploaded file; must end in
    ///   `.txt` (case-insensitive)
    /// * `content` - Raw file bytes, decoded as UTF-8 (lossily)
    ///
    /// # Errors
    ///
    /// * [`OrderError::UnsupportedExtension`] for non-`.txt` files
    /// * [`OrderError::IndexDrop`] when the superseded index exists but
    ///   cannot be dropped; nothing is written in that case
    pub async fn execute(
        &self,
        file_name: &str,
        content: &[u8],
    ) -> Result<UploadSummary, OrderError> {
        validate_extension(file_name)?;

        let text = String::from_utf8_lossy(content);
        let parsed = parse_content(&text);
        tracing::info!(
            file_name,
            lines = parsed.lines,
            invalid_lines = parsed.invalid_lines,
            "parsed upload"
        );

        let written = self.writer.write(parsed.records.clone()).await?;
        let data = group_and_sum(&parsed.records);

        Ok(UploadSummary {
            message: UPLOAD_OK_MESSAGE.to_string(),
            file_name: file_name.to_string(),
            file_size: content.len(),
            lines: parsed.lines,
            saved_orders: written.saved,
            skipped_orders: written.skipped,
            data,
        })
    }
}

/// Require a `.txt` extension, case-insensitively
fn validate_extension(file_name: &str) -> Result<(), OrderError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str());
    match extension {
        Some(extension) if extension.eq_ignore_ascii_case("txt") => Ok(()),
        _ => Err(OrderError::unsupported_extension(file_name)),
    }
}
