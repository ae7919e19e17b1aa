//! Parsed create/edit form submissions.
//!
//! Create and edit both arrive as `multipart/form-data` with `name`,
//! `salary`, and an optional `file` part. Parsing keeps presence and value
//! separate so the validation layer can tell "salary omitted" apart from
//! "salary is zero".

use axum::extract::Multipart;
use serde_json::{Value, json};

use crate::errors::AppError;

/// An uploaded attachment: the client's filename plus the raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content: Vec<u8>,
}

/// A create/edit payload as submitted, before validation.
///
/// `salary` is `None` when the field was missing or not a number; the raw
/// text is kept in `salary_raw` so rejections can echo what was typed.
#[derive(Debug, Clone, Default)]
pub struct EmployeeSubmission {
    pub name: Option<String>,
    pub salary: Option<f64>,
    pub salary_raw: Option<String>,
    pub file: Option<UploadedFile>,
}

impl EmployeeSubmission {
    /// Drain a multipart stream into a submission.
    ///
    /// Unknown fields are ignored. A `file` part with an empty body or no
    /// filename counts as "no file supplied", matching browser behavior for
    /// an untouched file input.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut submission = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| AppError::bad_request(format!("malformed multipart body: {err}")))?
        {
            let field_name = field.name().map(str::to_string);
            match field_name.as_deref() {
                Some("name") => {
                    let value = field
                        .text()
                        .await
                        .map_err(|err| AppError::bad_request(format!("reading name: {err}")))?;
                    submission.name = Some(value);
                }
                Some("salary") => {
                    let value = field
                        .text()
                        .await
                        .map_err(|err| AppError::bad_request(format!("reading salary: {err}")))?;
                    submission.salary = value.trim().parse::<f64>().ok();
                    submission.salary_raw = Some(value);
                }
                Some("file") => {
                    let original_name = field.file_name().map(str::to_string);
                    let content = field
                        .bytes()
                        .await
                        .map_err(|err| AppError::bad_request(format!("reading file: {err}")))?;
                    if let Some(original_name) = original_name {
                        if !content.is_empty() {
                            submission.file = Some(UploadedFile {
                                original_name,
                                content: content.to_vec(),
                            });
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(submission)
    }

    /// What the user typed, echoed back on validation failure.
    pub fn echo(&self) -> Value {
        json!({
            "name": self.name,
            "salary": self.salary_raw,
        })
    }
}
