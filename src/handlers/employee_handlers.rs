//! HTTP handlers for the employee CRUD operations.
//!
//! Handlers are thin: they parse the multipart form and delegate to the
//! orchestration functions below, which run validate -> file store ->
//! record store in that order. Validation always happens before any byte
//! touches disk, so a rejected form can never leave an orphaned attachment.

use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use std::io::ErrorKind;
use tokio_util::io::ReaderStream;
use tracing::warn;

use crate::{
    errors::AppError,
    models::{
        employee::{Employee, EmployeeSummary, NewEmployee},
        forms::EmployeeSubmission,
    },
    services::file_store::{ATTACHMENT_FOLDER, FileStoreError},
    state::AppState,
    validation::validate_submission,
};

/// Optional lookup parameter on the list route.
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub id: Option<i64>,
}

/// GET `/employees` — all rows, or a single-element array for `?id=N`.
/// An unknown id is a 404, same as every other lookup in the service.
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<Vec<EmployeeSummary>>, AppError> {
    let rows = match query.id {
        Some(id) => vec![state.employees.get_by_id(id).await?.into()],
        None => state.employees.list().await?,
    };
    Ok(Json(rows))
}

/// GET `/employees/{id}` — the full row, backing the edit and
/// delete-confirmation views.
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Employee>, AppError> {
    Ok(Json(state.employees.get_by_id(id).await?))
}

/// POST `/employees` — create from a multipart form, then redirect to the
/// list.
pub async fn create_employee(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let submission = EmployeeSubmission::from_multipart(multipart).await?;
    create_record(&state, submission).await?;
    Ok(Redirect::to("/employees"))
}

/// POST `/employees/{id}` — edit from a multipart form, then redirect to
/// the list.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let submission = EmployeeSubmission::from_multipart(multipart).await?;
    update_record(&state, id, submission).await?;
    Ok(Redirect::to("/employees"))
}

/// DELETE `/employees/{id}` — confirmed deletion, then redirect to the list.
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    delete_record(&state, id).await?;
    Ok(Redirect::to("/employees"))
}

/// GET `/files/{filename}` — stream a stored attachment.
pub async fn download_attachment(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let (file, len) = state
        .files
        .open(ATTACHMENT_FOLDER, &filename)
        .await
        .map_err(|err| match err {
            FileStoreError::Io(ref io_err) if io_err.kind() == ErrorKind::NotFound => {
                AppError::not_found(format!("attachment `{filename}` not found"))
            }
            FileStoreError::InvalidFilename(_) => AppError::bad_request(err.to_string()),
            other => other.into(),
        })?;

    let mut response = Response::new(Body::from_stream(ReaderStream::new(file)));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    if let Ok(value) = HeaderValue::from_str(&len.to_string()) {
        response.headers_mut().insert(header::CONTENT_LENGTH, value);
    }
    *response.status_mut() = StatusCode::OK;
    Ok(response)
}

/// Validate, store the attachment if one was supplied, insert the row.
///
/// A stored attachment is removed again if the insert fails, so a failed
/// create leaves neither a row nor a file behind.
pub(crate) async fn create_record(
    state: &AppState,
    submission: EmployeeSubmission,
) -> Result<Employee, AppError> {
    let valid = validate_submission(&submission)
        .map_err(|fields| AppError::validation(&fields, submission.echo()))?;

    let mut stored_file = None;
    if let Some(upload) = &submission.file {
        let generated = state
            .files
            .store(ATTACHMENT_FOLDER, &upload.original_name, &upload.content)
            .await?;
        stored_file = Some(generated);
    }

    let insert_result = state
        .employees
        .insert(NewEmployee {
            name: valid.name,
            salary: valid.salary,
            file: stored_file.clone(),
            created_on: Utc::now(),
        })
        .await;

    match insert_result {
        Ok(employee) => Ok(employee),
        Err(err) => {
            if let Some(generated) = stored_file {
                if let Err(cleanup_err) =
                    state.files.remove(ATTACHMENT_FOLDER, &generated).await
                {
                    warn!("could not remove attachment after failed insert: {cleanup_err}");
                }
            }
            Err(err.into())
        }
    }
}

/// Fetch, validate, persist the edit.
///
/// With a replacement attachment the new file is stored before the row is
/// updated; the old file is removed only after the update succeeds, so the
/// row never references a file that was deleted ahead of a failure.
pub(crate) async fn update_record(
    state: &AppState,
    id: i64,
    submission: EmployeeSubmission,
) -> Result<Employee, AppError> {
    let mut employee = state.employees.get_by_id(id).await?;

    let valid = validate_submission(&submission)
        .map_err(|fields| AppError::validation(&fields, submission.echo()))?;

    employee.name = valid.name;
    employee.salary = valid.salary;
    employee.updated_on = Some(Utc::now());

    let previous_file = employee.file.clone();
    let mut replacement = None;
    if let Some(upload) = &submission.file {
        let generated = state
            .files
            .store(ATTACHMENT_FOLDER, &upload.original_name, &upload.content)
            .await?;
        employee.file = Some(generated.clone());
        replacement = Some(generated);
    }

    if let Err(err) = state.employees.update(&employee).await {
        if let Some(generated) = replacement {
            if let Err(cleanup_err) = state.files.remove(ATTACHMENT_FOLDER, &generated).await {
                warn!("could not remove attachment after failed update: {cleanup_err}");
            }
        }
        return Err(err.into());
    }

    if replacement.is_some() {
        if let Some(old) = previous_file {
            if let Err(err) = state.files.remove(ATTACHMENT_FOLDER, &old).await {
                warn!("could not remove replaced attachment `{old}`: {err}");
            }
        }
    }

    Ok(employee)
}

/// Fetch, remove the attachment if present, delete the row.
pub(crate) async fn delete_record(state: &AppState, id: i64) -> Result<(), AppError> {
    let employee = state.employees.get_by_id(id).await?;

    if let Some(filename) = &employee.file {
        // A missing file is tolerated; an I/O failure aborts before the row
        // is touched so no row ever ends up pointing at a half-deleted file.
        state.files.remove(ATTACHMENT_FOLDER, filename).await?;
    }

    state.employees.delete(id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forms::UploadedFile;
    use crate::services::employee_store::tests::test_pool;
    use crate::services::file_store::RemoveStatus;
    use axum::http::StatusCode;
    use tempfile::TempDir;

    async fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(test_pool().await, dir.path());
        (state, dir)
    }

    fn submission(name: Option<&str>, salary: Option<f64>) -> EmployeeSubmission {
        EmployeeSubmission {
            name: name.map(str::to_string),
            salary,
            salary_raw: salary.map(|s| s.to_string()),
            file: None,
        }
    }

    fn submission_with_file(
        name: &str,
        salary: f64,
        file_name: &str,
        content: &[u8],
    ) -> EmployeeSubmission {
        EmployeeSubmission {
            file: Some(UploadedFile {
                original_name: file_name.to_string(),
                content: content.to_vec(),
            }),
            ..submission(Some(name), Some(salary))
        }
    }

    fn attachment_count(dir: &TempDir) -> usize {
        let folder = dir.path().join(ATTACHMENT_FOLDER);
        if !folder.exists() {
            return 0;
        }
        std::fs::read_dir(folder).unwrap().count()
    }

    #[tokio::test]
    async fn create_persists_row_visible_in_list() {
        let (state, _dir) = test_state().await;

        let before = Utc::now();
        let created = create_record(&state, submission(Some("Alice"), Some(50_000.0)))
            .await
            .unwrap();
        assert!(created.created_on >= before);

        let listed = state.employees.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Alice");
        assert_eq!(listed[0].salary, 50_000.0);
        assert_eq!(listed[0].file, None);
    }

    #[tokio::test]
    async fn invalid_create_persists_nothing_and_keeps_no_file() {
        let (state, dir) = test_state().await;

        let err = create_record(
            &state,
            EmployeeSubmission {
                file: Some(UploadedFile {
                    original_name: "f.png".to_string(),
                    content: b"png".to_vec(),
                }),
                ..submission(None, Some(1.0))
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(state.employees.list().await.unwrap().is_empty());
        assert_eq!(attachment_count(&dir), 0);
    }

    #[tokio::test]
    async fn create_with_file_stores_attachment_and_reference() {
        let (state, dir) = test_state().await;

        let created = create_record(
            &state,
            submission_with_file("Alice", 50_000.0, "photo.png", b"png-bytes"),
        )
        .await
        .unwrap();

        let filename = created.file.unwrap();
        assert!(filename.ends_with("photo.png"));
        assert_eq!(attachment_count(&dir), 1);
        assert!(dir.path().join(ATTACHMENT_FOLDER).join(&filename).exists());
    }

    #[tokio::test]
    async fn edit_unknown_id_is_not_found_and_mutates_nothing() {
        let (state, dir) = test_state().await;

        let err = update_record(&state, 99, submission(Some("Nobody"), Some(1.0)))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(state.employees.list().await.unwrap().is_empty());
        assert_eq!(attachment_count(&dir), 0);
    }

    #[tokio::test]
    async fn edit_without_file_preserves_existing_reference() {
        let (state, _dir) = test_state().await;

        let created = create_record(
            &state,
            submission_with_file("Alice", 50_000.0, "photo.png", b"png"),
        )
        .await
        .unwrap();
        let original_file = created.file.clone().unwrap();

        let updated = update_record(&state, created.id, submission(Some("Alice B"), Some(55_000.0)))
            .await
            .unwrap();

        assert_eq!(updated.name, "Alice B");
        assert_eq!(updated.salary, 55_000.0);
        assert_eq!(updated.file.as_deref(), Some(original_file.as_str()));
        assert!(updated.updated_on.is_some());
    }

    #[tokio::test]
    async fn edit_with_file_replaces_old_attachment() {
        let (state, dir) = test_state().await;

        let created = create_record(
            &state,
            submission_with_file("Alice", 50_000.0, "old.png", b"old"),
        )
        .await
        .unwrap();
        let old_file = created.file.clone().unwrap();

        let updated = update_record(
            &state,
            created.id,
            submission_with_file("Alice B", 55_000.0, "f.png", b"new"),
        )
        .await
        .unwrap();

        let new_file = updated.file.unwrap();
        assert!(new_file.ends_with("f.png"));
        assert_ne!(new_file, old_file);
        assert_eq!(attachment_count(&dir), 1);
        assert!(!dir.path().join(ATTACHMENT_FOLDER).join(&old_file).exists());

        let fetched = state.employees.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.file.as_deref(), Some(new_file.as_str()));
    }

    #[tokio::test]
    async fn invalid_edit_echoes_submission_and_changes_nothing() {
        let (state, _dir) = test_state().await;

        let created = create_record(&state, submission(Some("Alice"), Some(50_000.0)))
            .await
            .unwrap();

        let err = update_record(&state, created.id, submission(Some("ab"), Some(-1.0)))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.details.is_some());

        let fetched = state.employees.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.name, "Alice");
        assert!(fetched.updated_on.is_none());
    }

    #[tokio::test]
    async fn delete_removes_row_and_attachment() {
        let (state, dir) = test_state().await;

        let created = create_record(
            &state,
            submission_with_file("Alice", 50_000.0, "photo.png", b"png"),
        )
        .await
        .unwrap();
        let filename = created.file.clone().unwrap();

        delete_record(&state, created.id).await.unwrap();

        assert!(state.employees.list().await.unwrap().is_empty());
        assert_eq!(attachment_count(&dir), 0);
        assert_eq!(
            state
                .files
                .remove(ATTACHMENT_FOLDER, &filename)
                .await
                .unwrap(),
            RemoveStatus::NotFound
        );
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let (state, _dir) = test_state().await;
        let err = delete_record(&state, 7).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_tolerates_already_missing_attachment() {
        let (state, dir) = test_state().await;

        let created = create_record(
            &state,
            submission_with_file("Alice", 50_000.0, "photo.png", b"png"),
        )
        .await
        .unwrap();

        // Simulate an attachment lost out-of-band.
        let filename = created.file.clone().unwrap();
        std::fs::remove_file(dir.path().join(ATTACHMENT_FOLDER).join(&filename)).unwrap();

        delete_record(&state, created.id).await.unwrap();
        assert!(state.employees.list().await.unwrap().is_empty());
    }
}
