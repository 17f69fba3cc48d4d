// handlers/protected/user/leads.rs - Lead list, single create and CSV import
//
// GET  /api/user/leads?limit=
// POST /api/user/leads
// POST /api/user/leads/upload-csv   (multipart, field "file")

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Extension,
};

use crate::api::extract::{Json, Query};
use crate::database::models::Lead;
use crate::error::ApiError;
use crate::handlers::ListQuery;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::lead_service::{CreateLeadRequest, CsvImportResult};
use crate::services::LeadService;
use crate::state::AppState;

pub async fn leads_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Lead>> {
    let limit = state.config.page_size(query.limit);
    let leads = LeadService::new(&state).list(&user, limit).await?;
    Ok(ApiResponse::success(leads))
}

/// POST /api/user/leads - Add one lead. Sales category only.
pub async fn leads_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateLeadRequest>,
) -> ApiResult<Lead> {
    let lead = LeadService::new(&state).create(&user, payload).await?;
    Ok(ApiResponse::created(lead))
}

/// POST /api/user/leads/upload-csv - Bulk import from a CSV file
///
/// The CSV needs `name` and `phone` columns; `email`, `company` and `notes` are
/// optional. Header names match case-insensitively. Rows missing a required
/// value are reported in `errors` and skipped; the rest are stored together.
pub async fn leads_upload_csv_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<CsvImportResult> {
    let mut multipart = multipart?;
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;
    tracing::debug!("Received CSV upload {} ({} bytes) from {}", filename, data.len(), user.email);

    let result = LeadService::new(&state).import_csv(&user, &filename, &data).await?;
    Ok(ApiResponse::created(result))
}
