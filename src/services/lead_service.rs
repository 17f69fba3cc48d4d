use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::models::{Lead, NewLead, User};
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::UserCategory;

#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CsvImportResult {
    pub success: bool,
    pub message: String,
    pub leads_imported: usize,
    pub lead_ids: Vec<Uuid>,
    pub errors: Vec<String>,
}

/// Rows that parsed into leads, plus one message per rejected row.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedCsv {
    pub leads: Vec<NewLead>,
    pub errors: Vec<String>,
}

fn optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Parse lead rows from CSV text. Headers match case-insensitively and the
/// header line counts as row 1 in error messages.
pub fn parse_leads_csv(data: &[u8]) -> Result<ParsedCsv, ApiError> {
    let text = std::str::from_utf8(data).map_err(|_| ApiError::bad_request("CSV file must be UTF-8 encoded"))?;
    let text = text.trim_start_matches('\u{feff}');

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ApiError::bad_request(format!("Could not read CSV header: {}", e)))?
        .iter()
        .map(|h| h.to_lowercase())
        .collect();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let (name_col, phone_col) = (column("name"), column("phone"));
    let (email_col, company_col, notes_col) = (column("email"), column("company"), column("notes"));

    let mut parsed = ParsedCsv::default();
    for (index, record) in reader.records().enumerate() {
        let row = index + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                parsed.errors.push(format!("Row {}: {}", row, e));
                continue;
            }
        };
        let field = |col: Option<usize>| optional(col.and_then(|c| record.get(c)));

        match (field(name_col), field(phone_col)) {
            (Some(name), Some(phone)) => parsed.leads.push(NewLead {
                name,
                phone,
                email: field(email_col),
                company: field(company_col),
                notes: field(notes_col),
            }),
            _ => parsed
                .errors
                .push(format!("Row {}: Missing required fields (name, phone)", row)),
        }
    }

    Ok(parsed)
}

fn require_sales(user: &User, action: &str) -> Result<(), ApiError> {
    if user.category != UserCategory::Sales {
        return Err(ApiError::forbidden(format!(
            "{} is only available for sales category",
            action
        )));
    }
    Ok(())
}

pub struct LeadService<'a> {
    state: &'a AppState,
}

impl<'a> LeadService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn list(&self, user: &User, limit: i64) -> Result<Vec<Lead>, ApiError> {
        Ok(self.state.store.list_leads(user.id, limit).await?)
    }

    pub async fn create(&self, user: &User, request: CreateLeadRequest) -> Result<Lead, ApiError> {
        require_sales(user, "Lead upload")?;

        let name = request.name.trim().to_string();
        let phone = request.phone.trim().to_string();
        if name.is_empty() || phone.is_empty() {
            return Err(ApiError::validation_error("Missing required fields (name, phone)", None));
        }

        let lead = NewLead {
            name,
            phone,
            email: optional(request.email.as_deref()),
            company: optional(request.company.as_deref()),
            notes: optional(request.notes.as_deref()),
        };

        let mut inserted = self.state.store.insert_leads(user.id, vec![lead]).await?;
        let lead = inserted
            .pop()
            .ok_or_else(|| ApiError::internal_server_error("Lead was not stored"))?;
        info!("User {} added lead {}", user.email, lead.id);
        Ok(lead)
    }

    pub async fn import_csv(&self, user: &User, filename: &str, data: &[u8]) -> Result<CsvImportResult, ApiError> {
        require_sales(user, "CSV upload")?;
        if !filename.to_lowercase().ends_with(".csv") {
            return Err(ApiError::bad_request("File must be a CSV"));
        }

        let parsed = parse_leads_csv(data)?;
        if parsed.leads.is_empty() {
            warn!("CSV upload from {} had no valid rows", user.email);
            return Err(ApiError::validation_error("No valid leads found in CSV", None));
        }

        let leads = self.state.store.insert_leads(user.id, parsed.leads).await?;
        let lead_ids: Vec<Uuid> = leads.iter().map(|l| l.id).collect();
        info!(
            "User {} imported {} leads from {} ({} rows rejected)",
            user.email,
            lead_ids.len(),
            filename,
            parsed.errors.len()
        );

        Ok(CsvImportResult {
            success: true,
            message: format!("{} leads uploaded successfully", lead_ids.len()),
            leads_imported: lead_ids.len(),
            lead_ids,
            errors: parsed.errors,
        })
    }
}
