//! CSV export endpoints.
//!
//! The HTTP counterpart of a browser download: the encoded CSV is returned
//! as a `Content-Disposition: attachment`.

use axum::{response::Response, Json};
use serde::Deserialize;

use crate::export::{
    csv_attachment, encode_expenses_to_csv, encode_generic_records_to_csv, Event, Expense,
    FlatRecord, User,
};
use crate::observability::metrics;

const DEFAULT_EXPENSES_FILENAME: &str = "expenses";
const DEFAULT_RECORDS_FILENAME: &str = "export";

#[derive(Debug, Deserialize)]
pub struct ExpenseExportRequest {
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub events: Vec<Event>,
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordExportRequest {
    #[serde(default)]
    pub records: Vec<FlatRecord>,
    pub filename: Option<String>,
}

pub async fn export_expenses(Json(request): Json<ExpenseExportRequest>) -> Response {
    let csv = encode_expenses_to_csv(&request.expenses, &request.users, &request.events);
    metrics::record_export("expenses", request.expenses.len());
    tracing::info!(rows = request.expenses.len(), "Expense export generated");

    let filename = request.filename.as_deref().unwrap_or(DEFAULT_EXPENSES_FILENAME);
    csv_attachment(csv, filename)
}

pub async fn export_records(Json(request): Json<RecordExportRequest>) -> Response {
    let csv = encode_generic_records_to_csv(&request.records);
    metrics::record_export("records", request.records.len());
    tracing::info!(rows = request.records.len(), "Record export generated");

    let filename = request.filename.as_deref().unwrap_or(DEFAULT_RECORDS_FILENAME);
    csv_attachment(csv, filename)
}
