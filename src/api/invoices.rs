use super::{AppState, ListResponse, MutationResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{Invoice, InvoiceStatus};
use crate::store::StoreError;
use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoice {
    pub invoice_number: String,
    pub customer_name: String,
    pub amount: BigDecimal,
    #[serde(default)]
    pub gst: Option<BigDecimal>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

fn backend_error(
    e: StoreError,
    error: &'static str,
    message: &'static str,
    code: &'static str,
) -> ApiError {
    match e {
        StoreError::NotFound => ApiError::not_found(
            "Invoice not found",
            "The requested invoice does not exist",
            "INVOICE_NOT_FOUND",
        ),
        StoreError::Backend(detail) => {
            tracing::error!("{}: {}", error, detail);
            ApiError::upstream(error, message, code)
        }
    }
}

/// GET /api/invoices
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ListResponse<Invoice>>, ApiError> {
    let invoices = state.store.list_invoices(&user.uid).await.map_err(|e| {
        backend_error(
            e,
            "Failed to fetch invoices",
            "Unable to retrieve invoices",
            "INVOICES_FETCH_FAILED",
        )
    })?;
    Ok(Json(ListResponse::new(invoices)))
}

/// POST /api/invoices. The total is always amount + gst, computed here.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateInvoice>,
) -> Result<(StatusCode, Json<MutationResponse<Invoice>>), ApiError> {
    let invoice_number = req.invoice_number.trim().to_string();
    let customer_name = req.customer_name.trim().to_string();
    if invoice_number.is_empty() || customer_name.is_empty() {
        return Err(ApiError::validation(
            "Missing required fields",
            "Invoice number and customer name are required",
            "MISSING_FIELDS",
        ));
    }
    if req.amount <= BigDecimal::zero() {
        return Err(ApiError::validation(
            "Invalid amount",
            "Amount must be a positive number",
            "INVALID_AMOUNT",
        ));
    }
    let gst = req.gst.unwrap_or_else(BigDecimal::zero);
    if gst < BigDecimal::zero() {
        return Err(ApiError::validation(
            "Invalid GST",
            "GST must not be negative",
            "INVALID_GST",
        ));
    }
    let status = match req.status.as_deref() {
        Some(raw) => InvoiceStatus::from_str(raw).map_err(|_| {
            ApiError::validation(
                "Invalid status",
                "Status must be Paid or Pending",
                "INVALID_STATUS",
            )
        })?,
        None => InvoiceStatus::Pending,
    };

    let now = Utc::now();
    let total_amount = &req.amount + &gst;
    let invoice = Invoice {
        id: Uuid::new_v4().to_string(),
        owner_id: user.uid,
        invoice_number,
        customer_name,
        amount: req.amount,
        gst,
        total_amount,
        status,
        date: req.date.unwrap_or(now),
        created_at: now,
    };

    state.store.insert_invoice(&invoice).await.map_err(|e| {
        backend_error(
            e,
            "Failed to create invoice",
            "Unable to create the invoice",
            "INVOICE_CREATE_FAILED",
        )
    })?;
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::new("Invoice created successfully", invoice)),
    ))
}
