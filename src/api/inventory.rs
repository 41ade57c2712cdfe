use super::{AppState, ListResponse, MutationResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::InventoryItem;
use crate::store::StoreError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use bigdecimal::BigDecimal;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    pub name: String,
    pub price: BigDecimal,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub threshold: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<BigDecimal>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub threshold: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DeletedItem {
    pub id: String,
}

fn item_not_found() -> ApiError {
    ApiError::not_found(
        "Inventory item not found",
        "The requested inventory item does not exist",
        "ITEM_NOT_FOUND",
    )
}

fn backend_error(
    e: StoreError,
    error: &'static str,
    message: &'static str,
    code: &'static str,
) -> ApiError {
    match e {
        StoreError::NotFound => item_not_found(),
        StoreError::Backend(detail) => {
            tracing::error!("{}: {}", error, detail);
            ApiError::upstream(error, message, code)
        }
    }
}

fn validate_counts(quantity: i64, threshold: i64, price: &BigDecimal) -> Result<(), ApiError> {
    if *price < BigDecimal::from(0) {
        return Err(ApiError::validation(
            "Invalid price",
            "Price must not be negative",
            "INVALID_PRICE",
        ));
    }
    if quantity < 0 {
        return Err(ApiError::validation(
            "Invalid quantity",
            "Quantity must not be negative",
            "INVALID_QUANTITY",
        ));
    }
    if threshold < 0 {
        return Err(ApiError::validation(
            "Invalid threshold",
            "Threshold must not be negative",
            "INVALID_THRESHOLD",
        ));
    }
    Ok(())
}

/// GET /api/inventory
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ListResponse<InventoryItem>>, ApiError> {
    let items = state.store.list_inventory(&user.uid).await.map_err(|e| {
        backend_error(
            e,
            "Failed to fetch inventory",
            "Unable to retrieve inventory items",
            "INVENTORY_FETCH_FAILED",
        )
    })?;
    Ok(Json(ListResponse::new(items)))
}

/// POST /api/inventory
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateItem>,
) -> Result<(StatusCode, Json<MutationResponse<InventoryItem>>), ApiError> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::validation(
            "Missing required fields",
            "Product name and price are required",
            "MISSING_FIELDS",
        ));
    }
    validate_counts(req.quantity, req.threshold, &req.price)?;

    let now = Utc::now();
    let item = InventoryItem {
        id: Uuid::new_v4().to_string(),
        owner_id: user.uid,
        name,
        price: req.price,
        quantity: req.quantity,
        category: req.category.unwrap_or_default(),
        threshold: req.threshold,
        created_at: now,
        last_updated: now,
    };

    state.store.insert_item(&item).await.map_err(|e| {
        backend_error(
            e,
            "Failed to add product",
            "Unable to add the inventory item",
            "INVENTORY_ITEM_CREATE_FAILED",
        )
    })?;
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::new("Product added successfully", item)),
    ))
}

/// PUT /api/inventory/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateItem>,
) -> Result<Json<MutationResponse<InventoryItem>>, ApiError> {
    if req.name.is_none()
        && req.price.is_none()
        && req.quantity.is_none()
        && req.category.is_none()
        && req.threshold.is_none()
    {
        return Err(ApiError::validation(
            "No update data provided",
            "At least one field must be provided for update",
            "NO_UPDATE_DATA",
        ));
    }

    let mut item = state
        .store
        .get_item(&id)
        .await
        .map_err(|e| {
            backend_error(
                e,
                "Failed to update product",
                "Unable to update the inventory item",
                "INVENTORY_ITEM_UPDATE_FAILED",
            )
        })?
        .ok_or_else(item_not_found)?;

    if let Some(name) = req.name {
        item.name = name.trim().to_string();
    }
    if let Some(price) = req.price {
        item.price = price;
    }
    if let Some(quantity) = req.quantity {
        item.quantity = quantity;
    }
    if let Some(category) = req.category {
        item.category = category;
    }
    if let Some(threshold) = req.threshold {
        item.threshold = threshold;
    }
    validate_counts(item.quantity, item.threshold, &item.price)?;
    item.last_updated = Utc::now();

    state.store.put_item(&item).await.map_err(|e| {
        backend_error(
            e,
            "Failed to update product",
            "Unable to update the inventory item",
            "INVENTORY_ITEM_UPDATE_FAILED",
        )
    })?;
    Ok(Json(MutationResponse::new(
        "Product updated successfully",
        item,
    )))
}

/// DELETE /api/inventory/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse<DeletedItem>>, ApiError> {
    state.store.delete_item(&id).await.map_err(|e| {
        backend_error(
            e,
            "Failed to delete product",
            "Unable to delete the inventory item",
            "INVENTORY_ITEM_DELETE_FAILED",
        )
    })?;
    Ok(Json(MutationResponse::new(
        "Product deleted successfully",
        DeletedItem { id },
    )))
}
