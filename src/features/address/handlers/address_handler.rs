use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::address::dtos::{
    AddressSearchQuery, AddressUnitResponseDto, DatasetStatusResponseDto, DistrictResponseDto,
    FormattedAddressResponseDto, PostalCodeLookupResponseDto, ProvinceResponseDto,
    SelectionSnapshotResponseDto, SelectionStateDto, SelectionTransitionRequestDto,
    SubDistrictResponseDto,
};
use crate::features::address::format::format_address;
use crate::features::address::services::{AddressListing, AddressService};
use crate::features::address::validation::{validate_selection, AddressValidation};
use crate::shared::types::{ApiResponse, Meta};

const INCOMPLETE_DATASET_MESSAGE: &str = "Some address data is unavailable";
const POSTAL_CODE_NOT_FOUND_MESSAGE: &str = "No address found for this postal code";

fn listing_response<T, D>(listing: AddressListing<T>) -> Json<ApiResponse<Vec<D>>>
where
    D: From<T>,
{
    let message = (!listing.complete).then(|| INCOMPLETE_DATASET_MESSAGE.to_string());
    let dtos: Vec<D> = listing.items.into_iter().map(Into::into).collect();
    Json(ApiResponse::success(
        Some(dtos),
        message,
        Some(Meta::total(listing.total)),
    ))
}

fn validate_query(query: &AddressSearchQuery) -> Result<()> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}

// ==================== Dataset Handlers ====================

/// Dataset load status
#[utoipa::path(
    get,
    path = "/api/address/dataset",
    responses(
        (status = 200, description = "Row counts and load failures", body = ApiResponse<DatasetStatusResponseDto>)
    ),
    tag = "address"
)]
pub async fn get_dataset_status(
    State(service): State<Arc<AddressService>>,
) -> Result<Json<ApiResponse<DatasetStatusResponseDto>>> {
    let dataset = service.dataset().await;
    let status = DatasetStatusResponseDto::from(dataset.as_ref());
    let message = (!status.complete).then(|| INCOMPLETE_DATASET_MESSAGE.to_string());
    Ok(Json(ApiResponse::success(Some(status), message, None)))
}

// ==================== Province Handlers ====================

/// List provinces
#[utoipa::path(
    get,
    path = "/api/address/provinces",
    params(AddressSearchQuery),
    responses(
        (status = 200, description = "List of provinces", body = ApiResponse<Vec<ProvinceResponseDto>>),
        (status = 400, description = "Invalid query")
    ),
    tag = "address"
)]
pub async fn list_provinces(
    State(service): State<Arc<AddressService>>,
    AppQuery(query): AppQuery<AddressSearchQuery>,
) -> Result<Json<ApiResponse<Vec<ProvinceResponseDto>>>> {
    validate_query(&query)?;
    let listing = service
        .list_provinces(query.search.as_deref(), query.limit)
        .await?;
    Ok(listing_response(listing))
}

/// Get a province by id
#[utoipa::path(
    get,
    path = "/api/address/provinces/{id}",
    params(
        ("id" = i64, Path, description = "Province id")
    ),
    responses(
        (status = 200, description = "Province details", body = ApiResponse<ProvinceResponseDto>),
        (status = 404, description = "Province not found")
    ),
    tag = "address"
)]
pub async fn get_province(
    State(service): State<Arc<AddressService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ProvinceResponseDto>>> {
    let province = service.get_province(id).await?;
    Ok(Json(ApiResponse::success(
        Some(province.into()),
        None,
        None,
    )))
}

/// List districts in a province
#[utoipa::path(
    get,
    path = "/api/address/provinces/{id}/districts",
    params(
        ("id" = i64, Path, description = "Province id"),
        AddressSearchQuery
    ),
    responses(
        (status = 200, description = "List of districts in the province", body = ApiResponse<Vec<DistrictResponseDto>>),
        (status = 404, description = "Province not found")
    ),
    tag = "address"
)]
pub async fn list_districts_by_province(
    State(service): State<Arc<AddressService>>,
    Path(id): Path<i64>,
    AppQuery(query): AppQuery<AddressSearchQuery>,
) -> Result<Json<ApiResponse<Vec<DistrictResponseDto>>>> {
    validate_query(&query)?;
    let listing = service
        .list_districts_by_province(id, query.search.as_deref(), query.limit)
        .await?;
    Ok(listing_response(listing))
}

// ==================== District Handlers ====================

/// Get a district by id
#[utoipa::path(
    get,
    path = "/api/address/districts/{id}",
    params(
        ("id" = i64, Path, description = "District (amphure) id")
    ),
    responses(
        (status = 200, description = "District details", body = ApiResponse<DistrictResponseDto>),
        (status = 404, description = "District not found")
    ),
    tag = "address"
)]
pub async fn get_district(
    State(service): State<Arc<AddressService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DistrictResponseDto>>> {
    let district = service.get_district(id).await?;
    Ok(Json(ApiResponse::success(
        Some(district.into()),
        None,
        None,
    )))
}

/// List sub-districts in a district
#[utoipa::path(
    get,
    path = "/api/address/districts/{id}/sub-districts",
    params(
        ("id" = i64, Path, description = "District (amphure) id"),
        AddressSearchQuery
    ),
    responses(
        (status = 200, description = "List of sub-districts in the district", body = ApiResponse<Vec<SubDistrictResponseDto>>),
        (status = 404, description = "District not found")
    ),
    tag = "address"
)]
pub async fn list_sub_districts_by_district(
    State(service): State<Arc<AddressService>>,
    Path(id): Path<i64>,
    AppQuery(query): AppQuery<AddressSearchQuery>,
) -> Result<Json<ApiResponse<Vec<SubDistrictResponseDto>>>> {
    validate_query(&query)?;
    let listing = service
        .list_sub_districts_by_district(id, query.search.as_deref(), query.limit)
        .await?;
    Ok(listing_response(listing))
}

// ==================== Sub-district Handlers ====================

/// Get a sub-district by id
#[utoipa::path(
    get,
    path = "/api/address/sub-districts/{id}",
    params(
        ("id" = i64, Path, description = "Sub-district (tambon) id")
    ),
    responses(
        (status = 200, description = "Sub-district details", body = ApiResponse<SubDistrictResponseDto>),
        (status = 404, description = "Sub-district not found")
    ),
    tag = "address"
)]
pub async fn get_sub_district(
    State(service): State<Arc<AddressService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<SubDistrictResponseDto>>> {
    let sub_district = service.get_sub_district(id).await?;
    Ok(Json(ApiResponse::success(
        Some(sub_district.into()),
        None,
        None,
    )))
}

// ==================== Search & Lookup Handlers ====================

/// Search provinces, districts and sub-districts at once
#[utoipa::path(
    get,
    path = "/api/address/search",
    params(AddressSearchQuery),
    responses(
        (status = 200, description = "Matching address units, provinces first", body = ApiResponse<Vec<AddressUnitResponseDto>>),
        (status = 400, description = "Missing or invalid search parameter")
    ),
    tag = "address"
)]
pub async fn search_address_units(
    State(service): State<Arc<AddressService>>,
    AppQuery(query): AppQuery<AddressSearchQuery>,
) -> Result<Json<ApiResponse<Vec<AddressUnitResponseDto>>>> {
    validate_query(&query)?;
    let search_term = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Search parameter 'search' is required".to_string()))?;

    let listing = service.search_all(search_term, query.limit).await?;
    Ok(listing_response(listing))
}

/// Resolve a postal code to its address
#[utoipa::path(
    get,
    path = "/api/address/postal-codes/{code}",
    params(
        ("code" = String, Path, description = "Five-digit postal code", example = "50200")
    ),
    responses(
        (status = 200, description = "Lookup result; `resolved` is null when no address carries the code", body = ApiResponse<PostalCodeLookupResponseDto>),
        (status = 400, description = "Postal code is not five digits")
    ),
    tag = "address"
)]
pub async fn lookup_postal_code(
    State(service): State<Arc<AddressService>>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<PostalCodeLookupResponseDto>>> {
    let matches = service.resolve_postal_code(&code).await?;

    let message = matches
        .resolved
        .is_none()
        .then(|| POSTAL_CODE_NOT_FOUND_MESSAGE.to_string());
    let dto = PostalCodeLookupResponseDto {
        postal_code: code.trim().to_string(),
        ambiguous: !matches.alternatives.is_empty(),
        resolved: matches.resolved.map(Into::into),
        alternatives: matches.alternatives.into_iter().map(Into::into).collect(),
    };

    Ok(Json(ApiResponse::success(Some(dto), message, None)))
}

// ==================== Selection Handlers ====================

/// Apply one cascade step to a selection
#[utoipa::path(
    post,
    path = "/api/address/selection/transitions",
    request_body = SelectionTransitionRequestDto,
    responses(
        (status = 200, description = "Selection after the step", body = ApiResponse<SelectionSnapshotResponseDto>),
        (status = 400, description = "Malformed request"),
        (status = 404, description = "Unknown province, district or sub-district id"),
        (status = 422, description = "Choice is outside the current candidates")
    ),
    tag = "address"
)]
pub async fn apply_selection_transition(
    State(service): State<Arc<AddressService>>,
    AppJson(dto): AppJson<SelectionTransitionRequestDto>,
) -> Result<Json<ApiResponse<SelectionSnapshotResponseDto>>> {
    let (selector, outcome) = service.apply_transition(&dto.state, dto.action).await?;

    let validation = validate_selection(selector.selection());
    let display = format_address(selector.selection());
    let snapshot = SelectionSnapshotResponseDto::new(&selector, outcome, validation, display);

    Ok(Json(ApiResponse::success(Some(snapshot), None, None)))
}

/// Validate a selection
#[utoipa::path(
    post,
    path = "/api/address/selection/validate",
    request_body = SelectionStateDto,
    responses(
        (status = 200, description = "Per-field validation messages", body = ApiResponse<AddressValidation>),
        (status = 404, description = "Unknown province, district or sub-district id"),
        (status = 422, description = "Ids do not nest")
    ),
    tag = "address"
)]
pub async fn validate_selection_state(
    State(service): State<Arc<AddressService>>,
    AppJson(dto): AppJson<SelectionStateDto>,
) -> Result<Json<ApiResponse<AddressValidation>>> {
    let validation = service.validate(&dto).await?;
    if validation.is_valid() {
        return Ok(Json(ApiResponse::success(Some(validation), None, None)));
    }

    let errors = validation.messages();
    let mut response = ApiResponse::success(
        Some(validation),
        Some("Address is incomplete".to_string()),
        None,
    );
    response.errors = Some(errors);
    Ok(Json(response))
}

/// Render a selection as a display string
#[utoipa::path(
    post,
    path = "/api/address/selection/format",
    request_body = SelectionStateDto,
    responses(
        (status = 200, description = "Thai display string", body = ApiResponse<FormattedAddressResponseDto>),
        (status = 404, description = "Unknown province, district or sub-district id"),
        (status = 422, description = "Ids do not nest")
    ),
    tag = "address"
)]
pub async fn format_selection(
    State(service): State<Arc<AddressService>>,
    AppJson(dto): AppJson<SelectionStateDto>,
) -> Result<Json<ApiResponse<FormattedAddressResponseDto>>> {
    let display = service.format(&dto).await?;
    Ok(Json(ApiResponse::success(
        Some(FormattedAddressResponseDto { display }),
        None,
        None,
    )))
}
