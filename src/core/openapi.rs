use utoipa::{Modify, OpenApi};

use crate::features::address::dataset::{DatasetLoadFailure, DatasetTable};
use crate::features::address::models::SelectionStage;
use crate::features::address::selector::PostalCodeOutcome;
use crate::features::address::validation::{AddressField, AddressValidation};
use crate::features::address::{dtos as address_dtos, handlers as address_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Dataset
        address_handlers::get_dataset_status,
        // Candidates
        address_handlers::list_provinces,
        address_handlers::get_province,
        address_handlers::list_districts_by_province,
        address_handlers::get_district,
        address_handlers::list_sub_districts_by_district,
        address_handlers::get_sub_district,
        // Search & lookup
        address_handlers::search_address_units,
        address_handlers::lookup_postal_code,
        // Selection
        address_handlers::apply_selection_transition,
        address_handlers::validate_selection_state,
        address_handlers::format_selection,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Dataset
            DatasetTable,
            DatasetLoadFailure,
            address_dtos::DatasetStatusResponseDto,
            ApiResponse<address_dtos::DatasetStatusResponseDto>,
            // Candidates
            address_dtos::ProvinceResponseDto,
            address_dtos::DistrictResponseDto,
            address_dtos::SubDistrictResponseDto,
            address_dtos::AddressUnitResponseDto,
            ApiResponse<Vec<address_dtos::ProvinceResponseDto>>,
            ApiResponse<address_dtos::ProvinceResponseDto>,
            ApiResponse<Vec<address_dtos::DistrictResponseDto>>,
            ApiResponse<address_dtos::DistrictResponseDto>,
            ApiResponse<Vec<address_dtos::SubDistrictResponseDto>>,
            ApiResponse<address_dtos::SubDistrictResponseDto>,
            ApiResponse<Vec<address_dtos::AddressUnitResponseDto>>,
            // Postal codes
            address_dtos::ResolvedAddressResponseDto,
            address_dtos::PostalCodeLookupResponseDto,
            ApiResponse<address_dtos::PostalCodeLookupResponseDto>,
            // Selection
            SelectionStage,
            PostalCodeOutcome,
            AddressField,
            AddressValidation,
            address_dtos::SelectionStateDto,
            address_dtos::SelectionActionDto,
            address_dtos::SelectionTransitionRequestDto,
            address_dtos::AddressSelectionResponseDto,
            address_dtos::SelectionCandidatesDto,
            address_dtos::SelectionSnapshotResponseDto,
            address_dtos::FormattedAddressResponseDto,
            ApiResponse<address_dtos::SelectionSnapshotResponseDto>,
            ApiResponse<AddressValidation>,
            ApiResponse<address_dtos::FormattedAddressResponseDto>,
        )
    ),
    tags(
        (name = "address", description = "Thai address resolution (provinces, districts, sub-districts, postal codes)"),
    ),
    info(
        title = "Prapa Address API",
        version = "0.1.0",
        description = "API documentation for Prapa address resolution",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
