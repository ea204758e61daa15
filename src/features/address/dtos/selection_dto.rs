use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::address::dtos::{
    DistrictResponseDto, ProvinceResponseDto, SubDistrictResponseDto,
};
use crate::features::address::models::SelectionStage;
use crate::features::address::selector::{AddressSelector, PostalCodeOutcome};
use crate::features::address::validation::AddressValidation;

/// Selection as held by the console, by id
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectionStateDto {
    #[serde(default)]
    pub province_id: Option<i64>,
    #[serde(default)]
    pub district_id: Option<i64>,
    #[serde(default)]
    pub sub_district_id: Option<i64>,
    #[serde(default)]
    pub postal_code: String,
}

/// One step of the cascade. A `null` id clears that picker.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SelectionActionDto {
    SelectProvince {
        #[serde(rename = "provinceId")]
        province_id: Option<i64>,
    },
    SelectDistrict {
        #[serde(rename = "districtId")]
        district_id: Option<i64>,
    },
    SelectSubDistrict {
        #[serde(rename = "subDistrictId")]
        sub_district_id: Option<i64>,
    },
    SetPostalCode {
        #[serde(rename = "postalCode")]
        postal_code: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectionTransitionRequestDto {
    #[serde(default)]
    pub state: SelectionStateDto,
    pub action: SelectionActionDto,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressSelectionResponseDto {
    pub province: Option<ProvinceResponseDto>,
    pub district: Option<DistrictResponseDto>,
    pub sub_district: Option<SubDistrictResponseDto>,
    pub postal_code: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectionCandidatesDto {
    pub provinces: Vec<ProvinceResponseDto>,
    pub districts: Vec<DistrictResponseDto>,
    pub sub_districts: Vec<SubDistrictResponseDto>,
}

/// Everything the console needs to re-render the address pickers
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSnapshotResponseDto {
    pub state: SelectionStateDto,
    pub selection: AddressSelectionResponseDto,
    pub stage: SelectionStage,
    pub postal_code_mismatch: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code_outcome: Option<PostalCodeOutcome>,
    pub candidates: SelectionCandidatesDto,
    pub validation: AddressValidation,
    pub display: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormattedAddressResponseDto {
    pub display: String,
}

impl SelectionStateDto {
    pub fn from_selector(selector: &AddressSelector) -> Self {
        let selection = selector.selection();
        Self {
            province_id: selection.province.as_ref().map(|p| p.id),
            district_id: selection.district.as_ref().map(|d| d.id),
            sub_district_id: selection.sub_district.as_ref().map(|s| s.id),
            postal_code: selection.postal_code.clone(),
        }
    }
}

impl SelectionSnapshotResponseDto {
    pub fn new(
        selector: &AddressSelector,
        postal_code_outcome: Option<PostalCodeOutcome>,
        validation: AddressValidation,
        display: String,
    ) -> Self {
        let selection = selector.selection().clone();

        Self {
            state: SelectionStateDto::from_selector(selector),
            stage: selection.stage(),
            postal_code_mismatch: selection.postal_code_mismatch(),
            postal_code_outcome,
            candidates: SelectionCandidatesDto {
                provinces: selector
                    .province_candidates()
                    .iter()
                    .cloned()
                    .map(Into::into)
                    .collect(),
                districts: selector
                    .district_candidates()
                    .iter()
                    .cloned()
                    .map(Into::into)
                    .collect(),
                sub_districts: selector
                    .sub_district_candidates()
                    .iter()
                    .cloned()
                    .map(Into::into)
                    .collect(),
            },
            selection: AddressSelectionResponseDto {
                province: selection.province.map(Into::into),
                district: selection.district.map(Into::into),
                sub_district: selection.sub_district.map(Into::into),
                postal_code: selection.postal_code,
            },
            validation,
            display,
        }
    }
}
