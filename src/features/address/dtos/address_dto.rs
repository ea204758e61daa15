use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::address::dataset::{AddressDataset, DatasetLoadFailure};
use crate::features::address::models::{AddressUnit, District, Province, SubDistrict};
use crate::features::address::services::ResolvedAddress;

/// Query parameters for searching candidates
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AddressSearchQuery {
    /// Search by Thai or English name (case-insensitive, partial match)
    #[param(example = "เชียง")]
    #[validate(length(max = 100, message = "Search must not exceed 100 characters"))]
    pub search: Option<String>,

    /// Maximum number of results (default 100, capped at 500)
    #[param(minimum = 1, maximum = 500)]
    pub limit: Option<usize>,
}

/// Response DTO for province data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceResponseDto {
    pub id: i64,
    pub name_th: String,
    pub name_en: String,
}

impl From<Province> for ProvinceResponseDto {
    fn from(province: Province) -> Self {
        Self {
            id: province.id,
            name_th: province.name_th,
            name_en: province.name_en,
        }
    }
}

/// Response DTO for district (amphure) data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistrictResponseDto {
    pub id: i64,
    pub name_th: String,
    pub name_en: String,
    pub province_id: i64,
}

impl From<District> for DistrictResponseDto {
    fn from(district: District) -> Self {
        Self {
            id: district.id,
            name_th: district.name_th,
            name_en: district.name_en,
            province_id: district.province_id,
        }
    }
}

/// Response DTO for sub-district (tambon) data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubDistrictResponseDto {
    pub id: i64,
    pub name_th: String,
    pub name_en: String,
    pub district_id: i64,
    pub zip_code: String,
}

impl From<SubDistrict> for SubDistrictResponseDto {
    fn from(sub_district: SubDistrict) -> Self {
        Self {
            id: sub_district.id,
            name_th: sub_district.name_th,
            name_en: sub_district.name_en,
            district_id: sub_district.amphure_id,
            zip_code: sub_district.zip_code,
        }
    }
}

/// A search hit from any level of the hierarchy
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AddressUnitResponseDto {
    Province(ProvinceResponseDto),
    District(DistrictResponseDto),
    SubDistrict(SubDistrictResponseDto),
}

impl From<AddressUnit> for AddressUnitResponseDto {
    fn from(unit: AddressUnit) -> Self {
        match unit {
            AddressUnit::Province(p) => Self::Province(p.into()),
            AddressUnit::District(d) => Self::District(d.into()),
            AddressUnit::SubDistrict(s) => Self::SubDistrict(s.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAddressResponseDto {
    pub province: ProvinceResponseDto,
    pub district: DistrictResponseDto,
    pub sub_district: SubDistrictResponseDto,
}

impl From<ResolvedAddress> for ResolvedAddressResponseDto {
    fn from(resolved: ResolvedAddress) -> Self {
        Self {
            province: resolved.province.into(),
            district: resolved.district.into(),
            sub_district: resolved.sub_district.into(),
        }
    }
}

/// Result of a postal code lookup.
///
/// `resolved` is the first match in dataset order; when `ambiguous` is set
/// the other possible addresses are listed in `alternatives`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostalCodeLookupResponseDto {
    pub postal_code: String,
    pub resolved: Option<ResolvedAddressResponseDto>,
    pub ambiguous: bool,
    pub alternatives: Vec<ResolvedAddressResponseDto>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStatusResponseDto {
    pub complete: bool,
    pub provinces: usize,
    pub districts: usize,
    pub sub_districts: usize,
    pub failures: Vec<DatasetLoadFailure>,
    pub loaded_at: DateTime<Utc>,
}

impl From<&AddressDataset> for DatasetStatusResponseDto {
    fn from(dataset: &AddressDataset) -> Self {
        Self {
            complete: dataset.is_complete(),
            provinces: dataset.provinces().len(),
            districts: dataset.districts().len(),
            sub_districts: dataset.sub_districts().len(),
            failures: dataset.failures().to_vec(),
            loaded_at: dataset.loaded_at(),
        }
    }
}
