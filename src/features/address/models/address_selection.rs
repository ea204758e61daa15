use serde::Serialize;
use utoipa::ToSchema;

use super::{District, Province, SubDistrict};

/// The address currently picked in one form.
///
/// Only [`AddressSelector`](crate::features::address::selector::AddressSelector)
/// mutates a selection; everything else reads snapshots of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressSelection {
    pub province: Option<Province>,
    pub district: Option<District>,
    pub sub_district: Option<SubDistrict>,
    pub postal_code: String,
}

/// How far down the cascade a selection has been walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SelectionStage {
    Empty,
    ProvinceOnly,
    ProvinceAndDistrict,
    Complete,
}

impl AddressSelection {
    pub fn stage(&self) -> SelectionStage {
        match (&self.province, &self.district, &self.sub_district) {
            (Some(_), Some(_), Some(_)) => SelectionStage::Complete,
            (Some(_), Some(_), None) => SelectionStage::ProvinceAndDistrict,
            (Some(_), None, _) => SelectionStage::ProvinceOnly,
            (None, _, _) => SelectionStage::Empty,
        }
    }

    /// True when a sub-district is selected but the postal code was typed to
    /// something other than its zip code.
    pub fn postal_code_mismatch(&self) -> bool {
        self.sub_district
            .as_ref()
            .is_some_and(|s| s.zip_code != self.postal_code)
    }
}
