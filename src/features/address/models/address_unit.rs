use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{District, Province, SubDistrict};

/// Any one administrative unit, tagged with its level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AddressUnit {
    Province(Province),
    District(District),
    SubDistrict(SubDistrict),
}

impl From<Province> for AddressUnit {
    fn from(province: Province) -> Self {
        AddressUnit::Province(province)
    }
}

impl From<District> for AddressUnit {
    fn from(district: District) -> Self {
        AddressUnit::District(district)
    }
}

impl From<SubDistrict> for AddressUnit {
    fn from(sub_district: SubDistrict) -> Self {
        AddressUnit::SubDistrict(sub_district)
    }
}
