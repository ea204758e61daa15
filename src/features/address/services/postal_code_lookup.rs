use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::features::address::dataset::AddressDataset;
use crate::features::address::models::{District, Province, SubDistrict};

/// The full address owning a postal code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAddress {
    pub province: Province,
    pub district: District,
    pub sub_district: SubDistrict,
}

/// Maps a postal code back to the sub-districts that carry it.
///
/// A code can belong to several sub-districts. [`resolve`](Self::resolve)
/// picks the first one in dataset order, which is not necessarily the one
/// the user meant; use [`resolve_all`](Self::resolve_all) to offer a choice.
pub struct PostalCodeLookup {
    dataset: Arc<AddressDataset>,
}

impl PostalCodeLookup {
    pub fn new(dataset: Arc<AddressDataset>) -> Self {
        Self { dataset }
    }

    /// First address carrying `code`, or `None` when nothing matches
    pub fn resolve(&self, code: &str) -> Option<ResolvedAddress> {
        self.candidates(code).next()
    }

    /// Every address carrying `code`, in dataset order
    pub fn resolve_all(&self, code: &str) -> Vec<ResolvedAddress> {
        self.candidates(code).collect()
    }

    fn candidates<'a>(&'a self, code: &'a str) -> impl Iterator<Item = ResolvedAddress> + 'a {
        self.dataset
            .sub_districts_with_zip(code)
            .filter_map(move |sub_district| self.complete(sub_district))
    }

    // Sub-districts whose district or province is missing from the dataset
    // cannot form a triple and are skipped.
    fn complete(&self, sub_district: &SubDistrict) -> Option<ResolvedAddress> {
        let district = self.dataset.district(sub_district.amphure_id)?;
        let province = self.dataset.province(district.province_id)?;

        Some(ResolvedAddress {
            province: province.clone(),
            district: district.clone(),
            sub_district: sub_district.clone(),
        })
    }
}
