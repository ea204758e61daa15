use std::sync::Arc;

use crate::core::config::SearchConfig;
use crate::core::error::{AppError, Result};
use crate::features::address::dataset::AddressDataset;
use crate::features::address::dtos::{SelectionActionDto, SelectionStateDto};
use crate::features::address::format::format_address;
use crate::features::address::models::{
    AddressSelection, AddressUnit, District, Province, SubDistrict,
};
use crate::features::address::search::{search, SearchField, Searchable, DEFAULT_SEARCH_FIELDS};
use crate::features::address::selector::{AddressSelector, CascadePolicy, PostalCodeOutcome};
use crate::features::address::services::{
    AddressDatasetProvider, PostalCodeLookup, ResolvedAddress,
};
use crate::features::address::validation::{validate_selection, AddressValidation};
use crate::shared::validation::is_postal_code;

/// Fields searched by the cross-level search endpoint
const CROSS_LEVEL_SEARCH_FIELDS: &[SearchField] = &[
    SearchField::NameTh,
    SearchField::NameEn,
    SearchField::ZipCode,
];

/// A capped page of candidates
#[derive(Debug, Clone)]
pub struct AddressListing<T> {
    pub items: Vec<T>,
    /// Number of matches before the limit was applied
    pub total: usize,
    /// False while any dataset table failed to load
    pub complete: bool,
}

#[derive(Debug, Clone)]
pub struct PostalCodeMatches {
    pub resolved: Option<ResolvedAddress>,
    pub alternatives: Vec<ResolvedAddress>,
}

/// Service answering address queries for the console
pub struct AddressService {
    provider: Arc<AddressDatasetProvider>,
    policy: CascadePolicy,
    search: SearchConfig,
}

impl AddressService {
    pub fn new(
        provider: Arc<AddressDatasetProvider>,
        policy: CascadePolicy,
        search: SearchConfig,
    ) -> Self {
        Self {
            provider,
            policy,
            search,
        }
    }

    /// The dataset, waiting for the load if it is still in flight
    pub async fn dataset(&self) -> Arc<AddressDataset> {
        self.provider.load_all().await
    }

    // ==================== Listing Methods ====================

    /// List provinces with optional search
    pub async fn list_provinces(
        &self,
        query: Option<&str>,
        limit: Option<usize>,
    ) -> Result<AddressListing<Province>> {
        let dataset = self.dataset().await;
        Ok(self.listing(&dataset, dataset.provinces().iter(), query, limit))
    }

    /// List districts in a province with optional search
    pub async fn list_districts_by_province(
        &self,
        province_id: i64,
        query: Option<&str>,
        limit: Option<usize>,
    ) -> Result<AddressListing<District>> {
        let dataset = self.dataset().await;
        find_province(&dataset, province_id)?;
        Ok(self.listing(&dataset, dataset.districts_of(province_id), query, limit))
    }

    /// List sub-districts in a district with optional search
    pub async fn list_sub_districts_by_district(
        &self,
        district_id: i64,
        query: Option<&str>,
        limit: Option<usize>,
    ) -> Result<AddressListing<SubDistrict>> {
        let dataset = self.dataset().await;
        find_district(&dataset, district_id)?;
        Ok(self.listing(
            &dataset,
            dataset.sub_districts_of(district_id),
            query,
            limit,
        ))
    }

    /// Search all three levels at once, provinces first
    pub async fn search_all(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<AddressListing<AddressUnit>> {
        let dataset = self.dataset().await;

        let units: Vec<AddressUnit> = dataset
            .provinces()
            .iter()
            .cloned()
            .map(AddressUnit::from)
            .chain(dataset.districts().iter().cloned().map(AddressUnit::from))
            .chain(dataset.sub_districts().iter().cloned().map(AddressUnit::from))
            .collect();

        let matches = search(units.iter(), query, CROSS_LEVEL_SEARCH_FIELDS);
        let total = matches.len();
        let items = matches
            .into_iter()
            .take(self.search.limit(limit))
            .cloned()
            .collect();

        tracing::debug!("Cross-level search '{}' matched {} units", query, total);

        Ok(AddressListing {
            items,
            total,
            complete: dataset.is_complete(),
        })
    }

    fn listing<'a, T>(
        &self,
        dataset: &AddressDataset,
        items: impl IntoIterator<Item = &'a T>,
        query: Option<&str>,
        limit: Option<usize>,
    ) -> AddressListing<T>
    where
        T: Searchable + Clone + 'a,
    {
        // Picker input is trimmed here; `search` itself matches whitespace
        let query = query.map(str::trim).unwrap_or_default();
        let matches = search(items, query, DEFAULT_SEARCH_FIELDS);
        let total = matches.len();
        let items = matches
            .into_iter()
            .take(self.search.limit(limit))
            .cloned()
            .collect();

        AddressListing {
            items,
            total,
            complete: dataset.is_complete(),
        }
    }

    // ==================== Lookup Methods ====================

    pub async fn get_province(&self, id: i64) -> Result<Province> {
        let dataset = self.dataset().await;
        find_province(&dataset, id).cloned()
    }

    pub async fn get_district(&self, id: i64) -> Result<District> {
        let dataset = self.dataset().await;
        find_district(&dataset, id).cloned()
    }

    pub async fn get_sub_district(&self, id: i64) -> Result<SubDistrict> {
        let dataset = self.dataset().await;
        find_sub_district(&dataset, id).cloned()
    }

    /// Reverse lookup of a five-digit postal code.
    ///
    /// An unknown code is not an error: `resolved` is `None`.
    pub async fn resolve_postal_code(&self, code: &str) -> Result<PostalCodeMatches> {
        let code = code.trim();
        if !is_postal_code(code) {
            return Err(AppError::BadRequest(format!(
                "Postal code '{}' must be 5 digits",
                code
            )));
        }

        let lookup = PostalCodeLookup::new(self.dataset().await);
        let resolved = lookup.resolve(code);
        if resolved.is_none() {
            tracing::info!("No address found for postal code {}", code);
        }
        let alternatives = lookup.resolve_all(code).into_iter().skip(1).collect();

        Ok(PostalCodeMatches {
            resolved,
            alternatives,
        })
    }

    // ==================== Selection Methods ====================

    /// Rebuild a selector from a client snapshot.
    ///
    /// Unknown ids are `NotFound`; ids that do not nest are an invalid
    /// transition.
    pub async fn restore_selection(&self, state: &SelectionStateDto) -> Result<AddressSelector> {
        let dataset = self.dataset().await;

        let initial = AddressSelection {
            province: state
                .province_id
                .map(|id| find_province(&dataset, id).cloned())
                .transpose()?,
            district: state
                .district_id
                .map(|id| find_district(&dataset, id).cloned())
                .transpose()?,
            sub_district: state
                .sub_district_id
                .map(|id| find_sub_district(&dataset, id).cloned())
                .transpose()?,
            postal_code: state.postal_code.clone(),
        };

        Ok(AddressSelector::with_initial(
            dataset,
            self.policy,
            initial,
        )?)
    }

    /// Apply one cascade step to a snapshot
    pub async fn apply_transition(
        &self,
        state: &SelectionStateDto,
        action: SelectionActionDto,
    ) -> Result<(AddressSelector, Option<PostalCodeOutcome>)> {
        let mut selector = self.restore_selection(state).await?;
        let dataset = self.dataset().await;

        let outcome = match action {
            SelectionActionDto::SelectProvince { province_id } => {
                let province = province_id
                    .map(|id| find_province(&dataset, id).cloned())
                    .transpose()?;
                selector.select_province(province);
                None
            }
            SelectionActionDto::SelectDistrict { district_id } => {
                let district = district_id
                    .map(|id| find_district(&dataset, id).cloned())
                    .transpose()?;
                selector.select_district(district)?;
                None
            }
            SelectionActionDto::SelectSubDistrict { sub_district_id } => {
                let sub_district = sub_district_id
                    .map(|id| find_sub_district(&dataset, id).cloned())
                    .transpose()?;
                selector.select_sub_district(sub_district)?;
                None
            }
            SelectionActionDto::SetPostalCode { postal_code } => {
                Some(selector.set_postal_code(postal_code))
            }
        };

        tracing::debug!(
            "Selection transition applied, stage is now {:?}",
            selector.stage()
        );

        Ok((selector, outcome))
    }

    pub async fn validate(&self, state: &SelectionStateDto) -> Result<AddressValidation> {
        let selector = self.restore_selection(state).await?;
        Ok(validate_selection(selector.selection()))
    }

    pub async fn format(&self, state: &SelectionStateDto) -> Result<String> {
        let selector = self.restore_selection(state).await?;
        Ok(format_address(selector.selection()))
    }
}

fn find_province(dataset: &AddressDataset, id: i64) -> Result<&Province> {
    dataset
        .province(id)
        .ok_or_else(|| AppError::NotFound(format!("Province with id {} not found", id)))
}

fn find_district(dataset: &AddressDataset, id: i64) -> Result<&District> {
    dataset
        .district(id)
        .ok_or_else(|| AppError::NotFound(format!("District with id {} not found", id)))
}

fn find_sub_district(dataset: &AddressDataset, id: i64) -> Result<&SubDistrict> {
    dataset
        .sub_district(id)
        .ok_or_else(|| AppError::NotFound(format!("Sub-district with id {} not found", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::address::dataset::DatasetTable;
    use crate::features::address::models::SelectionStage;
    use crate::features::address::validation::AddressField;
    use crate::shared::test_helpers::{sample_dataset, StaticDatasetSource};

    fn service() -> AddressService {
        service_with(CascadePolicy::default())
    }

    fn service_with(policy: CascadePolicy) -> AddressService {
        let provider = AddressDatasetProvider::preloaded(
            Arc::new(StaticDatasetSource::sample()),
            sample_dataset(),
        );
        AddressService::new(Arc::new(provider), policy, SearchConfig::default())
    }

    fn state(
        province_id: Option<i64>,
        district_id: Option<i64>,
        sub_district_id: Option<i64>,
        postal_code: &str,
    ) -> SelectionStateDto {
        SelectionStateDto {
            province_id,
            district_id,
            sub_district_id,
            postal_code: postal_code.to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_provinces_with_search_and_limit() {
        let service = service();

        let all = service.list_provinces(None, None).await.unwrap();
        assert_eq!(all.total, 3);
        assert!(all.complete);

        let chiang = service.list_provinces(Some("เชียง"), Some(1)).await.unwrap();
        assert_eq!(chiang.total, 2);
        assert_eq!(chiang.items.len(), 1);
        assert_eq!(chiang.items[0].id, 1);
    }

    #[tokio::test]
    async fn test_picker_query_is_trimmed() {
        let service = service();
        let listing = service
            .list_provinces(Some("  chiang  "), None)
            .await
            .unwrap();
        assert_eq!(listing.total, 2);

        let blank = service.list_provinces(Some("   "), None).await.unwrap();
        assert_eq!(blank.total, 3);
    }

    #[tokio::test]
    async fn test_list_districts_of_unknown_province_is_not_found() {
        let service = service();
        let result = service.list_districts_by_province(99, None, None).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let districts = service
            .list_districts_by_province(1, None, None)
            .await
            .unwrap();
        let ids: Vec<i64> = districts.items.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![10, 11]);
    }

    #[tokio::test]
    async fn test_list_sub_districts_searches_names_in_english() {
        let service = service();
        let listing = service
            .list_sub_districts_by_district(10, Some("SUTHEP"), None)
            .await
            .unwrap();
        assert_eq!(listing.total, 1);
        assert_eq!(listing.items[0].id, 100);
    }

    #[tokio::test]
    async fn test_search_all_spans_every_level() {
        let service = service();
        let listing = service.search_all("หางดง", None).await.unwrap();
        let kinds: Vec<&str> = listing
            .items
            .iter()
            .map(|unit| match unit {
                AddressUnit::Province(_) => "province",
                AddressUnit::District(_) => "district",
                AddressUnit::SubDistrict(_) => "subDistrict",
            })
            .collect();
        assert_eq!(kinds, vec!["district", "subDistrict"]);

        let by_zip = service.search_all("5020", None).await.unwrap();
        assert_eq!(by_zip.total, 2);
    }

    #[tokio::test]
    async fn test_resolve_postal_code_reports_alternatives() {
        let service = service();
        let matches = service.resolve_postal_code("50200").await.unwrap();
        let resolved = matches.resolved.unwrap();
        assert_eq!(resolved.sub_district.id, 100);
        assert_eq!(matches.alternatives.len(), 1);
        assert_eq!(matches.alternatives[0].sub_district.id, 101);
    }

    #[tokio::test]
    async fn test_resolve_unknown_postal_code_is_not_an_error() {
        let service = service();
        let matches = service.resolve_postal_code("99999").await.unwrap();
        assert!(matches.resolved.is_none());
        assert!(matches.alternatives.is_empty());

        let malformed = service.resolve_postal_code("5020").await;
        assert!(matches!(malformed, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_restore_rejects_unknown_and_inconsistent_ids() {
        let service = service();

        let unknown = service
            .restore_selection(&state(Some(1), Some(999), None, ""))
            .await;
        assert!(matches!(unknown, Err(AppError::NotFound(_))));

        let inconsistent = service
            .restore_selection(&state(Some(2), Some(10), None, ""))
            .await;
        assert!(matches!(inconsistent, Err(AppError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn test_transition_cascades_from_province() {
        let service = service();
        let (selector, outcome) = service
            .apply_transition(
                &state(Some(1), Some(10), Some(100), ""),
                SelectionActionDto::SelectProvince {
                    province_id: Some(2),
                },
            )
            .await
            .unwrap();

        assert!(outcome.is_none());
        assert_eq!(selector.stage(), SelectionStage::ProvinceOnly);
        assert_eq!(selector.selection().postal_code, "50200");
        let districts: Vec<i64> = selector.district_candidates().iter().map(|d| d.id).collect();
        assert_eq!(districts, vec![20]);
    }

    #[tokio::test]
    async fn test_transition_honours_cascade_policy() {
        let service = service_with(CascadePolicy {
            clear_postal_code_on_province_change: true,
            clear_postal_code_on_sub_district_clear: false,
        });
        let (selector, _) = service
            .apply_transition(
                &state(Some(1), Some(10), Some(100), ""),
                SelectionActionDto::SelectProvince {
                    province_id: Some(2),
                },
            )
            .await
            .unwrap();
        assert_eq!(selector.selection().postal_code, "");
    }

    #[tokio::test]
    async fn test_transition_postal_code_fills_cascade() {
        let service = service();
        let (selector, outcome) = service
            .apply_transition(
                &SelectionStateDto::default(),
                SelectionActionDto::SetPostalCode {
                    postal_code: "57000".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome, Some(PostalCodeOutcome::Resolved { alternatives: 1 }));
        assert_eq!(selector.stage(), SelectionStage::Complete);
        assert_eq!(selector.selection().sub_district.as_ref().unwrap().id, 200);
    }

    #[tokio::test]
    async fn test_transition_stores_postal_code_as_sent() {
        let service = service();
        let (selector, outcome) = service
            .apply_transition(
                &SelectionStateDto::default(),
                SelectionActionDto::SetPostalCode {
                    postal_code: " 57000 ".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome, Some(PostalCodeOutcome::Incomplete));
        assert_eq!(selector.selection().postal_code, " 57000 ");
        assert_eq!(selector.stage(), SelectionStage::Empty);

        let restored = service
            .restore_selection(&state(None, None, None, " 57000 "))
            .await
            .unwrap();
        assert_eq!(restored.selection().postal_code, " 57000 ");
    }

    #[tokio::test]
    async fn test_transition_outside_candidates_is_rejected() {
        let service = service();
        let result = service
            .apply_transition(
                &state(Some(1), None, None, ""),
                SelectionActionDto::SelectDistrict {
                    district_id: Some(20),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn test_validate_and_format_snapshot() {
        let service = service();

        let validation = service
            .validate(&state(Some(1), None, None, "5020"))
            .await
            .unwrap();
        assert!(!validation.is_valid());
        assert!(validation.error(AddressField::Province).is_none());
        assert!(validation.error(AddressField::District).is_some());
        assert!(validation.error(AddressField::PostalCode).is_some());

        let display = service
            .format(&state(Some(1), Some(10), Some(100), ""))
            .await
            .unwrap();
        assert_eq!(
            display,
            "ตำบล สุเทพ อำเภอ เมืองเชียงใหม่ จังหวัด เชียงใหม่ รหัสไปรษณีย์ 50200"
        );
    }

    #[tokio::test]
    async fn test_listing_reports_incomplete_dataset() {
        let source = StaticDatasetSource::sample().failing(DatasetTable::Districts);
        let provider = AddressDatasetProvider::new(Arc::new(source));
        let service = AddressService::new(
            Arc::new(provider),
            CascadePolicy::default(),
            SearchConfig::default(),
        );

        let provinces = service.list_provinces(None, None).await.unwrap();
        assert_eq!(provinces.total, 3);
        assert!(!provinces.complete);

        let districts = service
            .list_districts_by_province(1, None, None)
            .await
            .unwrap();
        assert!(districts.items.is_empty());
    }
}
