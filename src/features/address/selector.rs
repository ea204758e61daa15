//! Cascading province → district → sub-district selection.
//!
//! [`AddressSelector`] owns one [`AddressSelection`] together with the
//! candidate lists offered by each picker, and keeps them consistent:
//!
//! 1. a selected district belongs to the selected province;
//! 2. a selected sub-district belongs to the selected district;
//! 3. a selected sub-district's zip code is the postal code, unless the
//!    user has since typed a code that did not resolve
//!    (see [`AddressSelection::postal_code_mismatch`]).
//!
//! Choosing a parent clears its children. Typing a complete postal code
//! fills in the whole cascade from the reverse lookup.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::features::address::dataset::AddressDataset;
use crate::features::address::models::{
    AddressSelection, District, Province, SelectionStage, SubDistrict,
};
use crate::features::address::services::{PostalCodeLookup, ResolvedAddress};
use crate::shared::validation::is_postal_code;

/// A child was offered that does not belong to the selected parent.
///
/// This is a bug in the caller, which should only offer the current
/// candidates. The selection is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTransition {
    #[error("District {district_id} cannot be selected before a province")]
    DistrictWithoutProvince { district_id: i64 },

    #[error("District {district_id} belongs to province {belongs_to}, not the selected province {selected}")]
    DistrictOutsideProvince {
        district_id: i64,
        belongs_to: i64,
        selected: i64,
    },

    #[error("Sub-district {sub_district_id} cannot be selected before a district")]
    SubDistrictWithoutDistrict { sub_district_id: i64 },

    #[error("Sub-district {sub_district_id} belongs to district {belongs_to}, not the selected district {selected}")]
    SubDistrictOutsideDistrict {
        sub_district_id: i64,
        belongs_to: i64,
        selected: i64,
    },
}

/// What happens to the postal code when the cascade above it changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadePolicy {
    pub clear_postal_code_on_province_change: bool,
    pub clear_postal_code_on_sub_district_clear: bool,
}

/// Result of typing into the postal code field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PostalCodeOutcome {
    /// Not five digits yet; nothing was looked up
    Incomplete,
    /// The cascade was filled from the first of `alternatives` matches
    Resolved { alternatives: usize },
    /// No sub-district carries this code; the cascade was left as it was
    NotFound,
}

pub struct AddressSelector {
    dataset: Arc<AddressDataset>,
    policy: CascadePolicy,
    selection: AddressSelection,
    district_candidates: Vec<District>,
    sub_district_candidates: Vec<SubDistrict>,
}

impl AddressSelector {
    pub fn new(dataset: Arc<AddressDataset>, policy: CascadePolicy) -> Self {
        Self {
            dataset,
            policy,
            selection: AddressSelection::default(),
            district_candidates: Vec::new(),
            sub_district_candidates: Vec::new(),
        }
    }

    /// Selector pre-populated from caller-supplied values.
    ///
    /// The values go through the same checks as interactive selection. A
    /// non-empty `postal_code` is kept as given; an empty one is derived from
    /// the sub-district. A restored code that differs from the sub-district's
    /// is preserved as is and surfaces through `postal_code_mismatch`.
    pub fn with_initial(
        dataset: Arc<AddressDataset>,
        policy: CascadePolicy,
        initial: AddressSelection,
    ) -> Result<Self, InvalidTransition> {
        let mut selector = Self::new(dataset, policy);
        selector.select_province(initial.province);
        selector.select_district(initial.district)?;
        selector.select_sub_district(initial.sub_district)?;
        if !initial.postal_code.is_empty() {
            selector.selection.postal_code = initial.postal_code;
        }
        Ok(selector)
    }

    pub fn select_province(&mut self, province: Option<Province>) {
        self.district_candidates = match &province {
            Some(p) => self.dataset.districts_of(p.id).cloned().collect(),
            None => Vec::new(),
        };
        self.sub_district_candidates.clear();

        self.selection.province = province;
        self.selection.district = None;
        self.selection.sub_district = None;
        if self.policy.clear_postal_code_on_province_change {
            self.selection.postal_code.clear();
        }
    }

    pub fn select_district(&mut self, district: Option<District>) -> Result<(), InvalidTransition> {
        if let Some(d) = &district {
            match &self.selection.province {
                None => {
                    return Err(InvalidTransition::DistrictWithoutProvince { district_id: d.id })
                }
                Some(p) if p.id != d.province_id => {
                    return Err(InvalidTransition::DistrictOutsideProvince {
                        district_id: d.id,
                        belongs_to: d.province_id,
                        selected: p.id,
                    })
                }
                Some(_) => {}
            }
        }

        self.sub_district_candidates = match &district {
            Some(d) => self.dataset.sub_districts_of(d.id).cloned().collect(),
            None => Vec::new(),
        };
        self.selection.district = district;
        self.selection.sub_district = None;
        Ok(())
    }

    pub fn select_sub_district(
        &mut self,
        sub_district: Option<SubDistrict>,
    ) -> Result<(), InvalidTransition> {
        if let Some(s) = &sub_district {
            match &self.selection.district {
                None => {
                    return Err(InvalidTransition::SubDistrictWithoutDistrict {
                        sub_district_id: s.id,
                    })
                }
                Some(d) if d.id != s.amphure_id => {
                    return Err(InvalidTransition::SubDistrictOutsideDistrict {
                        sub_district_id: s.id,
                        belongs_to: s.amphure_id,
                        selected: d.id,
                    })
                }
                Some(_) => {}
            }
        }

        match &sub_district {
            Some(s) => self.selection.postal_code = s.zip_code.clone(),
            None if self.policy.clear_postal_code_on_sub_district_clear => {
                self.selection.postal_code.clear()
            }
            None => {}
        }
        self.selection.sub_district = sub_district;
        Ok(())
    }

    /// Store a typed postal code and, once it is five digits, fill in the
    /// cascade from it.
    pub fn set_postal_code(&mut self, code: impl Into<String>) -> PostalCodeOutcome {
        self.selection.postal_code = code.into();
        if !is_postal_code(&self.selection.postal_code) {
            return PostalCodeOutcome::Incomplete;
        }

        let lookup = PostalCodeLookup::new(Arc::clone(&self.dataset));
        let mut matches = lookup.resolve_all(&self.selection.postal_code);
        if matches.is_empty() {
            tracing::debug!(
                "No sub-district carries postal code {}",
                self.selection.postal_code
            );
            return PostalCodeOutcome::NotFound;
        }

        let alternatives = matches.len();
        let first = matches.swap_remove(0);
        self.apply_resolved(first);
        PostalCodeOutcome::Resolved { alternatives }
    }

    fn apply_resolved(&mut self, resolved: ResolvedAddress) {
        self.district_candidates = self
            .dataset
            .districts_of(resolved.province.id)
            .cloned()
            .collect();
        self.sub_district_candidates = self
            .dataset
            .sub_districts_of(resolved.district.id)
            .cloned()
            .collect();

        self.selection.province = Some(resolved.province);
        self.selection.district = Some(resolved.district);
        self.selection.sub_district = Some(resolved.sub_district);
    }

    pub fn selection(&self) -> &AddressSelection {
        &self.selection
    }

    pub fn stage(&self) -> SelectionStage {
        self.selection.stage()
    }

    pub fn province_candidates(&self) -> &[Province] {
        self.dataset.provinces()
    }

    pub fn district_candidates(&self) -> &[District] {
        &self.district_candidates
    }

    pub fn sub_district_candidates(&self) -> &[SubDistrict] {
        &self.sub_district_candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{district, province, sample_dataset, sub_district};

    fn selector() -> AddressSelector {
        AddressSelector::new(sample_dataset(), CascadePolicy::default())
    }

    fn chiang_mai_dataset() -> Arc<AddressDataset> {
        Arc::new(AddressDataset::new(
            vec![province(1, "เชียงใหม่", "Chiang Mai")],
            vec![district(10, 1, "เมือง", "Mueang")],
            vec![sub_district(100, 10, "สุเทพ", "Suthep", "50200")],
        ))
    }

    fn ids<T>(items: &[T], id: impl Fn(&T) -> i64) -> Vec<i64> {
        items.iter().map(id).collect()
    }

    #[test]
    fn test_walking_the_cascade() {
        let dataset = chiang_mai_dataset();
        let mut selector = AddressSelector::new(dataset.clone(), CascadePolicy::default());

        selector.select_province(dataset.province(1).cloned());
        assert_eq!(ids(selector.district_candidates(), |d| d.id), vec![10]);
        assert_eq!(selector.stage(), SelectionStage::ProvinceOnly);

        selector.select_district(dataset.district(10).cloned()).unwrap();
        assert_eq!(ids(selector.sub_district_candidates(), |s| s.id), vec![100]);
        assert_eq!(selector.stage(), SelectionStage::ProvinceAndDistrict);

        selector
            .select_sub_district(dataset.sub_district(100).cloned())
            .unwrap();
        assert_eq!(selector.selection().postal_code, "50200");
        assert_eq!(selector.stage(), SelectionStage::Complete);
    }

    #[test]
    fn test_postal_code_fills_empty_selection() {
        let mut selector = AddressSelector::new(chiang_mai_dataset(), CascadePolicy::default());

        let outcome = selector.set_postal_code("50200");

        assert_eq!(outcome, PostalCodeOutcome::Resolved { alternatives: 1 });
        let selection = selector.selection();
        assert_eq!(selection.province.as_ref().unwrap().id, 1);
        assert_eq!(selection.district.as_ref().unwrap().id, 10);
        assert_eq!(selection.sub_district.as_ref().unwrap().id, 100);
        assert_eq!(ids(selector.district_candidates(), |d| d.id), vec![10]);
        assert_eq!(ids(selector.sub_district_candidates(), |s| s.id), vec![100]);
    }

    #[test]
    fn test_unknown_postal_code_keeps_cascade_and_text() {
        let mut selector = AddressSelector::new(chiang_mai_dataset(), CascadePolicy::default());

        let outcome = selector.set_postal_code("99999");

        assert_eq!(outcome, PostalCodeOutcome::NotFound);
        let selection = selector.selection();
        assert!(selection.province.is_none());
        assert!(selection.district.is_none());
        assert!(selection.sub_district.is_none());
        assert_eq!(selection.postal_code, "99999");
    }

    #[test]
    fn test_partial_postal_code_is_stored_without_lookup() {
        let mut selector = selector();
        assert_eq!(selector.set_postal_code("502"), PostalCodeOutcome::Incomplete);
        assert_eq!(selector.set_postal_code("50200a"), PostalCodeOutcome::Incomplete);
        assert_eq!(selector.selection().postal_code, "50200a");
        assert!(selector.selection().province.is_none());
    }

    #[test]
    fn test_clearing_province_clears_children() {
        let dataset = chiang_mai_dataset();
        let mut selector = AddressSelector::new(dataset.clone(), CascadePolicy::default());
        selector.select_province(dataset.province(1).cloned());
        selector.select_district(dataset.district(10).cloned()).unwrap();

        selector.select_province(None);

        assert!(selector.district_candidates().is_empty());
        assert!(selector.sub_district_candidates().is_empty());
        assert!(selector.selection().district.is_none());
        assert!(selector.selection().sub_district.is_none());
        assert_eq!(selector.stage(), SelectionStage::Empty);
    }

    #[test]
    fn test_selecting_same_province_twice_is_idempotent() {
        let dataset = sample_dataset();
        let mut once = AddressSelector::new(dataset.clone(), CascadePolicy::default());
        let mut twice = AddressSelector::new(dataset.clone(), CascadePolicy::default());

        once.select_province(dataset.province(1).cloned());
        twice.select_province(dataset.province(1).cloned());
        twice.select_province(dataset.province(1).cloned());

        assert_eq!(once.selection(), twice.selection());
        assert_eq!(once.district_candidates(), twice.district_candidates());
    }

    #[test]
    fn test_changing_province_keeps_postal_code_by_default() {
        let dataset = sample_dataset();
        let mut selector = selector();
        selector.set_postal_code("50200");

        selector.select_province(dataset.province(2).cloned());

        assert!(selector.selection().sub_district.is_none());
        assert_eq!(selector.selection().postal_code, "50200");
    }

    #[test]
    fn test_policy_can_clear_postal_code() {
        let dataset = sample_dataset();
        let policy = CascadePolicy {
            clear_postal_code_on_province_change: true,
            clear_postal_code_on_sub_district_clear: true,
        };

        let mut selector = AddressSelector::new(dataset.clone(), policy);
        selector.set_postal_code("57000");
        selector.select_sub_district(None).unwrap();
        assert_eq!(selector.selection().postal_code, "");

        selector.set_postal_code("57000");
        selector.select_province(dataset.province(1).cloned());
        assert_eq!(selector.selection().postal_code, "");
    }

    #[test]
    fn test_clearing_sub_district_keeps_postal_code_by_default() {
        let mut selector = selector();
        selector.set_postal_code("57000");

        selector.select_sub_district(None).unwrap();

        assert!(selector.selection().sub_district.is_none());
        assert_eq!(selector.selection().postal_code, "57000");
    }

    #[test]
    fn test_district_from_other_province_is_rejected() {
        let dataset = sample_dataset();
        let mut selector = selector();
        selector.select_province(dataset.province(1).cloned());
        let before = selector.selection().clone();

        let err = selector
            .select_district(dataset.district(20).cloned())
            .unwrap_err();

        assert_eq!(
            err,
            InvalidTransition::DistrictOutsideProvince {
                district_id: 20,
                belongs_to: 2,
                selected: 1,
            }
        );
        assert_eq!(selector.selection(), &before);
    }

    #[test]
    fn test_child_without_parent_is_rejected() {
        let dataset = sample_dataset();
        let mut selector = selector();

        assert!(matches!(
            selector.select_district(dataset.district(10).cloned()),
            Err(InvalidTransition::DistrictWithoutProvince { district_id: 10 })
        ));
        assert!(matches!(
            selector.select_sub_district(dataset.sub_district(100).cloned()),
            Err(InvalidTransition::SubDistrictWithoutDistrict {
                sub_district_id: 100
            })
        ));
        // clearing is always allowed
        assert!(selector.select_district(None).is_ok());
        assert!(selector.select_sub_district(None).is_ok());
    }

    #[test]
    fn test_sub_district_from_other_district_is_rejected() {
        let dataset = sample_dataset();
        let mut selector = selector();
        selector.select_province(dataset.province(1).cloned());
        selector.select_district(dataset.district(11).cloned()).unwrap();

        let err = selector
            .select_sub_district(dataset.sub_district(100).cloned())
            .unwrap_err();
        assert!(matches!(
            err,
            InvalidTransition::SubDistrictOutsideDistrict { selected: 11, .. }
        ));
        assert!(selector.selection().sub_district.is_none());
    }

    #[test]
    fn test_with_initial_checks_consistency() {
        let dataset = sample_dataset();
        let initial = AddressSelection {
            province: dataset.province(1).cloned(),
            district: dataset.district(10).cloned(),
            sub_district: dataset.sub_district(101).cloned(),
            postal_code: String::new(),
        };
        let selector =
            AddressSelector::with_initial(dataset.clone(), CascadePolicy::default(), initial)
                .unwrap();
        assert_eq!(selector.selection().postal_code, "50200");
        assert_eq!(ids(selector.sub_district_candidates(), |s| s.id), vec![100, 101]);

        let inconsistent = AddressSelection {
            province: dataset.province(2).cloned(),
            district: dataset.district(10).cloned(),
            sub_district: None,
            postal_code: String::new(),
        };
        assert!(
            AddressSelector::with_initial(dataset, CascadePolicy::default(), inconsistent)
                .is_err()
        );
    }

    #[test]
    fn test_with_initial_keeps_mismatched_postal_code() {
        let dataset = sample_dataset();
        let initial = AddressSelection {
            province: dataset.province(1).cloned(),
            district: dataset.district(10).cloned(),
            sub_district: dataset.sub_district(100).cloned(),
            postal_code: "10200".to_string(),
        };
        let selector =
            AddressSelector::with_initial(dataset, CascadePolicy::default(), initial).unwrap();

        assert_eq!(selector.selection().postal_code, "10200");
        assert_eq!(selector.selection().sub_district.as_ref().unwrap().id, 100);
        assert!(selector.selection().postal_code_mismatch());
    }

    #[test]
    fn test_typed_code_that_fails_to_resolve_is_a_mismatch() {
        let mut selector = selector();
        selector.set_postal_code("57000");
        assert!(!selector.selection().postal_code_mismatch());

        selector.set_postal_code("5700");
        assert!(selector.selection().postal_code_mismatch());
        assert_eq!(selector.selection().sub_district.as_ref().unwrap().id, 200);
    }

    #[test]
    fn test_empty_dataset_never_panics() {
        let mut selector =
            AddressSelector::new(Arc::new(AddressDataset::empty()), CascadePolicy::default());
        selector.select_province(Some(province(1, "เชียงใหม่", "Chiang Mai")));
        assert!(selector.district_candidates().is_empty());
        assert_eq!(selector.set_postal_code("50200"), PostalCodeOutcome::NotFound);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Province(Option<i64>),
            District(Option<i64>),
            SubDistrict(Option<i64>),
            PostalCode(String),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                prop::option::of(prop::sample::select(vec![1i64, 2, 3])).prop_map(Op::Province),
                prop::option::of(prop::sample::select(vec![10i64, 11, 20, 30]))
                    .prop_map(Op::District),
                prop::option::of(prop::sample::select(vec![100i64, 101, 110, 200, 300]))
                    .prop_map(Op::SubDistrict),
                prop::sample::select(vec!["50200", "50230", "57000", "10200", "99999", "502", ""])
                    .prop_map(|s| Op::PostalCode(s.to_string())),
            ]
        }

        fn check_invariants(selector: &AddressSelector) -> Result<(), TestCaseError> {
            let selection = selector.selection();
            if let Some(d) = &selection.district {
                let p = selection.province.as_ref();
                prop_assert_eq!(Some(d.province_id), p.map(|p| p.id));
            }
            if let Some(s) = &selection.sub_district {
                let d = selection.district.as_ref();
                prop_assert_eq!(Some(s.amphure_id), d.map(|d| d.id));
                if !selection.postal_code_mismatch() {
                    prop_assert_eq!(&selection.postal_code, &s.zip_code);
                }
            }
            match &selection.province {
                Some(p) => prop_assert!(selector
                    .district_candidates()
                    .iter()
                    .all(|d| d.province_id == p.id)),
                None => prop_assert!(selector.district_candidates().is_empty()),
            }
            match &selection.district {
                Some(d) => prop_assert!(selector
                    .sub_district_candidates()
                    .iter()
                    .all(|s| s.amphure_id == d.id)),
                None => prop_assert!(selector.sub_district_candidates().is_empty()),
            }
            Ok(())
        }

        proptest! {
            #[test]
            fn invariants_hold_after_any_sequence(ops in prop::collection::vec(op(), 0..30)) {
                let dataset = sample_dataset();
                let mut selector = AddressSelector::new(dataset.clone(), CascadePolicy::default());

                for op in ops {
                    let before = selector.selection().clone();
                    let result = match op {
                        Op::Province(id) => {
                            selector.select_province(id.and_then(|id| dataset.province(id).cloned()));
                            Ok(())
                        }
                        Op::District(id) => {
                            selector.select_district(id.and_then(|id| dataset.district(id).cloned()))
                        }
                        Op::SubDistrict(id) => selector
                            .select_sub_district(id.and_then(|id| dataset.sub_district(id).cloned())),
                        Op::PostalCode(code) => {
                            selector.set_postal_code(code);
                            Ok(())
                        }
                    };
                    if result.is_err() {
                        prop_assert_eq!(selector.selection(), &before);
                    }
                    check_invariants(&selector)?;
                }
            }
        }
    }
}
