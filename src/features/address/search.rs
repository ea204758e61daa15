//! Free-text narrowing of picker candidates.
//!
//! [`search`] has no result limit of its own. Every caller that renders the
//! result is responsible for capping it (the HTTP handlers apply the
//! `limit` query parameter, see [`crate::shared::constants`]).

use serde::Deserialize;
use utoipa::ToSchema;

use crate::features::address::models::{AddressUnit, District, Province, SubDistrict};

/// A field that free-text search can match against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SearchField {
    NameTh,
    NameEn,
    ZipCode,
}

/// Fields used by the pickers when the caller does not choose
pub const DEFAULT_SEARCH_FIELDS: &[SearchField] = &[SearchField::NameTh, SearchField::NameEn];

pub trait Searchable {
    /// Value of `field`, or `None` if this entity has no such field
    fn search_field(&self, field: SearchField) -> Option<&str>;
}

impl Searchable for Province {
    fn search_field(&self, field: SearchField) -> Option<&str> {
        match field {
            SearchField::NameTh => Some(&self.name_th),
            SearchField::NameEn => Some(&self.name_en),
            SearchField::ZipCode => None,
        }
    }
}

impl Searchable for District {
    fn search_field(&self, field: SearchField) -> Option<&str> {
        match field {
            SearchField::NameTh => Some(&self.name_th),
            SearchField::NameEn => Some(&self.name_en),
            SearchField::ZipCode => None,
        }
    }
}

impl Searchable for SubDistrict {
    fn search_field(&self, field: SearchField) -> Option<&str> {
        match field {
            SearchField::NameTh => Some(&self.name_th),
            SearchField::NameEn => Some(&self.name_en),
            SearchField::ZipCode => Some(&self.zip_code),
        }
    }
}

impl Searchable for AddressUnit {
    fn search_field(&self, field: SearchField) -> Option<&str> {
        match self {
            AddressUnit::Province(p) => p.search_field(field),
            AddressUnit::District(d) => d.search_field(field),
            AddressUnit::SubDistrict(s) => s.search_field(field),
        }
    }
}

/// Items where any of `fields` contains `query`, ignoring case.
///
/// Only an empty query matches everything; whitespace is matched like any
/// other character. Input order is preserved.
pub fn search<'a, T: Searchable>(
    items: impl IntoIterator<Item = &'a T>,
    query: &str,
    fields: &[SearchField],
) -> Vec<&'a T>
where
    T: 'a,
{
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return items.into_iter().collect();
    }

    items
        .into_iter()
        .filter(|item| matches(*item, &needle, fields))
        .collect()
}

fn matches<T: Searchable>(item: &T, needle: &str, fields: &[SearchField]) -> bool {
    fields.iter().any(|&field| {
        item.search_field(field)
            .is_some_and(|value| value.to_lowercase().contains(needle))
    })
}
