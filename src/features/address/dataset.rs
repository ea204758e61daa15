//! In-memory address reference tables.
//!
//! An [`AddressDataset`] is built once from the three published tables and
//! never mutated afterwards. Row order is kept exactly as loaded, since the
//! postal-code lookup breaks ties by dataset order.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::features::address::models::{District, Province, SubDistrict};

/// One of the three reference tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum DatasetTable {
    Provinces,
    Districts,
    SubDistricts,
}

impl DatasetTable {
    /// File name of the table in the published dataset
    pub fn file_name(&self) -> &'static str {
        match self {
            DatasetTable::Provinces => "api_province.json",
            DatasetTable::Districts => "api_amphure.json",
            DatasetTable::SubDistricts => "api_tambon.json",
        }
    }
}

impl std::fmt::Display for DatasetTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DatasetTable::Provinces => "provinces",
            DatasetTable::Districts => "districts",
            DatasetTable::SubDistricts => "sub-districts",
        };
        f.write_str(name)
    }
}

/// A table that could not be loaded and was replaced by an empty list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatasetLoadFailure {
    pub table: DatasetTable,
    pub reason: String,
}

#[derive(Debug)]
pub struct AddressDataset {
    provinces: Vec<Province>,
    districts: Vec<District>,
    sub_districts: Vec<SubDistrict>,
    province_index: HashMap<i64, usize>,
    district_index: HashMap<i64, usize>,
    sub_district_index: HashMap<i64, usize>,
    postal_code_index: HashMap<String, Vec<usize>>,
    failures: Vec<DatasetLoadFailure>,
    loaded_at: DateTime<Utc>,
}

fn index_by_id<T>(rows: &[T], id: impl Fn(&T) -> i64) -> HashMap<i64, usize> {
    let mut index = HashMap::with_capacity(rows.len());
    for (pos, row) in rows.iter().enumerate() {
        // first row wins on duplicate ids
        index.entry(id(row)).or_insert(pos);
    }
    index
}

impl AddressDataset {
    pub fn new(
        provinces: Vec<Province>,
        districts: Vec<District>,
        sub_districts: Vec<SubDistrict>,
    ) -> Self {
        let province_index = index_by_id(&provinces, |p| p.id);
        let district_index = index_by_id(&districts, |d| d.id);
        let sub_district_index = index_by_id(&sub_districts, |s| s.id);

        let mut postal_code_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, sub_district) in sub_districts.iter().enumerate() {
            postal_code_index
                .entry(sub_district.zip_code.clone())
                .or_default()
                .push(pos);
        }

        Self {
            provinces,
            districts,
            sub_districts,
            province_index,
            district_index,
            sub_district_index,
            postal_code_index,
            failures: Vec::new(),
            loaded_at: Utc::now(),
        }
    }

    #[cfg(test)]
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }

    pub fn with_failures(mut self, failures: Vec<DatasetLoadFailure>) -> Self {
        self.failures = failures;
        self
    }

    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    pub fn sub_districts(&self) -> &[SubDistrict] {
        &self.sub_districts
    }

    pub fn province(&self, id: i64) -> Option<&Province> {
        self.province_index.get(&id).map(|&pos| &self.provinces[pos])
    }

    pub fn district(&self, id: i64) -> Option<&District> {
        self.district_index.get(&id).map(|&pos| &self.districts[pos])
    }

    pub fn sub_district(&self, id: i64) -> Option<&SubDistrict> {
        self.sub_district_index
            .get(&id)
            .map(|&pos| &self.sub_districts[pos])
    }

    /// Districts belonging to a province, in dataset order
    pub fn districts_of(&self, province_id: i64) -> impl Iterator<Item = &District> + '_ {
        self.districts
            .iter()
            .filter(move |d| d.province_id == province_id)
    }

    /// Sub-districts belonging to a district, in dataset order
    pub fn sub_districts_of(&self, district_id: i64) -> impl Iterator<Item = &SubDistrict> + '_ {
        self.sub_districts
            .iter()
            .filter(move |s| s.amphure_id == district_id)
    }

    /// Sub-districts carrying the given zip code, in dataset order
    pub fn sub_districts_with_zip(&self, zip_code: &str) -> impl Iterator<Item = &SubDistrict> + '_ {
        self.postal_code_index
            .get(zip_code)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.sub_districts[pos])
    }

    pub fn failures(&self) -> &[DatasetLoadFailure] {
        &self.failures
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}
