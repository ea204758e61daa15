use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::features::address::clients::{DatasetError, DatasetSource};
use crate::features::address::dataset::{AddressDataset, DatasetTable};
use crate::features::address::models::{District, Province, SubDistrict};

pub fn province(id: i64, name_th: &str, name_en: &str) -> Province {
    Province {
        id,
        name_th: name_th.to_string(),
        name_en: name_en.to_string(),
    }
}

pub fn district(id: i64, province_id: i64, name_th: &str, name_en: &str) -> District {
    District {
        id,
        name_th: name_th.to_string(),
        name_en: name_en.to_string(),
        province_id,
    }
}

pub fn sub_district(
    id: i64,
    amphure_id: i64,
    name_th: &str,
    name_en: &str,
    zip_code: &str,
) -> SubDistrict {
    SubDistrict {
        id,
        name_th: name_th.to_string(),
        name_en: name_en.to_string(),
        amphure_id,
        zip_code: zip_code.to_string(),
    }
}

/// Small dataset covering shared zip codes and more than one province
pub fn sample_tables() -> (Vec<Province>, Vec<District>, Vec<SubDistrict>) {
    let provinces = vec![
        province(1, "เชียงใหม่", "Chiang Mai"),
        province(2, "เชียงราย", "Chiang Rai"),
        province(3, "กรุงเทพมหานคร", "Bangkok"),
    ];
    let districts = vec![
        district(10, 1, "เมืองเชียงใหม่", "Mueang Chiang Mai"),
        district(11, 1, "หางดง", "Hang Dong"),
        district(20, 2, "เมืองเชียงราย", "Mueang Chiang Rai"),
        district(30, 3, "พระนคร", "Phra Nakhon"),
    ];
    let sub_districts = vec![
        sub_district(100, 10, "สุเทพ", "Suthep", "50200"),
        sub_district(101, 10, "ศรีภูมิ", "Si Phum", "50200"),
        sub_district(110, 11, "หางดง", "Hang Dong", "50230"),
        sub_district(200, 20, "เวียง", "Wiang", "57000"),
        sub_district(300, 30, "พระบรมมหาราชวัง", "Phra Borom Maha Ratchawang", "10200"),
    ];
    (provinces, districts, sub_districts)
}

pub fn sample_dataset() -> Arc<AddressDataset> {
    let (provinces, districts, sub_districts) = sample_tables();
    Arc::new(AddressDataset::new(provinces, districts, sub_districts))
}

/// In-memory [`DatasetSource`] that counts fetches
pub struct StaticDatasetSource {
    tables: HashMap<DatasetTable, Option<Vec<u8>>>,
    fetches: AtomicUsize,
}

impl StaticDatasetSource {
    pub fn new(
        provinces: &[Province],
        districts: &[District],
        sub_districts: &[SubDistrict],
    ) -> Self {
        let mut tables = HashMap::new();
        tables.insert(
            DatasetTable::Provinces,
            Some(serde_json::to_vec(provinces).unwrap()),
        );
        tables.insert(
            DatasetTable::Districts,
            Some(serde_json::to_vec(districts).unwrap()),
        );
        tables.insert(
            DatasetTable::SubDistricts,
            Some(serde_json::to_vec(sub_districts).unwrap()),
        );
        Self {
            tables,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn sample() -> Self {
        let (provinces, districts, sub_districts) = sample_tables();
        Self::new(&provinces, &districts, &sub_districts)
    }

    /// Make one table fail to load
    pub fn failing(mut self, table: DatasetTable) -> Self {
        self.tables.insert(table, None);
        self
    }

    pub fn with_raw(mut self, table: DatasetTable, raw: &[u8]) -> Self {
        self.tables.insert(table, Some(raw.to_vec()));
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatasetSource for StaticDatasetSource {
    fn describe(&self) -> String {
        "static".to_string()
    }

    async fn fetch(&self, table: DatasetTable) -> Result<Vec<u8>, DatasetError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.tables.get(&table) {
            Some(Some(bytes)) => Ok(bytes.clone()),
            _ => Err(DatasetError::Status {
                url: format!("static://{}", table.file_name()),
                status: 503,
            }),
        }
    }
}
