use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

use crate::features::address::clients::{DatasetError, DatasetSource};
use crate::features::address::dataset::{AddressDataset, DatasetLoadFailure, DatasetTable};
use crate::features::address::models::{District, Province, SubDistrict};

/// Loads the three reference tables once and serves them from memory.
///
/// The first call to [`load_all`](Self::load_all) performs the load; callers
/// arriving while it is in flight wait for the same result. The cached
/// dataset lives as long as the provider and is never refreshed.
pub struct AddressDatasetProvider {
    source: Arc<dyn DatasetSource>,
    dataset: OnceCell<Arc<AddressDataset>>,
}

impl AddressDatasetProvider {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            source,
            dataset: OnceCell::new(),
        }
    }

    /// Provider that is already loaded with the given dataset
    #[cfg(test)]
    pub fn preloaded(source: Arc<dyn DatasetSource>, dataset: Arc<AddressDataset>) -> Self {
        Self {
            source,
            dataset: OnceCell::new_with(Some(dataset)),
        }
    }

    /// Load all tables, or return the cached dataset.
    ///
    /// A table that fails to load is replaced by an empty list and recorded
    /// in [`AddressDataset::failures`]; the other tables still load.
    pub async fn load_all(&self) -> Arc<AddressDataset> {
        self.dataset
            .get_or_init(|| async { Arc::new(self.load().await) })
            .await
            .clone()
    }

    async fn load(&self) -> AddressDataset {
        tracing::info!("Loading address dataset from {}", self.source.describe());

        let (provinces, districts, sub_districts) = futures::join!(
            self.load_table::<Province>(DatasetTable::Provinces),
            self.load_table::<District>(DatasetTable::Districts),
            self.load_table::<SubDistrict>(DatasetTable::SubDistricts),
        );

        let mut failures = Vec::new();
        let provinces = provinces.unwrap_or_else(|f| {
            failures.push(f);
            Vec::new()
        });
        let districts = districts.unwrap_or_else(|f| {
            failures.push(f);
            Vec::new()
        });
        let sub_districts = sub_districts.unwrap_or_else(|f| {
            failures.push(f);
            Vec::new()
        });

        tracing::info!(
            "Address dataset loaded: provinces={}, districts={}, sub_districts={}, failures={}",
            provinces.len(),
            districts.len(),
            sub_districts.len(),
            failures.len()
        );

        AddressDataset::new(provinces, districts, sub_districts).with_failures(failures)
    }

    async fn load_table<T: DeserializeOwned>(
        &self,
        table: DatasetTable,
    ) -> Result<Vec<T>, DatasetLoadFailure> {
        let parsed = match self.source.fetch(table).await {
            Ok(bytes) => serde_json::from_slice::<Vec<T>>(&bytes).map_err(DatasetError::from),
            Err(e) => Err(e),
        };

        parsed.map_err(|e| {
            tracing::warn!("Failed to load {} table: {}", table, e);
            DatasetLoadFailure {
                table,
                reason: e.to_string(),
            }
        })
    }
}
