mod address_service;
mod dataset_provider;
mod postal_code_lookup;

pub use address_service::*;
pub use dataset_provider::*;
pub use postal_code_lookup::*;
