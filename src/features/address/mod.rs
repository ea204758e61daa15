//! Thai address resolution feature.
//!
//! Serves the province → district (amphure) → sub-district (tambon)
//! reference tables to the console's address pickers, including free-text
//! narrowing of each picker and reverse lookup from a postal code.
//!
//! ## Data Hierarchy
//!
//! - Level 1: Provinces (จังหวัด) - 77 regions
//! - Level 2: Districts (อำเภอ) - 928 regions
//! - Level 3: Sub-districts (ตำบล) - 7,436 regions, each with a postal code
//!
//! The tables are fetched once per process (see [`services::AddressDatasetProvider`])
//! and held in memory.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/address/dataset` | Dataset load status |
//! | GET | `/api/address/provinces` | List provinces |
//! | GET | `/api/address/provinces/{id}` | Get province by id |
//! | GET | `/api/address/provinces/{id}/districts` | List districts in a province |
//! | GET | `/api/address/districts/{id}` | Get district by id |
//! | GET | `/api/address/districts/{id}/sub-districts` | List sub-districts in a district |
//! | GET | `/api/address/sub-districts/{id}` | Get sub-district by id |
//! | GET | `/api/address/search` | Search all levels |
//! | GET | `/api/address/postal-codes/{code}` | Resolve a postal code |
//! | POST | `/api/address/selection/transitions` | Apply one cascade step |
//! | POST | `/api/address/selection/validate` | Validate a selection |
//! | POST | `/api/address/selection/format` | Render a selection for display |

pub mod clients;
pub mod dataset;
pub mod dtos;
pub mod format;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod search;
pub mod selector;
pub mod services;
pub mod validation;

pub use services::AddressService;
