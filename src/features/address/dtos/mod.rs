mod address_dto;
mod selection_dto;

pub use address_dto::*;
pub use selection_dto::*;
