//! Form-level checks on a finished selection.
//!
//! Validation never fails: it returns a per-field message map that the
//! console shows inline and uses to block submission.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::features::address::models::AddressSelection;
use crate::shared::validation::is_postal_code;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum AddressField {
    Province,
    District,
    SubDistrict,
    PostalCode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressValidation {
    pub errors: BTreeMap<AddressField, String>,
}

impl AddressValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[cfg(test)]
    pub fn error(&self, field: AddressField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Messages in field order, for the `errors` list of an API response
    pub fn messages(&self) -> Vec<String> {
        self.errors.values().cloned().collect()
    }
}

pub fn validate_selection(selection: &AddressSelection) -> AddressValidation {
    let mut errors = BTreeMap::new();

    if selection.province.is_none() {
        errors.insert(AddressField::Province, "กรุณาเลือกจังหวัด".to_string());
    }
    if selection.district.is_none() {
        errors.insert(AddressField::District, "กรุณาเลือกอำเภอ".to_string());
    }
    if selection.sub_district.is_none() {
        errors.insert(AddressField::SubDistrict, "กรุณาเลือกตำบล".to_string());
    }

    if selection.postal_code.is_empty() {
        errors.insert(AddressField::PostalCode, "กรุณากรอกรหัสไปรษณีย์".to_string());
    } else if !is_postal_code(&selection.postal_code) {
        errors.insert(
            AddressField::PostalCode,
            "รหัสไปรษณีย์ต้องเป็นตัวเลข 5 หลัก".to_string(),
        );
    }

    AddressValidation { errors }
}
