use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating Thai postal codes
    /// Exactly five ASCII digits
    /// - Valid: "50200", "10100", "01000"
    /// - Invalid: "5020", "502000", "5020a", " 50200", "๕๐๒๐๐"
    pub static ref POSTAL_CODE_REGEX: Regex = Regex::new(r"^[0-9]{5}$").unwrap();
}

pub fn is_postal_code(value: &str) -> bool {
    POSTAL_CODE_REGEX.is_match(value)
}
