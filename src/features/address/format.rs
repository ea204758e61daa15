use crate::features::address::models::AddressSelection;

pub const SUB_DISTRICT_LABEL: &str = "ตำบล";
pub const DISTRICT_LABEL: &str = "อำเภอ";
pub const PROVINCE_LABEL: &str = "จังหวัด";
pub const POSTAL_CODE_LABEL: &str = "รหัสไปรษณีย์";

/// Single-line address: sub-district, district, province, postal code.
///
/// Each part is written as `label name`; parts that are not selected are
/// left out.
pub fn format_address(selection: &AddressSelection) -> String {
    let parts = [
        (
            SUB_DISTRICT_LABEL,
            selection.sub_district.as_ref().map(|s| s.name_th.as_str()),
        ),
        (
            DISTRICT_LABEL,
            selection.district.as_ref().map(|d| d.name_th.as_str()),
        ),
        (
            PROVINCE_LABEL,
            selection.province.as_ref().map(|p| p.name_th.as_str()),
        ),
        (
            POSTAL_CODE_LABEL,
            Some(selection.postal_code.trim()).filter(|c| !c.is_empty()),
        ),
    ];

    parts
        .iter()
        .filter_map(|(label, value)| value.map(|v| format!("{} {}", label, v)))
        .collect::<Vec<_>>()
        .join(" ")
}
