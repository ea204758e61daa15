use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Sub-district model representing Thai sub-districts (ตำบล / tambon)
///
/// The published dataset stores `zip_code` as a JSON number, which drops the
/// leading zero of codes such as `01000`. Both forms are accepted and the
/// value is kept as a zero-padded five character string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubDistrict {
    pub id: i64,
    pub name_th: String,
    #[serde(default)]
    pub name_en: String,
    pub amphure_id: i64,
    #[serde(deserialize_with = "deserialize_zip_code")]
    pub zip_code: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawZipCode {
    Number(u32),
    Text(String),
}

fn deserialize_zip_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawZipCode::deserialize(deserializer)? {
        RawZipCode::Number(n) => format!("{:05}", n),
        RawZipCode::Text(s) => s.trim().to_string(),
    })
}
