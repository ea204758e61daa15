use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// District model representing Thai districts (อำเภอ / amphure)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct District {
    pub id: i64,
    pub name_th: String,
    #[serde(default)]
    pub name_en: String,
    pub province_id: i64,
}
