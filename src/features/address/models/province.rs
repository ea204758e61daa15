use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Province model representing Thai provinces (จังหวัด)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Province {
    pub id: i64,
    pub name_th: String,
    #[serde(default)]
    pub name_en: String,
}
