use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_days: u32,
    #[serde(default)]
    pub normal_turns: u32,
    #[serde(default)]
    pub priority_turns: u32,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// A purchased package instance owned by the current user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPackage {
    pub id: i64,
    #[serde(default)]
    pub package_id: Option<i64>,
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default)]
    pub remaining_normal_turns: u32,
    #[serde(default)]
    pub remaining_priority_turns: u32,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub package_id: i64,
}

fn default_true() -> bool {
    true
}
