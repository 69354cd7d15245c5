use openroute::prelude::*;

/// Stored item. Only ever produced by the server, so nothing is checked.
#[derive(Clone, Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[garde(allow_unvalidated)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
pub struct NewItem {
    /// Display name.
    #[garde(length(min = 1, max = 64))]
    pub name: String,
    #[garde(range(min = 0))]
    pub count: i64,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct ItemPath {
    #[garde(range(min = 1))]
    pub id: u64,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct ListQuery {
    /// Maximum number of items to return.
    #[garde(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct PingQuery {
    #[garde(length(min = 1))]
    pub name: String,
}
