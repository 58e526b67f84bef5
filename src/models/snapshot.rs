use serde::{Deserialize, Serialize};

use super::aggregate::ScopeOneAggregate;

/// A saved copy of the full aggregate, tagged with when and under what
/// label it was captured. The aggregate fields are flattened so the
/// persisted record keeps the shape of previously saved lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(flatten)]
    pub aggregate: ScopeOneAggregate,
    pub saved_at: String, // ISO-8601
    pub label: String,
}
