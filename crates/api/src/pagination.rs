use serde::Deserialize;

/// List payload as the backend serves it: either a pagination envelope with
/// the items under `results`, or a bare array on deployments that do not
/// paginate the endpoint. Extra envelope fields (counts, cursors) are ignored.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paginated { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Paginated { results } => results,
            Listing::Bare(items) => items,
        }
    }
}
