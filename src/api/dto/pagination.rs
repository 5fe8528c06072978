//! Pagination query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

/// Query parameters for `GET /api/urls`.
///
/// Uses `serde_with` to parse numbers from query strings. Both are optional;
/// the service applies the default and the page-size cap.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<usize>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub offset: Option<usize>,
}
