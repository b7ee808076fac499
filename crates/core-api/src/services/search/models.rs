use jodidar_database::SearchFilters;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

#[derive(Serialize, Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct SearchQuery {
    /// Matched against names, city, company, occupation and birth city
    pub keyword: Option<String>,
    pub gender: Option<String>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub caste: Option<String>,
    pub religion: Option<String>,
    pub marital_status: Option<String>,
    pub same_caste_only: bool,
    pub education: Option<String>,
    pub city: Option<String>,
}

#[derive(Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VisitorsQuery {
    pub limit: Option<usize>,
}

impl From<SearchQuery> for SearchFilters {
    fn from(val: SearchQuery) -> Self {
        Self {
            keyword: val.keyword,
            gender: val.gender,
            min_age: val.min_age,
            max_age: val.max_age,
            caste: val.caste,
            religion: val.religion,
            marital_status: val.marital_status,
            same_caste_only: val.same_caste_only,
            education: val.education,
            city: val.city,
        }
    }
}
