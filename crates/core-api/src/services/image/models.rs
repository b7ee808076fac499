use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadParams {
    /// Original file name; its extension decides whether the upload is accepted
    pub file_name: String,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ImageDeleted {
    /// False when the stored object could not be removed and was left behind
    pub blob_removed: bool,
}
