mod models;
mod router;

pub use models::*;
pub use router::*;
