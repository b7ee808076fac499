mod models;
mod queries;

pub use models::*;
