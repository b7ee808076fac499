mod birth_date;
mod models;
mod queries;

pub use birth_date::*;
pub use models::*;
