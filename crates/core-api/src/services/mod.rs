mod family;
mod geo;
mod image;
mod profile;
mod router;
mod search;
mod user;

pub use router::*;
