pub mod city;
pub mod country;
pub mod state;

mod queries;

