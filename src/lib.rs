pub mod aggregate;
pub mod cleaning;
pub mod config;
pub mod country_codes;
pub mod coverage;
pub mod error;
pub mod linker;
pub mod models;
pub mod normalize;
pub mod report;
pub mod state_codes;
pub mod table;
