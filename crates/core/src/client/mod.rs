pub mod traits;

// HTTP client implementations
pub mod account_api;
pub mod fund_api;
