pub mod account;
pub mod fund;
pub mod settings;
pub mod subscription;
pub mod watchlist;
