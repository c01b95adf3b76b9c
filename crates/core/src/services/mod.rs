pub mod refresher;
pub mod watchlist_service;
