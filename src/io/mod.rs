/// CSV export of panel data.
pub mod export;
