pub mod cache;
pub mod dexscreener;
pub mod display;
