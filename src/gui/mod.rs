pub mod menu;
pub mod theme;
pub mod units;
