pub mod chart;
pub mod dashboard;
pub mod export;
pub mod format;
pub mod menu;
pub mod table;
