pub mod analyze;
pub mod diagnostics;
pub mod health;
pub mod pages;
pub mod reports;
pub mod upload;
