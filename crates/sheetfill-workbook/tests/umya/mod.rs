// Shared test helpers (umya workbook builders, etc.)
#[path = "../common/mod.rs"]
mod common;

mod cells;
mod save;
