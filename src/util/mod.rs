pub mod cancel;
pub mod process;
pub mod ui;
