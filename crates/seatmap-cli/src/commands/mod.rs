pub mod offline;
pub mod session;
pub mod utils;
