pub mod bots;
pub mod replay;
pub mod runner;
pub mod util;
