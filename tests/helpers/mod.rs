pub mod setup;
pub mod utils;
