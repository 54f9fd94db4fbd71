pub mod engine;
pub mod process;
pub mod workspace;
