pub mod app_config;
pub mod engine_options;
