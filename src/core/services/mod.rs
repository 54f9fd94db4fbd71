pub mod diagnostic_parser;
pub mod sanitizer;
pub mod status_resolver;
