//! Parsers for ninja output formats

pub mod structlog;
