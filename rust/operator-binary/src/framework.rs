//! Validated name types and helpers which are not specific to PostgreSQL
//!
//! Names are validated once when they are parsed, so that derived names cannot be invalid.

use stackable_operator::validation::RFC_1123_LABEL_MAX_LENGTH;

pub mod macros {
    pub mod attributed_string_type;
    pub mod constant;
}

pub mod types {
    pub mod kubernetes;
    pub mod operator;
}

/// Maximum length of an object name which is also used as a DNS label, e.g. for a Service or a
/// Pod hostname
pub const MAX_DNS_LABEL_LENGTH: usize = RFC_1123_LABEL_MAX_LENGTH;
