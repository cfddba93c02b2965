use thiserror::Error;

/// Name of the object-level rule requiring a product link.
pub const AT_LEAST_ONE_PRODUCT: &str = "at_least_one_product";

/// One broken rule in a structured analysis candidate.
///
/// `field` is a path such as `recommendations[1].product.url`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("`{field}` is missing or empty")]
    MissingField { field: String },

    #[error("`{field}` must be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("`{field}` must be one of high, medium, low (got `{value}`)")]
    InvalidEnum { field: String, value: String },

    #[error("`{field}` is not a usable product URL: `{url}`")]
    InvalidUrl { field: String, url: String },

    #[error("`{field}` must hold between {min} and {max} items (got {actual})")]
    InvalidLength {
        field: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("{message}")]
    CrossFieldViolation { rule: &'static str, message: String },
}

impl Violation {
    /// Path of the offending field; the rule name for cross-field violations.
    pub fn field(&self) -> &str {
        match self {
            Violation::MissingField { field }
            | Violation::WrongType { field, .. }
            | Violation::InvalidEnum { field, .. }
            | Violation::InvalidUrl { field, .. }
            | Violation::InvalidLength { field, .. } => field,
            Violation::CrossFieldViolation { rule, .. } => rule,
        }
    }
}
