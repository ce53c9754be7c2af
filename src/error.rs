use thiserror::Error;

/// A recognized label whose value does not fit its grammar.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid Posted On value {value:?}: {reason}")]
    PostedOn { value: String, reason: String },

    #[error("invalid Budget value {value:?}")]
    Budget {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("invalid Hourly Range value {value:?}")]
    HourlyRange {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}

impl ParseError {
    /// The label the failing value was attached to.
    pub fn label(&self) -> &'static str {
        match self {
            ParseError::PostedOn { .. } => "Posted On",
            ParseError::Budget { .. } => "Budget",
            ParseError::HourlyRange { .. } => "Hourly Range",
        }
    }
}
