//! Error type for the layer RTM.

/// Possible RTM errors.
#[derive(Debug)]
pub enum RtmError {
    /// A physical input is outside its valid range
    InvalidParameter {
        /// Name of the offending parameter
        name: &'static str,
        /// The rejected value
        value: f64,
    },
    /// A closed-form denominator vanished
    SingularConfiguration,
    /// The inputs don't have the expected shape(s)
    InconsistentInputs,
    /// The operation was aborted early
    Cancelled,
    /// The worker thread pool couldn't be created
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl RtmError {
    pub(crate) fn invalid(name: &'static str, value: f64) -> Self {
        RtmError::InvalidParameter { name, value }
    }
}

impl std::fmt::Display for RtmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RtmError::InvalidParameter { name, value } => {
                write!(f, "invalid value for {name}: {value}")
            }
            RtmError::SingularConfiguration => {
                write!(f, "singular configuration: bottom albedo times layer reflectance is 1")
            }
            RtmError::InconsistentInputs => write!(f, "inputs to RTM have the wrong shape"),
            RtmError::Cancelled => write!(f, "operation cancelled early"),
            RtmError::ThreadPool(e) => write!(f, "couldn't build thread pool: {e}"),
        }
    }
}

impl std::error::Error for RtmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RtmError::ThreadPool(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for RtmError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        RtmError::ThreadPool(e)
    }
}
