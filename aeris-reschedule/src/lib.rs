pub mod validator;

pub use validator::{validate_proposals, CandidateError, RescheduleService, REQUIRED_CANDIDATES};
