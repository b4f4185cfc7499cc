pub mod booking;
pub mod slot;
pub mod weather;
pub mod resources;
pub mod candidate;
pub mod run;
pub mod repository;

pub use booking::{Booking, BookingStatus, CertificationTier, Location, ResourceKind};
pub use candidate::{CandidateProposal, RankingRequest, RescheduleCandidate};
pub use repository::{BookingStore, DispatchReceipt, NotificationDispatcher, RankingClient, WeatherProvider};
pub use resources::{Aircraft, Instructor, Trainee, WeeklyWindow};
pub use run::WorkflowRun;
pub use slot::TimeSlot;
pub use weather::{MeasuredConditions, ObservationError, SafetyEvaluation, SafetyMinimums, WeatherObservation};
