pub mod booking;
pub mod conflict;
pub mod lifecycle;
pub mod slots;
pub mod timezone;
pub mod validation;

pub use booking::AppointmentBookingService;
pub use conflict::ConflictDetectionService;
pub use lifecycle::AppointmentLifecycleService;
pub use timezone::ClinicZone;
pub use validation::BookingValidator;
