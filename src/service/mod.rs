pub mod attendance;
pub mod clock;
pub mod hours;

pub use attendance::{AttendanceService, CheckInCommand, CheckOutCommand, TransitionOutcome};
pub use clock::{Clock, SystemClock};
