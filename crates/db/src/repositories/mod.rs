//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod attendance_repo;
pub mod member_repo;
pub mod registration_repo;
pub mod statistics_repo;
pub mod ticket_repo;

pub use attendance_repo::AttendanceRepo;
pub use member_repo::MemberRepo;
pub use registration_repo::RegistrationRepo;
pub use statistics_repo::StatisticsRepo;
pub use ticket_repo::TicketRepo;
