pub mod action;
pub mod coordinate;
pub mod record;
pub mod session;
pub mod subject;

pub use action::Action;
pub use coordinate::Coordinate;
pub use record::AttendanceRecord;
pub use session::{ConversationKey, Session, SessionState};
pub use subject::{Subject, SubjectDirectory};
