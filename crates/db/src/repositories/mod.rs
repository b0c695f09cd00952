//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. User-scoped methods also take
//! the caller's `user_id` and filter on it, so another user's row reads as
//! missing.

pub mod daily_todo_repo;
pub mod event_repo;
pub mod focus_app_repo;
pub mod focus_session_repo;
pub mod party_repo;
pub mod subject_repo;
pub mod task_repo;
pub mod user_repo;
pub mod user_status_repo;

pub use daily_todo_repo::DailyTodoRepo;
pub use event_repo::EventRepo;
pub use focus_app_repo::FocusAppRepo;
pub use focus_session_repo::FocusSessionRepo;
pub use party_repo::{MemberInsert, PartyRepo};
pub use subject_repo::SubjectRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
pub use user_status_repo::UserStatusRepo;
