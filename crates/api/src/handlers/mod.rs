pub mod analytics;
pub mod daily_todos;
pub mod events;
pub mod focus_apps;
pub mod focus_sessions;
pub mod focus_tracker;
pub mod parties;
pub mod profile;
pub mod subjects;
pub mod tasks;
pub mod timer;
