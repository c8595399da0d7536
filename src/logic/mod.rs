pub mod answers;
pub mod notifications;
pub mod reminders;
pub mod shifts;
