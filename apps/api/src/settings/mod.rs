// Run configuration: read and update the single settings row.
// Every successful update re-evaluates the hourly scheduler.

pub mod handlers;
pub mod validation;
