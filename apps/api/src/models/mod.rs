pub mod job_match;
pub mod resume;
pub mod run;
pub mod settings;
