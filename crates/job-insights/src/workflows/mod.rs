pub mod jobs;
pub mod sources;
