pub mod duplicate;
pub mod naming;
pub mod organizer;
pub mod references;
pub mod report;
pub mod scanner;
pub mod scoring;
