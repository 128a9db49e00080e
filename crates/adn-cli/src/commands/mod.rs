// Batch conversion
pub mod batch;
pub mod csv;
pub mod pdf;

// Housekeeping
pub mod config;
pub mod files;

// Review workflow
pub mod review;
