//! # Classify Module
//!
//! Fast, name-based classification of uploaded files.
//! Runs before any simulated analysis to tag the upload record.
//!
//! ## Components
//! - `file_type`: suffix-based file type, size formatting and MIME sniffing
//! - `module_detector`: keyword-group detection of the target business module

pub mod file_type;
pub mod module_detector;

pub use file_type::{classify_file_type, format_file_size, guess_mime_type};
pub use module_detector::{detect_module, detect_module_with_matches, ModuleDetection};
