//! Module detection using keyword groups.
//!
//! Guesses which business module an uploaded file belongs to from its name.
//! Groups are evaluated in priority order and the first match wins, so a name
//! matching both a crop and a finance keyword is routed to crops.

use crate::models::ModuleKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Result of module detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDetection {
    /// Detected module
    pub module: ModuleKind,
    /// The keyword that decided the match, `None` for the default
    pub matched_keyword: Option<String>,
}

/// Keyword group for one module
struct KeywordGroup {
    module: ModuleKind,
    pattern: Regex,
}

// Compile patterns once at startup; order is the detection priority.
// NOTE: expect() is acceptable here, the patterns are constants.
static KEYWORD_GROUPS: LazyLock<Vec<KeywordGroup>> = LazyLock::new(|| {
    vec![
        KeywordGroup {
            module: ModuleKind::Crops,
            pattern: Regex::new(r"(?i)cult|plante|semis|sol|parcel|ferti")
                .expect("Invalid regex: crop keywords"),
        },
        KeywordGroup {
            module: ModuleKind::Livestock,
            pattern: Regex::new(r"(?i)animal|vache|bovin|poule|vaccination|élevage")
                .expect("Invalid regex: livestock keywords"),
        },
        KeywordGroup {
            module: ModuleKind::Financing,
            pattern: Regex::new(r"(?i)finance|aide|subvention|credit|budget")
                .expect("Invalid regex: financing keywords"),
        },
        KeywordGroup {
            module: ModuleKind::DecisionSupport,
            pattern: Regex::new(r"(?i)decision|analyse|rapport|conseils")
                .expect("Invalid regex: decision keywords"),
        },
    ]
});

/// Detects the module for a file name. Falls back to `Documents`.
pub fn detect_module(file_name: &str) -> ModuleKind {
    detect_module_with_matches(file_name).module
}

/// Same as [`detect_module`], also reporting the keyword that matched.
pub fn detect_module_with_matches(file_name: &str) -> ModuleDetection {
    KEYWORD_GROUPS
        .iter()
        .find_map(|group| {
            group.pattern.find(file_name).map(|m| ModuleDetection {
                module: group.module,
                matched_keyword: Some(m.as_str().to_lowercase()),
            })
        })
        .unwrap_or(ModuleDetection {
            module: ModuleKind::Documents,
            matched_keyword: None,
        })
}
