//! Report metadata: the branding block both renderers stamp onto their
//! title sections.

use std::env;

/// Company/operator identity for report headers.
///
/// Loaded once at startup from the same environment the rest of the app is
/// configured through; the export dialogs pass it to every job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMeta {
    /// Company banner, e.g. "VINOTECA".
    pub company: String,

    /// Application version shown in document properties.
    pub version: String,

    /// Operator display name; `None` falls back to a generic author line.
    pub operator: Option<String>,
}

impl Default for ReportMeta {
    fn default() -> Self {
        ReportMeta {
            company: "VINOTECA".to_string(),
            version: "1.0.0".to_string(),
            operator: None,
        }
    }
}

impl ReportMeta {
    /// Loads metadata from `APP_NAME`, `APP_VERSION` and `OPERATOR_NAME`,
    /// with defaults for everything unset. An empty operator name counts
    /// as unset.
    pub fn from_env() -> Self {
        let defaults = ReportMeta::default();
        ReportMeta {
            company: env::var("APP_NAME").unwrap_or(defaults.company),
            version: env::var("APP_VERSION").unwrap_or(defaults.version),
            operator: env::var("OPERATOR_NAME")
                .ok()
                .filter(|name| !name.trim().is_empty()),
        }
    }

    /// The author line for title pages: the operator when known, otherwise
    /// the reporting system itself.
    pub fn author_line(&self) -> String {
        match &self.operator {
            Some(name) => format!("Operator: {name}"),
            None => format!("Author: {} Reporting System", self.company),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_line_prefers_the_operator() {
        let meta = ReportMeta {
            operator: Some("M. Ivanov".to_string()),
            ..ReportMeta::default()
        };
        assert_eq!(meta.author_line(), "Operator: M. Ivanov");

        let meta = ReportMeta::default();
        assert_eq!(meta.author_line(), "Author: VINOTECA Reporting System");
    }
}
