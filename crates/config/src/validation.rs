//! Configuration validation utilities

use crate::schema::Config;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate complete configuration
    pub fn validate(config: &Config) -> ValidationReport {
        let mut report = ValidationReport::new();

        Self::validate_node(config, &mut report);
        Self::validate_fees(config, &mut report);
        Self::validate_polling(config, &mut report);
        Self::validate_logging(config, &mut report);

        report
    }

    fn validate_node(config: &Config, report: &mut ValidationReport) {
        let url = config.node.url.as_str();
        if url.is_empty() {
            report.add_warning("node.url", "No node URL configured, using the local node");
        } else if url.contains("://") && !url.starts_with("http://") && !url.starts_with("https://") {
            report.add_error("node.url", "Node URL must start with http:// or https://");
        } else if url.starts_with("http://")
            && !url.contains("127.0.0.1")
            && !url.contains("localhost")
        {
            report.add_warning("node.url", "Remote node is reached over plain HTTP");
        }

        if config.node.timeout_seconds == 0 {
            report.add_error("node.timeout_seconds", "Request timeout cannot be 0");
        } else if config.node.timeout_seconds > 300 {
            report.add_warning("node.timeout_seconds", "Request timeout is very high");
        }

        if config.node.user_agent.is_empty() {
            report.add_error("node.user_agent", "User agent cannot be empty");
        }
    }

    fn validate_fees(config: &Config, report: &mut ValidationReport) {
        match config.fees.parse() {
            Ok(fees) => {
                if fees.min_fee > fees.max_fee {
                    report.add_error("fees", "min_fee cannot be greater than max_fee");
                }
                if fees.max_fee.is_zero() {
                    report.add_warning("fees.max_fee", "max_fee is zero, every non-zero estimate will be rejected");
                }
            }
            Err(e) => {
                report.add_error("fees", &format!("Failed to parse fees: {}", e));
            }
        }
    }

    fn validate_polling(config: &Config, report: &mut ValidationReport) {
        if config.polling.interval_ms == 0 {
            report.add_error("polling.interval_ms", "Polling interval cannot be 0");
        } else if config.polling.interval_ms < 100 {
            report.add_warning("polling.interval_ms", "Polling interval is very low, may overload the node");
        }

        if config.polling.timeout_seconds == Some(0) {
            report.add_error("polling.timeout_seconds", "Polling timeout cannot be 0");
        }
    }

    fn validate_logging(config: &Config, report: &mut ValidationReport) {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&config.logging.level.as_str()) {
            report.add_error("logging.level", &format!("Invalid log level: {}. Valid levels: {:?}", config.logging.level, valid_levels));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&config.logging.format.as_str()) {
            report.add_error("logging.format", &format!("Invalid log format: {}. Valid formats: {:?}", config.logging.format, valid_formats));
        }
    }
}

/// Validation report containing errors and warnings
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// A validation issue (error or warning)
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn summary(&self) -> String {
        format!("Validation: {} errors, {} warnings", self.errors.len(), self.warnings.len())
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}
