//! Config validator
//!
//! Checks the styled attributes and demo settings for values the widget would
//! silently ignore or the timer could not run with, and can restore defaults
//! for the ones that matter.

use crate::config::{Config, DemoConfig, ProgressBarStyle};
use crate::widget_state::parse_color;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    InvalidMax {
        value: i32,
    },
    ProgressOutOfRange {
        progress: i32,
        max: i32,
    },
    InvalidColor {
        field: String,
        value: String,
    },
    NegativeDimension {
        field: String,
        value: f32,
    },
    ZeroTickInterval,
    NonPositiveStep {
        value: i32,
    },
    UnknownBorderStyle {
        value: String,
    },
}

impl ValidationIssue {
    pub fn severity(&self) -> ValidationSeverity {
        match self {
            ValidationIssue::InvalidMax { .. }
            | ValidationIssue::ProgressOutOfRange { .. }
            | ValidationIssue::InvalidColor { .. }
            | ValidationIssue::NegativeDimension { .. }
            | ValidationIssue::ZeroTickInterval => ValidationSeverity::Error,
            ValidationIssue::NonPositiveStep { .. } | ValidationIssue::UnknownBorderStyle { .. } => {
                ValidationSeverity::Warning
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            ValidationIssue::InvalidMax { value } => {
                format!("progress_bar.max must be positive, got {}", value)
            }
            ValidationIssue::ProgressOutOfRange { progress, max } => {
                format!(
                    "progress_bar.progress {} is outside 0..={} and will be ignored",
                    progress, max
                )
            }
            ValidationIssue::InvalidColor { field, value } => {
                format!("{} is not a color: {:?}", field, value)
            }
            ValidationIssue::NegativeDimension { field, value } => {
                format!("{} must not be negative, got {}", field, value)
            }
            ValidationIssue::ZeroTickInterval => {
                "demo.tick_interval_ms must be greater than zero".to_string()
            }
            ValidationIssue::NonPositiveStep { value } => {
                format!("demo.step is {}, ticks will not advance the bar", value)
            }
            ValidationIssue::UnknownBorderStyle { value } => {
                format!("layout.border_style '{}' is unknown, using plain", value)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| matches!(i.severity(), ValidationSeverity::Error))
    }

    pub fn has_warnings(&self) -> bool {
        self.issues
            .iter()
            .any(|i| matches!(i.severity(), ValidationSeverity::Warning))
    }

    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| matches!(i.severity(), ValidationSeverity::Error))
            .collect()
    }

    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| matches!(i.severity(), ValidationSeverity::Warning))
            .collect()
    }
}

const BORDER_STYLES: [&str; 4] = ["plain", "rounded", "double", "thick"];

pub fn validate_config(config: &Config) -> ValidationResult {
    let mut issues = Vec::new();
    let style = &config.progress_bar;

    if style.max <= 0 {
        issues.push(ValidationIssue::InvalidMax { value: style.max });
    } else if style.progress < 0 || style.progress > style.max {
        issues.push(ValidationIssue::ProgressOutOfRange {
            progress: style.progress,
            max: style.max,
        });
    }

    check_color(&mut issues, "progress_bar.reached_color", &style.reached_color);
    check_color(&mut issues, "progress_bar.unreached_color", &style.unreached_color);
    check_color(&mut issues, "progress_bar.text_color", &style.text_color);
    if let Some(color) = &config.layout.border_color {
        check_color(&mut issues, "layout.border_color", color);
    }

    check_dimension(&mut issues, "progress_bar.text_size", style.text_size);
    check_dimension(&mut issues, "progress_bar.reached_bar_height", style.reached_bar_height);
    check_dimension(&mut issues, "progress_bar.unreached_bar_height", style.unreached_bar_height);
    check_dimension(&mut issues, "progress_bar.text_offset", style.text_offset);

    if config.demo.tick_interval_ms == 0 {
        issues.push(ValidationIssue::ZeroTickInterval);
    }
    if config.demo.step <= 0 {
        issues.push(ValidationIssue::NonPositiveStep {
            value: config.demo.step,
        });
    }

    if let Some(border) = &config.layout.border_style {
        if !BORDER_STYLES.contains(&border.as_str()) {
            issues.push(ValidationIssue::UnknownBorderStyle {
                value: border.clone(),
            });
        }
    }

    ValidationResult { issues }
}

fn check_color(issues: &mut Vec<ValidationIssue>, field: &str, value: &str) {
    if parse_color(value).is_none() {
        issues.push(ValidationIssue::InvalidColor {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

fn check_dimension(issues: &mut Vec<ValidationIssue>, field: &str, value: f32) {
    if value < 0.0 || value.is_nan() {
        issues.push(ValidationIssue::NegativeDimension {
            field: field.to_string(),
            value,
        });
    }
}

/// Restore defaults for every error-level issue. Returns how many were fixed.
pub fn auto_fix_config(config: &mut Config, issues: &[ValidationIssue]) -> usize {
    let style_defaults = ProgressBarStyle::default();
    let demo_defaults = DemoConfig::default();
    let mut fixed_count = 0;

    for issue in issues {
        let fixed = match issue {
            ValidationIssue::InvalidMax { .. } => {
                config.progress_bar.max = style_defaults.max;
                true
            }
            ValidationIssue::ProgressOutOfRange { .. } => {
                config.progress_bar.progress = style_defaults.progress;
                true
            }
            ValidationIssue::InvalidColor { field, .. } => match field.as_str() {
                "progress_bar.reached_color" => {
                    config.progress_bar.reached_color = style_defaults.reached_color.clone();
                    true
                }
                "progress_bar.unreached_color" => {
                    config.progress_bar.unreached_color = style_defaults.unreached_color.clone();
                    true
                }
                "progress_bar.text_color" => {
                    config.progress_bar.text_color = style_defaults.text_color.clone();
                    true
                }
                "layout.border_color" => {
                    config.layout.border_color = None;
                    true
                }
                _ => false,
            },
            ValidationIssue::NegativeDimension { field, .. } => match field.as_str() {
                "progress_bar.text_size" => {
                    config.progress_bar.text_size = style_defaults.text_size;
                    true
                }
                "progress_bar.reached_bar_height" => {
                    config.progress_bar.reached_bar_height = style_defaults.reached_bar_height;
                    true
                }
                "progress_bar.unreached_bar_height" => {
                    config.progress_bar.unreached_bar_height = style_defaults.unreached_bar_height;
                    true
                }
                "progress_bar.text_offset" => {
                    config.progress_bar.text_offset = style_defaults.text_offset;
                    true
                }
                _ => false,
            },
            ValidationIssue::ZeroTickInterval => {
                config.demo.tick_interval_ms = demo_defaults.tick_interval_ms;
                true
            }
            ValidationIssue::NonPositiveStep { .. } | ValidationIssue::UnknownBorderStyle { .. } => {
                false
            }
        };

        if fixed {
            fixed_count += 1;
        }
    }

    fixed_count
}
