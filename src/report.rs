//! Diagnostics explaining which conditions had no effect on a pass.

use serde::Serialize;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The condition was dropped although it looks intentional.
    Warning,
    /// The condition was dropped by a documented policy.
    Info,
}

/// Why a condition was dropped or only partially applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    MissingParam,
    MissingValue,
    ConflictVeto,
    UnknownValue,
    NegatedWildcard,
    UnsupportedOperator,
    UnresolvableParam,
    UnhandledParam,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::MissingParam => "missing-param",
            DiagnosticCode::MissingValue => "missing-value",
            DiagnosticCode::ConflictVeto => "conflict-veto",
            DiagnosticCode::UnknownValue => "unknown-value",
            DiagnosticCode::NegatedWildcard => "negated-wildcard",
            DiagnosticCode::UnsupportedOperator => "unsupported-operator",
            DiagnosticCode::UnresolvableParam => "unresolvable-param",
            DiagnosticCode::UnhandledParam => "unhandled-param",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticCode::MissingParam
            | DiagnosticCode::MissingValue
            | DiagnosticCode::UnknownValue
            | DiagnosticCode::UnsupportedOperator
            | DiagnosticCode::UnhandledParam => Severity::Warning,
            DiagnosticCode::ConflictVeto
            | DiagnosticCode::NegatedWildcard
            | DiagnosticCode::UnresolvableParam => Severity::Info,
        }
    }
}

/// A single diagnostic about one condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    /// Unformatted field group name.
    pub field_group: String,
    /// JSON path to the condition (e.g., "/location/0/1")
    pub path: String,
    pub message: String,
}

/// Diagnostics collected over one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub field_groups: usize,
    pub skipped_groups: usize,
    pub conditions: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub(crate) fn push(
        &mut self,
        code: DiagnosticCode,
        field_group: &str,
        path: String,
        message: String,
    ) {
        self.diagnostics.push(Diagnostic {
            severity: code.severity(),
            code,
            field_group: field_group.to_string(),
            path,
            message,
        });
    }

    pub fn warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn infos(&self) -> usize {
        self.count(Severity::Info)
    }

    /// Returns true if no condition was dropped unexpectedly.
    pub fn is_ok(&self) -> bool {
        self.warnings() == 0
    }

    /// Diagnostics with a given code.
    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}
