//! Form payloads and validation
//!
//! Validation runs before any database call; failures are reported
//! per-field and block the write entirely.

use serde::{Deserialize, Serialize};

/// One per-field validation failure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Data fields of a submission form (new submission, update proposal, or
/// admin direct edit)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionInput {
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub computation: Vec<String>,
    #[serde(default)]
    pub num_qubits: Option<i64>,
    #[serde(default)]
    pub num_2q_gates: Option<i64>,
    #[serde(default)]
    pub num_1q_gates: Option<i64>,
    #[serde(default)]
    pub total_gates: Option<i64>,
    #[serde(default)]
    pub circuit_depth: Option<i64>,
    #[serde(default)]
    pub circuit_depth_measure: Option<String>,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub computer: String,
    #[serde(default)]
    pub error_mitigation: Vec<String>,
}

impl SubmissionInput {
    /// Validate required fields and value ranges.
    ///
    /// Required: reference, qubit count, at least one of the two-qubit /
    /// total gate counts, institution, computer.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.reference.trim().is_empty() {
            errors.push(FieldError::new("reference", "Reference is required"));
        }

        match self.num_qubits {
            None => errors.push(FieldError::new("num_qubits", "Number of qubits is required")),
            Some(n) if n <= 0 => {
                errors.push(FieldError::new("num_qubits", "Number of qubits must be positive"))
            }
            Some(_) => {}
        }

        if self.num_2q_gates.is_none() && self.total_gates.is_none() {
            errors.push(FieldError::new(
                "gates",
                "Either the two-qubit gate count or the total gate count is required",
            ));
        }

        for (field, value) in [
            ("num_2q_gates", self.num_2q_gates),
            ("num_1q_gates", self.num_1q_gates),
            ("total_gates", self.total_gates),
            ("circuit_depth", self.circuit_depth),
        ] {
            if let Some(n) = value {
                if n < 0 {
                    errors.push(FieldError::new(field, "Value must not be negative"));
                }
            }
        }

        if self.institution.trim().is_empty() {
            errors.push(FieldError::new("institution", "Institution is required"));
        }
        if self.computer.trim().is_empty() {
            errors.push(FieldError::new("computer", "Computer is required"));
        }

        errors
    }
}

/// An edit proposal against an existing approved reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProposal {
    #[serde(flatten)]
    pub fields: SubmissionInput,
    #[serde(default)]
    pub justification: String,
}

impl UpdateProposal {
    /// Field validation plus the required justification text
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = self.fields.validate();
        if self.justification.trim().is_empty() {
            errors.push(FieldError::new(
                "justification",
                "A justification for the update is required",
            ));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> SubmissionInput {
        SubmissionInput {
            reference: "arXiv:1234".to_string(),
            num_qubits: Some(5),
            num_2q_gates: Some(10),
            institution: "IBM".to_string(),
            computer: "Eagle".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_complete_submission() {
        assert!(valid_input().validate().is_empty());
    }

    #[test]
    fn rejects_missing_reference() {
        let input = SubmissionInput {
            reference: "".to_string(),
            ..valid_input()
        };
        let errors = input.validate();
        assert!(errors.iter().any(|e| e.field == "reference"));
    }

    #[test]
    fn rejects_when_neither_gate_count_present() {
        let input = SubmissionInput {
            num_2q_gates: None,
            total_gates: None,
            ..valid_input()
        };
        let errors = input.validate();
        assert!(errors.iter().any(|e| e.field == "gates"));
    }

    #[test]
    fn total_gates_alone_satisfies_gate_requirement() {
        let input = SubmissionInput {
            num_2q_gates: None,
            total_gates: Some(250),
            ..valid_input()
        };
        assert!(input.validate().is_empty());
    }

    #[test]
    fn rejects_negative_counts() {
        let input = SubmissionInput {
            circuit_depth: Some(-1),
            ..valid_input()
        };
        let errors = input.validate();
        assert!(errors.iter().any(|e| e.field == "circuit_depth"));
    }

    #[test]
    fn whitespace_reference_is_missing() {
        let input = SubmissionInput {
            reference: "   ".to_string(),
            ..valid_input()
        };
        assert!(!input.validate().is_empty());
    }

    #[test]
    fn proposal_requires_justification() {
        let proposal = UpdateProposal {
            fields: valid_input(),
            justification: "".to_string(),
        };
        let errors = proposal.validate();
        assert!(errors.iter().any(|e| e.field == "justification"));

        let proposal = UpdateProposal {
            fields: valid_input(),
            justification: "gate count was corrected in v2 of the paper".to_string(),
        };
        assert!(proposal.validate().is_empty());
    }
}
