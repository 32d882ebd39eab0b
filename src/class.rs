//! Class aggregate: specification, enrollments, and the metas registry.

use serde::{Deserialize, Serialize};

use crate::enrollment::Enrollment;
use crate::error::{DomainError, DomainResult};
use crate::specification::AverageSpecification;
use crate::student::{Student, normalize_cpf};

/// An academic class. The average specification is assigned at creation and
/// never swapped; the metas set locks after its first non-empty assignment.
///
/// Metas and specification goal weights are deliberately independent
/// registries — neither validates against the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub topic: String,
    pub semester: u8,
    pub year: i32,
    #[serde(rename = "especificacao")]
    specification: AverageSpecification,
    #[serde(default)]
    enrollments: Vec<Enrollment>,
    #[serde(default)]
    metas: Vec<String>,
    #[serde(default, rename = "metasLocked")]
    metas_locked: bool,
}

impl Class {
    pub fn new(
        topic: impl Into<String>,
        semester: u8,
        year: i32,
        specification: AverageSpecification,
    ) -> Self {
        Self {
            topic: topic.into(),
            semester,
            year,
            specification,
            enrollments: Vec::new(),
            metas: Vec::new(),
            metas_locked: false,
        }
    }

    pub fn specification(&self) -> &AverageSpecification {
        &self.specification
    }

    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    pub fn enrollments_mut(&mut self) -> &mut [Enrollment] {
        &mut self.enrollments
    }

    /// Enrolls a student; rejects a CPF that is already enrolled.
    pub fn enroll(&mut self, student: Student) -> DomainResult<&mut Enrollment> {
        if self.find_enrollment(student.cpf()).is_some() {
            return Err(DomainError::AlreadyEnrolled {
                cpf: student.cpf().to_string(),
            });
        }
        self.enrollments.push(Enrollment::new(student));
        Ok(self.enrollments.last_mut().unwrap())
    }

    /// Removes the enrollment for `cpf`, returning whether one existed.
    /// Evaluations cascade with it.
    pub fn remove_enrollment(&mut self, cpf: &str) -> bool {
        let cpf = normalize_cpf(cpf);
        let before = self.enrollments.len();
        self.enrollments.retain(|e| e.student().cpf() != cpf);
        self.enrollments.len() < before
    }

    pub fn find_enrollment(&self, cpf: &str) -> Option<&Enrollment> {
        self.enrollments.iter().find(|e| e.matches_cpf(cpf))
    }

    pub fn find_enrollment_mut(&mut self, cpf: &str) -> Option<&mut Enrollment> {
        self.enrollments.iter_mut().find(|e| e.matches_cpf(cpf))
    }

    pub fn metas(&self) -> &[String] {
        &self.metas
    }

    pub fn metas_locked(&self) -> bool {
        self.metas_locked
    }

    /// Assigns the metas set. All-or-nothing: a blank or duplicate label
    /// rejects the whole assignment and leaves both the stored set and the
    /// lock untouched. The first non-empty assignment locks the set.
    pub fn set_metas(&mut self, labels: Vec<String>) -> DomainResult<()> {
        if self.metas_locked {
            return Err(DomainError::MetasLocked);
        }
        for (position, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(DomainError::BlankMetaLabel { position });
            }
            if labels[..position].contains(label) {
                return Err(DomainError::DuplicateMetaLabel {
                    label: label.clone(),
                });
            }
        }
        if !labels.is_empty() {
            self.metas_locked = true;
        }
        self.metas = labels;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grade::Grade;
    use std::collections::HashMap;

    fn spec() -> AverageSpecification {
        AverageSpecification::new(
            HashMap::from([(Grade::Ma, 10.0), (Grade::Mpa, 7.0), (Grade::Mana, 0.0)]),
            HashMap::from([("Requirements".to_string(), 1.0), ("Tests".to_string(), 1.0)]),
        )
        .unwrap()
    }

    fn class() -> Class {
        Class::new("Software Engineering", 1, 2026, spec())
    }

    #[test]
    fn test_enroll_rejects_duplicate_cpf() {
        let mut c = class();
        c.enroll(Student::new("111.222.333-44", "Ana")).unwrap();

        // same cpf, different punctuation
        let result = c.enroll(Student::new("11122233344", "Ana again"));
        assert!(matches!(result, Err(DomainError::AlreadyEnrolled { .. })));
        assert_eq!(c.enrollments().len(), 1);
    }

    #[test]
    fn test_find_enrollment_normalizes_cpf() {
        let mut c = class();
        c.enroll(Student::new("111.222.333-44", "Ana")).unwrap();
        assert!(c.find_enrollment("111.222.333-44").is_some());
        assert!(c.find_enrollment("11122233344").is_some());
        assert!(c.find_enrollment("999").is_none());
    }

    #[test]
    fn test_remove_enrollment_cascades() {
        let mut c = class();
        c.enroll(Student::new("123", "Ana")).unwrap();
        c.find_enrollment_mut("123")
            .unwrap()
            .add_or_update_evaluation("Tests", Grade::Ma);

        assert!(c.remove_enrollment("123"));
        assert!(!c.remove_enrollment("123"));
        assert!(c.find_enrollment("123").is_none());
    }

    #[test]
    fn test_metas_lock_after_first_non_empty_assignment() {
        let mut c = class();
        c.set_metas(vec!["Req".to_string(), "Tests".to_string()])
            .unwrap();
        assert!(c.metas_locked());

        let result = c.set_metas(vec!["Other".to_string()]);
        assert!(matches!(result, Err(DomainError::MetasLocked)));
        assert_eq!(
            c.metas().to_vec(),
            vec!["Req".to_string(), "Tests".to_string()]
        );
        assert!(c.metas_locked());
    }

    #[test]
    fn test_duplicate_meta_leaves_state_untouched() {
        let mut c = class();
        let result = c.set_metas(vec!["Req".to_string(), "Req".to_string()]);
        assert!(matches!(result, Err(DomainError::DuplicateMetaLabel { .. })));
        assert!(c.metas().is_empty());
        assert!(!c.metas_locked());
    }

    #[test]
    fn test_blank_meta_leaves_state_untouched() {
        let mut c = class();
        let result = c.set_metas(vec!["Req".to_string(), "  ".to_string()]);
        assert!(matches!(result, Err(DomainError::BlankMetaLabel { .. })));
        assert!(c.metas().is_empty());
        assert!(!c.metas_locked());
    }

    #[test]
    fn test_empty_assignment_does_not_lock() {
        let mut c = class();
        c.set_metas(Vec::new()).unwrap();
        assert!(!c.metas_locked());
        c.set_metas(vec!["Req".to_string()]).unwrap();
        assert!(c.metas_locked());
    }

    #[test]
    fn test_serde_round_trip_uses_persisted_shape() {
        let mut c = class();
        c.enroll(Student::new("123", "Ana")).unwrap();

        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["topic"], "Software Engineering");
        assert!(json["especificacao"]["goalWeights"].is_object());
        assert_eq!(json["enrollments"][0]["studentCPF"], "123");

        let back: Class = serde_json::from_value(json).unwrap();
        assert_eq!(back.enrollments().len(), 1);
        assert_eq!(back.specification().goal_weight_sum(), 2.0);
    }
}
