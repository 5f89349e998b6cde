//! Medical knowledge base consulted by the risk analyzer.
//!
//! The knowledge base is two ordered tables:
//!
//! - **conditions**: condition name → recommended medicines and specialist types
//! - **symptom mappings**: symptom phrase → condition names the phrase suggests
//!
//! Both tables keep insertion order because the analyzer walks them in that order and the order
//! decides which pass "claims" a condition first. A knowledge base is built once at startup and
//! shared read-only (usually behind an `Arc`); there is no mutation API.
//!
//! ## YAML form
//!
//! Alternate tables can be loaded with [`KnowledgeBase::from_yaml`]:
//!
//! ```yaml
//! conditions:
//!   - name: diabetes
//!     medicines:
//!       - name: Metformin
//!         dosage: 500mg twice daily
//!     specialists: [Endocrinologist]
//! symptoms:
//!   - phrase: frequent urination
//!     conditions: [diabetes]
//! ```

use crate::error::{KnowledgeError, KnowledgeResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A recommended medicine and its dosage text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medicine {
    pub name: String,
    pub dosage: String,
}

impl Medicine {
    pub fn new(name: impl Into<String>, dosage: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dosage: dosage.into(),
        }
    }
}

/// One condition entry: its treatments and the specialists who handle it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    #[serde(default)]
    pub medicines: Vec<Medicine>,
    #[serde(default)]
    pub specialists: Vec<String>,
}

/// A symptom phrase and the conditions it suggests, in stored order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomMapping {
    pub phrase: String,
    #[serde(default)]
    pub conditions: Vec<String>,
}

#[derive(Deserialize)]
struct KnowledgeFile {
    #[serde(default)]
    conditions: Vec<Condition>,
    #[serde(default)]
    symptoms: Vec<SymptomMapping>,
}

/// Immutable, ordered medical knowledge table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnowledgeBase {
    conditions: Vec<Condition>,
    condition_index: HashMap<String, usize>,
    symptoms: Vec<SymptomMapping>,
}

impl KnowledgeBase {
    /// The fixed table the service runs with.
    pub fn builtin() -> Self {
        let conditions = vec![
            Condition {
                name: "diabetes".into(),
                medicines: vec![Medicine::new("Metformin", "500mg twice daily")],
                specialists: vec!["Endocrinologist".into()],
            },
            Condition {
                name: "hypertension".into(),
                medicines: vec![Medicine::new("Lisinopril", "10mg daily")],
                specialists: vec!["Cardiologist".into()],
            },
        ];
        let symptoms = vec![
            SymptomMapping {
                phrase: "frequent urination".into(),
                conditions: vec!["diabetes".into()],
            },
            SymptomMapping {
                phrase: "headache".into(),
                conditions: vec!["hypertension".into()],
            },
        ];
        let condition_index = conditions
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();

        Self {
            conditions,
            condition_index,
            symptoms,
        }
    }

    /// Parses a knowledge base from its YAML form.
    ///
    /// # Errors
    ///
    /// Returns [`KnowledgeError`] if the YAML is malformed, a key is empty, or a condition
    /// name / symptom phrase appears twice.
    pub fn from_yaml(yaml: &str) -> KnowledgeResult<Self> {
        let file: KnowledgeFile = serde_yaml::from_str(yaml)?;
        let mut builder = KnowledgeBaseBuilder::new();
        for condition in file.conditions {
            builder = builder.condition(condition.name, condition.medicines, condition.specialists);
        }
        for mapping in file.symptoms {
            builder = builder.symptom(mapping.phrase, mapping.conditions);
        }
        builder.build()
    }

    /// Iterates condition entries in table order.
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }

    /// Iterates symptom mappings in table order.
    pub fn symptom_mappings(&self) -> impl Iterator<Item = &SymptomMapping> {
        self.symptoms.iter()
    }

    /// Looks up a condition by exact name.
    pub fn condition(&self, name: &str) -> Option<&Condition> {
        self.condition_index
            .get(name)
            .map(|&index| &self.conditions[index])
    }

    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    pub fn symptom_count(&self) -> usize {
        self.symptoms.len()
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Assembles a [`KnowledgeBase`] in code, validating keys on [`build`](Self::build).
#[derive(Debug, Default)]
pub struct KnowledgeBaseBuilder {
    conditions: Vec<Condition>,
    symptoms: Vec<SymptomMapping>,
}

impl KnowledgeBaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn condition(
        mut self,
        name: impl Into<String>,
        medicines: Vec<Medicine>,
        specialists: Vec<String>,
    ) -> Self {
        self.conditions.push(Condition {
            name: name.into(),
            medicines,
            specialists,
        });
        self
    }

    pub fn symptom(mut self, phrase: impl Into<String>, conditions: Vec<String>) -> Self {
        self.symptoms.push(SymptomMapping {
            phrase: phrase.into(),
            conditions,
        });
        self
    }

    /// Validates keys and freezes the table.
    ///
    /// Symptom mappings may name conditions that have no entry; the analyzer treats those as
    /// matched-but-untreatable.
    ///
    /// # Errors
    ///
    /// Returns [`KnowledgeError`] for empty or duplicate keys.
    pub fn build(self) -> KnowledgeResult<KnowledgeBase> {
        let mut condition_index = HashMap::with_capacity(self.conditions.len());
        for (index, condition) in self.conditions.iter().enumerate() {
            if condition.name.is_empty() {
                return Err(KnowledgeError::EmptyCondition);
            }
            if condition_index
                .insert(condition.name.clone(), index)
                .is_some()
            {
                return Err(KnowledgeError::DuplicateCondition(condition.name.clone()));
            }
        }

        let mut phrases = std::collections::HashSet::with_capacity(self.symptoms.len());
        for mapping in &self.symptoms {
            if mapping.phrase.is_empty() {
                return Err(KnowledgeError::EmptySymptom);
            }
            if !phrases.insert(mapping.phrase.as_str()) {
                return Err(KnowledgeError::DuplicateSymptom(mapping.phrase.clone()));
            }
            for related in &mapping.conditions {
                if !condition_index.contains_key(related) {
                    tracing::debug!(
                        "symptom '{}' maps to condition '{}' with no knowledge entry",
                        mapping.phrase,
                        related
                    );
                }
            }
        }

        Ok(KnowledgeBase {
            conditions: self.conditions,
            condition_index,
            symptoms: self.symptoms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILTIN_YAML: &str = r#"
conditions:
  - name: diabetes
    medicines:
      - name: Metformin
        dosage: 500mg twice daily
    specialists: [Endocrinologist]
  - name: hypertension
    medicines:
      - name: Lisinopril
        dosage: 10mg daily
    specialists: [Cardiologist]
symptoms:
  - phrase: frequent urination
    conditions: [diabetes]
  - phrase: headache
    conditions: [hypertension]
"#;

    #[test]
    fn test_builtin_tables_in_declared_order() {
        let kb = KnowledgeBase::builtin();

        let names: Vec<&str> = kb.conditions().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["diabetes", "hypertension"]);

        let phrases: Vec<&str> = kb.symptom_mappings().map(|s| s.phrase.as_str()).collect();
        assert_eq!(phrases, vec!["frequent urination", "headache"]);
    }

    #[test]
    fn test_condition_lookup() {
        let kb = KnowledgeBase::builtin();

        let diabetes = kb.condition("diabetes").expect("diabetes should exist");
        assert_eq!(
            diabetes.medicines,
            vec![Medicine::new("Metformin", "500mg twice daily")]
        );
        assert_eq!(diabetes.specialists, vec!["Endocrinologist".to_string()]);

        assert!(kb.condition("asthma").is_none());
        assert!(kb.condition("Diabetes").is_none(), "lookup is exact");
    }

    #[test]
    fn test_from_yaml_matches_builtin() {
        let kb = KnowledgeBase::from_yaml(BUILTIN_YAML).expect("yaml should load");
        assert_eq!(kb, KnowledgeBase::builtin());
    }

    #[test]
    fn test_from_yaml_rejects_duplicate_condition() {
        let yaml = r#"
conditions:
  - name: asthma
  - name: asthma
"#;
        let err = KnowledgeBase::from_yaml(yaml).expect_err("duplicate should be rejected");
        assert!(matches!(err, KnowledgeError::DuplicateCondition(name) if name == "asthma"));
    }

    #[test]
    fn test_from_yaml_rejects_duplicate_symptom() {
        let yaml = r#"
symptoms:
  - phrase: cough
    conditions: [asthma]
  - phrase: cough
    conditions: [bronchitis]
"#;
        let err = KnowledgeBase::from_yaml(yaml).expect_err("duplicate should be rejected");
        assert!(matches!(err, KnowledgeError::DuplicateSymptom(phrase) if phrase == "cough"));
    }

    #[test]
    fn test_from_yaml_rejects_malformed_input() {
        let err = KnowledgeBase::from_yaml("conditions: [[[").expect_err("should fail");
        assert!(matches!(err, KnowledgeError::InvalidYaml(_)));
    }

    #[test]
    fn test_builder_allows_mapping_to_unknown_condition() {
        let kb = KnowledgeBaseBuilder::new()
            .symptom("wheezing", vec!["asthma".into()])
            .build()
            .expect("unknown targets are allowed");

        assert_eq!(kb.symptom_count(), 1);
        assert_eq!(kb.condition_count(), 0);
        assert!(kb.condition("asthma").is_none());
    }

    #[test]
    fn test_builder_rejects_empty_keys() {
        let err = KnowledgeBaseBuilder::new()
            .condition("", vec![], vec![])
            .build()
            .expect_err("empty condition name");
        assert!(matches!(err, KnowledgeError::EmptyCondition));

        let err = KnowledgeBaseBuilder::new()
            .symptom("", vec![])
            .build()
            .expect_err("empty phrase");
        assert!(matches!(err, KnowledgeError::EmptySymptom));
    }
}
