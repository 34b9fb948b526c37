//! # Refactoring Catalog
//!
//! Describes the available refactorings to clients. The definitions ship
//! inside the binary as YAML.

use super::types::*;
use crate::errors::ServiceError;
use std::collections::BTreeMap;
use tracing::{debug, warn};

const EMBEDDED_CATALOG: &str = include_str!("catalog.yaml");

/// Catalog of available refactorings
#[derive(Debug, Clone)]
pub struct RefactoringCatalog {
    refactorings: BTreeMap<RefactoringKind, RefactoringDefinition>,
}

impl RefactoringCatalog {
    /// Load the catalog shipped with the crate.
    pub fn embedded() -> Result<Self, ServiceError> {
        let catalog = Self::from_yaml(EMBEDDED_CATALOG)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse a YAML list of refactoring definitions.
    pub fn from_yaml(content: &str) -> Result<Self, ServiceError> {
        let definitions: Vec<RefactoringDefinition> = serde_yaml::from_str(content)?;
        let mut refactorings = BTreeMap::new();
        for definition in definitions {
            if refactorings.contains_key(&definition.id) {
                warn!("Duplicate catalog entry for '{}', keeping the last one", definition.id);
            }
            refactorings.insert(definition.id, definition);
        }
        debug!("Loaded {} refactoring definitions", refactorings.len());
        Ok(Self { refactorings })
    }

    /// Every refactoring the engine runs must be described.
    pub fn validate(&self) -> Result<(), ServiceError> {
        let missing: Vec<&str> = RefactoringKind::all()
            .iter()
            .filter(|kind| !self.refactorings.contains_key(kind))
            .map(|kind| kind.as_str())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Internal(format!(
                "Refactoring catalog is missing: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn get(&self, kind: RefactoringKind) -> Option<&RefactoringDefinition> {
        self.refactorings.get(&kind)
    }

    pub fn all(&self) -> Vec<&RefactoringDefinition> {
        self.refactorings.values().collect()
    }

    pub fn for_language(&self, language: &str) -> Vec<&RefactoringDefinition> {
        self.refactorings
            .values()
            .filter(|r| r.supports(language))
            .collect()
    }

    /// Check that `kind` can run on code written in `language`.
    pub fn validate_request(
        &self,
        kind: RefactoringKind,
        language: &str,
    ) -> Result<&RefactoringDefinition, ServiceError> {
        let definition = self
            .get(kind)
            .ok_or_else(|| ServiceError::Internal(format!("No catalog entry for {kind}")))?;
        if !definition.supports(language) {
            return Err(ServiceError::UnsupportedLanguage(format!(
                "Refactoring '{kind}' does not support language: {language}"
            )));
        }
        Ok(definition)
    }
}
