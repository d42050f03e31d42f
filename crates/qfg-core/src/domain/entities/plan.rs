use super::artifact::Artifact;
use super::common::RelativePath;
use crate::domain::clusters::ClusterId;
use crate::domain::error::PlanError;
use std::collections::HashSet;

/// One planned file: where it goes, which template fills it, and which
/// cluster asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub path: RelativePath,
    pub template_key: &'static str,
    pub cluster: ClusterId,
    /// The seeded example artifact this file was fanned out from.
    pub artifact: Option<Artifact>,
}

/// Ordered files for a fresh project. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompositionPlan {
    entries: Vec<PlanEntry>,
}

impl CompositionPlan {
    pub fn new(entries: Vec<PlanEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths().any(|p| p == path)
    }

    pub fn in_cluster(&self, cluster: ClusterId) -> impl Iterator<Item = &PlanEntry> {
        self.entries.iter().filter(move |e| e.cluster == cluster)
    }

    /// Reject duplicate paths.
    ///
    /// Absolute paths never reach this point: `RelativePath` refuses them at
    /// construction.
    pub fn validate(&self) -> Result<(), PlanError> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.path.as_str()) {
                return Err(PlanError::DuplicatePath {
                    path: entry.path.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Distinct template keys, in first-use order.
    pub fn template_keys(&self) -> Vec<&'static str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|e| e.template_key)
            .filter(|k| seen.insert(*k))
            .collect()
    }
}
