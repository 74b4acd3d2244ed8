use std::collections::HashMap;

use serde::Serialize;

use crate::config::AnimationConfig;
use crate::{AlgorithmKind, AnimationController, Result, VisualiserError};

/// Descriptor shown by presentation layers when listing algorithms.
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmEntry {
    pub name: &'static str,
    pub title: &'static str,
    pub kind: AlgorithmKind,
    pub listing: &'static str,
}

impl AlgorithmEntry {
    fn from_kind(kind: AlgorithmKind) -> Self {
        Self {
            name: kind.name(),
            title: kind.title(),
            kind,
            listing: kind.listing(),
        }
    }
}

/// Name lookup over the fixed set of animated algorithms.
#[derive(Debug)]
pub struct AlgorithmRegistry {
    entries: HashMap<&'static str, AlgorithmEntry>,
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AlgorithmRegistry {
    pub fn new() -> Self {
        let entries = AlgorithmKind::ALL
            .into_iter()
            .map(|kind| (kind.name(), AlgorithmEntry::from_kind(kind)))
            .collect();
        Self { entries }
    }

    pub fn lookup(&self, name: &str) -> Result<&AlgorithmEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| VisualiserError::UnknownAlgorithm(name.to_string()))
    }

    /// Entries in presentation order.
    pub fn entries(&self) -> Vec<&AlgorithmEntry> {
        AlgorithmKind::ALL
            .iter()
            .filter_map(|kind| self.entries.get(kind.name()))
            .collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries().into_iter().map(|entry| entry.name).collect()
    }

    /// A fresh, idle controller for `name`.
    pub fn controller(&self, name: &str, config: &AnimationConfig) -> Result<AnimationController> {
        let entry = self.lookup(name)?;
        Ok(AnimationController::from_config(entry.kind, config))
    }
}
