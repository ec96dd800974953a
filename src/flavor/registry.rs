//! Flavor registry.
//!
//! An ordered catalog of every flavor avakas can detect. Registration order is
//! probing order: the first flavor whose detector accepts a directory wins.
//! Synonym precedence is layered on top, because a base flavor with synonyms
//! is instantiated as [`WithSynonyms`] and declines any directory one of its
//! synonyms accepts.
//!
//! The built-in registry is assembled once per process by [`global`] and is
//! read-only afterwards.

use super::{AvakasProject, Constructor, NodeProject, PythonFlavor, PythonProject, WithSynonyms};
use crate::error::{AvakasError, Result};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

/// Position of a flavor in the synonym hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// May have synonyms of its own.
    Base { synonyms: Vec<&'static str> },
    /// Leaf flavor preferred over `of`. Cannot have synonyms.
    Synonym { of: &'static str },
}

/// A registered flavor.
pub struct FlavorEntry {
    id: &'static str,
    role: Role,
    construct: Constructor,
}

impl FlavorEntry {
    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn is_synonym(&self) -> bool {
        matches!(self.role, Role::Synonym { .. })
    }
}

impl fmt::Debug for FlavorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlavorEntry")
            .field("id", &self.id)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct FlavorRegistry {
    entries: Vec<FlavorEntry>,
}

impl FlavorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in flavor.
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();

        registry.register(PythonFlavor::Pep621.id(), PythonProject::pep621)?;
        registry.register(PythonFlavor::Setuptools.id(), PythonProject::setuptools)?;
        registry.add_synonym(PythonFlavor::Pep621.id(), PythonFlavor::Setuptools.id())?;
        registry.register(PythonFlavor::Poetry.id(), PythonProject::poetry)?;
        registry.add_synonym(PythonFlavor::Pep621.id(), PythonFlavor::Poetry.id())?;

        registry.register(super::node::FLAVOR, NodeProject::boxed)?;

        Ok(registry)
    }

    /// Appends a flavor as a base with no synonyms.
    ///
    /// # Errors
    ///
    /// `DuplicateFlavor` if `id` is already registered.
    pub fn register(&mut self, id: &'static str, construct: Constructor) -> Result<()> {
        if self.get(id).is_some() {
            return Err(AvakasError::DuplicateFlavor(id.to_string()));
        }

        log::trace!("Registered flavor {}", id);
        self.entries.push(FlavorEntry {
            id,
            role: Role::Base {
                synonyms: Vec::new(),
            },
            construct,
        });
        Ok(())
    }

    /// Makes the registered flavor `synonym` take precedence over `base`.
    ///
    /// # Errors
    ///
    /// `InvalidSynonym` when:
    /// - `synonym` and `base` are the same flavor
    /// - either flavor is not registered
    /// - `base` is itself a synonym
    /// - `synonym` already has synonyms or already belongs to a base
    pub fn add_synonym(&mut self, base: &'static str, synonym: &'static str) -> Result<()> {
        let invalid = |reason: &str| AvakasError::InvalidSynonym {
            base: base.to_string(),
            synonym: synonym.to_string(),
            reason: reason.to_string(),
        };

        if base == synonym {
            return Err(invalid("a flavor cannot be a synonym of itself"));
        }

        let base_idx = self.position(base).ok_or_else(|| invalid("base is not registered"))?;
        let synonym_idx = self
            .position(synonym)
            .ok_or_else(|| invalid("synonym is not registered"))?;

        match &self.entries[synonym_idx].role {
            Role::Synonym { of } => {
                return Err(invalid(&format!("already a synonym of '{}'", of)));
            }
            Role::Base { synonyms } if !synonyms.is_empty() => {
                return Err(invalid("it has synonyms of its own"));
            }
            Role::Base { .. } => {}
        }

        match &mut self.entries[base_idx].role {
            Role::Base { synonyms } => synonyms.push(synonym),
            Role::Synonym { .. } => return Err(invalid("base is itself a synonym")),
        }
        self.entries[synonym_idx].role = Role::Synonym { of: base };

        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&FlavorEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// All flavors in registration (probing) order.
    pub fn all_flavors(&self) -> impl Iterator<Item = &FlavorEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a project of `entry`'s flavor bound to `directory`.
    ///
    /// Base flavors with synonyms come back wrapped in [`WithSynonyms`].
    pub fn instantiate(&self, entry: &FlavorEntry, directory: &Path) -> Box<dyn AvakasProject> {
        let project = (entry.construct)(directory);

        match &entry.role {
            Role::Base { synonyms } if !synonyms.is_empty() => {
                let constructors = synonyms
                    .iter()
                    .filter_map(|id| self.get(id))
                    .map(|synonym| synonym.construct)
                    .collect();
                Box::new(WithSynonyms::new(project, constructors))
            }
            _ => project,
        }
    }

    /// Opens `directory` as the named flavor without probing.
    ///
    /// # Errors
    ///
    /// `UnknownFlavor` if `id` is not registered.
    pub fn open(&self, id: &str, directory: &Path) -> Result<Box<dyn AvakasProject>> {
        let entry = self
            .get(id)
            .ok_or_else(|| AvakasError::UnknownFlavor(id.to_string()))?;
        Ok(self.instantiate(entry, directory))
    }

    /// Probes `directory` with every flavor in order; first match wins.
    pub fn resolve(&self, directory: &Path) -> Option<Box<dyn AvakasProject>> {
        let project = self
            .entries
            .iter()
            .map(|entry| self.instantiate(entry, directory))
            .find(|project| project.guess_flavor());

        match &project {
            Some(p) => log::debug!("Resolved {} as {}", directory.display(), p.flavor()),
            None => log::debug!("No flavor matches {}", directory.display()),
        }
        project
    }
}

static GLOBAL: OnceLock<FlavorRegistry> = OnceLock::new();

/// Process-wide built-in registry, assembled on first use.
///
/// # Errors
///
/// Propagates configuration errors from [`FlavorRegistry::builtin`]; the
/// registry is never published in that case.
pub fn global() -> Result<&'static FlavorRegistry> {
    if let Some(registry) = GLOBAL.get() {
        return Ok(registry);
    }
    let registry = FlavorRegistry::builtin()?;
    Ok(GLOBAL.get_or_init(|| registry))
}
