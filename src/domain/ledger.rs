//! In-memory package ledger
//!
//! Holds one [`Package`] per unique name in insertion order and accepts the
//! version fill passes that enrich it.

use super::Package;
use std::collections::HashMap;

/// Ordered set of packages keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    packages: Vec<Package>,
    index: HashMap<String, usize>,
}

impl Ledger {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger, keeping the first package seen for each name
    pub fn from_packages(packages: impl IntoIterator<Item = Package>) -> Self {
        let mut ledger = Self::new();
        for package in packages {
            ledger.insert(package);
        }
        ledger
    }

    /// Inserts a package unless one with the same name already exists.
    ///
    /// Returns false when the package was ignored.
    pub fn insert(&mut self, package: Package) -> bool {
        if self.index.contains_key(&package.name) {
            tracing::debug!(package = %package.name, "ignoring duplicate package");
            return false;
        }
        self.index.insert(package.name.clone(), self.packages.len());
        self.packages.push(package);
        true
    }

    /// Looks up a package by name
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.index.get(name).map(|&i| &self.packages[i])
    }

    /// Applies installed versions reported by a version source.
    ///
    /// Names that are not in the ledger are ignored. Returns the number of
    /// packages that received a version.
    pub fn apply_installed<'a, I>(&mut self, installed: I) -> usize
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut matched = 0;
        for (name, version) in installed {
            if let Some(&i) = self.index.get(name) {
                self.packages[i].installed_version = Some(version.to_string());
                matched += 1;
            }
        }
        matched
    }

    /// Records the latest version of a package. Unknown names are ignored.
    pub fn set_latest(&mut self, name: &str, version: impl Into<String>) -> bool {
        match self.index.get(name) {
            Some(&i) => {
                self.packages[i].latest_version = Some(version.into());
                true
            }
            None => false,
        }
    }

    /// Returns package names in insertion order
    pub fn names(&self) -> Vec<String> {
        self.packages.iter().map(|p| p.name.clone()).collect()
    }

    /// Iterates packages in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    /// Returns true if any package has a known installed version
    pub fn has_installed(&self) -> bool {
        self.packages.iter().any(|p| p.installed_version.is_some())
    }

    /// Number of packages
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if the ledger holds no packages
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Package;
    type IntoIter = std::slice::Iter<'a, Package>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Ledger {
        Ledger::from_packages(vec![
            Package::new("requests", "2.28.0"),
            Package::new("pydantic", "2.0.0"),
        ])
    }

    #[test]
    fn test_first_package_wins() {
        let ledger = Ledger::from_packages(vec![
            Package::new("a", "1"),
            Package::new("b", "2"),
            Package::new("a", "3"),
        ]);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get("a").unwrap().declared_version, "1");
        assert_eq!(ledger.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_apply_installed_ignores_unknown_names() {
        let mut ledger = sample();
        let matched = ledger.apply_installed(vec![
            ("requests", "2.31.0"),
            ("urllib3", "2.0.0"),
        ]);
        assert_eq!(matched, 1);
        assert_eq!(
            ledger.get("requests").unwrap().installed_version.as_deref(),
            Some("2.31.0")
        );
        assert!(ledger.get("pydantic").unwrap().installed_version.is_none());
        assert!(ledger.get("urllib3").is_none());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut ledger = sample();
        let matched = ledger.apply_installed(vec![("Requests", "2.31.0")]);
        assert_eq!(matched, 0);
        assert!(!ledger.has_installed());
    }

    #[test]
    fn test_set_latest() {
        let mut ledger = sample();
        assert!(ledger.set_latest("pydantic", "2.5.0"));
        assert!(!ledger.set_latest("missing", "1.0.0"));
        assert_eq!(
            ledger.get("pydantic").unwrap().latest_version.as_deref(),
            Some("2.5.0")
        );
    }

    #[test]
    fn test_has_installed() {
        let mut ledger = sample();
        assert!(!ledger.has_installed());
        ledger.apply_installed(vec![("pydantic", "2.0.0")]);
        assert!(ledger.has_installed());
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.iter().count(), 0);
    }
}
