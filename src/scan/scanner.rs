// Component scanning - selecting candidate types from the component index
use super::index::{ComponentIndex, ComponentMetadata, Stereotype, TypeKind};
use super::scope::ScanScope;
use crate::host::Environment;
use indexmap::IndexSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Decides whether a type may be a candidate at all, independent of filters
pub type CandidateRule = fn(&ComponentMetadata) -> bool;

/// Only instantiable types qualify
pub fn concrete_only(metadata: &ComponentMetadata) -> bool {
    metadata.kind == TypeKind::Concrete
}

/// Interfaces qualify as well as concrete types
pub fn any_kind(_: &ComponentMetadata) -> bool {
    true
}

/// Generic scanning primitive: stereotype include filters plus profile gating
/// delegated to the host environment. By default only concrete types qualify.
pub struct ComponentScanner {
    environment: Arc<dyn Environment>,
    include: Vec<Stereotype>,
    candidate_rule: CandidateRule,
}

impl ComponentScanner {
    pub fn new(environment: Arc<dyn Environment>) -> Self {
        Self {
            environment,
            include: Vec::new(),
            candidate_rule: concrete_only,
        }
    }

    /// Include types carrying the given stereotype. With no include filter every
    /// `Component` stereotype qualifies.
    pub fn include(mut self, stereotype: Stereotype) -> Self {
        self.include.push(stereotype);
        self
    }

    pub fn candidate_rule(mut self, rule: CandidateRule) -> Self {
        self.candidate_rule = rule;
        self
    }

    fn matches_filters(&self, metadata: &ComponentMetadata) -> bool {
        if self.include.is_empty() {
            return metadata.has_stereotype(&Stereotype::Component);
        }
        self.include
            .iter()
            .any(|stereotype| metadata.has_stereotype(stereotype))
    }

    /// Candidate type names within the scope, in index order, without duplicates
    pub fn find_candidates(&self, index: &ComponentIndex, scope: &ScanScope) -> Vec<String> {
        let mut found = IndexSet::new();
        for metadata in index.iter() {
            if !scope.contains(&metadata.type_name) {
                continue;
            }
            if !(self.candidate_rule)(metadata) || !self.matches_filters(metadata) {
                continue;
            }
            if !self.environment.accepts_profiles(&metadata.profiles) {
                debug!(
                    "Skipping {} (profiles {:?} not active)",
                    metadata.type_name, metadata.profiles
                );
                continue;
            }
            found.insert(metadata.type_name.clone());
        }
        found.into_iter().collect()
    }
}

/// Finds store declarations: interfaces included, `Store` stereotype only
pub struct StoreScanner {
    inner: ComponentScanner,
}

impl StoreScanner {
    pub fn new(environment: Arc<dyn Environment>) -> Self {
        let inner = ComponentScanner::new(environment)
            .candidate_rule(any_kind)
            .include(Stereotype::Store);
        Self { inner }
    }

    pub fn scan(&self, index: &ComponentIndex, scope: &ScanScope) -> Vec<String> {
        let candidates = self.inner.find_candidates(index, scope);
        info!("Found {} store candidate(s) in {}", candidates.len(), scope);
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StandardEnvironment;

    fn index() -> ComponentIndex {
        let mut index = ComponentIndex::new();
        index.add(ComponentMetadata::interface("app::stores::Menu").with_stereotype(Stereotype::Store));
        index.add(
            ComponentMetadata::interface("app::stores::DevOnly")
                .with_stereotype(Stereotype::Store)
                .with_profile("dev"),
        );
        index.add(ComponentMetadata::interface("app::stores::Plain"));
        index.add(ComponentMetadata::concrete("app::service::Billing").with_stereotype(Stereotype::Component));
        index.add(ComponentMetadata::concrete("other::Reports").with_stereotype(Stereotype::Store));
        index
    }

    fn environment(profiles: &[&str]) -> Arc<dyn Environment> {
        Arc::new(StandardEnvironment::with_profiles(profiles.iter().copied()))
    }

    #[test]
    fn test_store_scanner_includes_interfaces() {
        let scanner = StoreScanner::new(environment(&[]));
        let found = scanner.scan(&index(), &ScanScope::package("app"));
        assert_eq!(found, vec!["app::stores::Menu"]);
    }

    #[test]
    fn test_generic_scanner_excludes_interfaces() {
        let scanner = ComponentScanner::new(environment(&[])).include(Stereotype::Store);
        let found = scanner.find_candidates(&index(), &ScanScope::everything());
        assert_eq!(found, vec!["other::Reports"]);

        let components = ComponentScanner::new(environment(&[]));
        assert_eq!(
            components.find_candidates(&index(), &ScanScope::everything()),
            vec!["app::service::Billing"]
        );
    }

    #[test]
    fn test_profile_gating() {
        let scanner = StoreScanner::new(environment(&["dev"]));
        let found = scanner.scan(&index(), &ScanScope::everything());
        assert_eq!(found, vec!["app::stores::Menu", "app::stores::DevOnly", "other::Reports"]);
    }
}
