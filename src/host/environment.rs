// Host environment - profile-based conditional activation
use indexmap::IndexSet;

pub const DEFAULT_PROFILE: &str = "default";

/// Host-side type filtering that scanning delegates to
pub trait Environment: Send + Sync {
    fn active_profiles(&self) -> Vec<String>;

    /// True if a type gated by `profiles` is active. An empty list is always active.
    fn accepts_profiles(&self, profiles: &[String]) -> bool;
}

/// Profiles given at startup; with none active the `default` profile applies.
/// A gate entry `!name` matches when `name` is not active.
#[derive(Debug, Clone, Default)]
pub struct StandardEnvironment {
    active: IndexSet<String>,
}

impl StandardEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles<I, S>(profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            active: profiles.into_iter().map(Into::into).collect(),
        }
    }

    fn is_active(&self, profile: &str) -> bool {
        if self.active.is_empty() {
            return profile == DEFAULT_PROFILE;
        }
        self.active.contains(profile)
    }
}

impl Environment for StandardEnvironment {
    fn active_profiles(&self) -> Vec<String> {
        self.active.iter().cloned().collect()
    }

    fn accepts_profiles(&self, profiles: &[String]) -> bool {
        if profiles.is_empty() {
            return true;
        }
        profiles.iter().any(|profile| match profile.strip_prefix('!') {
            Some(negated) => !self.is_active(negated),
            None => self.is_active(profile),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(profiles: &[&str]) -> Vec<String> {
        profiles.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_default_profile() {
        let env = StandardEnvironment::new();
        assert!(env.accepts_profiles(&[]));
        assert!(env.accepts_profiles(&gate(&["default"])));
        assert!(!env.accepts_profiles(&gate(&["dev"])));
        assert!(env.accepts_profiles(&gate(&["!dev"])));
    }

    #[test]
    fn test_active_profiles() {
        let env = StandardEnvironment::with_profiles(["dev", "it"]);
        assert_eq!(env.active_profiles(), vec!["dev", "it"]);
        assert!(env.accepts_profiles(&gate(&["prod", "dev"])));
        assert!(!env.accepts_profiles(&gate(&["default"])));
        assert!(!env.accepts_profiles(&gate(&["!it"])));
    }
}
