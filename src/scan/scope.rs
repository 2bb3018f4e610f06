// Scan scope - the namespace prefix constraining discovery
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanScope {
    /// Normalized `::`-separated segments; empty means everything
    segments: Vec<String>,
}

impl ScanScope {
    pub fn everything() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Scope for a package prefix; `.` and `::` separators are equivalent
    pub fn package(prefix: &str) -> Self {
        let segments = prefix
            .replace("::", ".")
            .split('.')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    /// Resolve the configured scan package, warning when scanning everything
    pub fn resolve(scan_package: Option<&str>) -> Self {
        let scope = scan_package.map(Self::package).unwrap_or_else(Self::everything);
        if scope.is_everything() {
            warn!(
                "No scan package configured, scanning every declared type. Provide a scan package (e.g. \"my_app::stores\") for much faster scanning"
            );
        }
        scope
    }

    pub fn is_everything(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if the type path lies within this scope, matching whole segments
    pub fn contains(&self, type_name: &str) -> bool {
        let path = Self::package(type_name);
        path.segments.len() >= self.segments.len()
            && path.segments.iter().zip(&self.segments).all(|(a, b)| a == b)
    }
}

impl fmt::Display for ScanScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_everything() {
            f.write_str("<everything>")
        } else {
            f.write_str(&self.segments.join("::"))
        }
    }
}
