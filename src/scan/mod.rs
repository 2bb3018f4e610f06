// Scan module - type catalog, component index, scope and scanners
pub mod catalog;
pub mod index;
pub mod scanner;
pub mod scope;

pub use catalog::TypeCatalog;
pub use index::{ComponentIndex, ComponentMetadata, Stereotype, TypeKind};
pub use scanner::{CandidateRule, ComponentScanner, StoreScanner, any_kind, concrete_only};
pub use scope::ScanScope;
