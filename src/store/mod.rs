// Store module - declaring, describing and synthesizing stores
mod macros;

pub mod declaration;
pub mod descriptor;
pub mod handle;
pub mod returns;
pub mod synthesizer;

pub use declaration::{ArgDecl, Instantiate, Item, MethodDecl, ModelType, StoreDeclaration, StoreInterface};
pub use descriptor::{CrudOperation, MethodBinding, MethodDescriptor, StoreDescriptor, UnboundReason};
pub use handle::{Dispatch, StoreHandle, SynthesizedStore, encode_arg};
pub use returns::{Outcome, PipelineStream, ReturnShape, StoreReturn};
pub use synthesizer::StoreSynthesizer;
