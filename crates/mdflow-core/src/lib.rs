pub mod error;
pub mod meta;
pub mod types;

pub use error::MdflowError;
pub use meta::{AgentDocument, MetaValue, Metadata};
pub use types::{CommandName, RunContext};
