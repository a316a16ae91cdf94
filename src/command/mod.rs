/// Command domain layer: tree definition, flattening, path resolution.
pub mod errors;
pub mod flatten;
pub mod resolve;
pub mod tree;

pub use errors::KroshError;
pub use flatten::{FlatTable, collisions, flatten};
pub use resolve::{Resolved, resolve, suggest};
pub use tree::{Action, Command, CommandTree, Handler, INDEX, Node, OptionKind, OptionSpec};
