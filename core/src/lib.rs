//! Core of Magic: the attribute bag.
//!
//! An [`AttributeBag`] stores an ordered attribute map and intercepts every
//! read, write, existence check and removal:
//!
//! - **Mutators**: a specialization `K` declares `get<Name>Attribute` and
//!   `set<Name>Attribute` methods through [`Mutators::declare`]. Reads and
//!   writes discover them by name.
//! - **Recordings**: per-instance callables invoked with the bag as receiver.
//! - **Class functions**: callables shared by every bag of every
//!   specialization ([`ClassFunctions::global`]).
//! - **Projections**: serialization of the stored map only, and a debug
//!   view that overlays computed attributes.

mod bag;
pub mod errors;
pub mod functions;
pub mod mutators;

pub use bag::{AttributeBag, Recording};
pub use errors::BagError;
pub use functions::{ClassFn, ClassFunctions};
pub use mutators::{
    Definition, Getter, MethodSet, MutatorKind, Mutators, Plain, Routine, Setter, method_set,
    mutator_name,
};

pub use magic_types::{Attributes, Value};
