//! Common imports for working with HLO graphs.
//!
//! ```rust,ignore
//! use rondo_hlo::prelude::*;
//! ```

pub use crate::error::{Error, PassError, Result};
pub use crate::graph::{Graph, Node, NodeId};
pub use crate::op::{HloOpcode, Literal, OpcodeKind};
pub use crate::pass::{HloPass, PassPipeline};
pub use crate::passes::{DeadCodeElimination, RoundProduct};
pub use crate::pattern::{Bindings, Pat};
pub use crate::shape::Shape;

pub use rondo_dtype::{ElementType, ScalarValue};
