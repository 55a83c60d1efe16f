//! dn-engine: the contract between path assembly and sound propagation.
//!
//! The propagation physics (duct attenuation, fitting insertion loss,
//! regenerated noise) lives behind [`PropagationEngine`]. This crate defines
//! the typed input ([`PathData`]) and output ([`EngineOutput`]) it exchanges,
//! and a [`ReplayEngine`] that serves previously computed outputs.

pub mod contract;
pub mod error;
pub mod replay;
pub mod traits;

pub use contract::{
    DuctShape, ElementResult, EngineOutput, FittingClass, FittingSpec, PathData, SegmentSpec,
    SourceSpec, TerminalSpec,
};
pub use error::{EngineError, EngineResult};
pub use replay::ReplayEngine;
pub use traits::PropagationEngine;
