#[macro_use]
extern crate lazy_static;

pub use buffer::{BufferFull, ReorderingBuffer};
pub use builder::{NormsBuilder, Options, OverrideHandling};
pub use classify::{classify, DeltaDetector};
pub use codepoint::Codepoint;
pub use composition::CompositionBuilder;
pub use decomposer::Decomposer;
pub use error::{BuildError, RangeError};
pub use norm::{Category, CompositionPair, DeferredError, MappingKind, Norm};
pub use norms::{NormId, NormRange, Norms, RangeVisitor};
pub use postprocess::{has_no_comp_boundary_after, PostProcessor};
pub use stats::Stats;

mod buffer;
mod builder;
mod classify;
mod codepoint;
mod composition;
mod decomposer;
mod error;
pub mod hangul;
mod norm;
pub mod norms;
mod postprocess;
mod stats;

/// максимальная длина декомпозиции в кодпоинтах
pub const MAX_MAPPING_LENGTH: usize = 31;

/// максимальное по модулю смещение алгоритмической декомпозиции (NoNoDelta)
pub const MAX_DELTA: i32 = 0x40;
