use thiserror::Error;

use crate::norm::DeferredError;
use crate::MAX_MAPPING_LENGTH;

/// ошибки построения данных нормализации
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError
{
    #[error("U+{code:04X}: malformed mapping: {reason}")]
    MalformedMapping
    {
        code: u32,
        reason: &'static str,
    },

    #[error("U+{code:04X} already has a mapping (phase {phase})")]
    DuplicateMapping
    {
        code: u32,
        phase: u32,
    },

    #[error("U+{code:04X} maps to itself directly or indirectly")]
    CyclicDecomposition
    {
        code: u32,
    },

    #[error(
        "U+{lead:04X} + U+{trail:04X} is the round-trip mapping of both U+{first:04X} and U+{second:04X}"
    )]
    AmbiguousComposition
    {
        lead: u32,
        trail: u32,
        first: u32,
        second: u32,
    },

    #[error(
        "U+{code:04X}: mapping of {length} code points exceeds the maximum of {max}",
        max = MAX_MAPPING_LENGTH
    )]
    BufferCapacityExceeded
    {
        code: u32,
        length: usize,
    },

    #[error("U+{code:04X}: {reason}, not possible in Unicode normalization")]
    InvalidRoundTrip
    {
        code: u32,
        reason: String,
    },

    #[error("U+{start:04X}..U+{end:04X}: U+{code:04X} already has normalization data")]
    OverlappingRange
    {
        start: u32,
        end: u32,
        code: u32,
    },

    #[error("{}", format_deferred(.0))]
    Deferred(Vec<RangeError>),
}

/// отложенная ошибка, привязанная к диапазону кодпоинтов, разделяющих одну запись
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {error}", format_range(.start, .end))]
pub struct RangeError
{
    pub start: u32,
    pub end: u32,
    pub error: DeferredError,
}

fn format_range(start: &u32, end: &u32) -> String
{
    match start == end {
        true => format!("U+{:04X}", start),
        false => format!("U+{:04X}..U+{:04X}", start, end),
    }
}

fn format_deferred(errors: &[RangeError]) -> String
{
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<String>>()
        .join("\n")
}
