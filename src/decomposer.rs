use tracing::trace;

use crate::buffer::ReorderingBuffer;
use crate::error::BuildError;
use crate::hangul::{decompose_hangul, is_hangul_syllable};
use crate::norm::{MappingKind, Norm};
use crate::norms::{NormId, Norms, RangeVisitor};
use crate::MAX_MAPPING_LENGTH;

/// подставляет в декомпозиции развернутые декомпозиции входящих в них кодпоинтов
///
/// один проход разворачивает декомпозиции на один уровень (или больше, если
/// зависимость уже развернута в этом же проходе); проход повторяется, пока did_decompose
#[derive(Default)]
pub struct Decomposer
{
    /// хотя бы одна декомпозиция изменилась за проход
    pub did_decompose: bool,
    /// первый кодпоинт диапазона, декомпозиция которого изменилась последней
    pub last_decomposed: Option<u32>,
    buffer: ReorderingBuffer,
}

impl Decomposer
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// подготовка к очередному проходу
    pub fn reset(&mut self)
    {
        self.did_decompose = false;
        self.last_decomposed = None;
    }
}

impl RangeVisitor for Decomposer
{
    fn visit(&mut self, norms: &mut Norms, start: u32, end: u32, id: NormId) -> Result<(), BuildError>
    {
        let norm = &norms[id];

        if !norm.has_mapping() {
            return Ok(());
        }

        let round_trip = norm.mapping_kind == MappingKind::RoundTrip;
        let mapping = norm.mapping.as_deref().unwrap_or(&[]);

        // None, пока не встретили кодпоинт, который нужно развернуть
        let mut decomposed: Option<Vec<u32>> = None;

        for (i, &code) in mapping.iter().enumerate() {
            if start <= code && code <= end {
                return Err(BuildError::CyclicDecomposition { code });
            }

            let inner = norms.get_norm_ref(code);

            if inner.has_mapping() {
                if round_trip {
                    check_round_trip(norms, start, mapping, i, inner)?;
                }

                decomposed
                    .get_or_insert_with(|| mapping[.. i].to_vec())
                    .extend_from_slice(inner.mapping.as_deref().unwrap_or(&[]));
            } else if is_hangul_syllable(code) {
                if round_trip && i != 0 {
                    return Err(BuildError::InvalidRoundTrip {
                        code: start,
                        reason: format!("round-trip mapping's non-starter U+{:04X} decomposes", code),
                    });
                }

                decomposed
                    .get_or_insert_with(|| mapping[.. i].to_vec())
                    .extend(decompose_hangul(code));
            } else if let Some(decomposed) = decomposed.as_mut() {
                decomposed.push(code);
            }
        }

        let mut decomposed = match decomposed {
            Some(decomposed) => decomposed,
            None => return Ok(()),
        };

        if decomposed.len() > MAX_MAPPING_LENGTH {
            return Err(BuildError::BufferCapacityExceeded {
                code: start,
                length: decomposed.len(),
            });
        }

        // подставленные декомпозиции канонически упорядочены по отдельности, но не вместе
        self.buffer.reset();
        norms
            .reorder(&mut decomposed, &mut self.buffer)
            .map_err(|_| BuildError::BufferCapacityExceeded {
                code: start,
                length: decomposed.len(),
            })?;

        trace!(
            "U+{:04X}: {:04X?} -> {:04X?}",
            start,
            norms[id].original_mapping(),
            decomposed
        );

        let norm = &mut norms[id];

        // исходная декомпозиция сохраняется только при первом разворачивании
        if norm.raw_mapping.is_none() {
            norm.raw_mapping = norm.mapping.take();
        }

        norm.mapping = Some(decomposed);

        self.did_decompose = true;
        self.last_decomposed = Some(start);

        Ok(())
    }
}

/// обратимая декомпозиция может разворачиваться только по первому кодпоинту,
/// который сам должен иметь обратимую декомпозицию
fn check_round_trip(norms: &Norms, code: u32, mapping: &[u32], i: usize, inner: &Norm) -> Result<(), BuildError>
{
    let inner_code = mapping[i];

    if i != 0 {
        return Err(BuildError::InvalidRoundTrip {
            code,
            reason: format!("round-trip mapping's non-starter U+{:04X} decomposes", inner_code),
        });
    }

    if inner.mapping_kind != MappingKind::RoundTrip {
        return Err(BuildError::InvalidRoundTrip {
            code,
            reason: format!("round-trip mapping's starter U+{:04X} one-way-decomposes", inner_code),
        });
    }

    let outer_trail_cc = mapping.get(i + 1).map_or(0, |&c| norms.get_cc(c));
    let inner_trail_cc = inner
        .mapping
        .as_deref()
        .and_then(|m| m.last())
        .map_or(0, |&c| norms.get_cc(c));

    if inner_trail_cc > outer_trail_cc {
        return Err(BuildError::InvalidRoundTrip {
            code,
            reason: format!(
                "round-trip mapping's starter U+{:04X} decomposes and the inner tccc={} > outer tccc={}",
                inner_code, inner_trail_cc, outer_trail_cc
            ),
        });
    }

    Ok(())
}
