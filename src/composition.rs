use crate::error::BuildError;
use crate::norm::{CompositionPair, DeferredError, MappingKind};
use crate::norms::{NormId, Norms, RangeVisitor};

/// строит пары композиции из обратимых декомпозиций
///
/// пара (второй кодпоинт, результат) записывается первому кодпоинту декомпозиции,
/// второй кодпоинт отмечается как комбинируемый с предыдущими
#[derive(Default)]
pub struct CompositionBuilder
{
    /// количество записанных пар
    pub pairs: usize,
}

impl CompositionBuilder
{
    pub fn new() -> Self
    {
        Self::default()
    }
}

impl RangeVisitor for CompositionBuilder
{
    fn visit(&mut self, norms: &mut Norms, start: u32, end: u32, id: NormId) -> Result<(), BuildError>
    {
        let norm = &norms[id];

        if norm.mapping_kind != MappingKind::RoundTrip {
            return Ok(());
        }

        // результат композиции должен быть одним кодпоинтом, а здесь - целый диапазон
        if start != end {
            norms[id].error = Some(DeferredError::SharedRoundTrip);
            return Ok(());
        }

        if norm.cc != 0 {
            return Err(BuildError::InvalidRoundTrip {
                code: start,
                reason: "round-trip mapping and ccc!=0".to_owned(),
            });
        }

        // пары строятся по исходной декомпозиции: развернутая может состоять из большего числа кодпоинтов
        let (lead, trail) = match norm.original_mapping() {
            &[lead, trail] => (lead, trail),
            _ => {
                return Err(BuildError::MalformedMapping {
                    code: start,
                    reason: "round-trip mapping must have exactly 2 code points",
                })
            }
        };

        if norms.get_cc(lead) != 0 {
            return Err(BuildError::InvalidRoundTrip {
                code: start,
                reason: format!("in the round-trip mapping U+{:04X} has ccc!=0", lead),
            });
        }

        let trail_id = norms.create_norm(trail);
        norms[trail_id].combines_back = true;

        let lead_id = norms.create_norm(lead);
        let compositions = &mut norms[lead_id].compositions;

        // вставка с сохранением сортировки по второму кодпоинту
        match compositions.binary_search_by_key(&trail, |pair| pair.trail) {
            Ok(i) => {
                return Err(BuildError::AmbiguousComposition {
                    lead,
                    trail,
                    first: compositions[i].composite,
                    second: start,
                })
            }
            Err(i) => compositions.insert(
                i,
                CompositionPair {
                    trail,
                    composite: start,
                },
            ),
        }

        self.pairs += 1;

        Ok(())
    }
}
