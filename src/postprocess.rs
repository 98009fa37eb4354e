use crate::buffer::ReorderingBuffer;
use crate::classify::classify;
use crate::error::BuildError;
use crate::hangul::{is_jamo, is_jamo_l, is_jamo_v};
use crate::norm::Norm;
use crate::norms::{NormId, Norms, RangeVisitor};

/// завершающая обработка записи после разворачивания декомпозиций и построения композиций:
///  - канонический порядок декомпозиций
///  - CCC первого и последнего кодпоинта декомпозиции
///  - может ли композиция продолжиться за кодпоинтом
///  - категория
///
/// проход не знает, каким кодпоинтам принадлежит запись, поэтому ошибки данных откладываются
#[derive(Default)]
pub struct PostProcessor
{
    buffer: ReorderingBuffer,
}

impl PostProcessor
{
    pub fn new() -> Self
    {
        Self::default()
    }
}

impl RangeVisitor for PostProcessor
{
    fn visit(&mut self, norms: &mut Norms, start: u32, _: u32, id: NormId) -> Result<(), BuildError>
    {
        let norm = &norms[id];

        if !norm.has_mapping() {
            let norm = &mut norms[id];

            norm.lead_cc = norm.cc;
            norm.trail_cc = norm.cc;
            norm.has_no_comp_boundary_after = norm.has_compositions() || norm.cc != 0 || norm.combines_back;

            return set_category(norm);
        }

        let overflow = |length: usize| BuildError::BufferCapacityExceeded { code: start, length };

        let mut raw_mapping = norm.raw_mapping.clone();
        let mut mapping = norm.mapping.clone().unwrap_or_default();

        if let Some(raw_mapping) = raw_mapping.as_mut() {
            self.buffer.reset();
            norms
                .reorder(raw_mapping, &mut self.buffer)
                .map_err(|_| overflow(raw_mapping.len()))?;
        }

        self.buffer.reset();
        norms
            .reorder(&mut mapping, &mut self.buffer)
            .map_err(|_| overflow(mapping.len()))?;

        // удаляемый кодпоинт соединяет соседей с обеих сторон - худший случай для CCC
        let (lead_cc, trail_cc) = match self.buffer.is_empty() {
            true => (1, 0xFF),
            false => (self.buffer.cc_at(0), self.buffer.cc_at(self.buffer.len() - 1)),
        };

        let has_no_comp_boundary_after = has_no_comp_boundary_after(norms, &self.buffer);

        let norm = &mut norms[id];

        norm.raw_mapping = raw_mapping;
        norm.mapping = Some(mapping);
        norm.lead_cc = lead_cc;
        norm.trail_cc = trail_cc;
        norm.has_no_comp_boundary_after = has_no_comp_boundary_after;

        set_category(norm)
    }
}

fn set_category(norm: &mut Norm) -> Result<(), BuildError>
{
    match classify(norm) {
        Ok(category) => norm.category = category,
        Err(error) => norm.error = Some(error),
    }

    Ok(())
}

/// может ли композиция, начатая в декомпозиции (в буфере), продолжиться на следующий за ней кодпоинт
pub fn has_no_comp_boundary_after(norms: &Norms, buffer: &ReorderingBuffer) -> bool
{
    // удаляемый кодпоинт - не граница никакого рода
    if buffer.is_empty() {
        return true;
    }

    let last_starter_index = match buffer.last_starter_index() {
        Some(i) => i,
        None => return true,
    };

    let last_index = buffer.len() - 1;
    let mut starter = buffer.char_at(last_starter_index);

    // последний стартер в начале декомпозиции комбинируется с предыдущими
    if last_starter_index == 0 && norms.combines_back(starter) {
        return true;
    }

    // ведущая согласная чамо или пара LV комбинируются со следующими, только если они в конце
    if is_jamo_l(starter)
        || (is_jamo_v(starter) && last_starter_index > 0 && is_jamo_l(buffer.char_at(last_starter_index - 1)))
    {
        return last_starter_index == last_index;
    }

    // несколько стартеров подряд могут скомбинироваться в один: ищем первый из последней их серии
    let mut first = last_starter_index;

    while first > 0 && buffer.cc_at(first - 1) == 0 && !is_jamo(buffer.char_at(first - 1)) {
        starter = buffer.char_at(first - 1);
        first -= 1;
    }

    let mut starter_norm = norms.get_norm(starter);

    if first == last_starter_index && !starter_norm.map_or(false, Norm::has_compositions) {
        return false;
    }

    // комбинируем, пока возможно, и проверяем, возможна ли композиция со следующим кодпоинтом
    let mut prev_cc = 0;

    for i in first + 1 ..= last_index {
        let cc = buffer.cc_at(i);

        // стартер комбинируется с нестартером, который встал бы перед текущим
        if i > last_starter_index
            && starter_norm.map_or(false, |norm| norms.combines_with_cc_between(norm, prev_cc, cc as u16))
        {
            return true;
        }

        let c = buffer.char_at(i);
        let composite = match starter_norm {
            Some(norm) if (prev_cc < cc || prev_cc == 0) && norms.combines_back(c) => norm.combine(c),
            _ => None,
        };

        match composite {
            Some(composite) => {
                // получили новый стартер; prev_cc не меняется - нестартер "поглощен"
                starter_norm = norms.get_norm(composite);

                if i >= last_starter_index && !starter_norm.map_or(false, Norm::has_compositions) {
                    return false;
                }
            }
            None if cc == 0 => {
                starter_norm = norms.get_norm(c);

                if i == last_starter_index && !starter_norm.map_or(false, Norm::has_compositions) {
                    return false;
                }

                prev_cc = 0;
            }
            None => prev_cc = cc,
        }
    }

    // в конце - стартер, комбинируемый со следующими
    if prev_cc == 0 {
        return true;
    }

    starter_norm.map_or(false, |norm| norms.combines_with_cc_between(norm, prev_cc, 256))
}
