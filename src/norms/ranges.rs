use super::{NormId, Norms, BLOCK_MASK, CODE_POINT_LIMIT};
use crate::norm::Norm;

/// диапазон кодпоинтов (включительно), разделяющих одну запись
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormRange
{
    pub start: u32,
    pub end: u32,
    pub id: NormId,
}

/// итератор по диапазонам записей; кодпоинты без записей пропускаются,
/// пустые блоки - целиком
pub struct Ranges<'a>
{
    norms: &'a Norms,
    code: u32,
}

impl<'a> Ranges<'a>
{
    pub(super) fn new(norms: &'a Norms) -> Self
    {
        Self { norms, code: 0 }
    }

    /// следующий кодпоинт с записью, начиная с текущего
    #[inline]
    fn skip_empty(&mut self) -> Option<u32>
    {
        while self.code < CODE_POINT_LIMIT {
            if self.norms.is_empty_block(self.code) {
                self.code = (self.code | BLOCK_MASK) + 1;
                continue;
            }

            if self.norms.raw_value(self.code) != 0 {
                return Some(self.code);
            }

            self.code += 1;
        }

        None
    }
}

impl<'a> Iterator for Ranges<'a>
{
    type Item = (NormRange, &'a Norm);

    fn next(&mut self) -> Option<Self::Item>
    {
        let start = self.skip_empty()?;
        let value = self.norms.raw_value(start);

        let mut end = start;

        while end + 1 < CODE_POINT_LIMIT {
            let next = end + 1;

            // один и тот же блок data у соседних блоков индекса - только общий блок диапазона,
            // целиком заполненный записью текущего диапазона
            if next & BLOCK_MASK == 0 && self.norms.block_of(next) == self.norms.block_of(end) {
                end = next | BLOCK_MASK;
                continue;
            }

            if self.norms.raw_value(next) != value {
                break;
            }

            end = next;
        }

        self.code = end + 1;

        let id = NormId(value - 1);

        Some((NormRange { start, end, id }, &self.norms[id]))
    }
}
