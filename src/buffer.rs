use thiserror::Error;

use crate::codepoint::Codepoint;
use crate::MAX_MAPPING_LENGTH;

/// в буфер не помещается очередной кодпоинт
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("reordering buffer holds at most {} code points", MAX_MAPPING_LENGTH)]
pub struct BufferFull;

/// буфер, в котором последовательность кодпоинтов собирается сразу в каноническом порядке
///
/// нестартеры "всплывают" назад до кодпоинта с CCC не больше своего, но не дальше последнего стартера
pub struct ReorderingBuffer
{
    array: [Codepoint; MAX_MAPPING_LENGTH],
    length: usize,
    last_starter_index: Option<usize>,
    did_reorder: bool,
}

impl Default for ReorderingBuffer
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl ReorderingBuffer
{
    pub fn new() -> Self
    {
        Self {
            array: [Codepoint::default(); MAX_MAPPING_LENGTH],
            length: 0,
            last_starter_index: None,
            did_reorder: false,
        }
    }

    pub fn reset(&mut self)
    {
        self.length = 0;
        self.last_starter_index = None;
        self.did_reorder = false;
    }

    #[inline]
    pub fn len(&self) -> usize
    {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool
    {
        self.length == 0
    }

    #[inline]
    pub fn last_starter_index(&self) -> Option<usize>
    {
        self.last_starter_index
    }

    #[inline]
    pub fn char_at(&self, i: usize) -> u32
    {
        self.array[i].code()
    }

    #[inline]
    pub fn cc_at(&self, i: usize) -> u8
    {
        self.array[i].ccc()
    }

    /// была ли хотя бы одна вставка не в конец
    #[inline]
    pub fn did_reorder(&self) -> bool
    {
        self.did_reorder
    }

    pub fn append(&mut self, code: u32, cc: u8) -> Result<(), BufferFull>
    {
        if self.length == MAX_MAPPING_LENGTH {
            return Err(BufferFull);
        }

        let entry = Codepoint::new(code, cc);

        if entry.is_starter() || self.length == 0 || self.cc_at(self.length - 1) <= cc {
            if entry.is_starter() {
                self.last_starter_index = Some(self.length);
            }

            self.array[self.length] = entry;
            self.length += 1;

            return Ok(());
        }

        // ищем позицию после последнего кодпоинта с CCC <= cc, не заходя за стартер
        let floor = self.last_starter_index.map_or(0, |i| i + 1);
        let mut i = self.length - 1;

        while i > floor && self.cc_at(i - 1) > cc {
            i -= 1;
        }

        self.array.copy_within(i .. self.length, i + 1);
        self.array[i] = entry;
        self.length += 1;
        self.did_reorder = true;

        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = Codepoint> + '_
    {
        self.array[.. self.length].iter().copied()
    }

    /// кодпоинты буфера в текущем порядке
    pub fn to_vec(&self) -> Vec<u32>
    {
        self.iter().map(|c| c.code()).collect()
    }
}
