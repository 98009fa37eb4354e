use core::ops::{Index, IndexMut};

use crate::buffer::{BufferFull, ReorderingBuffer};
use crate::error::{BuildError, RangeError};
use crate::norm::{Category, Norm};

pub use ranges::{NormRange, Ranges};

mod ranges;

/// первый кодпоинт за пределами Unicode
pub const CODE_POINT_LIMIT: u32 = 0x110000;

/// количество бит, с помощью которых кодируется смещение внутри блока
pub const BLOCK_BITS: u32 = 7;
/// размер блока
pub const BLOCK_SIZE: u32 = 1 << BLOCK_BITS;
/// маска смещения внутри блока
pub const BLOCK_MASK: u32 = BLOCK_SIZE - 1;
/// количество блоков, покрывающих все кодпоинты
pub const BLOCK_COUNT: u32 = CODE_POINT_LIMIT >> BLOCK_BITS;

/// блок-заглушка: ни у одного кодпоинта блока нет записи
const EMPTY_BLOCK: u32 = 0;

lazy_static! {
    /// данные кодпоинта, о котором ничего не известно
    static ref EMPTY_NORM: Norm = Norm {
        category: Category::Inert,
        ..Default::default()
    };
}

/// номер записи в хранилище
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NormId(u32);

/// обработчик диапазонов кодпоинтов, разделяющих одну запись
pub trait RangeVisitor
{
    fn visit(&mut self, norms: &mut Norms, start: u32, end: u32, id: NormId) -> Result<(), BuildError>;
}

/// хранилище данных нормализации: кодпоинт -> запись
///
/// индекс блоков ссылается на блоки data, в которых хранится номер записи + 1 (0 - записи нет).
/// блоки без записей ссылаются на общую заглушку, полностью занятые одним диапазоном блоки - на общий блок
pub struct Norms
{
    index: Vec<u32>,
    data: Vec<u32>,
    norms: Vec<Norm>,
}

impl Default for Norms
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl Index<NormId> for Norms
{
    type Output = Norm;

    #[inline]
    fn index(&self, id: NormId) -> &Norm
    {
        &self.norms[id.0 as usize]
    }
}

impl IndexMut<NormId> for Norms
{
    #[inline]
    fn index_mut(&mut self, id: NormId) -> &mut Norm
    {
        &mut self.norms[id.0 as usize]
    }
}

impl Norms
{
    pub fn new() -> Self
    {
        Self {
            index: vec![EMPTY_BLOCK; BLOCK_COUNT as usize],
            data: vec![0; BLOCK_SIZE as usize],
            norms: vec![],
        }
    }

    /// количество записей
    #[inline]
    pub fn len(&self) -> usize
    {
        self.norms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool
    {
        self.norms.is_empty()
    }

    /// номер записи кодпоинта, если она есть
    #[inline]
    pub fn id_of(&self, code: u32) -> Option<NormId>
    {
        if code >= CODE_POINT_LIMIT {
            return None;
        }

        match self.data[self.position(code)] {
            0 => None,
            value => Some(NormId(value - 1)),
        }
    }

    /// запись кодпоинта, если она есть
    #[inline]
    pub fn get_norm(&self, code: u32) -> Option<&Norm>
    {
        self.id_of(code).map(|id| &self[id])
    }

    #[inline]
    pub fn get_norm_mut(&mut self, code: u32) -> Option<&mut Norm>
    {
        self.id_of(code).map(|id| &mut self[id])
    }

    /// запись кодпоинта или неизменяемая пустая запись
    #[inline]
    pub fn get_norm_ref(&self, code: u32) -> &Norm
    {
        self.get_norm(code).unwrap_or(&EMPTY_NORM)
    }

    #[inline]
    pub fn get_cc(&self, code: u32) -> u8
    {
        self.get_norm_ref(code).cc
    }

    #[inline]
    pub fn combines_back(&self, code: u32) -> bool
    {
        self.get_norm_ref(code).combines_back
    }

    /// категория кодпоинта; у кодпоинтов без записи - Inert
    pub fn category_of(&self, code: u32) -> Category
    {
        self.get_norm_ref(code).category
    }

    /// запись кодпоинта, созданная при необходимости
    pub fn create_norm(&mut self, code: u32) -> NormId
    {
        assert!(code < CODE_POINT_LIMIT, "U+{:04X} is not a code point", code);

        if let Some(id) = self.id_of(code) {
            return id;
        }

        let id = self.alloc_norm();
        let position = self.writable_position(code);
        self.data[position] = id.0 + 1;

        id
    }

    /// одна общая запись для всех кодпоинтов диапазона, ни у одного из которых еще нет записи
    pub fn create_range(&mut self, start: u32, end: u32) -> Result<NormId, BuildError>
    {
        assert!(start <= end && end < CODE_POINT_LIMIT);

        if let Some(code) = (start ..= end).find(|&c| self.id_of(c).is_some()) {
            return Err(BuildError::OverlappingRange { start, end, code });
        }

        let id = self.alloc_norm();
        let value = id.0 + 1;

        // блок, целиком занятый диапазоном, записываем один раз и переиспользуем
        let mut shared_block = None;
        let mut code = start;

        while code <= end {
            let block_start = code & !BLOCK_MASK;
            let block_end = block_start + BLOCK_MASK;

            if code == block_start && block_end <= end {
                let block = *shared_block.get_or_insert_with(|| {
                    let block = self.alloc_block();
                    let position = (block << BLOCK_BITS) as usize;
                    self.data[position .. position + BLOCK_SIZE as usize].fill(value);

                    block
                });

                self.index[(code >> BLOCK_BITS) as usize] = block;
                code = block_end + 1;

                continue;
            }

            let position = self.writable_position(code);
            self.data[position] = value;
            code += 1;
        }

        Ok(id)
    }

    /// выстроить декомпозицию в каноническом порядке
    pub fn reorder(&self, mapping: &mut Vec<u32>, buffer: &mut ReorderingBuffer) -> Result<(), BufferFull>
    {
        for &code in mapping.iter() {
            buffer.append(code, self.get_cc(code))?;
        }

        if buffer.did_reorder() {
            *mapping = buffer.to_vec();
        }

        Ok(())
    }

    /// комбинируется ли norm с каким-либо кодпоинтом, CCC которого строго между low_cc и high_cc
    ///
    /// high_cc - u16, чтобы можно было передать 256 в качестве верхней границы
    pub fn combines_with_cc_between(&self, norm: &Norm, low_cc: u8, high_cc: u16) -> bool
    {
        if high_cc < low_cc as u16 + 2 {
            return false;
        }

        norm.compositions.iter().any(|pair| {
            let trail_cc = self.get_cc(pair.trail);

            low_cc < trail_cc && (trail_cc as u16) < high_cc
        })
    }

    /// непрерывные диапазоны кодпоинтов с одной и той же записью, по возрастанию
    pub fn ranges(&self) -> Ranges<'_>
    {
        Ranges::new(self)
    }

    /// обойти диапазоны записей
    ///
    /// диапазоны фиксируются до обхода: записи, созданные обработчиком, в обход не попадают
    pub fn enumerate_ranges<V: RangeVisitor>(&mut self, visitor: &mut V) -> Result<(), BuildError>
    {
        let ranges: Vec<NormRange> = self.ranges().map(|(range, _)| range).collect();

        for range in ranges {
            visitor.visit(self, range.start, range.end, range.id)?;
        }

        Ok(())
    }

    /// забрать отложенные ошибки всех записей
    pub fn take_deferred_errors(&mut self) -> Vec<RangeError>
    {
        let ranges: Vec<NormRange> = self.ranges().map(|(range, _)| range).collect();

        ranges
            .into_iter()
            .filter_map(|range| {
                self[range.id].error.take().map(|error| RangeError {
                    start: range.start,
                    end: range.end,
                    error,
                })
            })
            .collect()
    }

    // ----

    /// номер записи кодпоинта в data + 1 (0 - нет записи), без проверки границ
    #[inline]
    pub(crate) fn raw_value(&self, code: u32) -> u32
    {
        self.data[self.position(code)]
    }

    /// пустой ли блок, содержащий кодпоинт
    #[inline]
    pub(crate) fn is_empty_block(&self, code: u32) -> bool
    {
        self.block_of(code) == EMPTY_BLOCK
    }

    /// номер блока data, содержащего кодпоинт
    #[inline]
    pub(crate) fn block_of(&self, code: u32) -> u32
    {
        self.index[(code >> BLOCK_BITS) as usize]
    }

    #[inline]
    fn position(&self, code: u32) -> usize
    {
        let block = self.index[(code >> BLOCK_BITS) as usize];

        ((block << BLOCK_BITS) | (code & BLOCK_MASK)) as usize
    }

    fn alloc_norm(&mut self) -> NormId
    {
        self.norms.push(Norm::default());

        NormId(self.norms.len() as u32 - 1)
    }

    fn alloc_block(&mut self) -> u32
    {
        let block = self.data.len() as u32 >> BLOCK_BITS;
        self.data.resize(self.data.len() + BLOCK_SIZE as usize, 0);

        block
    }

    /// позиция кодпоинта в собственном (не общем) блоке
    ///
    /// запись в общий блок диапазона невозможна: в нём у всех кодпоинтов уже есть записи
    fn writable_position(&mut self, code: u32) -> usize
    {
        let i = (code >> BLOCK_BITS) as usize;

        if self.index[i] == EMPTY_BLOCK {
            self.index[i] = self.alloc_block();
        }

        self.position(code)
    }
}
