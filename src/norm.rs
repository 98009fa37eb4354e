use thiserror::Error;

/// тип декомпозиции кодпоинта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingKind
{
    /// декомпозиции нет
    #[default]
    NoMapping,
    /// декомпозиция в пустую последовательность
    Removed,
    /// декомпозиция, которая может быть скомбинирована обратно
    RoundTrip,
    /// декомпозиция без обратной композиции (например, совместимости)
    OneWay,
}

/// итоговая категория кодпоинта, определяет способ его записи в таблицу
///
/// YesNo и т.п. - быстрые проверки (quick check) композиции и декомпозиции
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Category
{
    /// значение до классификации
    #[default]
    Unknown,
    /// нет декомпозиции, не комбинируется, CCC = 0
    Inert,
    /// стартер без декомпозиции, комбинируется со следующими кодпоинтами
    YesYesCombinesForward,
    /// стартер с обратимой декомпозицией и композициями
    YesNoCombinesForward,
    /// стартер с обратимой декомпозицией без композиций
    YesNoMappingOnly,
    /// необратимая декомпозиция
    NoNo,
    /// необратимая декомпозиция в один кодпоинт, записанная как смещение
    NoNoDelta,
    /// комбинируется и с предыдущими, и со следующими кодпоинтами
    MaybeYesCombinesForward,
    /// комбинируется только с предыдущими кодпоинтами
    MaybeYesSimple,
    /// CCC > 0, не комбинируется с предыдущими
    YesYesWithCC,
}

impl Category
{
    /// все категории, которые может получить кодпоинт после классификации
    pub const TERMINAL: [Category; 9] = [
        Category::Inert,
        Category::YesYesCombinesForward,
        Category::YesNoCombinesForward,
        Category::YesNoMappingOnly,
        Category::NoNo,
        Category::NoNoDelta,
        Category::MaybeYesCombinesForward,
        Category::MaybeYesSimple,
        Category::YesYesWithCC,
    ];
}

/// пара композиции: второй кодпоинт и результат комбинирования
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositionPair
{
    pub trail: u32,
    pub composite: u32,
}

/// ошибка, обнаруженная проходом, который не знает конкретного кодпоинта;
/// сообщается после прохода вместе с диапазоном
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeferredError
{
    #[error("same round-trip mapping for more than 1 code point")]
    SharedRoundTrip,
    #[error("combines-back and decomposes, not possible in Unicode normalization")]
    CombinesBackWithMapping,
}

/// данные нормализации кодпоинта
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Norm
{
    /// полностью развернутая декомпозиция
    pub mapping: Option<Vec<u32>>,
    /// исходная декомпозиция, если она была развернута
    pub raw_mapping: Option<Vec<u32>>,
    /// кодпоинт исходной декомпозиции, если она состоит из одного кодпоинта
    pub mapping_cp: Option<u32>,
    /// фаза, в которой была задана декомпозиция
    pub mapping_phase: u32,
    pub mapping_kind: MappingKind,

    /// композиции, в которых кодпоинт - первый; CompositionBuilder хранит их по возрастанию второго кодпоинта,
    /// но поиск от порядка не зависит
    pub compositions: Vec<CompositionPair>,
    pub cc: u8,
    /// CCC первого кодпоинта развернутой декомпозиции
    pub lead_cc: u8,
    /// CCC последнего кодпоинта развернутой декомпозиции
    pub trail_cc: u8,
    /// может быть вторым кодпоинтом композиции
    pub combines_back: bool,
    /// композиция может продолжиться через этот кодпоинт на следующий:
    /// у записей без декомпозиции - стартер с композициями, нестартер или кодпоинт,
    /// комбинируемый с предыдущими; у декомпозиций - по их последнему стартеру
    pub has_no_comp_boundary_after: bool,

    pub category: Category,
    /// смещение в данных категории или дельта алгоритмической декомпозиции;
    /// заполняется при записи таблиц
    pub offset: i32,

    pub error: Option<DeferredError>,
}

impl Norm
{
    /// есть ли декомпозиция (в том числе в пустую последовательность)
    #[inline]
    pub fn has_mapping(&self) -> bool
    {
        self.mapping_kind != MappingKind::NoMapping
    }

    #[inline]
    pub fn has_compositions(&self) -> bool
    {
        !self.compositions.is_empty()
    }

    /// декомпозиция в том виде, в котором она была задана
    pub fn original_mapping(&self) -> &[u32]
    {
        match (&self.raw_mapping, &self.mapping) {
            (Some(raw), _) => raw,
            (None, Some(mapping)) => mapping,
            (None, None) => &[],
        }
    }

    /// задать декомпозицию, сбросив результаты предыдущего разворачивания
    pub fn set_mapping(&mut self, kind: MappingKind, mapping: Vec<u32>, phase: u32)
    {
        self.mapping_cp = match mapping.len() {
            1 => Some(mapping[0]),
            _ => None,
        };

        self.mapping = Some(mapping);
        self.raw_mapping = None;
        self.mapping_kind = kind;
        self.mapping_phase = phase;
    }

    /// удалить декомпозицию
    pub fn clear_mapping(&mut self)
    {
        self.mapping = None;
        self.raw_mapping = None;
        self.mapping_cp = None;
        self.mapping_kind = MappingKind::NoMapping;
    }

    /// результат комбинирования с кодпоинтом trail
    pub fn combine(&self, trail: u32) -> Option<u32>
    {
        self.compositions
            .iter()
            .find(|pair| pair.trail == trail)
            .map(|pair| pair.composite)
    }
}
