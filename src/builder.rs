use tracing::{debug, info, warn};

use crate::classify::DeltaDetector;
use crate::composition::CompositionBuilder;
use crate::decomposer::Decomposer;
use crate::error::BuildError;
use crate::norm::MappingKind;
use crate::norms::{Norms, CODE_POINT_LIMIT};
use crate::postprocess::PostProcessor;
use crate::stats::Stats;
use crate::{MAX_DELTA, MAX_MAPPING_LENGTH};

/// что делать, если у кодпоинта уже есть декомпозиция
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverrideHandling
{
    /// повторная декомпозиция - ошибка
    #[default]
    None,
    /// декомпозиция из более поздней фазы заменяет более раннюю
    Previous,
    /// всегда заменять
    Any,
}

/// настройки построения
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options
{
    pub override_handling: OverrideHandling,
    /// записывать декомпозиции в один кодпоинт как смещение (NoNoDelta)
    pub algorithmic_deltas: bool,
    /// максимальное по модулю смещение
    pub max_delta: i32,
}

impl Default for Options
{
    fn default() -> Self
    {
        Self {
            override_handling: OverrideHandling::None,
            algorithmic_deltas: true,
            max_delta: MAX_DELTA,
        }
    }
}

/// построитель данных нормализации: принимает CCC и декомпозиции кодпоинтов,
/// затем разворачивает декомпозиции, строит композиции и классифицирует кодпоинты
#[derive(Default)]
pub struct NormsBuilder
{
    norms: Norms,
    options: Options,
    phase: u32,
}

impl NormsBuilder
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn with_options(options: Options) -> Self
    {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn norms(&self) -> &Norms
    {
        &self.norms
    }

    pub fn into_norms(self) -> Norms
    {
        self.norms
    }

    /// фаза (например, номер входного файла), к которой относятся следующие декомпозиции
    pub fn set_phase(&mut self, phase: u32)
    {
        self.phase = phase;
    }

    pub fn set_cc(&mut self, code: u32, cc: u8) -> Result<(), BuildError>
    {
        check_code_point(code, code)?;

        let id = self.norms.create_norm(code);
        self.norms[id].cc = cc;

        Ok(())
    }

    pub fn set_cc_range(&mut self, start: u32, end: u32, cc: u8) -> Result<(), BuildError>
    {
        for code in start ..= end {
            self.set_cc(code, cc)?;
        }

        Ok(())
    }

    /// необратимая декомпозиция; пустая - кодпоинт удаляется
    pub fn set_one_way_mapping(&mut self, code: u32, mapping: &[u32]) -> Result<(), BuildError>
    {
        let kind = match mapping.is_empty() {
            true => MappingKind::Removed,
            false => MappingKind::OneWay,
        };

        self.set_mapping(code, kind, mapping)
    }

    /// обратимая декомпозиция, ровно 2 кодпоинта
    pub fn set_round_trip_mapping(&mut self, code: u32, mapping: &[u32]) -> Result<(), BuildError>
    {
        if mapping.len() != 2 {
            return Err(BuildError::MalformedMapping {
                code,
                reason: "round-trip mapping must have exactly 2 code points",
            });
        }

        self.set_mapping(code, MappingKind::RoundTrip, mapping)
    }

    /// убрать декомпозицию, заданную ранее
    pub fn remove_mapping(&mut self, code: u32) -> Result<(), BuildError>
    {
        check_code_point(code, code)?;

        if let Some(norm) = self.norms.get_norm_mut(code) {
            if norm.has_mapping() {
                check_override(self.options.override_handling, self.phase, code, norm.mapping_phase)?;
                norm.clear_mapping();
            }
        }

        Ok(())
    }

    fn set_mapping(&mut self, code: u32, kind: MappingKind, mapping: &[u32]) -> Result<(), BuildError>
    {
        check_code_point(code, code)?;

        for &c in mapping {
            check_code_point(code, c)?;
        }

        if mapping.len() > MAX_MAPPING_LENGTH {
            return Err(BuildError::BufferCapacityExceeded {
                code,
                length: mapping.len(),
            });
        }

        let id = self.norms.create_norm(code);
        let norm = &mut self.norms[id];

        if norm.has_mapping() {
            check_override(self.options.override_handling, self.phase, code, norm.mapping_phase)?;
        }

        norm.set_mapping(kind, mapping.to_vec(), self.phase);

        Ok(())
    }

    /// обработать накопленные данные; после успешного завершения у всех записей есть категория
    pub fn process(&mut self) -> Result<Stats, BuildError>
    {
        let passes = self.decompose()?;

        let mut compositions = CompositionBuilder::new();
        self.norms.enumerate_ranges(&mut compositions)?;
        self.check_deferred_errors()?;

        debug!("composition pairs: {}", compositions.pairs);

        self.norms.enumerate_ranges(&mut PostProcessor::new())?;
        self.check_deferred_errors()?;

        if self.options.algorithmic_deltas {
            let mut deltas = DeltaDetector::new(self.options.max_delta);
            self.norms.enumerate_ranges(&mut deltas)?;

            debug!("algorithmic deltas: {}", deltas.deltas);
        }

        let stats = Stats::collect(&self.norms, passes);
        info!("{}", stats);

        Ok(stats)
    }

    /// разворачиваем декомпозиции, пока они меняются
    ///
    /// без циклов цепочка зависимостей не длиннее количества декомпозиций,
    /// поэтому большее количество проходов означает цикл
    fn decompose(&mut self) -> Result<usize, BuildError>
    {
        let max_passes = self.norms.ranges().filter(|(_, norm)| norm.has_mapping()).count() + 1;

        let mut decomposer = Decomposer::new();
        let mut passes = 0;

        loop {
            decomposer.reset();
            self.norms.enumerate_ranges(&mut decomposer)?;
            passes += 1;

            debug!("decomposition pass {}: changed = {}", passes, decomposer.did_decompose);

            if !decomposer.did_decompose {
                return Ok(passes);
            }

            if passes > max_passes {
                return Err(BuildError::CyclicDecomposition {
                    code: decomposer.last_decomposed.unwrap_or_default(),
                });
            }
        }
    }

    fn check_deferred_errors(&mut self) -> Result<(), BuildError>
    {
        let errors = self.norms.take_deferred_errors();

        if errors.is_empty() {
            return Ok(());
        }

        for error in errors.iter() {
            warn!("{}", error);
        }

        Err(BuildError::Deferred(errors))
    }
}

/// code - кодпоинт, данные которого задаются, c - проверяемый кодпоинт
fn check_code_point(code: u32, c: u32) -> Result<(), BuildError>
{
    let reason = match c {
        0xD800 ..= 0xDFFF => "surrogate code point",
        _ if c >= CODE_POINT_LIMIT => "code point out of range",
        _ => return Ok(()),
    };

    Err(BuildError::MalformedMapping { code, reason })
}

fn check_override(handling: OverrideHandling, phase: u32, code: u32, mapping_phase: u32) -> Result<(), BuildError>
{
    let allowed = match handling {
        OverrideHandling::None => false,
        OverrideHandling::Previous => phase > mapping_phase,
        OverrideHandling::Any => true,
    };

    match allowed {
        true => Ok(()),
        false => Err(BuildError::DuplicateMapping {
            code,
            phase: mapping_phase,
        }),
    }
}
