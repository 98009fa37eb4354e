use crate::error::BuildError;
use crate::norm::{Category, DeferredError, MappingKind, Norm};
use crate::norms::{NormId, Norms, RangeVisitor};

/// категория кодпоинта по уже окончательным данным записи
///
/// NoNoDelta здесь не выбирается: дельта - свойство диапазона, см. DeltaDetector
pub fn classify(norm: &Norm) -> Result<Category, DeferredError>
{
    if norm.combines_back {
        if norm.has_mapping() {
            return Err(DeferredError::CombinesBackWithMapping);
        }

        return Ok(match norm.has_compositions() {
            true => Category::MaybeYesCombinesForward,
            false => Category::MaybeYesSimple,
        });
    }

    Ok(match norm.mapping_kind {
        MappingKind::NoMapping => match (norm.has_compositions(), norm.cc) {
            (true, _) => Category::YesYesCombinesForward,
            (false, 0) => Category::Inert,
            (false, _) => Category::YesYesWithCC,
        },
        MappingKind::RoundTrip => match norm.has_compositions() {
            true => Category::YesNoCombinesForward,
            false => Category::YesNoMappingOnly,
        },
        MappingKind::OneWay | MappingKind::Removed => Category::NoNo,
    })
}

/// переводит необратимые декомпозиции в один кодпоинт в NoNoDelta,
/// если разница кодов укладывается в max_delta
///
/// дельта постоянна только для одного кодпоинта: у диапазона из нескольких кодпоинтов
/// с общей записью она для каждого своя, такие диапазоны остаются NoNo
pub struct DeltaDetector
{
    pub max_delta: i32,
    /// количество кодпоинтов, переведенных в NoNoDelta
    pub deltas: usize,
}

impl DeltaDetector
{
    pub fn new(max_delta: i32) -> Self
    {
        Self {
            max_delta,
            deltas: 0,
        }
    }
}

impl RangeVisitor for DeltaDetector
{
    fn visit(&mut self, norms: &mut Norms, start: u32, end: u32, id: NormId) -> Result<(), BuildError>
    {
        let norm = &norms[id];

        if start != end || norm.category != Category::NoNo || norm.cc != 0 {
            return Ok(());
        }

        let target = match norm.mapping_cp {
            Some(target) if norms.get_cc(target) == 0 => target,
            _ => return Ok(()),
        };

        let delta = target as i32 - start as i32;

        if delta.abs() > self.max_delta {
            return Ok(());
        }

        let norm = &mut norms[id];
        norm.category = Category::NoNoDelta;
        norm.offset = delta;

        self.deltas += 1;

        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::norm::CompositionPair;

    fn pair() -> Vec<CompositionPair>
    {
        vec![CompositionPair {
            trail: 0x301,
            composite: 0xC1,
        }]
    }

    fn mapped(kind: MappingKind) -> Norm
    {
        let mut norm = Norm::default();
        norm.set_mapping(kind, vec![0x41, 0x301], 0);

        norm
    }

    #[test]
    fn no_mapping_rows()
    {
        assert_eq!(classify(&Norm::default()), Ok(Category::Inert));

        let with_cc = Norm {
            cc: 230,
            ..Default::default()
        };
        assert_eq!(classify(&with_cc), Ok(Category::YesYesWithCC));

        let forward = Norm {
            compositions: pair(),
            ..Default::default()
        };
        assert_eq!(classify(&forward), Ok(Category::YesYesCombinesForward));
    }

    #[test]
    fn mapping_rows()
    {
        let mut norm = mapped(MappingKind::RoundTrip);
        assert_eq!(classify(&norm), Ok(Category::YesNoMappingOnly));

        norm.compositions = pair();
        assert_eq!(classify(&norm), Ok(Category::YesNoCombinesForward));

        assert_eq!(classify(&mapped(MappingKind::OneWay)), Ok(Category::NoNo));

        let mut removed = Norm::default();
        removed.set_mapping(MappingKind::Removed, vec![], 0);
        assert_eq!(classify(&removed), Ok(Category::NoNo));
    }

    #[test]
    fn backward_combining_rows()
    {
        let simple = Norm {
            combines_back: true,
            cc: 230,
            ..Default::default()
        };
        assert_eq!(classify(&simple), Ok(Category::MaybeYesSimple));

        let both = Norm {
            combines_back: true,
            compositions: pair(),
            ..Default::default()
        };
        assert_eq!(classify(&both), Ok(Category::MaybeYesCombinesForward));

        let mut invalid = mapped(MappingKind::OneWay);
        invalid.combines_back = true;
        assert_eq!(classify(&invalid), Err(DeferredError::CombinesBackWithMapping));
    }

    #[test]
    fn delta_only_for_single_code_points_in_reach()
    {
        let mut norms = Norms::new();

        for (code, target) in [(0x2000, 0x2002), (0x2126, 0x3A9), (0x1F00, 0x1F80)] {
            let id = norms.create_norm(code);
            norms[id].set_mapping(MappingKind::OneWay, vec![target], 0);
            norms[id].category = Category::NoNo;
        }

        let id = norms.create_range(0x3000, 0x3001).unwrap();
        norms[id].set_mapping(MappingKind::OneWay, vec![0x3002], 0);
        norms[id].category = Category::NoNo;

        let mut detector = DeltaDetector::new(0x40);
        norms.enumerate_ranges(&mut detector).unwrap();

        assert_eq!(detector.deltas, 1);
        assert_eq!(norms.category_of(0x2000), Category::NoNoDelta);
        assert_eq!(norms.get_norm(0x2000).unwrap().offset, 2);
        assert_eq!(norms.category_of(0x2126), Category::NoNo);
        assert_eq!(norms.category_of(0x1F00), Category::NoNo);
        assert_eq!(norms.category_of(0x3001), Category::NoNo);
    }
}
