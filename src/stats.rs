use std::collections::BTreeMap;

use crate::norm::Category;
use crate::norms::Norms;

/// статистика построенных данных
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats
{
    /// количество кодпоинтов каждой категории (диапазоны учитываются целиком)
    pub categories: BTreeMap<Category, usize>,
    /// количество записей
    pub norms: usize,
    /// количество диапазонов
    pub ranges: usize,
    /// количество пар композиции
    pub compositions: usize,
    /// проходов разворачивания декомпозиций
    pub decomposition_passes: usize,
}

impl Stats
{
    pub fn collect(norms: &Norms, decomposition_passes: usize) -> Self
    {
        let mut stats = Self {
            norms: norms.len(),
            decomposition_passes,
            ..Default::default()
        };

        for (range, norm) in norms.ranges() {
            *stats.categories.entry(norm.category).or_default() += (range.end - range.start + 1) as usize;

            stats.ranges += 1;
            stats.compositions += norm.compositions.len();
        }

        stats
    }

    /// количество кодпоинтов категории
    pub fn count(&self, category: Category) -> usize
    {
        self.categories.get(&category).copied().unwrap_or(0)
    }
}

impl core::fmt::Display for Stats
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        write!(
            f,
            "records: {}, ranges: {}, composition pairs: {}, decomposition passes: {}",
            self.norms, self.ranges, self.compositions, self.decomposition_passes
        )?;

        // по убыванию количества, как в отчетах о таблицах
        let mut categories: Vec<(&Category, &usize)> = self.categories.iter().collect();
        categories.sort_by(|a, b| b.1.cmp(a.1));

        for (category, count) in categories {
            write!(f, "\n  {:?}: {}", category, count)?;
        }

        Ok(())
    }
}
