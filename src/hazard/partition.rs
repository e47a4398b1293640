use crate::hazard::error::HazardError;

/// Positional nominal-year slicing of a daily series
///
/// Blocks are `total_days / year_count` days long regardless of calendar dates; the
/// remainder tail is dropped. Missing days or leap years shift every later boundary.
#[derive(Debug, Clone, Copy)]
pub struct YearPartitioner {
    year_count: usize,
}

/// One nominal year of daily rainfall
#[derive(Debug, Clone, Copy)]
pub struct YearBlock<'a> {
    pub days: &'a [f32],
}

impl YearBlock<'_> {
    /// Largest finite daily value, 0.0 when the block has none
    pub fn annual_maximum(&self) -> f64 {
        self.days
            .iter()
            .filter(|v| v.is_finite())
            .map(|&v| f64::from(v))
            .fold(None, |max: Option<f64>, v| Some(max.map_or(v, |m| m.max(v))))
            .unwrap_or(0.0)
    }

    /// Sum of finite daily values
    pub fn annual_total(&self) -> f64 {
        self.days
            .iter()
            .filter(|v| v.is_finite())
            .map(|&v| f64::from(v))
            .sum()
    }
}

impl YearPartitioner {
    pub fn new(year_count: usize) -> Self {
        Self { year_count }
    }

    /// Partitioner for an inclusive year span, e.g. 1910..=2023 gives 114 years
    pub fn from_span(start_year: i32, end_year: i32) -> Result<Self, HazardError> {
        let invalid = || HazardError::InvalidYearSpan {
            start: start_year,
            end: end_year,
        };
        if end_year < start_year {
            return Err(invalid());
        }
        let years = i64::from(end_year) - i64::from(start_year) + 1;
        let year_count = usize::try_from(years).map_err(|_| invalid())?;
        Ok(Self::new(year_count))
    }

    pub fn year_count(&self) -> usize {
        self.year_count
    }

    pub fn block_length(&self, total_days: usize) -> usize {
        if self.year_count == 0 {
            return 0;
        }
        total_days / self.year_count
    }

    /// Slice the series into `year_count` blocks; empty blocks are not returned
    pub fn partition<'a>(&self, daily: &'a [f32]) -> Vec<YearBlock<'a>> {
        let block_length = self.block_length(daily.len());
        if block_length == 0 {
            return Vec::new();
        }

        daily
            .chunks_exact(block_length)
            .take(self.year_count)
            .map(|days| YearBlock { days })
            .collect()
    }
}
