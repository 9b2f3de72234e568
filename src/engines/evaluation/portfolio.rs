use crate::data::ReturnTable;
use crate::error::Result;
use crate::types::DatedSeries;

/// Equal-weight basket of named assets, rebalanced every period.
pub struct EqualWeightPortfolio<'a> {
    assets: &'a [String],
}

impl<'a> EqualWeightPortfolio<'a> {
    pub fn new(assets: &'a [String]) -> Self {
        Self { assets }
    }

    /// Per-date arithmetic mean across the assets, skipping NaN cells.
    /// A date where every asset is NaN stays NaN.
    pub fn series(&self, table: &ReturnTable) -> Result<DatedSeries> {
        let columns = table.columns(self.assets)?;

        let values = (0..table.height())
            .map(|row| {
                let (sum, count) = columns
                    .iter()
                    .map(|col| col[row])
                    .filter(|v| !v.is_nan())
                    .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
                if count == 0 {
                    f64::NAN
                } else {
                    sum / count as f64
                }
            })
            .collect();

        Ok(DatedSeries::new(table.dates().to_vec(), values))
    }
}
