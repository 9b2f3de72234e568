// src/engines/metrics/risk.rs

pub struct RiskMetrics;

impl RiskMetrics {
    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return f64::NAN;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Population standard deviation (divides by n)
    pub fn std_dev(values: &[f64]) -> f64 {
        if values.is_empty() {
            return f64::NAN;
        }

        let mean = Self::mean(values);
        let variance = values.iter()
            .map(|&v| (v - mean).powi(2))
            .sum::<f64>() / values.len() as f64;

        variance.sqrt()
    }

    pub fn annualized_volatility(values: &[f64], periods_per_year: f64) -> f64 {
        Self::std_dev(values) * periods_per_year.sqrt()
    }

    /// Per-period Sharpe ratio, NaN when the series has no dispersion
    pub fn sharpe(values: &[f64], risk_free_rate: f64) -> f64 {
        let std = Self::std_dev(values);
        if std == 0.0 || std.is_nan() {
            return f64::NAN;
        }
        (Self::mean(values) - risk_free_rate) / std
    }

    /// Pearson correlation; 0.0 when either side has zero variance
    pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
        let n = a.len().min(b.len());
        if n == 0 {
            return 0.0;
        }
        let (a, b) = (&a[..n], &b[..n]);

        let mean_a = a.iter().sum::<f64>() / n as f64;
        let mean_b = b.iter().sum::<f64>() / n as f64;

        let mut cov = 0.0;
        let mut var_a = 0.0;
        let mut var_b = 0.0;
        for (&x, &y) in a.iter().zip(b.iter()) {
            let dx = x - mean_a;
            let dy = y - mean_b;
            cov += dx * dy;
            var_a += dx * dx;
            var_b += dy * dy;
        }

        if var_a == 0.0 || var_b == 0.0 {
            return 0.0;
        }
        cov / (var_a * var_b).sqrt()
    }

    /// Largest peak-to-trough loss of the compounded curve, as a positive fraction
    pub fn max_drawdown(returns: &[f64]) -> f64 {
        let mut equity = 1.0;
        let mut peak = f64::NEG_INFINITY;
        let mut worst = 0.0_f64;

        for &r in returns {
            equity *= 1.0 + r;
            if equity > peak {
                peak = equity;
            }
            let dd = (equity - peak) / peak;
            if dd < worst {
                worst = dd;
            }
        }

        -worst
    }
}
