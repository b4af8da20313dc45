//! Fiscal-year aggregation of the capital contribution ledger

use super::fiscal::FiscalYear;
use crate::error::ReportError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single capital contribution ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CashFlowRow {
    pub date: NaiveDate,
    pub amount_added: Decimal,
    pub amount_withdrawn: Decimal,
}

impl CashFlowRow {
    pub fn new(date: NaiveDate, amount_added: Decimal, amount_withdrawn: Decimal) -> Self {
        CashFlowRow {
            date,
            amount_added,
            amount_withdrawn,
        }
    }

    /// Rows with nothing added and nothing withdrawn carry no activity
    pub fn is_empty(&self) -> bool {
        self.amount_added.is_zero() && self.amount_withdrawn.is_zero()
    }
}

/// Net flows for one fiscal year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct FiscalYearBucket {
    pub fiscal_year: FiscalYear,
    pub label: String,
    /// Latest ledger date within the fiscal year
    pub representative_date: NaiveDate,
    pub net_amount: Decimal,
    /// Running total of `net_amount` up to and including this bucket
    pub cumulative_total: Decimal,
}

/// Latest row of the valuation sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ValuationPoint {
    pub date: NaiveDate,
    pub portfolio_value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "kind")]
pub enum PointKind {
    /// Cumulative capital after a fiscal year's net flow
    Flow { net: Decimal },
    /// Terminal portfolio valuation
    Valuation,
}

/// One point of the performance chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct SeriesPoint {
    /// X-axis label: fiscal-year label, or the calendar date for the valuation
    pub label: String,
    pub date: NaiveDate,
    pub value: Decimal,
    #[serde(flatten)]
    pub kind: PointKind,
}

/// Cumulative fiscal-year series terminated by the latest valuation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct PerformanceSeries {
    pub points: Vec<SeriesPoint>,
}

impl PerformanceSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn terminal(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }
}

#[derive(Debug)]
struct BucketAccumulator {
    max_date: NaiveDate,
    added: Decimal,
    withdrawn: Decimal,
}

/// Group ledger rows into fiscal-year buckets.
///
/// Rows with no activity are ignored, buckets that net to zero are dropped,
/// and the remainder is ordered by representative date with a running
/// cumulative total. Totals too large for a `Decimal` are an error.
pub fn aggregate_fiscal_years(rows: &[CashFlowRow]) -> Result<Vec<FiscalYearBucket>, ReportError> {
    let mut groups: BTreeMap<FiscalYear, BucketAccumulator> = BTreeMap::new();

    for row in rows.iter().filter(|r| !r.is_empty()) {
        let fiscal_year = FiscalYear::from_date(row.date);
        let acc = groups.entry(fiscal_year).or_insert(BucketAccumulator {
            max_date: row.date,
            added: Decimal::ZERO,
            withdrawn: Decimal::ZERO,
        });
        acc.max_date = acc.max_date.max(row.date);
        acc.added = acc
            .added
            .checked_add(row.amount_added)
            .ok_or_else(|| overflow(fiscal_year.label()))?;
        acc.withdrawn = acc
            .withdrawn
            .checked_add(row.amount_withdrawn)
            .ok_or_else(|| overflow(fiscal_year.label()))?;
    }

    let mut buckets = Vec::with_capacity(groups.len());
    for (fiscal_year, acc) in groups {
        let net_amount = acc
            .added
            .checked_sub(acc.withdrawn)
            .ok_or_else(|| overflow(fiscal_year.label()))?;
        if net_amount.is_zero() {
            log::debug!("Dropping {} with zero net flow", fiscal_year);
            continue;
        }
        buckets.push(FiscalYearBucket {
            fiscal_year,
            label: fiscal_year.label(),
            representative_date: acc.max_date,
            net_amount,
            cumulative_total: Decimal::ZERO,
        });
    }

    buckets.sort_by_key(|b| b.representative_date);

    let mut running = Decimal::ZERO;
    for bucket in &mut buckets {
        running = running
            .checked_add(bucket.net_amount)
            .ok_or_else(|| overflow(bucket.label.clone()))?;
        bucket.cumulative_total = running;
        log::debug!(
            "{}: net {} cumulative {} (as of {})",
            bucket.label,
            bucket.net_amount,
            bucket.cumulative_total,
            bucket.representative_date
        );
    }

    Ok(buckets)
}

fn overflow(period: String) -> ReportError {
    ReportError::AmountOverflow { period }
}

/// Build the chart series: one point per bucket, then the valuation point.
///
/// The valuation contributes its raw portfolio value, not a netted flow. With
/// no buckets the series is the single valuation point.
pub fn build_series(buckets: &[FiscalYearBucket], valuation: &ValuationPoint) -> PerformanceSeries {
    let mut points: Vec<SeriesPoint> = buckets
        .iter()
        .map(|b| SeriesPoint {
            label: b.label.clone(),
            date: b.representative_date,
            value: b.cumulative_total,
            kind: PointKind::Flow { net: b.net_amount },
        })
        .collect();

    points.push(SeriesPoint {
        label: valuation.date.format("%d %b %Y").to_string(),
        date: valuation.date,
        value: valuation.portfolio_value,
        kind: PointKind::Valuation,
    });

    PerformanceSeries { points }
}
