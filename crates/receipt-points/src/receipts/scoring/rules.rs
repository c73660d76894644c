use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::warn;

use super::super::domain::{Item, Receipt};
use super::{RuleObserver, ScoreBreakdown, ScoreComponent, ScoreError, ScoringRule};

const ROUND_DOLLAR_POINTS: u64 = 50;
const QUARTER_MULTIPLE_POINTS: u64 = 25;
const ITEM_PAIR_POINTS: u64 = 5;
const ODD_DAY_POINTS: u64 = 6;
const AFTERNOON_POINTS: u64 = 10;
const AFTERNOON_HOURS: std::ops::Range<u32> = 14..16;
const MAX_DECIMAL_DIGITS: usize = 28;

pub(crate) fn score_receipt(
    receipt: &Receipt,
    observer: &mut dyn RuleObserver,
) -> Result<ScoreBreakdown, ScoreError> {
    let mut components = Vec::with_capacity(ScoringRule::ordered().len());
    let mut record = |component: ScoreComponent| {
        observer.observe(&component);
        components.push(component);
    };

    record(retailer_name(&receipt.retailer));

    let total = TotalAmount::parse(&receipt.total).ok_or_else(|| ScoreError::InvalidTotal {
        total: receipt.total.clone(),
    })?;
    record(round_dollar_total(&total));
    record(quarter_multiple_total(&total));

    record(item_pairs(&receipt.items));
    record(item_descriptions(&receipt.items));
    record(odd_purchase_day(&receipt.purchase_date));
    record(afternoon_purchase(&receipt.purchase_time));

    let total = components
        .iter()
        .fold(0u64, |sum, component| sum.saturating_add(component.points));

    Ok(ScoreBreakdown { components, total })
}

/// Split plain decimal notation (`[+-]digits[.digits]`) into integer and
/// fractional digits. Exponents, separators and whitespace are rejected.
fn split_decimal(raw: &str) -> Option<(&str, &str)> {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let digits_only = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
    let well_formed = !(integer.is_empty() && fraction.is_empty())
        && digits_only(integer)
        && digits_only(fraction);
    well_formed.then_some((integer, fraction))
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    split_decimal(raw)?;
    Decimal::from_str(raw).ok()
}

/// Receipt total reduced to what the total rules read: its fractional digits.
///
/// Works from the digits directly, so totals wider than `Decimal` still score.
#[derive(Debug)]
struct TotalAmount<'a> {
    raw: &'a str,
    fraction: &'a str,
}

impl<'a> TotalAmount<'a> {
    fn parse(raw: &'a str) -> Option<Self> {
        let (_, fraction) = split_decimal(raw)?;
        Some(Self { raw, fraction })
    }

    fn is_whole(&self) -> bool {
        self.fraction.bytes().all(|byte| byte == b'0')
    }

    /// Cents past the dollar, truncated toward zero.
    fn cents(&self) -> u32 {
        self.fraction
            .bytes()
            .chain(std::iter::repeat(b'0'))
            .take(2)
            .fold(0, |cents, digit| cents * 10 + u32::from(digit - b'0'))
    }
}

fn retailer_name(retailer: &str) -> ScoreComponent {
    let count = retailer.chars().filter(char::is_ascii_alphanumeric).count() as u64;
    ScoreComponent {
        rule: ScoringRule::RetailerName,
        points: count,
        notes: format!("retailer '{retailer}' has {count} alphanumeric characters"),
    }
}

fn round_dollar_total(total: &TotalAmount<'_>) -> ScoreComponent {
    let raw = total.raw;
    if total.is_whole() {
        ScoreComponent {
            rule: ScoringRule::RoundDollarTotal,
            points: ROUND_DOLLAR_POINTS,
            notes: format!("total {raw} is a round dollar amount"),
        }
    } else {
        ScoreComponent {
            rule: ScoringRule::RoundDollarTotal,
            points: 0,
            notes: format!("total {raw} has cents"),
        }
    }
}

fn quarter_multiple_total(total: &TotalAmount<'_>) -> ScoreComponent {
    // Whole dollars are always 100 cents, a multiple of 25, so only the
    // cents past the dollar decide the rule.
    let raw = total.raw;
    if total.cents() % 25 == 0 {
        ScoreComponent {
            rule: ScoringRule::QuarterMultipleTotal,
            points: QUARTER_MULTIPLE_POINTS,
            notes: format!("total {raw} is a multiple of 0.25"),
        }
    } else {
        ScoreComponent {
            rule: ScoringRule::QuarterMultipleTotal,
            points: 0,
            notes: format!("total {raw} is not a multiple of 0.25"),
        }
    }
}

fn item_pairs(items: &[Item]) -> ScoreComponent {
    let pairs = (items.len() / 2) as u64;
    ScoreComponent {
        rule: ScoringRule::ItemPairs,
        points: pairs * ITEM_PAIR_POINTS,
        notes: format!("{} items form {pairs} pair(s)", items.len()),
    }
}

fn item_descriptions(items: &[Item]) -> ScoreComponent {
    let mut points: u64 = 0;
    let mut qualifying = 0usize;

    for (index, item) in items.iter().enumerate() {
        let description = item.short_description.trim();
        if description.len() % 3 != 0 {
            continue;
        }
        match description_bonus(&item.price) {
            Some(bonus) => {
                qualifying += 1;
                points = points.saturating_add(bonus);
            }
            None => warn!(
                item = index,
                description,
                price = %item.price,
                "item price is not a decimal amount; item earns no description bonus"
            ),
        }
    }

    ScoreComponent {
        rule: ScoringRule::ItemDescriptions,
        points,
        notes: format!("{qualifying} item(s) with description length divisible by 3"),
    }
}

/// `ceil(price * 0.2)`, floored at zero for negative prices.
fn description_bonus(raw_price: &str) -> Option<u64> {
    let (integer, _) = split_decimal(raw_price)?;
    let Some(price) = parse_amount(raw_price) else {
        // Well formed but wider than `Decimal`: far beyond any u64 bonus.
        if integer.len() <= MAX_DECIMAL_DIGITS {
            return None;
        }
        return Some(if raw_price.starts_with('-') { 0 } else { u64::MAX });
    };
    let bonus = price.checked_mul(Decimal::new(2, 1))?.ceil();
    if bonus.is_sign_negative() {
        return Some(0);
    }
    Some(bonus.to_u64().unwrap_or(u64::MAX))
}

/// `YYYY-MM-DD` with zero padded month and day.
fn parse_purchase_date(raw: &str) -> Result<NaiveDate, String> {
    let bytes = raw.as_bytes();
    let padded = bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !padded {
        return Err("expected zero padded YYYY-MM-DD".to_string());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|err| err.to_string())
}

/// 24-hour `H:MM` or `HH:MM`; minutes are always two digits.
fn parse_purchase_time(raw: &str) -> Result<NaiveTime, String> {
    let digits = |part: &str, widths: std::ops::RangeInclusive<usize>| {
        widths.contains(&part.len()) && part.bytes().all(|byte| byte.is_ascii_digit())
    };
    match raw.split_once(':') {
        Some((hour, minute)) if digits(hour, 1..=2) && digits(minute, 2..=2) => {
            NaiveTime::parse_from_str(raw, "%H:%M").map_err(|err| err.to_string())
        }
        _ => Err("expected HH:MM".to_string()),
    }
}

fn odd_purchase_day(raw: &str) -> ScoreComponent {
    let (points, notes) = match parse_purchase_date(raw) {
        Ok(date) if date.day() % 2 == 1 => (ODD_DAY_POINTS, format!("{date} falls on an odd day")),
        Ok(date) => (0, format!("{date} falls on an even day")),
        Err(err) => {
            warn!(purchase_date = raw, error = %err, "purchase date is not YYYY-MM-DD");
            (0, format!("purchase date '{raw}' could not be parsed"))
        }
    };
    ScoreComponent {
        rule: ScoringRule::OddPurchaseDay,
        points,
        notes,
    }
}

fn afternoon_purchase(raw: &str) -> ScoreComponent {
    let (points, notes) = match parse_purchase_time(raw) {
        Ok(time) if AFTERNOON_HOURS.contains(&time.hour()) => (
            AFTERNOON_POINTS,
            format!("{raw} is between 2:00 PM and 4:00 PM"),
        ),
        Ok(_) => (0, format!("{raw} is outside 2:00 PM to 4:00 PM")),
        Err(err) => {
            warn!(purchase_time = raw, error = %err, "purchase time is not HH:MM");
            (0, format!("purchase time '{raw}' could not be parsed"))
        }
    };
    ScoreComponent {
        rule: ScoringRule::AfternoonPurchase,
        points,
        notes,
    }
}
