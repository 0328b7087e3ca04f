use chefdeck_shared::Ingredient;
use fraction::GenericFraction;

const MAX_DENOMINATOR: u64 = 10_000;
const FALLBACK_DENOMINATOR: u64 = 1_000_000_000_000;
const TOLERANCE: f64 = 1e-12;

/// Format an ingredient amount as a mixed fraction for display
///
/// Formats:
/// - Zero: 0 → "" (the quantity is omitted)
/// - Whole numbers: 2 → "2"
/// - Mixed fractions: 1.5 → "1 1/2"
/// - Pure fractions: 0.5 → "1/2"
///
/// Amounts whose fractional part has no denominator up to 10 000 fall back to
/// a denominator of 10^12 without reduction. Non-finite input gives "".
pub fn format_fraction(amount: f64) -> String {
    if !amount.is_finite() || amount == 0.0 {
        return String::new();
    }

    let whole = amount.floor();
    let decimal = round_12(amount - whole);

    if decimal == 0.0 {
        return format!("{whole}");
    }

    let (numerator, denominator) = to_fraction(decimal);

    if whole == 0.0 && numerator == denominator {
        format!("1/{denominator}")
    } else if whole > 0.0 {
        format!("{whole} {numerator}/{denominator}")
    } else {
        format!("{numerator}/{denominator}")
    }
}

/// Render an ingredient as one grocery line: "1 1/2 cup flour", "3 eggs".
///
/// A zero amount and the `count` unit are left out.
pub fn ingredient_line(ingredient: &Ingredient) -> String {
    let amount = format_fraction(ingredient.amount);
    let unit = if ingredient.is_count() {
        ""
    } else {
        ingredient.unit.trim()
    };

    [amount.as_str(), unit, ingredient.name.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn round_12(value: f64) -> f64 {
    (value * 1e12).round() / 1e12
}

fn to_fraction(decimal: f64) -> (u64, u64) {
    for multiplier in 1..=MAX_DENOMINATOR {
        let scaled = decimal * multiplier as f64;

        if (scaled - scaled.round()).abs() < TOLERANCE {
            let numerator = scaled.round().abs() as u64;
            let reduced = GenericFraction::<u64>::new(numerator, multiplier);

            return match (reduced.numer(), reduced.denom()) {
                (Some(numerator), Some(denominator)) => (*numerator, *denominator),
                _ => (numerator, multiplier),
            };
        }
    }

    ((decimal * FALLBACK_DENOMINATOR as f64).round().abs() as u64, FALLBACK_DENOMINATOR)
}
