use rust_decimal::{Decimal, RoundingStrategy};

/// `Rp 1,000,000,000`: whole rupiah, comma grouped, ties rounded to even.
/// Display only; callers keep the exact amount.
pub fn format_rupiah(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    let digits = rounded.abs().trunc().to_string();
    format!("Rp {}{}", sign, group_thousands(&digits))
}

/// `25.00%`
pub fn format_pct(pct: Decimal) -> String {
    let mut rounded = pct.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.rescale(2);
    format!("{}%", rounded)
}

/// Short bar label for narrow terminals: `1.0M` (miliar), `250.0jt` (juta),
/// `12.5rb` (ribu).
pub fn compact_rupiah(amount: Decimal) -> String {
    const STEPS: [(i64, &str); 4] = [
        (1_000_000_000_000, "T"),
        (1_000_000_000, "M"),
        (1_000_000, "jt"),
        (1_000, "rb"),
    ];
    for (size, suffix) in STEPS {
        let size = Decimal::from(size);
        if amount.abs() >= size {
            let mut scaled = (amount / size).round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven);
            scaled.rescale(1);
            return format!("{}{}", scaled, suffix);
        }
    }
    amount.round_dp(0).to_string()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
