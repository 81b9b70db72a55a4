//! Report formatting
//!
//! Pure mapping from a daily snapshot to the message posted to the
//! webhook. Deterministic given identical input, which the golden tests
//! below rely on. Each metric line shows the absolute value plus a
//! signed day-over-day change, or a neutral `n/a` placeholder when no
//! baseline day exists.

use rust_decimal::Decimal;

use crate::config::ReportSettings;
use crate::delta::DailySnapshot;
use crate::ledger::PRICE_SCALE;

/// Render the daily report message.
pub fn format_report(snapshot: &DailySnapshot, settings: &ReportSettings) -> String {
    let obs = &snapshot.observation;
    let posted_at = format!("{} {:02}:00", obs.date.format("%Y-%m-%d"), settings.post_hour);

    let mut message = format!(
        "\u{25c6} {} ({})\n\
         Members: {} (day change {})\n\
         Price: {} (day change {})\n\
         Stock: {} (day change {})\n",
        settings.title,
        posted_at,
        group_thousands(obs.members),
        format_count_delta(snapshot.deltas.members),
        format_price(obs.price),
        format_price_delta(snapshot.deltas.price),
        group_thousands(obs.stock),
        format_count_delta(snapshot.deltas.stock),
    );

    if let Some(tags) = &settings.tag_line {
        message.push_str(tags);
        message.push('\n');
    }
    message
}

fn format_price(price: Decimal) -> String {
    format!("{:.prec$}", price, prec = PRICE_SCALE as usize)
}

fn format_count_delta(delta: Option<i64>) -> String {
    match delta {
        Some(d) if d < 0 => format!("-{}", group_thousands(d.unsigned_abs())),
        Some(d) => format!("+{}", group_thousands(d as u64)),
        None => "n/a".to_string(),
    }
}

fn format_price_delta(delta: Option<Decimal>) -> String {
    match delta {
        Some(d) if d.is_sign_negative() && !d.is_zero() => format_price(d),
        Some(d) => format!("+{}", format_price(d)),
        None => "n/a".to_string(),
    }
}

/// Group a count with comma separators (22300 -> "22,300").
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
