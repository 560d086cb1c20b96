//! Deterministic share text for one user's picks, percent-encoded for a
//! tweet-intent link.

use super::PickValuation;

/// Share text in its three forms: the plain message, the percent-encoded
/// query value, and the full tweet-intent link.
#[derive(Debug, Clone)]
pub struct ShareText {
    pub plain: String,
    pub encoded: String,
    pub tweet_url: String,
}

/// Build the share text for a user's valued picks. One line per pick,
/// `<mint> => <signed amount>`, then the summed total.
pub fn build_share_text(username: &str, chat_id: i64, picks: &[PickValuation]) -> ShareText {
    let mut lines = Vec::with_capacity(picks.len());
    let mut total_pnl = 0.0;

    for pick in picks {
        total_pnl += pick.pnl;
        lines.push(format!(
            "{} => {}",
            pick.position.mint_address,
            format_signed_usd(pick.pnl)
        ));
    }

    let plain = format!(
        "{}'s Picks (Chat {}):\n\n{}\n\nTotal PnL: {}\nShared via #SnipeChecksBot",
        username,
        chat_id,
        lines.join("\n"),
        format_signed_usd(total_pnl),
    );

    let encoded = urlencoding::encode(&plain).into_owned();
    let tweet_url = format!("https://twitter.com/intent/tweet?text={}", encoded);

    ShareText {
        plain,
        encoded,
        tweet_url,
    }
}

/// Render a USD amount with an explicit sign, thousands separators and two
/// decimals, e.g. `+$1,234.50` / `-$0.75`.
pub fn format_signed_usd(amount: f64) -> String {
    let sign = if amount >= 0.0 { '+' } else { '-' };
    format!("{}${}", sign, format_grouped(amount.abs()))
}

/// Unsigned USD amount with thousands separators, two decimals.
pub fn format_grouped(amount: f64) -> String {
    let rendered = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some(parts) => parts,
        None => (rendered.as_str(), "00"),
    };

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (i, b) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*b as char);
    }

    format!("{}.{}", grouped, frac_part)
}
