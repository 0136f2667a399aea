//! Presentation helpers shared by the data layer and the HTTP handlers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

static LEADING_INT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid leading integer regex"));

/// Formats an amount in cents the way `en-US` USD currency formatting does:
/// `$1,234.56`, `-$0.50`.
pub fn format_currency(cents: i64) -> String {
    let negative = cents < 0;
    let abs = cents.unsigned_abs();
    let dollars = (abs / 100).to_string();
    let fraction = abs % 100;

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{:02}", if negative { "-" } else { "" }, grouped, fraction)
}

/// Parses the integer prefix of `input` (`"12abc"` -> 12, `" -7"` -> -7).
/// Returns `None` when there is no leading digit run or it overflows.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    LEADING_INT_RE
        .captures(input)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// One slot of a pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u64),
    Ellipsis,
}

impl Serialize for PageItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageItem::Page(n) => serializer.serialize_u64(*n),
            PageItem::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Builds the list of page links to show for `current_page` out of `total_pages`.
///
/// Up to 7 pages are listed in full. Past that, the first and last pages stay
/// visible and the gap around the current page collapses into an ellipsis.
pub fn generate_pagination(current_page: u64, total_pages: u64) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total_pages <= 7 {
        return (1..=total_pages).map(Page).collect();
    }

    if current_page <= 3 {
        return vec![Page(1), Page(2), Page(3), Ellipsis, Page(total_pages - 1), Page(total_pages)];
    }

    if current_page >= total_pages - 2 {
        return vec![
            Page(1),
            Page(2),
            Ellipsis,
            Page(total_pages - 2),
            Page(total_pages - 1),
            Page(total_pages),
        ];
    }

    vec![
        Page(1),
        Ellipsis,
        Page(current_page - 1),
        Page(current_page),
        Page(current_page + 1),
        Ellipsis,
        Page(total_pages),
    ]
}

/// Y axis for the revenue chart: labels in $1K steps from the rounded-up
/// maximum down to zero, plus that maximum.
pub fn generate_y_axis(revenue: &[i32]) -> (Vec<String>, i64) {
    let highest = revenue.iter().copied().max().unwrap_or(0).max(0) as i64;
    let top_label = (highest + 999) / 1000 * 1000;

    let labels = (0..=top_label / 1000)
        .rev()
        .map(|k| format!("${}K", k))
        .collect();

    (labels, top_label)
}
