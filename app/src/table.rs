// In app/src/table.rs

use std::fmt::Write;

use core_types::Column;
use engine::RankedView;
use engine::view::format_compact;

/// Renders a ranked view as a plain-text table for the terminal.
pub fn render(view: &RankedView) -> String {
    let mut out = String::new();

    if let Some(ts) = view.timestamp {
        let _ = writeln!(out, "Last update: {}", ts.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    let header = |column: Column| format!("{}{}", column.header(), view.sort.arrow_for(column));
    let _ = writeln!(
        out,
        "{:<2} {:<18} {:<8} {:>12} {:>12} {:>12} {:>9} {:<16} {}",
        "",
        header(Column::Name),
        header(Column::Symbol),
        header(Column::Price),
        header(Column::MarketCap),
        header(Column::Volume),
        header(Column::Pct24h),
        header(Column::Signal),
        header(Column::TrendPct),
    );

    for row in &view.rows {
        let asset = &row.asset;
        let trend = match asset.first_7d {
            Some(first) => format!("{:.2} → {:.2} ({:+.2}%)", first, asset.price, asset.trend_pct),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<2} {:<18} {:<8} {:>12} {:>12} {:>12} {:>9} {:<16} {}",
            if row.is_watched { "*" } else { "" },
            asset.name,
            asset.symbol,
            format!("${}", format_compact(asset.price)),
            format!("${}", format_compact(asset.market_cap)),
            format_compact(asset.volume),
            format!("{:.2}%", asset.pct24h),
            asset.signal.label(),
            trend,
        );
    }

    out
}
