//! Plain-text rendering of view models

use boardshelf_core::facets::{ranked, tag_cloud};
use boardshelf_core::render::{Badge, ColumnHeader, GameSummary, ListRow, TileCard};
use boardshelf_core::{FacetCatalog, FacetKind, FilterState, RenderedView, SortColumn};

const NAME_WIDTH: usize = 32;
const CELL_WIDTH: usize = 10;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let fill = width.saturating_sub(text.chars().count());
    format!("{}{}", text, " ".repeat(fill))
}

fn badges(list: &[Badge]) -> String {
    list.iter().map(|b| format!("[{}]", b.label)).collect::<Vec<_>>().join(" ")
}

fn tile(card: &TileCard) -> String {
    let mut lines = vec![
        card.summary.name.clone(),
        format!("  {}", card.summary.meta_line()),
        format!("  {}", card.summary.rating_line()),
    ];
    if !card.badges.is_empty() {
        lines.push(format!("  {}", badges(&card.badges)));
    }
    lines.join("\n")
}

fn cell(summary: &GameSummary, column: SortColumn) -> &str {
    match column {
        SortColumn::Name => &summary.name,
        SortColumn::Year => &summary.year,
        SortColumn::Players => &summary.players,
        SortColumn::PlayingTime => &summary.playing_time,
        SortColumn::Weight => &summary.weight,
        SortColumn::AvgRating => &summary.avg_rating,
        SortColumn::BayesRating => &summary.bayes_rating,
        SortColumn::MyRating => &summary.my_rating,
    }
}

fn width(column: SortColumn) -> usize {
    if column == SortColumn::Name { NAME_WIDTH } else { CELL_WIDTH }
}

fn header_line(headers: &[ColumnHeader]) -> String {
    headers
        .iter()
        .map(|h| {
            let label = format!("{} {}", h.label(), h.indicator.symbol());
            pad(label.trim_end(), width(h.column))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn row(headers: &[ColumnHeader], row: &ListRow) -> String {
    let cells = headers
        .iter()
        .map(|h| pad(cell(&row.summary, h.column), width(h.column)))
        .collect::<Vec<_>>()
        .join(" ");
    let mut lines = vec![cells.trim_end().to_string()];
    if !row.mechanics.is_empty() {
        lines.push(format!("    mechanics:  {}", badges(&row.mechanics)));
    }
    if !row.categories.is_empty() {
        lines.push(format!("    categories: {}", badges(&row.categories)));
    }
    lines.join("\n")
}

/// Full text for a rendered view, ending with the stats line
pub fn view(rendered: &RenderedView) -> String {
    let mut out = match rendered {
        RenderedView::Tiles(cards) => cards.iter().map(tile).collect::<Vec<_>>().join("\n\n"),
        RenderedView::Table { headers, rows } => {
            let mut lines = vec![header_line(headers)];
            lines.extend(rows.iter().map(|r| row(headers, r)));
            lines.join("\n")
        }
    };
    if !out.is_empty() {
        out.push_str("\n\n");
    }
    out.push_str(&rendered.stats_line());
    out
}

pub fn summary(state: &FilterState) -> String {
    let pairs = state.summary();
    if pairs.is_empty() {
        return "No filters".to_string();
    }
    pairs.iter().map(|(k, v)| format!("{}: {}", k, v)).collect::<Vec<_>>().join("\n")
}

/// Ranked values for one facet, or every facet plus the distributions
pub fn facets(catalog: &FacetCatalog, kind: Option<FacetKind>, limit: usize) -> String {
    let mut sections = Vec::new();
    let kinds: Vec<FacetKind> = kind.map(|k| vec![k]).unwrap_or_else(|| FacetKind::ALL.to_vec());

    for kind in kinds {
        let lines: Vec<String> = if kind == FacetKind::Mechanics {
            tag_cloud(catalog.get(kind))
                .into_iter()
                .take(limit)
                .map(|t| format!("  {:40} {:>5}  x{:.2}", t.name, t.count, t.scale))
                .collect()
        } else {
            ranked(catalog.get(kind))
                .into_iter()
                .take(limit)
                .map(|r| format!("  {:40} {:>5}", r.name, r.count))
                .collect()
        };
        sections.push(format!("{}:\n{}", kind.label(), lines.join("\n")));
    }

    if kind.is_none() {
        for (label, values) in catalog.distributions() {
            if values.is_empty() {
                continue;
            }
            let lines: Vec<String> = ranked(values)
                .into_iter()
                .map(|r| format!("  {:40} {:>5}", r.name, r.count))
                .collect();
            sections.push(format!("{}:\n{}", label, lines.join("\n")));
        }
    }

    sections.join("\n\n")
}
