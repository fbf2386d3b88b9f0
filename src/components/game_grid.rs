//! Tile and list views of the current results
//!
//! Each change of results, view mode or sort rebuilds the whole view from
//! `render`. Badge clicks feed back into the filter store.

use boardshelf_core::render::{Badge, ColumnHeader, ListRow, TileCard};
use boardshelf_core::{render, RenderedView};
use leptos::prelude::*;

use crate::state::CatalogState;

fn badges(state: CatalogState, badges: Vec<Badge>, class: &'static str) -> impl IntoView {
    badges
        .into_iter()
        .map(|badge| {
            let action = badge.action;
            view! {
                <button class=class on:click=move |_| state.apply_badge(action.clone())>
                    {badge.label}
                </button>
            }
        })
        .collect_view()
}

fn tile(state: CatalogState, card: TileCard) -> impl IntoView {
    let summary = card.summary;
    let meta = summary.meta_line();
    let rating = summary.rating_line();
    let image = match summary.image_url {
        Some(url) => view! { <img src=url alt=summary.name.clone() loading="lazy" /> }.into_any(),
        None => {
            let initial = summary.name.chars().next().unwrap_or('?').to_string();
            view! { <div class="game-cover-placeholder">{initial}</div> }.into_any()
        }
    };

    view! {
        <div class="game-card">
            <div class="game-cover">{image}</div>
            <div class="game-info">
                <div class="game-title" title=summary.name.clone()>{summary.name.clone()}</div>
                <div class="game-meta">{meta}</div>
                <div class="game-rating">{rating}</div>
                <div class="badges">{badges(state, card.badges, "badge mechanic")}</div>
            </div>
        </div>
    }
}

fn header(state: CatalogState, header: ColumnHeader) -> impl IntoView {
    let column = header.column;
    view! {
        <th
            class="sortable"
            aria-sort=header.indicator.aria()
            on:click=move |_| state.mutate(|s| s.activate_column(column))
        >
            {header.label()}
            <span class="sort-indicator">{header.indicator.symbol()}</span>
        </th>
    }
}

fn row(state: CatalogState, row: ListRow) -> impl IntoView {
    let s = row.summary;
    view! {
        <tr>
            <td class="col-name">{s.name}</td>
            <td>{s.year}</td>
            <td>{s.players}</td>
            <td>{s.playing_time}</td>
            <td>{s.weight}</td>
            <td>{s.avg_rating}</td>
            <td>{s.bayes_rating}</td>
            <td>{s.my_rating}</td>
            <td class="badges">{badges(state, row.mechanics, "badge mechanic")}</td>
            <td class="badges">{badges(state, row.categories, "badge category")}</td>
        </tr>
    }
}

fn view_of(state: CatalogState, rendered: RenderedView) -> impl IntoView {
    match rendered {
        RenderedView::Tiles(cards) => view! {
            <div class="game-grid">
                {cards.into_iter().map(|card| tile(state, card)).collect_view()}
            </div>
        }
        .into_any(),
        RenderedView::Table { headers, rows } => view! {
            <table class="game-table">
                <thead>
                    <tr>
                        {headers.into_iter().map(|h| header(state, h)).collect_view()}
                        <th>"Mechanics"</th>
                        <th>"Categories"</th>
                    </tr>
                </thead>
                <tbody>
                    {rows.into_iter().map(|r| row(state, r)).collect_view()}
                </tbody>
            </table>
        }
        .into_any(),
    }
}

#[component]
pub fn GameGrid(state: CatalogState) -> impl IntoView {
    let rendered = Memo::new(move |_| {
        let games = state.games.get();
        state.filters.with(|f| render(&games, f.view_mode(), f.sort_column(), f.sort_direction()))
    });

    view! {
        <main class="game-area">
            <div class="stats">{move || rendered.with(|r| r.stats_line())}</div>
            <Show
                when=move || rendered.with(|r| !r.is_empty())
                fallback=|| view! { <div class="empty-state">"No games match these filters"</div> }
            >
                {move || view_of(state, rendered.get())}
            </Show>
        </main>
    }
}
