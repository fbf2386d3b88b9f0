use boardshelf_core::{FilterField, ViewMode};
use leptos::prelude::*;

use crate::state::CatalogState;

#[component]
pub fn Toolbar(state: CatalogState) -> impl IntoView {
    let view_mode = move || state.filters.with(|f| f.view_mode());
    let search = move || {
        state
            .filters
            .with(|f| f.get(FilterField::Search).unwrap_or_default().to_string())
    };

    view! {
        <header class="toolbar">
            <div class="toolbar-left">
                <h1 class="app-title">"Boardshelf"</h1>
            </div>
            <div class="toolbar-center">
                <div class="search-box">
                    <input
                        type="text"
                        placeholder="Search games..."
                        prop:value=search
                        on:input=move |ev| state.set_search_debounced(event_target_value(&ev))
                    />
                    <Show when=move || !search().is_empty()>
                        <button
                            class="search-clear"
                            on:click=move |_| state.clear_search()
                            title="Clear search"
                        >
                            "×"
                        </button>
                    </Show>
                </div>
            </div>
            <div class="toolbar-right">
                <div class="view-toggle">
                    <button
                        class="view-btn"
                        class:active=move || view_mode() == ViewMode::Tile
                        on:click=move |_| state.mutate(|s| s.set_view_mode(ViewMode::Tile))
                        title="Tile View"
                    >
                        "Tiles"
                    </button>
                    <button
                        class="view-btn"
                        class:active=move || view_mode() == ViewMode::List
                        on:click=move |_| state.mutate(|s| s.set_view_mode(ViewMode::List))
                        title="List View"
                    >
                        "List"
                    </button>
                </div>
                <button
                    class="refresh-btn"
                    title="Re-import the collection"
                    disabled=move || state.refreshing.get()
                    on:click=move |_| state.refresh()
                >
                    {move || if state.refreshing.get() { "Refreshing..." } else { "Refresh" }}
                </button>
            </div>
            <Show when=move || state.notice.get().is_some()>
                <div class="notice" on:click=move |_| state.dismiss_notice()>
                    {move || state.notice.get().unwrap_or_default()}
                </div>
            </Show>
        </header>
    }
}
