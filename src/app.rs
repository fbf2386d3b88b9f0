use leptos::prelude::*;

use crate::components::{GameGrid, Sidebar, Toolbar};
use crate::state::CatalogState;

const BUILD_HASH: &str = env!("BUILD_HASH");
const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");

#[component]
pub fn App() -> impl IntoView {
    let state = CatalogState::new();
    state.start();

    view! {
        <div class="app-container">
            <Toolbar state=state />
            <div class="main-content">
                <Sidebar state=state />
                <GameGrid state=state />
            </div>
            <footer class="app-footer">
                {format!("Boardshelf {} ({})", BUILD_HASH, BUILD_TIMESTAMP)}
            </footer>
        </div>
    }
}
