mod game_grid;
mod sidebar;
mod toolbar;

pub use game_grid::GameGrid;
pub use sidebar::Sidebar;
pub use toolbar::Toolbar;
