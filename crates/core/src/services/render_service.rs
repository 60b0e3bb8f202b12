use crate::models::preferences::Theme;
use crate::models::row::RowViewModel;
use crate::models::sort::SortState;

/// Front-end that materializes the table.
///
/// `render` is always called with the complete, ordered row set and must
/// fully replace whatever was drawn before, so calling it twice with the
/// same arguments leaves the same table. `sort` is passed along so header
/// indicators can be redrawn from [`SortState::indicator`].
pub trait RenderSink {
    fn render(&mut self, rows: &[RowViewModel], sort: &SortState);

    /// Switch the color scheme. Rows are not re-rendered for a theme change.
    fn apply_theme(&mut self, _theme: Theme) {}
}
