use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::rc::Rc;

use coin_dashboard_core::errors::CoreError;
use coin_dashboard_core::models::preferences::Theme;
use coin_dashboard_core::models::row::RowViewModel;
use coin_dashboard_core::models::sort::{SortColumn, SortState};
use coin_dashboard_core::services::chart_service::{surface_for, ChartBackend, ChartHandle};
use coin_dashboard_core::services::render_service::RenderSink;

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// What the terminal currently shows: rows from the sink, sparklines from
/// the chart backend. Both write into the same screen.
#[derive(Debug, Default)]
pub struct Screen {
    rows: Vec<RowViewModel>,
    sort: SortState,
    theme: Theme,
    /// surface → rendered sparkline
    sparklines: HashMap<String, String>,
    /// live handle → surface it draws on
    handles: HashMap<ChartHandle, String>,
    next_handle: u64,
}

pub type SharedScreen = Rc<RefCell<Screen>>;

impl Screen {
    pub fn shared() -> SharedScreen {
        Rc::new(RefCell::new(Screen::default()))
    }

    /// Render the table as text.
    pub fn draw(&self) -> String {
        let mut out = String::new();
        let header = |column: SortColumn, label: &str| -> String {
            match self.sort.indicator(column) {
                Some(arrow) => format!("{label} {arrow}"),
                None => label.to_string(),
            }
        };
        let _ = writeln!(
            out,
            "{:>5}  {:<28} {:>18} {:>9} {:>22} {:>22}  7d",
            header(SortColumn::Rank, "#"),
            header(SortColumn::Name, "Name"),
            header(SortColumn::Price, "Price"),
            header(SortColumn::Change, "24h"),
            header(SortColumn::Volume, "Volume"),
            header(SortColumn::MarketCap, "Market Cap"),
        );

        let (up, down) = match self.theme {
            Theme::Dark => ("\x1b[92m", "\x1b[91m"),
            Theme::Light => ("\x1b[32m", "\x1b[31m"),
        };
        for row in &self.rows {
            let star = if row.is_favorited { "★" } else { "☆" };
            let name = format!("{} ({}) {star}", row.name, row.symbol);
            let color = if row.change_is_positive { up } else { down };
            let sparkline = self
                .sparklines
                .get(&surface_for(&row.id))
                .map(String::as_str)
                .unwrap_or("");
            let _ = writeln!(
                out,
                "{:>5}  {:<28} {:>18} {color}{:>9}\x1b[0m {:>22} {:>22}  {sparkline}",
                row.rank,
                name,
                row.price_display,
                row.change_display,
                row.volume_display,
                row.market_cap_display,
            );
        }
        if self.rows.is_empty() {
            out.push_str("  (no assets match)\n");
        }
        out
    }
}

/// [`RenderSink`] that replaces the screen's rows on every render.
pub struct TableSink {
    screen: SharedScreen,
}

impl TableSink {
    pub fn new(screen: SharedScreen) -> Self {
        Self { screen }
    }
}

impl RenderSink for TableSink {
    fn render(&mut self, rows: &[RowViewModel], sort: &SortState) {
        let mut screen = self.screen.borrow_mut();
        screen.rows = rows.to_vec();
        screen.sort = *sort;
    }

    fn apply_theme(&mut self, theme: Theme) {
        self.screen.borrow_mut().theme = theme;
    }
}

/// [`ChartBackend`] drawing block-character sparklines.
pub struct SparklineBackend {
    screen: SharedScreen,
    width: usize,
}

impl SparklineBackend {
    pub fn new(screen: SharedScreen, width: usize) -> Self {
        Self {
            screen,
            width: width.max(1),
        }
    }
}

impl ChartBackend for SparklineBackend {
    fn create_chart(&mut self, surface: &str, samples: &[f64]) -> Result<ChartHandle, CoreError> {
        if samples.is_empty() {
            return Err(CoreError::Resource {
                asset: surface.trim_start_matches("sparkline-").to_string(),
                message: "no trend samples to draw".into(),
            });
        }
        let mut screen = self.screen.borrow_mut();
        if screen.sparklines.contains_key(surface) {
            return Err(CoreError::Resource {
                asset: surface.trim_start_matches("sparkline-").to_string(),
                message: format!("surface {surface} is still owned by another chart"),
            });
        }

        screen.next_handle += 1;
        let handle = ChartHandle(screen.next_handle);
        screen
            .sparklines
            .insert(surface.to_string(), sparkline(samples, self.width));
        screen.handles.insert(handle, surface.to_string());
        Ok(handle)
    }

    fn dispose(&mut self, handle: ChartHandle) {
        let mut screen = self.screen.borrow_mut();
        if let Some(surface) = screen.handles.remove(&handle) {
            screen.sparklines.remove(&surface);
        }
    }
}

/// Downsample to `width` buckets (bucket mean) and map onto eight block levels.
fn sparkline(samples: &[f64], width: usize) -> String {
    let buckets: Vec<f64> = if samples.len() <= width {
        samples.to_vec()
    } else {
        (0..width)
            .map(|i| {
                let start = i * samples.len() / width;
                let end = ((i + 1) * samples.len() / width).max(start + 1);
                let slice = &samples[start..end];
                slice.iter().sum::<f64>() / slice.len() as f64
            })
            .collect()
    };

    let min = buckets.iter().copied().fold(f64::INFINITY, f64::min);
    let max = buckets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    buckets
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                BLOCKS[BLOCKS.len() / 2]
            } else {
                let level = ((v - min) / span * (BLOCKS.len() - 1) as f64).round() as usize;
                BLOCKS[level.min(BLOCKS.len() - 1)]
            }
        })
        .collect()
}
