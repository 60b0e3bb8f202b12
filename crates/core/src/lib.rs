pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::Utc;
use models::{
    asset::AssetRecord,
    command::{Command, Outcome},
    dataset::DatasetCache,
    favorites::FavoriteSet,
    filter::FilterState,
    preferences::{Preferences, Theme},
    row::RowViewModel,
    settings::DashboardSettings,
    sort::{SortColumn, SortState},
};
use providers::{coingecko::CoinGeckoProvider, traits::MarketDataProvider};
use services::{
    chart_service::{ChartBackend, ChartResourceManager, SyncReport},
    render_service::RenderSink,
    row_service::RowService,
    view_service::{project, ViewStateEngine},
};
use storage::{backend::PreferenceBackend, preference_store::PreferenceStore};

use errors::CoreError;

/// Main entry point for the Coin Dashboard core library.
///
/// Owns the application state (dataset, sort, filter, favorites, preferences)
/// and the collaborators that consume it. Every user action goes through
/// [`Dashboard::dispatch`], which runs to completion before the next one can
/// start (`&mut self`). After each state change the pipeline
/// project → render rows → sync charts runs again.
#[must_use]
pub struct Dashboard {
    settings: DashboardSettings,
    provider: Box<dyn MarketDataProvider>,
    store: PreferenceStore,
    preferences: Preferences,
    favorites: FavoriteSet,
    dataset: DatasetCache,
    sort: SortState,
    filter: FilterState,
    engine: ViewStateEngine,
    row_service: RowService,
    sink: Box<dyn RenderSink>,
    charts: ChartResourceManager,
    /// Reason of the most recent failed refresh, cleared on success.
    last_error: Option<String>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("provider", &self.provider.name())
            .field("preferences", &self.preferences)
            .field("assets", &self.dataset.len())
            .field("favorites", &self.favorites.len())
            .field("sort", &self.sort)
            .field("filter", &self.filter)
            .field("charts", &self.charts.len())
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl Dashboard {
    /// Build a dashboard and seed it from stored preferences.
    ///
    /// Nothing is fetched yet; call [`Dashboard::start`] (or dispatch
    /// `Command::Refresh`) to load the first snapshot.
    pub fn new(
        settings: DashboardSettings,
        provider: Box<dyn MarketDataProvider>,
        backend: Box<dyn PreferenceBackend>,
        sink: Box<dyn RenderSink>,
        chart_backend: Box<dyn ChartBackend>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        let store = PreferenceStore::new(backend);
        let preferences = store.load_preferences(&settings.default_currency);
        let favorites = store.load_favorites();

        let mut dashboard = Self {
            settings,
            provider,
            store,
            preferences,
            favorites,
            dataset: DatasetCache::new(),
            sort: SortState::none(),
            filter: FilterState::default(),
            engine: ViewStateEngine::new(),
            row_service: RowService::new(),
            sink,
            charts: ChartResourceManager::new(chart_backend),
            last_error: None,
        };
        dashboard.sink.apply_theme(dashboard.preferences.theme);
        tracing::info!(
            provider = dashboard.provider.name(),
            currency = %dashboard.preferences.currency_code,
            theme = %dashboard.preferences.theme,
            favorites = dashboard.favorites.len(),
            "dashboard initialized"
        );
        Ok(dashboard)
    }

    /// Same as [`Dashboard::new`] with the CoinGecko provider built from `settings`.
    pub fn with_coingecko(
        settings: DashboardSettings,
        backend: Box<dyn PreferenceBackend>,
        sink: Box<dyn RenderSink>,
        chart_backend: Box<dyn ChartBackend>,
    ) -> Result<Self, CoreError> {
        let provider = Box::new(CoinGeckoProvider::new(&settings));
        Self::new(settings, provider, backend, sink, chart_backend)
    }

    /// Initial load.
    pub async fn start(&mut self) -> Outcome {
        self.refresh().await
    }

    // ── Command dispatch ────────────────────────────────────────────

    /// Apply one user action.
    ///
    /// Fetch failures never surface as `Err`: they come back as
    /// `Outcome::RefreshFailed` with the previous view left in place.
    /// Storage and validation failures are returned as errors and leave
    /// the in-memory state unchanged.
    pub async fn dispatch(&mut self, command: Command) -> Result<Outcome, CoreError> {
        tracing::debug!(?command, "dispatch");
        match command {
            Command::SetSort(column) => Ok(self.click_sort(column)),
            Command::SetFilter(filter) => Ok(self.set_filter(filter)),
            Command::ToggleFavorite(id) => self.toggle_favorite(&id),
            Command::SetCurrency(code) => self.set_currency(&code).await,
            Command::SetTheme(theme) => self.set_theme(theme),
            Command::ToggleTheme => self.set_theme(self.preferences.theme.toggled()),
            Command::Refresh => Ok(self.refresh().await),
            Command::ActivateRow(id) => self.activate_row(&id),
        }
    }

    /// Fetch a new snapshot in the current currency.
    ///
    /// On success the dataset is replaced and the table fully re-rendered.
    /// On failure the last good dataset, rows and charts stay as they were.
    pub async fn refresh(&mut self) -> Outcome {
        let currency = self.preferences.currency_code.clone();
        match self.provider.fetch_assets(&currency).await {
            Ok(records) => {
                self.dataset.replace(records, &currency, Utc::now());
                self.last_error = None;
                tracing::info!(
                    provider = self.provider.name(),
                    currency = %currency,
                    assets = self.dataset.len(),
                    "dataset refreshed"
                );
                self.rerender();
                Outcome::Refreshed {
                    assets: self.dataset.len(),
                }
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    currency = %currency,
                    error = %e,
                    "refresh failed, keeping previous data"
                );
                let reason = e.to_string();
                self.last_error = Some(reason.clone());
                Outcome::RefreshFailed { reason }
            }
        }
    }

    /// Header click: advance the sort cycle for `column` and re-render.
    pub fn click_sort(&mut self, column: SortColumn) -> Outcome {
        self.sort = self.sort.clicked(column);
        self.rerender();
        Outcome::Rendered
    }

    /// Replace the search text / favorites-only flag and re-render.
    pub fn set_filter(&mut self, filter: FilterState) -> Outcome {
        self.filter = filter;
        self.rerender();
        Outcome::Rendered
    }

    /// Star click. Persists before updating the in-memory set.
    /// Sort order is untouched; only the filter runs again.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<Outcome, CoreError> {
        let mut next = self.favorites.clone();
        let now_favorite = next.toggle(id);
        self.store.save_favorites(&next)?;
        self.favorites = next;
        tracing::debug!(asset = %id, favorite = now_favorite, "favorite toggled");
        self.rerender();
        Ok(Outcome::Rendered)
    }

    /// Persist a new quote currency and refetch, since prices depend on it.
    pub async fn set_currency(&mut self, code: &str) -> Result<Outcome, CoreError> {
        let code = self.store.set_currency(code)?;
        self.preferences.currency_code = code;
        Ok(self.refresh().await)
    }

    /// Persist and apply a theme. No refetch, no re-render of rows.
    pub fn set_theme(&mut self, theme: Theme) -> Result<Outcome, CoreError> {
        self.store.set_theme(theme)?;
        self.preferences.theme = theme;
        self.sink.apply_theme(theme);
        Ok(Outcome::ThemeChanged(theme))
    }

    /// Row click: link to the detail page of a currently visible asset.
    pub fn activate_row(&self, id: &str) -> Result<Outcome, CoreError> {
        if !self.projection().iter().any(|r| r.id == id) {
            return Err(CoreError::ValidationError(format!(
                "Asset '{id}' is not in the current view"
            )));
        }
        Ok(Outcome::Navigate {
            url: self.settings.detail_url(id),
        })
    }

    /// Dispose every chart. The dashboard stays usable; the next render
    /// recreates them.
    pub fn shutdown(&mut self) {
        let disposed = self.charts.clear();
        tracing::debug!(disposed, "charts released");
    }

    // ── Read access ─────────────────────────────────────────────────

    /// Current projection (sorted, then filtered).
    #[must_use]
    pub fn projection(&self) -> Vec<&AssetRecord> {
        project(
            self.dataset.records(),
            &self.sort,
            &self.filter,
            &self.favorites,
        )
    }

    /// Row view-models of the current projection.
    #[must_use]
    pub fn rows(&self) -> Vec<RowViewModel> {
        self.row_service
            .build_rows(&self.projection(), &self.favorites, self.display_currency())
    }

    #[must_use]
    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    #[must_use]
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    #[must_use]
    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    #[must_use]
    pub fn dataset(&self) -> &DatasetCache {
        &self.dataset
    }

    #[must_use]
    pub fn charts(&self) -> &ChartResourceManager {
        &self.charts
    }

    #[must_use]
    pub fn preference_store(&self) -> &PreferenceStore {
        &self.store
    }

    /// Reason of the last failed refresh, if the most recent one failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of full sorts performed so far.
    #[must_use]
    pub fn sort_passes(&self) -> u64 {
        self.engine.sort_passes()
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Prices are formatted in the currency of the cached data, which lags
    /// the preference while a currency-change refetch has not succeeded.
    fn display_currency(&self) -> &str {
        self.dataset
            .currency()
            .unwrap_or(self.preferences.currency_code.as_str())
    }

    fn rerender(&mut self) -> SyncReport {
        let projection =
            self.engine
                .projection(&self.dataset, &self.sort, &self.filter, &self.favorites);
        let rows =
            self.row_service
                .build_rows(&projection, &self.favorites, self.display_currency());
        self.sink.render(&rows, &self.sort);

        let visible: Vec<(&str, &[f64])> = projection
            .iter()
            .map(|r| (r.id.as_str(), r.trend.as_slice()))
            .collect();
        self.charts.sync(&visible)
    }
}
