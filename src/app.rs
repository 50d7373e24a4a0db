//! Application state management for swa
//!
//! This module contains the main application state, handling keyboard input,
//! resolving the forecast point, and loading the dashboard data.

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};

use crate::cache::{CacheManager, CachedData, POINT_CACHE_KEY};
use crate::cli::{LocationSource, StartupConfig};
use crate::config::Config;
use crate::data::{normalize, Dashboard, NwsClient, NwsError, Point};

/// Upper bound for the scroll offset; the renderer clamps to the content
const MAX_SCROLL: u16 = 200;

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while fetching data
    Loading,
    /// Dashboard is available
    Dashboard,
    /// The first load failed and there is nothing to show
    Failed(String),
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Data from the last successful load
    pub dashboard: Option<Dashboard>,
    /// Error from the last refresh, shown while older data stays on screen
    pub last_error: Option<String>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag indicating a refresh has been requested
    pub refresh_requested: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Scroll offset of the alerts/forecast pane
    pub scroll_offset: u16,
    /// Index of the highlighted alert
    pub selected_alert: usize,
    /// Index of the alert whose description is shown
    pub expanded_alert: Option<usize>,
    location: LocationSource,
    fallback: (f64, f64),
    point_ttl_hours: u64,
    client: NwsClient,
    cache: Option<CacheManager>,
}

impl App {
    /// Creates a new App in the loading state
    ///
    /// # Arguments
    /// * `client` - weather.gov API client
    /// * `cache` - Where the resolved point is remembered, if anywhere
    /// * `startup` - Settings derived from CLI arguments
    /// * `config` - Settings from the config file
    pub fn new(
        client: NwsClient,
        cache: Option<CacheManager>,
        startup: &StartupConfig,
        config: &Config,
    ) -> Self {
        Self {
            state: AppState::Loading,
            dashboard: None,
            last_error: None,
            should_quit: false,
            refresh_requested: false,
            show_help: false,
            scroll_offset: 0,
            selected_alert: 0,
            expanded_alert: None,
            location: startup.location,
            fallback: (config.fallback_latitude, config.fallback_longitude),
            point_ttl_hours: config.point_ttl_hours,
            client,
            cache,
        }
    }

    /// Number of alerts in the current dashboard
    pub fn alert_count(&self) -> usize {
        self.dashboard.as_ref().map_or(0, |d| d.alerts.len())
    }

    /// Reloads the dashboard and updates state
    ///
    /// On failure the previous dashboard stays visible and the error is kept
    /// in `last_error`. Without a previous dashboard the app moves to `Failed`.
    pub async fn refresh(&mut self) {
        self.refresh_requested = false;

        match self.load_dashboard().await {
            Ok(dashboard) => {
                tracing::info!(
                    place = %dashboard.point.place_name(),
                    alerts = dashboard.alerts.len(),
                    hours = dashboard.hourly.len(),
                    "dashboard loaded"
                );
                let alert_count = dashboard.alerts.len();
                self.dashboard = Some(dashboard);
                self.last_error = None;
                self.state = AppState::Dashboard;

                if self.selected_alert >= alert_count {
                    self.selected_alert = 0;
                }
                if self.expanded_alert.is_some_and(|i| i >= alert_count) {
                    self.expanded_alert = None;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load dashboard");
                let message = e.to_string();
                if self.dashboard.is_some() {
                    self.last_error = Some(message);
                } else {
                    self.state = AppState::Failed(message);
                }
            }
        }
    }

    /// Fetches everything the dashboard shows
    ///
    /// Alerts, forecast and hourly forecast are requested concurrently. A
    /// failed alerts request degrades to an empty list.
    ///
    /// # Returns
    /// * `Ok(Dashboard)` with the normalized chart window
    /// * `Err(NwsError)` if the point, forecast, or hourly forecast failed
    pub async fn load_dashboard(&mut self) -> Result<Dashboard, NwsError> {
        let point = self.resolve_point().await?;

        let (alerts, forecast, hourly) = futures::join!(
            self.client.fetch_alerts(point.latitude, point.longitude),
            self.client.fetch_forecast(&point.forecast_url),
            self.client.fetch_hourly(&point.forecast_hourly_url),
        );

        let alerts = alerts.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "alerts unavailable, showing none");
            Vec::new()
        });

        Ok(Dashboard {
            alerts,
            forecast: forecast?,
            hourly: normalize(&hourly?),
            point,
            fetched_at: Utc::now(),
        })
    }

    /// Determines the forecast point to load
    ///
    /// Order: the point already on screen, explicit coordinates, the
    /// remembered point, then the fallback location. Freshly fetched points
    /// are remembered. An expired remembered point is refetched, and reused
    /// as-is when that fails.
    async fn resolve_point(&mut self) -> Result<Point, NwsError> {
        if let Some(dashboard) = &self.dashboard {
            return Ok(dashboard.point.clone());
        }

        if let LocationSource::Explicit {
            latitude,
            longitude,
        } = self.location
        {
            let point = self.client.fetch_point(latitude, longitude).await?;
            self.remember_point(&point);
            return Ok(point);
        }

        let remembered: Option<CachedData<Point>> =
            self.cache.as_ref().and_then(|c| c.read(POINT_CACHE_KEY));

        if let Some(cached) = remembered {
            if !cached.is_expired {
                tracing::debug!(place = %cached.data.place_name(), "using remembered point");
                return Ok(cached.data);
            }

            let stale = cached.data;
            return match self.client.fetch_point(stale.latitude, stale.longitude).await {
                Ok(point) => {
                    self.remember_point(&point);
                    Ok(point)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "could not refresh remembered point, reusing it");
                    Ok(stale)
                }
            };
        }

        let (latitude, longitude) = self.fallback;
        tracing::info!(latitude, longitude, "no remembered point, using fallback location");
        let point = self.client.fetch_point(latitude, longitude).await?;
        self.remember_point(&point);
        Ok(point)
    }

    fn remember_point(&self, point: &Point) {
        let Some(cache) = &self.cache else {
            return;
        };
        if let Err(e) = cache.write(POINT_CACHE_KEY, point, self.point_ttl_hours) {
            tracing::warn!(error = %e, "failed to remember point");
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Arguments
    /// * `key_event` - The keyboard event to handle
    ///
    /// # Key Bindings
    /// - `q`: Quit the application
    /// - `Esc`: Collapse the expanded alert, or quit
    /// - `r`: Refresh
    /// - `?`: Toggle help
    /// - `Up`/`k`, `Down`/`j`: Scroll
    /// - `g`/`G`: Scroll to top/bottom
    /// - `n`/`Tab`, `p`/`BackTab`: Select next/previous alert
    /// - `Enter`: Expand or collapse the selected alert
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match self.state {
            AppState::Loading => {
                // Only quit is allowed during loading
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::Failed(_) => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
            AppState::Dashboard => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc => {
                    if self.expanded_alert.is_some() {
                        self.expanded_alert = None;
                    } else {
                        self.should_quit = true;
                    }
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    self.scroll_down();
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.scroll_up();
                }
                KeyCode::Char('g') => {
                    self.scroll_to_top();
                }
                KeyCode::Char('G') => {
                    self.scroll_to_bottom();
                }
                KeyCode::Char('n') | KeyCode::Tab => {
                    self.select_next_alert();
                }
                KeyCode::Char('p') | KeyCode::BackTab => {
                    self.select_previous_alert();
                }
                KeyCode::Enter => {
                    self.toggle_selected_alert();
                }
                _ => {}
            },
        }
    }

    /// Moves the alert selection down, wrapping to the first alert
    fn select_next_alert(&mut self) {
        let count = self.alert_count();
        if count == 0 {
            return;
        }
        self.selected_alert = (self.selected_alert + 1) % count;
    }

    /// Moves the alert selection up, wrapping to the last alert
    fn select_previous_alert(&mut self) {
        let count = self.alert_count();
        if count == 0 {
            return;
        }
        if self.selected_alert == 0 {
            self.selected_alert = count - 1;
        } else {
            self.selected_alert -= 1;
        }
    }

    /// Expands the selected alert, or collapses it if already expanded
    fn toggle_selected_alert(&mut self) {
        if self.alert_count() == 0 {
            return;
        }
        self.expanded_alert = match self.expanded_alert {
            Some(i) if i == self.selected_alert => None,
            _ => Some(self.selected_alert),
        };
    }

    /// Scrolls up with bounds checking
    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Scrolls down, stopping at an upper bound
    pub fn scroll_down(&mut self) {
        if self.scroll_offset < MAX_SCROLL {
            self.scroll_offset += 1;
        }
    }

    /// Scrolls to the top
    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    /// Scrolls to the bottom
    ///
    /// Sets scroll offset to a large value that will be clamped by the renderer.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = MAX_SCROLL;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Alert, AlertSeverity, ForecastPeriod};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app(startup: StartupConfig, cache: Option<CacheManager>, base_url: &str) -> App {
        let client = NwsClient::new("swa-test").unwrap().with_base_url(base_url);
        App::new(client, cache, &startup, &Config::default())
    }

    fn sample_point(base: &str) -> Point {
        Point {
            latitude: 39.7456,
            longitude: -97.0892,
            city: "Linn".to_string(),
            state: "KS".to_string(),
            forecast_url: format!("{}/gridpoints/TOP/32,81/forecast", base),
            forecast_hourly_url: format!("{}/gridpoints/TOP/32,81/forecast/hourly", base),
        }
    }

    fn sample_alert(n: usize) -> Alert {
        Alert {
            id: format!("alert-{}", n),
            event: "Heat Advisory".to_string(),
            severity: AlertSeverity::Severe,
            headline: format!("HEAT ADVISORY {}", n),
            description: "Hot.".to_string(),
            instruction: None,
        }
    }

    /// App showing a dashboard with `alerts` alerts, no network needed
    fn app_with_alerts(alerts: usize) -> App {
        let mut app = test_app(StartupConfig::default(), None, "http://127.0.0.1:9");
        app.dashboard = Some(Dashboard {
            point: sample_point("http://127.0.0.1:9"),
            alerts: (0..alerts).map(sample_alert).collect(),
            forecast: Vec::<ForecastPeriod>::new(),
            hourly: Vec::new(),
            fetched_at: Utc::now(),
        });
        app.state = AppState::Dashboard;
        app
    }

    fn point_body(base: &str, lon: f64, lat: f64, city: &str) -> serde_json::Value {
        serde_json::json!({
            "geometry": {"type": "Point", "coordinates": [lon, lat]},
            "properties": {
                "forecast": format!("{}/gridpoints/TOP/32,81/forecast", base),
                "forecastHourly": format!("{}/gridpoints/TOP/32,81/forecast/hourly", base),
                "relativeLocation": {"properties": {"city": city, "state": "KS"}}
            }
        })
    }

    fn hourly_body() -> serde_json::Value {
        let periods: Vec<_> = (0..10)
            .map(|h| {
                serde_json::json!({
                    "startTime": format!("2024-07-15T{:02}:00:00-05:00", 10 + h),
                    "temperature": 95,
                    "relativeHumidity": {"unitCode": "wmoUnit:percent", "value": 5},
                    "windSpeed": "8 mph",
                    "probabilityOfPrecipitation": {"unitCode": "wmoUnit:percent", "value": 10},
                    "shortForecast": "Sunny"
                })
            })
            .collect();
        serde_json::json!({ "periods": periods })
    }

    fn forecast_body() -> serde_json::Value {
        serde_json::json!({
            "periods": [{
                "name": "This Afternoon",
                "isDaytime": true,
                "temperature": 95,
                "shortForecast": "Sunny",
                "detailedForecast": "Sunny, with a high near 95."
            }]
        })
    }

    /// Mounts forecast, hourly, and alerts endpoints
    async fn mount_forecasts(server: &MockServer, alerts_status: u16) {
        Mock::given(method("GET"))
            .and(path("/gridpoints/TOP/32,81/forecast/hourly"))
            .respond_with(ResponseTemplate::new(200).set_body_json(hourly_body()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gridpoints/TOP/32,81/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/alerts"))
            .respond_with(ResponseTemplate::new(alerts_status).set_body_json(serde_json::json!({
                "@graph": [{
                    "id": "a1",
                    "event": "Excessive Heat Warning",
                    "severity": "Extreme",
                    "headline": "Excessive Heat Warning",
                    "description": "Very hot.",
                    "instruction": null,
                    "parameters": {}
                }]
            })))
            .mount(server)
            .await;
    }

    // ========================================================================
    // State and Key Handling Tests
    // ========================================================================

    #[test]
    fn test_initial_state_is_loading() {
        let app = test_app(StartupConfig::default(), None, "http://127.0.0.1:9");
        assert_eq!(app.state, AppState::Loading);
        assert!(app.dashboard.is_none());
        assert!(!app.should_quit);
        assert!(!app.show_help);
        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn test_keys_ignored_during_loading() {
        let mut app = test_app(StartupConfig::default(), None, "http://127.0.0.1:9");

        app.handle_key(key_event(KeyCode::Char('r')));
        app.handle_key(key_event(KeyCode::Char('j')));
        assert!(!app.refresh_requested);
        assert_eq!(app.scroll_offset, 0);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_r_requests_refresh() {
        let mut app = app_with_alerts(0);
        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(app.refresh_requested);
    }

    #[test]
    fn test_r_retries_after_failure() {
        let mut app = test_app(StartupConfig::default(), None, "http://127.0.0.1:9");
        app.state = AppState::Failed("boom".to_string());

        app.handle_key(key_event(KeyCode::Char('r')));

        assert!(app.refresh_requested);
    }

    #[test]
    fn test_q_quits_from_dashboard() {
        let mut app = app_with_alerts(0);
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = app_with_alerts(0);

        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('j')));
        assert_eq!(app.scroll_offset, 0, "scroll ignored while help is shown");

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit, "q closes help before quitting");
    }

    #[test]
    fn test_scroll_keys() {
        let mut app = app_with_alerts(0);

        app.handle_key(key_event(KeyCode::Char('j')));
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.scroll_offset, 2);

        app.handle_key(key_event(KeyCode::Char('k')));
        assert_eq!(app.scroll_offset, 1);

        app.handle_key(key_event(KeyCode::Char('G')));
        assert_eq!(app.scroll_offset, MAX_SCROLL);

        app.handle_key(key_event(KeyCode::Char('g')));
        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn test_scroll_up_stops_at_zero() {
        let mut app = app_with_alerts(0);
        app.scroll_up();
        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn test_scroll_down_respects_maximum() {
        let mut app = app_with_alerts(0);
        app.scroll_offset = MAX_SCROLL;
        app.scroll_down();
        assert_eq!(app.scroll_offset, MAX_SCROLL);
    }

    #[test]
    fn test_alert_selection_wraps() {
        let mut app = app_with_alerts(3);

        app.handle_key(key_event(KeyCode::Char('n')));
        assert_eq!(app.selected_alert, 1);
        app.handle_key(key_event(KeyCode::Tab));
        app.handle_key(key_event(KeyCode::Char('n')));
        assert_eq!(app.selected_alert, 0);

        app.handle_key(key_event(KeyCode::Char('p')));
        assert_eq!(app.selected_alert, 2);
    }

    #[test]
    fn test_alert_selection_without_alerts_is_noop() {
        let mut app = app_with_alerts(0);

        app.handle_key(key_event(KeyCode::Char('n')));
        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.selected_alert, 0);
        assert!(app.expanded_alert.is_none());
    }

    #[test]
    fn test_enter_toggles_alert_expansion() {
        let mut app = app_with_alerts(2);
        app.handle_key(key_event(KeyCode::Char('n')));

        app.handle_key(key_event(KeyCode::Enter));
        assert_eq!(app.expanded_alert, Some(1));

        app.handle_key(key_event(KeyCode::Enter));
        assert_eq!(app.expanded_alert, None);
    }

    #[test]
    fn test_esc_collapses_alert_before_quitting() {
        let mut app = app_with_alerts(1);
        app.handle_key(key_event(KeyCode::Enter));

        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.expanded_alert.is_none());
        assert!(!app.should_quit);

        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.should_quit);
    }

    // ========================================================================
    // Dashboard Loading Tests
    // ========================================================================

    #[tokio::test]
    async fn test_explicit_location_fetches_and_remembers_point() {
        let server = MockServer::start().await;
        let base = server.uri();
        Mock::given(method("GET"))
            .and(path("/points/39.7456,-97.0892"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(point_body(&base, -97.0892, 39.7456, "Linn")),
            )
            .expect(1)
            .mount(&server)
            .await;
        mount_forecasts(&server, 200).await;

        let temp_dir = TempDir::new().unwrap();
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        let startup = StartupConfig {
            location: LocationSource::Explicit {
                latitude: 39.7456,
                longitude: -97.0892,
            },
            ..StartupConfig::default()
        };
        let mut app = test_app(startup, Some(cache.clone()), &base);

        app.refresh().await;

        assert_eq!(app.state, AppState::Dashboard);
        let dashboard = app.dashboard.as_ref().expect("dashboard loaded");
        assert_eq!(dashboard.point.place_name(), "Linn, KS");
        assert_eq!(dashboard.alerts.len(), 1);
        assert_eq!(dashboard.forecast.len(), 1);
        assert_eq!(dashboard.hourly.len(), 8, "chart window is 8 hours");
        for period in &dashboard.hourly {
            let feels = period.apparent_temperature.expect("heat band");
            assert!((feels - 88.178).abs() < 0.01);
        }
        assert!(app.last_error.is_none());

        let remembered: CachedData<Point> = cache.read(POINT_CACHE_KEY).expect("point remembered");
        assert_eq!(remembered.data.city, "Linn");
    }

    #[tokio::test]
    async fn test_remembered_point_skips_points_request() {
        let server = MockServer::start().await;
        let base = server.uri();
        Mock::given(method("GET"))
            .and(path("/points/39.7456,-97.0892"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        mount_forecasts(&server, 200).await;

        let temp_dir = TempDir::new().unwrap();
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        cache.write(POINT_CACHE_KEY, &sample_point(&base), 24).unwrap();
        let mut app = test_app(StartupConfig::default(), Some(cache), &base);

        app.refresh().await;

        assert_eq!(app.state, AppState::Dashboard);
        assert_eq!(app.dashboard.unwrap().point.city, "Linn");
    }

    #[tokio::test]
    async fn test_expired_point_is_reused_when_refetch_fails() {
        let server = MockServer::start().await;
        let base = server.uri();
        Mock::given(method("GET"))
            .and(path("/points/39.7456,-97.0892"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;
        mount_forecasts(&server, 200).await;

        let temp_dir = TempDir::new().unwrap();
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        cache.write(POINT_CACHE_KEY, &sample_point(&base), 0).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let mut app = test_app(StartupConfig::default(), Some(cache), &base);

        app.refresh().await;

        assert_eq!(app.state, AppState::Dashboard);
        assert_eq!(app.dashboard.unwrap().point.city, "Linn");
    }

    #[tokio::test]
    async fn test_fallback_location_without_remembered_point() {
        let server = MockServer::start().await;
        let base = server.uri();
        Mock::given(method("GET"))
            .and(path("/points/21.3069,-157.8583"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(point_body(&base, -157.8583, 21.3069, "Honolulu")),
            )
            .expect(1)
            .mount(&server)
            .await;
        mount_forecasts(&server, 200).await;

        let temp_dir = TempDir::new().unwrap();
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        let mut app = test_app(StartupConfig::default(), Some(cache.clone()), &base);

        app.refresh().await;

        assert_eq!(app.dashboard.unwrap().point.city, "Honolulu");
        let remembered: CachedData<Point> = cache.read(POINT_CACHE_KEY).expect("point remembered");
        assert_eq!(remembered.data.city, "Honolulu");
    }

    #[tokio::test]
    async fn test_alerts_failure_degrades_to_no_alerts() {
        let server = MockServer::start().await;
        let base = server.uri();
        mount_forecasts(&server, 500).await;

        let temp_dir = TempDir::new().unwrap();
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        cache.write(POINT_CACHE_KEY, &sample_point(&base), 24).unwrap();
        let mut app = test_app(StartupConfig::default(), Some(cache), &base);

        app.refresh().await;

        assert_eq!(app.state, AppState::Dashboard);
        let dashboard = app.dashboard.unwrap();
        assert!(dashboard.alerts.is_empty());
        assert_eq!(dashboard.hourly.len(), 8);
    }

    #[tokio::test]
    async fn test_first_load_failure_moves_to_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut app = test_app(StartupConfig::default(), None, &server.uri());

        app.refresh().await;

        assert!(matches!(app.state, AppState::Failed(_)));
        assert!(app.dashboard.is_none());
        assert!(!app.refresh_requested);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_dashboard() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut app = app_with_alerts(2);
        app.client = NwsClient::new("swa-test").unwrap().with_base_url(server.uri());
        app.dashboard.as_mut().unwrap().point = sample_point(&server.uri());

        app.refresh().await;

        assert_eq!(app.state, AppState::Dashboard);
        assert_eq!(app.alert_count(), 2);
        assert!(app.last_error.is_some());
    }

    #[tokio::test]
    async fn test_refresh_resets_out_of_range_selection() {
        let server = MockServer::start().await;
        let base = server.uri();
        mount_forecasts(&server, 200).await;

        let mut app = app_with_alerts(3);
        app.client = NwsClient::new("swa-test").unwrap().with_base_url(&base);
        app.dashboard.as_mut().unwrap().point = sample_point(&base);
        app.selected_alert = 2;
        app.expanded_alert = Some(2);

        app.refresh().await;

        assert_eq!(app.alert_count(), 1);
        assert_eq!(app.selected_alert, 0);
        assert!(app.expanded_alert.is_none());
    }
}
