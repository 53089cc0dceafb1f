use std::time::Instant;

use crate::catalog::{Catalog, CatalogError};
use crate::config::{validate, Config};
use crate::contract::{QuerySnapshot, ShowcaseSnapshot, ToolCard};
use crate::filter::{filter, CategoryFilter, FilterQuery, ALL_CATEGORIES};
use crate::hotkey::{parse_hotkey, Hotkey};
use crate::logging::{self, LogEvent};
use crate::model::{Category, Tool};
use crate::progress::{PollOutcome, ProgressDriver, ProgressState, StartOutcome, TickOutcome};
use crate::search_focus::{FocusAction, SearchFocus};

pub type SubscriptionId = u64;

type Observer = Box<dyn FnMut(&SessionEvent)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    QueryChanged { result_count: usize },
    ProgressChanged(ProgressState),
    InstallCompleted,
    FocusSearch,
    SearchBlurred,
}

#[derive(Debug)]
pub enum SessionError {
    Config(String),
    Catalog(CatalogError),
    TornDown,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(error) => write!(f, "config error: {error}"),
            Self::Catalog(error) => write!(f, "catalog error: {error}"),
            Self::TornDown => write!(f, "session already torn down"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<CatalogError> for SessionError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

/// Shell-facing owner of the live query, the install driver and search
/// focus. Observers run synchronously, in subscription order, before the
/// mutating call returns.
pub struct ShowcaseSession {
    config: Config,
    catalog: Catalog,
    hotkey: Hotkey,
    query: FilterQuery,
    driver: ProgressDriver,
    focus: SearchFocus,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: SubscriptionId,
    torn_down: bool,
}

impl ShowcaseSession {
    pub fn new(config: Config, catalog: Catalog) -> Result<Self, SessionError> {
        validate(&config).map_err(SessionError::Config)?;
        let hotkey = parse_hotkey(&config.hotkey).map_err(SessionError::Config)?;
        let query = FilterQuery {
            text: String::new(),
            category: CategoryFilter::parse(&config.default_category),
        };
        let driver = ProgressDriver::new(config.progress_step, config.tick_interval());

        Ok(Self {
            config,
            catalog,
            hotkey,
            query,
            driver,
            focus: SearchFocus::default(),
            observers: Vec::new(),
            next_subscription: 1,
            torn_down: false,
        })
    }

    pub fn with_builtin_catalog(config: Config) -> Result<Self, SessionError> {
        let catalog = Catalog::builtin()?;
        Self::new(config, catalog)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    pub fn hotkey(&self) -> &Hotkey {
        &self.hotkey
    }

    pub fn categories(&self) -> Vec<&'static str> {
        std::iter::once(ALL_CATEGORIES)
            .chain(Category::ALL.into_iter().map(Category::as_str))
            .collect()
    }

    pub fn visible_tools(&self) -> Vec<&Tool> {
        filter(self.catalog.tools(), &self.query)
    }

    pub fn progress(&self) -> ProgressState {
        self.driver.state()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&SessionEvent) + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        if !self.torn_down {
            self.observers.push((id, Box::new(observer)));
        }
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn set_search_text(&mut self, text: &str) {
        if self.torn_down || self.query.text == text {
            return;
        }
        self.query.text = text.to_string();
        self.emit_query_changed();
    }

    pub fn set_category(&mut self, category: &str) {
        let parsed = CategoryFilter::parse(category);
        if self.torn_down || self.query.category == parsed {
            return;
        }
        self.query.category = parsed;
        self.emit_query_changed();
    }

    pub fn reset_filters(&mut self) {
        let reset = FilterQuery::default();
        if self.torn_down || self.query == reset {
            return;
        }
        self.query = reset;
        self.emit_query_changed();
    }

    pub fn start_install(&mut self) -> Result<StartOutcome, SessionError> {
        self.start_install_at(Instant::now())
    }

    pub fn start_install_at(&mut self, now: Instant) -> Result<StartOutcome, SessionError> {
        if self.torn_down {
            return Err(SessionError::TornDown);
        }

        let outcome = self.driver.start_at(now);
        if outcome == StartOutcome::Started {
            logging::record(&LogEvent::InstallStarted {
                step: self.driver.step(),
            });
            self.emit(SessionEvent::ProgressChanged(self.driver.state()));
        }
        Ok(outcome)
    }

    pub fn tick_install(&mut self) -> TickOutcome {
        let outcome = self.driver.tick();
        match outcome {
            TickOutcome::Idle => {}
            TickOutcome::Advanced(_) => self.emit(SessionEvent::ProgressChanged(self.driver.state())),
            TickOutcome::Completed => self.emit_completion(),
        }
        outcome
    }

    /// Applies every tick due by `now`. Observers see one coalesced
    /// `ProgressChanged` per poll, followed by `InstallCompleted` if the run
    /// finished.
    pub fn poll_install(&mut self, now: Instant) -> PollOutcome {
        let outcome = self.driver.poll(now);
        if outcome.completed {
            self.emit_completion();
        } else if outcome.ticks > 0 {
            self.emit(SessionEvent::ProgressChanged(self.driver.state()));
        }
        outcome
    }

    pub fn next_tick_due_in(&self, now: Instant) -> Option<std::time::Duration> {
        self.driver.next_due_in(now)
    }

    pub fn cancel_install(&mut self) -> bool {
        if !self.driver.cancel() {
            return false;
        }
        logging::record(&LogEvent::InstallCancelled {
            percent: self.driver.percent(),
            by_teardown: false,
        });
        self.emit(SessionEvent::ProgressChanged(self.driver.state()));
        true
    }

    /// Key event forwarded by the shell. Returns `None` when the event is not
    /// the search hotkey.
    pub fn handle_key(&mut self, modifiers: &[&str], key: &str) -> Option<FocusAction> {
        if self.torn_down || !self.hotkey.matches(modifiers, key) {
            return None;
        }

        let action = self.focus.on_hotkey();
        if action == FocusAction::FocusSearch {
            self.emit(SessionEvent::FocusSearch);
        }
        Some(action)
    }

    pub fn set_search_focused(&mut self, focused: bool) {
        self.focus.set_focused(focused);
    }

    pub fn is_search_focused(&self) -> bool {
        self.focus.is_focused()
    }

    pub fn on_escape(&mut self) -> bool {
        if self.torn_down || !self.focus.on_escape() {
            return false;
        }
        self.emit(SessionEvent::SearchBlurred);
        true
    }

    pub fn snapshot(&self) -> ShowcaseSnapshot {
        ShowcaseSnapshot {
            query: QuerySnapshot {
                text: self.query.text.clone(),
                category: self.query.category.to_string(),
            },
            categories: self.categories().into_iter().map(str::to_string).collect(),
            tools: self
                .visible_tools()
                .into_iter()
                .map(ToolCard::from)
                .collect(),
            progress: self.driver.state().into(),
        }
    }

    /// Stops the install run and drops every observer. Safe to call more
    /// than once; also runs on drop.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if self.driver.cancel() {
            logging::record(&LogEvent::InstallCancelled {
                percent: self.driver.percent(),
                by_teardown: true,
            });
        }
        self.observers.clear();
    }

    fn emit_query_changed(&mut self) {
        let result_count = self.visible_tools().len();
        self.emit(SessionEvent::QueryChanged { result_count });
    }

    fn emit_completion(&mut self) {
        logging::record(&LogEvent::InstallCompleted {
            run: self.driver.completed_runs(),
        });
        self.emit(SessionEvent::ProgressChanged(self.driver.state()));
        self.emit(SessionEvent::InstallCompleted);
    }

    fn emit(&mut self, event: SessionEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
    }
}

impl Drop for ShowcaseSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
