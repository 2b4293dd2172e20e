//! Built-in handlers for the directive types the application can act on.

use super::page::PageRegistry;
use async_trait::async_trait;
use izzico_core::action::{ActionHandler, Navigator};
use izzico_core::directive::ActionDirective;
use izzico_core::{AssistantError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Path of the page that consumes pending filters.
pub const SEARCH_PATH: &str = "/search";

fn required_field<'a>(directive: &'a ActionDirective, name: &str) -> Result<&'a str> {
    directive
        .field(name)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            AssistantError::handler(format!(
                "{} directive is missing '{}'",
                directive.action_type, name
            ))
        })
}

/// `navigate` pushes `path` onto the router.
pub struct NavigateHandler {
    navigator: Arc<dyn Navigator>,
}

impl NavigateHandler {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }
}

#[async_trait]
impl ActionHandler for NavigateHandler {
    async fn handle(&self, directive: &ActionDirective) -> Result<String> {
        let path = required_field(directive, "path")?;
        self.navigator.push(path)?;
        Ok(format!(
            "Navigating to {}",
            directive.description.as_deref().unwrap_or(path)
        ))
    }
}

/// Parses `key=value,key=value`.
///
/// Pairs without `=` or with an empty key are skipped.
pub fn parse_filters(raw: &str) -> BTreeMap<String, String> {
    raw.split(',')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// `setFilters` stores search filters for the search page and navigates
/// there when needed.
pub struct SetFiltersHandler {
    navigator: Arc<dyn Navigator>,
    page: Arc<PageRegistry>,
}

impl SetFiltersHandler {
    pub fn new(navigator: Arc<dyn Navigator>, page: Arc<PageRegistry>) -> Self {
        Self { navigator, page }
    }
}

#[async_trait]
impl ActionHandler for SetFiltersHandler {
    async fn handle(&self, directive: &ActionDirective) -> Result<String> {
        let filters = parse_filters(required_field(directive, "filters")?);
        if filters.is_empty() {
            return Err(AssistantError::handler("no valid filters given"));
        }

        let summary = filters
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect::<Vec<_>>()
            .join(", ");
        self.page.set_pending_filters(filters);

        if self.navigator.current_path() != SEARCH_PATH {
            self.navigator.push(SEARCH_PATH)?;
        }
        Ok(format!("Filters set: {}", summary))
    }
}

/// `openModal` opens a modal mounted on the current page.
pub struct OpenModalHandler {
    page: Arc<PageRegistry>,
}

impl OpenModalHandler {
    pub fn new(page: Arc<PageRegistry>) -> Self {
        Self { page }
    }
}

#[async_trait]
impl ActionHandler for OpenModalHandler {
    async fn handle(&self, directive: &ActionDirective) -> Result<String> {
        let modal_id = required_field(directive, "modal")?;
        let open = self.page.modal(modal_id).ok_or_else(|| {
            AssistantError::handler(format!(
                "Modal \"{}\" is not available on this page",
                modal_id
            ))
        })?;
        open()?;
        Ok(format!(
            "Opening {}",
            directive.description.as_deref().unwrap_or(modal_id)
        ))
    }
}

/// `startTour` starts a guided tour registered by the current page.
pub struct StartTourHandler {
    page: Arc<PageRegistry>,
}

impl StartTourHandler {
    pub fn new(page: Arc<PageRegistry>) -> Self {
        Self { page }
    }
}

#[async_trait]
impl ActionHandler for StartTourHandler {
    async fn handle(&self, directive: &ActionDirective) -> Result<String> {
        let tour_id = required_field(directive, "tour")?;
        let start = self.page.tour(tour_id).ok_or_else(|| {
            AssistantError::handler(format!("Tour \"{}\" is not available", tour_id))
        })?;
        start()?;
        Ok(format!("Tour \"{}\" started", tour_id))
    }
}
