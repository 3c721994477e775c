//! Facility browsing: locate the user, fetch nearby facilities with a
//! fallback to the full list, and paginate in memory.

use crate::api::ParkingApi;
use crate::config::{ClientConfig, DEFAULT_CENTER};
use crate::error::{ClientError, ClientResult, ErrorKind};
use crate::request::HttpClient;
use easypark_shared::{Coordinates, Facility};

/// One-shot position source.
#[async_trait::async_trait(?Send)]
pub trait Locator {
    /// Current position, or `GeolocationUnavailable`.
    async fn locate(&self) -> ClientResult<Coordinates>;
}

/// Locator that never finds anything. Used where geolocation is off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait::async_trait(?Send)]
impl Locator for NoLocation {
    async fn locate(&self) -> ClientResult<Coordinates> {
        Err(ClientError::geolocation("geolocation disabled"))
    }
}

/// What the facility browser shows.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseResult {
    pub facilities: Vec<Facility>,
    /// Present only when the position was obtained.
    pub user_location: Option<Coordinates>,
    /// Map centre: the user when located, the default centre otherwise.
    pub center: Coordinates,
}

impl BrowseResult {
    pub fn is_nearby(&self) -> bool {
        self.user_location.is_some()
    }
}

/// Facilities around the user within the configured radius.
///
/// Without a position the browser degrades to the unfiltered list centred
/// on the default centre; the geolocation failure itself is not surfaced.
pub async fn browse_facilities<C, L>(
    api: &ParkingApi<C>,
    locator: &L,
    config: &ClientConfig,
) -> ClientResult<BrowseResult>
where
    C: HttpClient,
    L: Locator + ?Sized,
{
    match locator.locate().await {
        Ok(position) => {
            let facilities = api
                .search_facilities(position, config.search_radius_km)
                .await
                .map_err(|failure| {
                    failure
                        .into_client(ErrorKind::FacilityFetchFailed)
                        .in_op_with("browse.nearby", format!("{}km", config.search_radius_km))
                })?;
            Ok(BrowseResult {
                facilities,
                user_location: Some(position),
                center: position,
            })
        }
        Err(e) => {
            log::info!("no position ({e}), listing every facility");
            let facilities = list_all_facilities(api).await?;
            Ok(BrowseResult {
                facilities,
                user_location: None,
                center: DEFAULT_CENTER,
            })
        }
    }
}

/// Every facility, as shown in the admin overview.
pub async fn list_all_facilities<C: HttpClient>(api: &ParkingApi<C>) -> ClientResult<Vec<Facility>> {
    api.list_facilities().await.map_err(|failure| {
        failure
            .into_client(ErrorKind::FacilityFetchFailed)
            .in_op("facilities.list")
    })
}

/// One facility, for the reservation page.
pub async fn load_facility<C: HttpClient>(api: &ParkingApi<C>, id: &str) -> ClientResult<Facility> {
    api.get_facility(id).await.map_err(|failure| {
        failure
            .into_client(ErrorKind::FacilityFetchFailed)
            .in_op_with("facilities.get", id)
    })
}

// =========================================================
// Pagination
// =========================================================

/// A 1-based page over an in-memory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Current page, clamped to `1..=total_pages`.
    pub number: usize,
    /// At least 1, so an empty list still reads "Page 1 of 1".
    pub total_pages: usize,
    pub page_size: usize,
    pub total_items: usize,
}

impl Page {
    pub fn new(total_items: usize, page_size: usize, requested: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size).max(1);
        Self {
            number: requested.clamp(1, total_pages),
            total_pages,
            page_size,
            total_items,
        }
    }

    /// Index range of the page within the list.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = ((self.number - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        &items[range.start.min(items.len())..range.end.min(items.len())]
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// Whether paging controls are worth showing.
    pub fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.number, self.total_pages)
    }
}

/// Layout of the admin facility overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Cards,
    Table,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Cards => ViewMode::Table,
            ViewMode::Table => ViewMode::Cards,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Cards => "Cards",
            ViewMode::Table => "Table",
        }
    }
}
