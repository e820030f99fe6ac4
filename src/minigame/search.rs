use serde::{Deserialize, Serialize};

use crate::core::{Rejection, UnitRegistry};
use crate::data::{SearchDataFile, SearchItem};
use crate::feedback::Feedback;
use crate::model::{Cost, SectorId, UnitId};
use crate::shop::{PriceCurve, debit};

pub const SEARCH_CURRENCY: UnitId = UnitId::Benefits;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SearchState {
    #[default]
    Idle,
    #[serde(rename_all = "camelCase")]
    InProgress { item: String, remaining_ms: f64 },
    AwaitingChoice { item: String },
}

impl SearchState {
    /// Item the encounter is busy with, if any.
    pub fn item(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::InProgress { item, .. } | Self::AwaitingChoice { item } => Some(item),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchChoice {
    Accept,
    Decline,
}

/// A sector's discovery encounters. Items are drawn in catalog order;
/// accepted ones join `discovered`, declined ones are set aside for good.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEncounter {
    pub sector: SectorId,
    pub state: SearchState,
    pub discovered: Vec<String>,
    pub declined: Vec<String>,
}

impl SearchEncounter {
    pub fn new(sector: SectorId) -> Self {
        Self {
            sector,
            state: SearchState::Idle,
            discovered: Vec::new(),
            declined: Vec::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == SearchState::Idle
    }

    /// The price grows linearly with every discovery.
    pub fn price(&self, data: &SearchDataFile, scale_factor: f64) -> f64 {
        PriceCurve::Linear {
            factor: scale_factor,
        }
        .price(data.price, self.discovered.len() as f64)
    }

    pub fn next_item<'a>(&self, data: &'a SearchDataFile) -> Option<&'a SearchItem> {
        data.items
            .iter()
            .find(|item| !self.discovered.contains(&item.id) && !self.declined.contains(&item.id))
    }

    pub fn discovered_items<'a>(&'a self, data: &'a SearchDataFile) -> impl Iterator<Item = &'a SearchItem> {
        self.discovered
            .iter()
            .filter_map(|id| data.items.iter().find(|item| &item.id == id))
    }

    pub fn start(
        &mut self,
        data: &SearchDataFile,
        scale_factor: f64,
        units: &mut UnitRegistry,
    ) -> Result<Vec<Feedback>, Rejection> {
        if !self.is_idle() {
            return Err(Rejection::Busy);
        }
        let item = self.next_item(data).ok_or(Rejection::NothingToDiscover)?;
        debit(units, Cost::new(self.price(data, scale_factor), SEARCH_CURRENCY))?;

        self.state = SearchState::InProgress {
            item: item.id.clone(),
            remaining_ms: (data.duration * 1000.0).max(0.0),
        };
        log::info!("search started in {:?} for {}", self.sector, item.id);
        Ok(vec![Feedback::Hold])
    }

    /// Counts the running search down. Returns true on the call that
    /// finishes it.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        let SearchState::InProgress { item, remaining_ms } = &mut self.state else {
            return false;
        };
        *remaining_ms -= dt_ms.max(0.0);
        if *remaining_ms > 0.0 {
            return false;
        }
        let item = std::mem::take(item);
        self.state = SearchState::AwaitingChoice { item };
        true
    }

    pub fn resolve(
        &mut self,
        data: &SearchDataFile,
        units: &mut UnitRegistry,
        choice: SearchChoice,
    ) -> Result<Vec<Feedback>, Rejection> {
        let SearchState::AwaitingChoice { item } = &self.state else {
            return Err(Rejection::NotReady);
        };
        let definition = data
            .items
            .iter()
            .find(|entry| &entry.id == item)
            .ok_or(Rejection::UnknownEntity)?;

        match choice {
            SearchChoice::Accept => {
                units.apply_choice_effects(&definition.accept_values);
                self.discovered.push(definition.id.clone());
            }
            SearchChoice::Decline => {
                units.apply_choice_effects(&definition.decline_values);
                self.declined.push(definition.id.clone());
            }
        }
        self.state = SearchState::Idle;
        Ok(vec![Feedback::ClickBasic])
    }
}
