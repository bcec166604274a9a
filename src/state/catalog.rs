//! Cascading catalog selection: manufacturer → model → generation → modification.
//!
//! DESIGN
//! ======
//! Changing a level clears every level below it, both the selected id and
//! the option list. Option lists are [`Slot`]s, so fetching is two-phase:
//! `begin_*` takes a ticket plus the parent id to query, and `apply_*`
//! stores the response only if no newer fetch (or reset) happened since.
//! The `refresh_*` helpers do both around a gateway call.

use super::sequence::{Slot, Ticket};
use crate::net::catalog;
use crate::net::gateway::{ApiError, Gateway};
use crate::net::types::{CarModel, Filter, Generation, Manufacturer, Modification};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selected {
    pub manufacturer_id: Option<i64>,
    pub car_model_id: Option<i64>,
    pub generation_id: Option<i64>,
    pub modification_id: Option<i64>,
}

#[derive(Debug, Default)]
pub struct CatalogSelection {
    selected: Selected,
    manufacturers: Slot<Vec<Manufacturer>>,
    models: Slot<Vec<CarModel>>,
    generations: Slot<Vec<Generation>>,
    modifications: Slot<Vec<Modification>>,
}

impl CatalogSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selected(&self) -> Selected {
        self.selected
    }

    #[must_use]
    pub fn manufacturers(&self) -> &[Manufacturer] {
        self.manufacturers.get()
    }

    #[must_use]
    pub fn models(&self) -> &[CarModel] {
        self.models.get()
    }

    #[must_use]
    pub fn generations(&self) -> &[Generation] {
        self.generations.get()
    }

    #[must_use]
    pub fn modifications(&self) -> &[Modification] {
        self.modifications.get()
    }

    // -------------------------------------------------------------------------
    // selection
    // -------------------------------------------------------------------------

    pub fn select_manufacturer(&mut self, id: Option<i64>) {
        self.selected.manufacturer_id = id;
        self.selected.car_model_id = None;
        self.models.reset(Vec::new());
        self.clear_below_model();
    }

    pub fn select_model(&mut self, id: Option<i64>) {
        self.selected.car_model_id = id;
        self.clear_below_model();
    }

    pub fn select_generation(&mut self, id: Option<i64>) {
        self.selected.generation_id = id;
        self.selected.modification_id = None;
        self.modifications.reset(Vec::new());
    }

    pub fn select_modification(&mut self, id: Option<i64>) {
        self.selected.modification_id = id;
    }

    fn clear_below_model(&mut self) {
        self.selected.generation_id = None;
        self.selected.modification_id = None;
        self.generations.reset(Vec::new());
        self.modifications.reset(Vec::new());
    }

    /// Restore the chain from a saved filter. Saved filters carry no
    /// modification, so that level is cleared.
    pub fn restore(&mut self, filter: &Filter) {
        self.select_manufacturer(filter.manufacturer_id);
        self.select_model(filter.car_model_id);
        self.select_generation(filter.generation_id);
    }

    /// Copy the selected ids into `filter`.
    #[must_use]
    pub fn apply_to(&self, mut filter: Filter) -> Filter {
        filter.manufacturer_id = self.selected.manufacturer_id;
        filter.car_model_id = self.selected.car_model_id;
        filter.generation_id = self.selected.generation_id;
        filter.modification_id = self.selected.modification_id;
        filter
    }

    // -------------------------------------------------------------------------
    // two-phase loading
    // -------------------------------------------------------------------------

    pub fn begin_manufacturers(&self) -> Ticket {
        self.manufacturers.begin()
    }

    pub fn apply_manufacturers(&mut self, ticket: Ticket, items: Vec<Manufacturer>) -> bool {
        self.manufacturers.apply(ticket, items)
    }

    /// `None` when no manufacturer is selected.
    pub fn begin_models(&self) -> Option<(Ticket, i64)> {
        self.selected.manufacturer_id.map(|id| (self.models.begin(), id))
    }

    pub fn apply_models(&mut self, ticket: Ticket, items: Vec<CarModel>) -> bool {
        self.models.apply(ticket, items)
    }

    /// `None` when no model is selected.
    pub fn begin_generations(&self) -> Option<(Ticket, i64)> {
        self.selected.car_model_id.map(|id| (self.generations.begin(), id))
    }

    pub fn apply_generations(&mut self, ticket: Ticket, items: Vec<Generation>) -> bool {
        self.generations.apply(ticket, items)
    }

    /// `None` when no generation is selected.
    pub fn begin_modifications(&self) -> Option<(Ticket, i64)> {
        self.selected.generation_id.map(|id| (self.modifications.begin(), id))
    }

    pub fn apply_modifications(&mut self, ticket: Ticket, items: Vec<Modification>) -> bool {
        self.modifications.apply(ticket, items)
    }

    // -------------------------------------------------------------------------
    // fetch helpers
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns the gateway error; the option list is left as it was.
    pub async fn refresh_manufacturers(&mut self, gateway: &Gateway) -> Result<bool, ApiError> {
        let ticket = self.begin_manufacturers();
        let items = catalog::get_all::<Manufacturer>(gateway).await?;
        Ok(self.apply_manufacturers(ticket, items))
    }

    /// # Errors
    ///
    /// Returns the gateway error; the option list is left as it was.
    pub async fn refresh_models(&mut self, gateway: &Gateway) -> Result<bool, ApiError> {
        let Some((ticket, id)) = self.begin_models() else {
            return Ok(false);
        };
        let items = catalog::models_by_manufacturer(gateway, id).await?;
        Ok(self.apply_models(ticket, items))
    }

    /// # Errors
    ///
    /// Returns the gateway error; the option list is left as it was.
    pub async fn refresh_generations(&mut self, gateway: &Gateway) -> Result<bool, ApiError> {
        let Some((ticket, id)) = self.begin_generations() else {
            return Ok(false);
        };
        let items = catalog::generations_by_model(gateway, id).await?;
        Ok(self.apply_generations(ticket, items))
    }

    /// # Errors
    ///
    /// Returns the gateway error; the option list is left as it was.
    pub async fn refresh_modifications(&mut self, gateway: &Gateway) -> Result<bool, ApiError> {
        let Some((ticket, id)) = self.begin_modifications() else {
            return Ok(false);
        };
        let items = catalog::modifications_by_generation(gateway, id).await?;
        Ok(self.apply_modifications(ticket, items))
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
