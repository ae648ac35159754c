//! Selection cascade controller.
//!
//! Event handlers wired to the form controls:
//! - [`Form::on_mode_change`]: mode selector changed
//! - [`Form::on_grid_toggle`]: grid checkbox clicked
//! - [`Form::on_site_toggle`]: site checkbox clicked
//!
//! Handlers keep no state of their own. They read the current mode and the
//! triggering control from the tree and push the resulting state down into
//! the child controls before returning.

use crate::models::Mode;

use super::{ControlId, Form, FormError, FormResult};

impl Form {
    /// Mode selector changed.
    ///
    /// Switches the grid and every control of the elements collection to the
    /// input type of `mode`, and disables the end-date picker in date mode.
    pub fn on_mode_change(&mut self, mode: Mode) {
        let input_type = mode.input_type();
        tracing::debug!(mode = %mode, input_type = %input_type, "mode changed");

        self.grid.input_type = input_type;
        for control in self.elements_mut() {
            control.input_type = input_type;
        }
        self.end_date_picker.disabled = mode.locks_end_date();
        self.mode = mode;
    }

    /// Grid checkbox changed: check and lock every site, or release them all.
    pub fn on_grid_toggle(&mut self) {
        if self.mode.is_free() {
            return;
        }

        let checked = self.grid.checked;
        tracing::debug!(checked, sites = self.sites.len(), "grid toggled");

        for idx in 0..self.sites.len() {
            // checked grid: sites locked; unchecked grid: sites released and cleared
            self.sites[idx].control.force(checked, checked);
            self.cascade_site(idx, !checked);
        }
    }

    /// Site checkbox changed.
    ///
    /// A checked site locks all its clusters. An unchecked site unchecks the
    /// grid and releases its clusters, clearing them when `clear` is set or
    /// when the site has a single cluster.
    pub fn on_site_toggle(&mut self, site: &str, clear: bool) -> FormResult<()> {
        let idx = self.site_position(site)?;
        self.on_site_toggle_at(idx, clear);
        Ok(())
    }

    /// [`Form::on_site_toggle`] for a site already resolved to its position
    pub(crate) fn on_site_toggle_at(&mut self, idx: usize, clear: bool) {
        if self.mode.is_free() {
            return;
        }
        self.cascade_site(idx, clear);
    }

    fn cascade_site(&mut self, idx: usize, clear: bool) {
        let Some(site) = self.sites.get_mut(idx) else {
            return;
        };
        tracing::trace!(site = %site.control.name, checked = site.control.checked, clear, "site toggled");

        if site.control.checked {
            for cluster in &mut site.clusters {
                cluster.force(true, true);
            }
        } else {
            self.grid.checked = false;
            let clear = clear || site.clusters.len() == 1;
            for cluster in &mut site.clusters {
                cluster.disabled = false;
                if clear {
                    cluster.checked = false;
                }
            }
        }
    }

    /// Emulate a click on a control.
    ///
    /// Disabled controls and text inputs ignore clicks. Otherwise the
    /// checkbox flips and the handler wired to it fires (grid and sites
    /// only; clusters and options have none). Returns whether anything
    /// changed.
    pub fn click(&mut self, id: ControlId) -> bool {
        let Some(control) = self.control_mut(id) else {
            return false;
        };
        if control.disabled || !control.is_checkbox() {
            tracing::debug!(control = %control.name, "click ignored");
            return false;
        }
        control.checked = !control.checked;

        match id {
            ControlId::Grid => self.on_grid_toggle(),
            ControlId::Site(idx) => self.on_site_toggle_at(idx, false),
            _ => {}
        }
        true
    }

    /// Tick a checkbox control unless it already is, firing its handler
    pub fn check(&mut self, id: ControlId) -> bool {
        self.control(id).is_some_and(|c| !c.checked) && self.click(id)
    }

    #[cfg(test)]
    pub fn click_grid(&mut self) -> bool {
        self.click(ControlId::Grid)
    }

    #[cfg(test)]
    pub fn click_site(&mut self, site: &str) -> FormResult<bool> {
        let idx = self.site_position(site)?;
        Ok(self.click(ControlId::Site(idx)))
    }

    #[cfg(test)]
    pub fn click_cluster(&mut self, site: &str, cluster: &str) -> FormResult<bool> {
        let (site, cluster) = self.cluster_position(site, cluster)?;
        Ok(self.click(ControlId::Cluster { site, cluster }))
    }

    /// Replace the text value of a control
    pub fn set_value(&mut self, id: ControlId, value: impl Into<String>) -> FormResult<()> {
        let control = self
            .control_mut(id)
            .ok_or_else(|| FormError::UnknownElement(format!("{:?}", id)))?;
        if control.disabled {
            return Err(FormError::ControlDisabled(control.name.clone()));
        }
        control.value = value.into();
        Ok(())
    }
}
