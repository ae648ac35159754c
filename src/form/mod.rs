//! Resource selection form.
//!
//! The form is the element tree the cascade handlers operate on:
//!
//! ```text
//! mode selector
//! grid5000                    (root resource group)
//! elements
//!  ├── site ──┬── cluster
//!  │          └── cluster
//!  └── site ──── cluster
//! walltime / start date / end date pickers, charter
//! network: subnet, kavlan
//! job options: submission options, autoreservation
//! ```
//!
//! The option controls sit outside the elements collection: mode changes
//! never switch their input type.
//!
//! All state lives in the controls themselves. Handlers live in
//! [`controller`], request building in [`request`].

pub mod controller;
mod error;
pub mod request;

pub use error::{FormError, FormResult, RequestError, RequestResult};
pub use request::{FunkCommand, ResourceRequest};

use std::collections::HashMap;

use chrono::Local;
use serde::Serialize;

use crate::formatting::{DEFAULT_WALLTIME, default_end_date, default_start_date};
use crate::models::{InputType, Mode, Platform};
use crate::utils::find_key_ignore_case;

/// A single input of the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Control {
    pub name: String,
    pub input_type: InputType,
    pub checked: bool,
    pub disabled: bool,
    /// Text entry (node count in free mode, date or walltime for time controls)
    pub value: String,
}

impl Control {
    #[must_use]
    pub fn checkbox(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input_type: InputType::Checkbox,
            checked: false,
            disabled: false,
            value: String::new(),
        }
    }

    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input_type: InputType::Text,
            checked: false,
            disabled: false,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn is_checkbox(&self) -> bool {
        self.input_type == InputType::Checkbox
    }

    /// Force both boolean flags at once
    pub fn force(&mut self, checked: bool, disabled: bool) {
        self.checked = checked;
        self.disabled = disabled;
    }
}

/// A site and the clusters nested under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Site {
    pub control: Control,
    pub clusters: Vec<Control>,
}

impl Site {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.control.name
    }

    #[cfg(test)]
    fn cluster_position(&self, name: &str) -> Option<usize> {
        self.clusters.iter().position(|c| c.name == name)
    }
}

/// Address of a control inside the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    Grid,
    Site(usize),
    Cluster { site: usize, cluster: usize },
    Walltime,
    StartDate,
    EndDate,
    Charter,
    Subnet,
    Kavlan,
    SubmissionOpts,
    Autoreservation,
}

impl ControlId {
    /// Walltime and date pickers
    pub const TIME: [ControlId; 3] = [ControlId::Walltime, ControlId::StartDate, ControlId::EndDate];

    /// Reservation options, in page order
    pub const OPTIONS: [ControlId; 5] = [
        ControlId::Charter,
        ControlId::Subnet,
        ControlId::Kavlan,
        ControlId::SubmissionOpts,
        ControlId::Autoreservation,
    ];
}

/// The element tree
#[derive(Debug, Clone)]
pub struct Form {
    mode: Mode,
    grid: Control,
    sites: Vec<Site>,
    site_index: HashMap<String, usize>,
    walltime: Control,
    start_date_picker: Control,
    end_date_picker: Control,
    charter: Control,
    subnet: Control,
    kavlan: Control,
    submission_opts: Control,
    autoreservation: Control,
}

impl Form {
    /// Render a form from a platform description.
    ///
    /// Sites and clusters are sorted by name. The mode handler is applied once
    /// so the initial rendering matches `mode`.
    pub fn from_platform(platform: &Platform, mode: Mode) -> FormResult<Self> {
        let mut site_specs: Vec<_> = platform.sites.iter().collect();
        site_specs.sort_by(|a, b| a.name.cmp(&b.name));

        let mut sites = Vec::with_capacity(site_specs.len());
        let mut site_index = HashMap::with_capacity(site_specs.len());

        for spec in site_specs {
            if site_index.insert(spec.name.clone(), sites.len()).is_some() {
                return Err(FormError::DuplicateSite(spec.name.clone()));
            }
            let mut clusters: Vec<Control> =
                spec.clusters.iter().map(Control::checkbox).collect();
            clusters.sort_by(|a, b| a.name.cmp(&b.name));
            sites.push(Site {
                control: Control::checkbox(&spec.name),
                clusters,
            });
        }

        let now = Local::now();
        let mut form = Self {
            mode: mode.clone(),
            grid: Control::checkbox(&platform.name),
            sites,
            site_index,
            walltime: Control::text("walltime", DEFAULT_WALLTIME),
            start_date_picker: Control::text("start_date_picker", default_start_date(now)),
            end_date_picker: Control::text("end_date_picker", default_end_date(now)),
            charter: Control::checkbox("charter"),
            subnet: Control::text("subnet", ""),
            kavlan: Control::checkbox("kavlan"),
            submission_opts: Control::text("submission_opts", ""),
            autoreservation: Control::checkbox("autoreservation"),
        };
        form.on_mode_change(mode);
        Ok(form)
    }

    /// Current value of the mode selector
    #[must_use]
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    #[must_use]
    pub fn grid(&self) -> &Control {
        &self.grid
    }

    #[cfg(test)]
    pub fn grid_mut(&mut self) -> &mut Control {
        &mut self.grid
    }

    #[must_use]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Look a site up by its exact name
    #[must_use]
    pub fn site(&self, name: &str) -> Option<&Site> {
        self.site_index.get(name).map(|&idx| &self.sites[idx])
    }

    #[cfg(test)]
    pub fn site_mut(&mut self, name: &str) -> FormResult<&mut Site> {
        let idx = self.site_position(name)?;
        Ok(&mut self.sites[idx])
    }

    pub(crate) fn site_position(&self, name: &str) -> FormResult<usize> {
        self.site_index
            .get(name)
            .copied()
            .ok_or_else(|| FormError::UnknownSite(name.to_string()))
    }

    #[cfg(test)]
    pub(crate) fn cluster_position(&self, site: &str, cluster: &str) -> FormResult<(usize, usize)> {
        let site_idx = self.site_position(site)?;
        let cluster_idx = self.sites[site_idx]
            .cluster_position(cluster)
            .ok_or_else(|| FormError::UnknownElement(cluster.to_string()))?;
        Ok((site_idx, cluster_idx))
    }

    #[must_use]
    pub fn walltime(&self) -> &Control {
        &self.walltime
    }

    #[must_use]
    pub fn start_date_picker(&self) -> &Control {
        &self.start_date_picker
    }

    #[must_use]
    pub fn end_date_picker(&self) -> &Control {
        &self.end_date_picker
    }

    /// Avoid charter periods, running only at night and on week-ends
    #[must_use]
    pub fn charter(&self) -> &Control {
        &self.charter
    }

    /// Subnet request, `slash_22=1` or `site:slash_22=1,...`
    #[must_use]
    pub fn subnet(&self) -> &Control {
        &self.subnet
    }

    #[must_use]
    pub fn kavlan(&self) -> &Control {
        &self.kavlan
    }

    /// Extra options passed through to oarsub/oargridsub
    #[must_use]
    pub fn submission_opts(&self) -> &Control {
        &self.submission_opts
    }

    /// Perform the reservation as soon as a slot is found
    #[must_use]
    pub fn autoreservation(&self) -> &Control {
        &self.autoreservation
    }

    /// Every control registered under the elements container: sites and
    /// their clusters.
    pub fn elements(&self) -> impl Iterator<Item = &Control> {
        self.sites
            .iter()
            .flat_map(|site| std::iter::once(&site.control).chain(site.clusters.iter()))
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Control> {
        self.sites
            .iter_mut()
            .flat_map(|Site { control, clusters }| std::iter::once(control).chain(clusters.iter_mut()))
    }

    #[must_use]
    pub fn control(&self, id: ControlId) -> Option<&Control> {
        match id {
            ControlId::Grid => Some(&self.grid),
            ControlId::Site(idx) => self.sites.get(idx).map(|s| &s.control),
            ControlId::Cluster { site, cluster } => {
                self.sites.get(site).and_then(|s| s.clusters.get(cluster))
            }
            ControlId::Walltime => Some(&self.walltime),
            ControlId::StartDate => Some(&self.start_date_picker),
            ControlId::EndDate => Some(&self.end_date_picker),
            ControlId::Charter => Some(&self.charter),
            ControlId::Subnet => Some(&self.subnet),
            ControlId::Kavlan => Some(&self.kavlan),
            ControlId::SubmissionOpts => Some(&self.submission_opts),
            ControlId::Autoreservation => Some(&self.autoreservation),
        }
    }

    pub(crate) fn control_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        match id {
            ControlId::Grid => Some(&mut self.grid),
            ControlId::Site(idx) => self.sites.get_mut(idx).map(|s| &mut s.control),
            ControlId::Cluster { site, cluster } => self
                .sites
                .get_mut(site)
                .and_then(|s| s.clusters.get_mut(cluster)),
            ControlId::Walltime => Some(&mut self.walltime),
            ControlId::StartDate => Some(&mut self.start_date_picker),
            ControlId::EndDate => Some(&mut self.end_date_picker),
            ControlId::Charter => Some(&mut self.charter),
            ControlId::Subnet => Some(&mut self.subnet),
            ControlId::Kavlan => Some(&mut self.kavlan),
            ControlId::SubmissionOpts => Some(&mut self.submission_opts),
            ControlId::Autoreservation => Some(&mut self.autoreservation),
        }
    }

    /// Resolve a resource element name (grid, site or cluster),
    /// case-insensitively.
    #[must_use]
    pub fn find_element(&self, name: &str) -> Option<ControlId> {
        if self.grid.name.eq_ignore_ascii_case(name) {
            return Some(ControlId::Grid);
        }

        if let Some(key) = find_key_ignore_case(self.site_index.keys(), name) {
            return self.site_index.get(key).map(|&idx| ControlId::Site(idx));
        }

        self.sites.iter().enumerate().find_map(|(site_idx, site)| {
            site.clusters
                .iter()
                .position(|c| c.name.eq_ignore_ascii_case(name))
                .map(|cluster_idx| ControlId::Cluster {
                    site: site_idx,
                    cluster: cluster_idx,
                })
        })
    }

    /// Flattened control order used for display: grid, then each site
    /// followed by its clusters.
    #[must_use]
    pub fn resource_ids(&self) -> Vec<ControlId> {
        let mut ids = Vec::with_capacity(1 + self.sites.len() * 4);
        ids.push(ControlId::Grid);
        for (site_idx, site) in self.sites.iter().enumerate() {
            ids.push(ControlId::Site(site_idx));
            ids.extend((0..site.clusters.len()).map(|cluster| ControlId::Cluster {
                site: site_idx,
                cluster,
            }));
        }
        ids
    }

    /// Serializable view of the whole tree
    #[must_use]
    pub fn snapshot(&self) -> FormSnapshot<'_> {
        FormSnapshot {
            mode: self.mode.as_str(),
            grid: &self.grid,
            sites: &self.sites,
            walltime: &self.walltime,
            start_date_picker: &self.start_date_picker,
            end_date_picker: &self.end_date_picker,
            charter: &self.charter,
            subnet: &self.subnet,
            kavlan: &self.kavlan,
            submission_opts: &self.submission_opts,
            autoreservation: &self.autoreservation,
        }
    }
}

/// JSON rendering of a form (`funk resolve --json`)
#[derive(Debug, Serialize)]
pub struct FormSnapshot<'a> {
    pub mode: &'a str,
    pub grid: &'a Control,
    pub sites: &'a [Site],
    pub walltime: &'a Control,
    pub start_date_picker: &'a Control,
    pub end_date_picker: &'a Control,
    pub charter: &'a Control,
    pub subnet: &'a Control,
    pub kavlan: &'a Control,
    pub submission_opts: &'a Control,
    pub autoreservation: &'a Control,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::SiteSpec;

    /// Small platform: rennes [paradent, parapluie], reims [stremi]
    pub fn small_platform() -> Platform {
        Platform {
            name: "grid5000".to_string(),
            sites: vec![
                SiteSpec {
                    name: "rennes".to_string(),
                    clusters: vec!["parapluie".to_string(), "paradent".to_string()],
                },
                SiteSpec {
                    name: "reims".to_string(),
                    clusters: vec!["stremi".to_string()],
                },
            ],
        }
    }

    pub fn small_form(mode: Mode) -> Form {
        Form::from_platform(&small_platform(), mode).unwrap()
    }
}
