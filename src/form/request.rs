//! Resource requests: the `-r element[:n_nodes],...` list.
//!
//! A request can be read out of a form (what the user ticked or typed), parsed
//! from a command line string, or pushed back into a form through the
//! cascade handlers. [`FunkCommand`] composes the final `funk` invocation.

use std::fmt;

use serde::Serialize;

use crate::formatting::{normalize_walltime, parse_oar_date, shell_quote};
use crate::models::Mode;

use super::{ControlId, Form, FormError, RequestError, RequestResult};

/// Default job name passed to the OAR sub-jobs
pub const DEFAULT_JOB_NAME: &str = "FUNK";

/// One element of a resource list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceEntry {
    pub element: String,
    /// Node count; only meaningful in free mode
    pub nodes: Option<u32>,
}

impl fmt::Display for ResourceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.nodes {
            Some(nodes) => write!(f, "{}:{}", self.element, nodes),
            None => f.write_str(&self.element),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResourceRequest {
    entries: Vec<ResourceEntry>,
}

impl fmt::Display for ResourceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

fn parse_node_count(element: &str, value: &str) -> RequestResult<u32> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| RequestError::InvalidNodeCount {
            element: element.to_string(),
            value: value.to_string(),
        })
}

impl ResourceRequest {
    /// Parse a comma separated list of `element` or `element:n_nodes`
    pub fn parse(list: &str) -> RequestResult<Self> {
        let mut entries = Vec::new();
        for raw in list.split(',') {
            let raw = raw.trim();
            let (element, nodes) = match raw.split_once(':') {
                Some((element, count)) => {
                    let element = element.trim();
                    (element, Some(parse_node_count(element, count)?))
                }
                None => (raw, None),
            };
            if element.is_empty() {
                return Err(RequestError::EmptyElement(list.to_string()));
            }
            entries.push(ResourceEntry {
                element: element.to_string(),
                nodes,
            });
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    #[must_use]
    pub fn has_node_counts(&self) -> bool {
        self.entries.iter().any(|e| e.nodes.is_some())
    }

    /// Drop every node count
    #[must_use]
    pub fn without_node_counts(mut self) -> Self {
        for entry in &mut self.entries {
            entry.nodes = None;
        }
        self
    }

    /// Check the request against `mode`.
    ///
    /// Free mode needs a node count on every element. Other modes ignore
    /// counts; a warning is returned for each one given.
    pub fn validate_for(&self, mode: &Mode) -> RequestResult<Vec<String>> {
        if self.entries.is_empty() {
            return Err(RequestError::EmptySelection);
        }

        if mode.is_free() {
            if let Some(entry) = self.entries.iter().find(|e| e.nodes.is_none()) {
                return Err(RequestError::MissingNodeCount(entry.element.clone()));
            }
            return Ok(Vec::new());
        }

        Ok(self
            .entries
            .iter()
            .filter(|e| e.nodes.is_some())
            .map(|e| {
                format!(
                    "'{}' gives a number of nodes, which is only used in free mode; it will be ignored",
                    e
                )
            })
            .collect())
    }
}

impl Form {
    /// Read the current selection as a resource request.
    ///
    /// Checkbox modes list the grid when it is checked, otherwise each checked
    /// site, and the checked clusters of unchecked sites. Free mode lists
    /// every control with a node count typed in.
    pub fn collect_request(&self) -> RequestResult<ResourceRequest> {
        let mut entries = Vec::new();

        if self.mode().is_free() {
            let mut push_count = |name: &str, value: &str| -> RequestResult<()> {
                if !value.trim().is_empty() {
                    entries.push(ResourceEntry {
                        element: name.to_string(),
                        nodes: Some(parse_node_count(name, value)?),
                    });
                }
                Ok(())
            };

            push_count(&self.grid().name, &self.grid().value)?;
            for control in self.elements() {
                push_count(&control.name, &control.value)?;
            }
        } else {
            let mut push = |name: &str| {
                entries.push(ResourceEntry {
                    element: name.to_string(),
                    nodes: None,
                });
            };

            if self.grid().checked {
                push(&self.grid().name);
            } else {
                for site in self.sites() {
                    if site.control.checked {
                        push(site.name());
                    } else {
                        site.clusters
                            .iter()
                            .filter(|c| c.checked)
                            .for_each(|c| push(&c.name));
                    }
                }
            }
        }

        if entries.is_empty() {
            return Err(RequestError::EmptySelection);
        }
        Ok(ResourceRequest { entries })
    }

    /// Push a request into the form the way a user would: ticking boxes
    /// (which fires the cascade) or typing node counts in free mode.
    ///
    /// Every element is resolved before anything is changed.
    pub fn apply_request(&mut self, request: &ResourceRequest) -> RequestResult<()> {
        request.validate_for(self.mode())?;

        let targets = request
            .entries()
            .iter()
            .map(|entry| {
                self.find_element(&entry.element)
                    .map(|id| (id, entry.nodes))
                    .ok_or_else(|| FormError::UnknownElement(entry.element.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (id, nodes) in targets {
            if self.mode().is_free() {
                if let Some(nodes) = nodes {
                    self.set_value(id, nodes.to_string())?;
                }
            } else if self.control(id).is_some_and(|c| !c.checked) && !self.click(id) {
                tracing::debug!(?id, "element already covered by a locked parent");
            }
        }
        Ok(())
    }
}

fn checked_date(field: &'static str, value: &str) -> RequestResult<String> {
    let value = value.trim();
    if !value.is_empty() && parse_oar_date(value).is_none() {
        return Err(RequestError::InvalidDate {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Check a subnet request: `param` for every site, or `site:param` items.
/// Each `param` reads `slash_NN=count`.
fn checked_subnet(value: &str) -> RequestResult<Option<String>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let valid = value.split(',').all(|item| {
        let param = match item.split_once(':') {
            Some((site, param)) if !site.trim().is_empty() => param,
            Some(_) => return false,
            None => item,
        };
        param.trim().split_once('=').is_some_and(|(size, count)| {
            size.strip_prefix("slash_")
                .is_some_and(|bits| bits.parse::<u8>().is_ok_and(|b| (1..=32).contains(&b)))
                && count.parse::<u32>().is_ok_and(|n| n > 0)
        })
    });

    if valid {
        Ok(Some(value.to_string()))
    } else {
        Err(RequestError::InvalidSubnet(value.to_string()))
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// A complete `funk` invocation built from a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunkCommand {
    pub mode: Mode,
    pub walltime: String,
    pub start_date: String,
    /// None when the end-date picker is disabled (date mode)
    pub end_date: Option<String>,
    pub charter: bool,
    pub resources: ResourceRequest,
    pub kavlan: bool,
    pub subnet: Option<String>,
    pub job_name: String,
    pub submission_opts: Option<String>,
    pub autoreservation: bool,
}

impl FunkCommand {
    pub fn from_form(form: &Form, job_name: &str) -> RequestResult<Self> {
        let resources = form.collect_request()?;

        let walltime_raw = &form.walltime().value;
        let walltime = normalize_walltime(walltime_raw)
            .ok_or_else(|| RequestError::InvalidWalltime(walltime_raw.clone()))?;

        let start_date = checked_date("start date", &form.start_date_picker().value)?;

        let end_picker = form.end_date_picker();
        let end_date = if end_picker.disabled || end_picker.value.trim().is_empty() {
            None
        } else {
            Some(checked_date("end date", &end_picker.value)?)
        };

        Ok(Self {
            mode: form.mode().clone(),
            walltime,
            start_date,
            end_date,
            charter: form.charter().checked,
            resources,
            kavlan: form.kavlan().checked,
            subnet: checked_subnet(&form.subnet().value)?,
            job_name: job_name.to_string(),
            submission_opts: non_empty(&form.submission_opts().value),
            autoreservation: form.autoreservation().checked,
        })
    }

    /// Command line arguments, without the program name
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "-m".to_string(),
            self.mode.to_string(),
            "-w".to_string(),
            self.walltime.clone(),
        ];
        if !self.start_date.is_empty() {
            args.push("-s".to_string());
            args.push(self.start_date.clone());
        }
        if let Some(end) = &self.end_date {
            args.push("-e".to_string());
            args.push(end.clone());
        }
        if self.charter {
            args.push("-c".to_string());
        }
        args.push("-r".to_string());
        args.push(self.resources.to_string());
        if self.kavlan {
            args.push("-k".to_string());
        }
        if let Some(subnet) = &self.subnet {
            args.push("-n".to_string());
            args.push(subnet.clone());
        }
        if !self.job_name.is_empty() && self.job_name != DEFAULT_JOB_NAME {
            args.push("-j".to_string());
            args.push(self.job_name.clone());
        }
        if let Some(opts) = &self.submission_opts {
            args.push("-o".to_string());
            args.push(opts.clone());
        }
        if self.autoreservation {
            args.push("-y".to_string());
        }
        args
    }

    /// Shell-ready command line
    #[must_use]
    pub fn to_command_line(&self) -> String {
        std::iter::once("funk".to_string())
            .chain(self.args().iter().map(|a| shell_quote(a)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for FunkCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_command_line())
    }
}
