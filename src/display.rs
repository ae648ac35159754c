//! CLI rendering of platforms, form states and composed commands

use owo_colors::OwoColorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, Width, object::Rows},
};

use crate::form::{Control, ControlId, Form, FunkCommand};
use crate::models::{InputType, Platform};

/// Table row for the platform listing
#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "Site")]
    site: String,

    #[tabled(rename = "Clusters")]
    clusters: String,

    #[tabled(rename = "#")]
    count: usize,
}

/// Format the sites and clusters of a platform
pub fn format_platform(platform: &Platform) -> String {
    let mut sites: Vec<_> = platform.sites.iter().collect();
    sites.sort_by(|a, b| a.name.cmp(&b.name));

    let rows: Vec<SiteRow> = sites
        .iter()
        .map(|site| {
            let mut clusters = site.clusters.clone();
            clusters.sort();
            SiteRow {
                site: site.name.bold().to_string(),
                clusters: clusters.join(", "),
                count: clusters.len(),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Width::wrap(120).keep_words(true))
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    let mut output = format!(
        "\n{} {} sites, {} clusters\n\n",
        platform.name.bold().blue(),
        platform.sites.len(),
        platform.cluster_count()
    );
    output.push_str(&table.to_string());
    output
}

/// Table row for the control state listing
#[derive(Tabled)]
struct ControlRow {
    #[tabled(rename = "Element")]
    element: String,

    #[tabled(rename = "Kind")]
    kind: &'static str,

    #[tabled(rename = "Input")]
    input: String,

    #[tabled(rename = "State")]
    state: String,
}

fn kind_label(id: ControlId) -> &'static str {
    match id {
        ControlId::Grid => "grid",
        ControlId::Site(_) => "site",
        ControlId::Cluster { .. } => "cluster",
        ControlId::Walltime | ControlId::StartDate | ControlId::EndDate | ControlId::Charter => {
            "time"
        }
        ControlId::Subnet | ControlId::Kavlan => "network",
        ControlId::SubmissionOpts | ControlId::Autoreservation => "job",
    }
}

/// Checkbox glyph with lock marker, or the typed value for text inputs
fn format_control_state(control: &Control) -> String {
    let state = match control.input_type {
        InputType::Checkbox if control.checked => "[x]".green().to_string(),
        InputType::Checkbox => "[ ]".to_string(),
        InputType::Text if control.value.is_empty() => "-".bright_black().to_string(),
        InputType::Text => control.value.clone(),
    };
    if control.disabled {
        format!("{} {}", state, "(locked)".bright_black())
    } else {
        state
    }
}

/// Format every control of the form with its input type and state
pub fn format_form_state(form: &Form) -> String {
    let rows: Vec<ControlRow> = form
        .resource_ids()
        .into_iter()
        .chain(ControlId::TIME)
        .chain(ControlId::OPTIONS)
        .filter_map(|id| form.control(id).map(|control| (id, control)))
        .map(|(id, control)| ControlRow {
            element: match id {
                ControlId::Cluster { .. } => format!("  {}", control.name),
                _ => control.name.clone(),
            },
            kind: kind_label(id),
            input: control.input_type.to_string(),
            state: format_control_state(control),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    format!(
        "\n{}: {} ({})\n\n{}",
        "Mode".green(),
        form.mode().as_str().bold(),
        form.mode().description(),
        table
    )
}

/// Format the composed command with any warnings collected on the way
pub fn format_command(command: &FunkCommand, warnings: &[String]) -> String {
    let mut output = String::new();
    for warning in warnings {
        output.push_str(&format!("{} {}\n", "Warning:".yellow().bold(), warning));
    }
    output.push_str(&format!(
        "\n{}: {}\n",
        "Resources".green(),
        command.resources
    ));
    output.push_str(&format!(
        "{}: {}\n",
        "Walltime".green(),
        command.walltime
    ));
    output.push_str(&format!(
        "{}: {} -> {}\n",
        "Period".green(),
        command.start_date,
        command.end_date.as_deref().unwrap_or("(start + walltime)")
    ));
    let options = command_options(command);
    if !options.is_empty() {
        output.push_str(&format!("{}: {}\n", "Options".green(), options.join(", ")));
    }
    output.push('\n');
    output.push_str(&format!("{}\n", command.to_command_line().bold()));
    output
}

/// Human readable reservation options of a command
fn command_options(command: &FunkCommand) -> Vec<String> {
    let mut options = Vec::new();
    if command.charter {
        options.push("avoid charter periods".to_string());
    }
    if command.kavlan {
        options.push("KaVLAN".to_string());
    }
    if let Some(subnet) = &command.subnet {
        options.push(format!("subnet {subnet}"));
    }
    if let Some(opts) = &command.submission_opts {
        options.push(format!("submission options '{opts}'"));
    }
    if command.autoreservation {
        options.push("reserve automatically".to_string());
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::test_support::{small_form, small_platform};
    use crate::models::Mode;

    #[test]
    fn test_format_platform_lists_sites() {
        let output = format_platform(&small_platform());
        assert!(output.contains("rennes"));
        assert!(output.contains("paradent, parapluie"));
        assert!(output.contains("2 sites, 3 clusters"));
    }

    #[test]
    fn test_format_control_state_locked_checkbox() {
        let mut control = Control::checkbox("paradent");
        control.force(true, true);
        let state = format_control_state(&control);
        assert!(state.contains("[x]"));
        assert!(state.contains("(locked)"));
    }

    #[test]
    fn test_format_control_state_text_value() {
        let control = Control::text("grid5000", "100");
        assert_eq!(format_control_state(&control), "100");
    }

    #[test]
    fn test_format_form_state_includes_every_control() {
        let form = small_form(Mode::Free);
        let output = format_form_state(&form);
        for name in [
            "grid5000",
            "rennes",
            "paradent",
            "stremi",
            "walltime",
            "end_date_picker",
            "charter",
            "subnet",
            "kavlan",
            "submission_opts",
            "autoreservation",
        ] {
            assert!(output.contains(name), "missing {name}");
        }
        assert!(output.contains("network"));
        assert!(output.contains("text"));
    }

    #[test]
    fn test_format_command_lists_options() {
        let mut form = small_form(Mode::Date);
        form.click(ControlId::Grid);
        let command = FunkCommand::from_form(&form, "FUNK").unwrap();
        assert!(!format_command(&command, &[]).contains("Options"));

        form.click(ControlId::Kavlan);
        form.set_value(ControlId::Subnet, "slash_22=1").unwrap();
        let command = FunkCommand::from_form(&form, "FUNK").unwrap();
        let output = format_command(&command, &["counts ignored".to_string()]);
        assert!(output.contains("KaVLAN, subnet slash_22=1"));
        assert!(output.contains("counts ignored"));
        assert!(output.contains("-k -n slash_22=1"));
    }
}
