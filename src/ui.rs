// UI layer: a simple interactive menu using `dialoguer`. Each selection
// runs exactly one client operation, prints the payload or the error,
// and loops back to the menu. Only "Exit" ends the loop.

use crate::api::GrafanaClient;
use crate::model::DeleteStatus;
use anyhow::Result;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

/// One menu entry. Kept separate from the raw `Select` index so the
/// dispatch mapping can be exercised without a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CreateSample,
    DeleteByUid,
    ShowInfo,
    UpdateSample,
    DeleteByPattern,
    ShowSettings,
    Exit,
}

impl MenuChoice {
    pub const LABELS: [&'static str; 7] = [
        "Create sample dashboard",
        "Delete dashboard by UID",
        "Show dashboard info",
        "Update sample dashboard",
        "Delete dashboards by title pattern",
        "Show settings",
        "Exit",
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::CreateSample),
            1 => Some(Self::DeleteByUid),
            2 => Some(Self::ShowInfo),
            3 => Some(Self::UpdateSample),
            4 => Some(Self::DeleteByPattern),
            5 => Some(Self::ShowSettings),
            6 => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Main interactive menu. Receives the client and runs a select loop
/// until the user chooses "Exit". Operation errors are printed, never
/// fatal.
pub fn main_menu(api: GrafanaClient) -> Result<()> {
    loop {
        let selection = Select::new()
            .items(&MenuChoice::LABELS)
            .default(0)
            .interact()?;
        let Some(choice) = MenuChoice::from_index(selection) else {
            continue;
        };
        match choice {
            MenuChoice::CreateSample => handle_create_sample(&api)?,
            MenuChoice::DeleteByUid => handle_delete(&api)?,
            MenuChoice::ShowInfo => handle_info(&api)?,
            MenuChoice::UpdateSample => handle_update(&api)?,
            MenuChoice::DeleteByPattern => handle_delete_by_pattern(&api)?,
            MenuChoice::ShowSettings => handle_settings(&api)?,
            MenuChoice::Exit => break,
        }
    }
    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message(message);
    spinner
}

fn handle_create_sample(api: &GrafanaClient) -> Result<()> {
    let title: String = Input::new()
        .with_prompt("Dashboard title (empty for a timestamped one)")
        .allow_empty(true)
        .interact_text()?;
    let title = title.trim().to_string();
    let pb = spinner("Creating sample dashboard...");
    let result = api.create_sample_dashboard(if title.is_empty() { None } else { Some(&title) });
    pb.finish_and_clear();
    match result {
        Ok(ack) => println!("Dashboard created with UID: {}", ack.uid),
        Err(e) => println!("Error creating dashboard: {e}"),
    }
    Ok(())
}

fn handle_delete(api: &GrafanaClient) -> Result<()> {
    let uid: String = Input::new().with_prompt("Dashboard UID").interact_text()?;
    let pb = spinner("Deleting...");
    let result = api.delete_dashboard(&uid);
    pb.finish_and_clear();
    match result {
        Ok(_) => println!("Dashboard with UID {uid} deleted successfully."),
        Err(e) => println!("Error deleting dashboard: {e}"),
    }
    Ok(())
}

fn handle_info(api: &GrafanaClient) -> Result<()> {
    let uid: String = Input::new().with_prompt("Dashboard UID").interact_text()?;
    let pb = spinner("Fetching dashboard...");
    let result = api.get_dashboard_by_uid(&uid);
    pb.finish_and_clear();
    match result {
        Ok(envelope) => {
            println!("Title: {}", envelope.dashboard.title);
            println!("UID:   {}", envelope.dashboard.uid.as_deref().unwrap_or("-"));
            println!("Version: {}", envelope.dashboard.version);
            println!("Panels:");
            for panel in &envelope.dashboard.panels {
                println!(
                    "- {} (type: {}, id: {})",
                    panel.title, panel.panel_type, panel.id
                );
            }
        }
        Err(e) => println!("Error retrieving dashboard info: {e}"),
    }
    Ok(())
}

fn handle_update(api: &GrafanaClient) -> Result<()> {
    let uid: String = Input::new().with_prompt("Dashboard UID").interact_text()?;
    let pb = spinner("Updating sample dashboard...");
    let result = api
        .get_dashboard_by_uid(&uid)
        .and_then(|envelope| api.update_sample_dashboard(&uid, &envelope.dashboard));
    pb.finish_and_clear();
    match result {
        Ok(ack) => println!("Dashboard updated with UID: {}", ack.uid),
        Err(e) => println!("Error updating dashboard: {e}"),
    }
    Ok(())
}

fn handle_delete_by_pattern(api: &GrafanaClient) -> Result<()> {
    let pattern: String = Input::new().with_prompt("Title pattern").interact_text()?;
    let pb = spinner("Deleting matching dashboards...");
    let result = api.delete_dashboards_by_title_pattern(&pattern);
    pb.finish_and_clear();
    match result {
        Ok(outcomes) if outcomes.is_empty() => println!("No dashboards matched '{pattern}'."),
        Ok(outcomes) => {
            for outcome in outcomes {
                match outcome.status {
                    DeleteStatus::Deleted => {
                        println!("deleted  {} (UID: {})", outcome.title, outcome.uid)
                    }
                    DeleteStatus::Error => println!(
                        "error    {} (UID: {}): {}",
                        outcome.title,
                        outcome.uid,
                        outcome.detail.unwrap_or_default()
                    ),
                }
            }
        }
        Err(e) => println!("Error searching dashboards: {e}"),
    }
    Ok(())
}

fn handle_settings(api: &GrafanaClient) -> Result<()> {
    let pb = spinner("Fetching settings...");
    let result = api.get_settings();
    pb.finish_and_clear();
    match result {
        Ok(settings) => println!("{}", serde_json::to_string_pretty(&settings)?),
        Err(e) => println!("Error retrieving settings: {e}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_maps_to_a_choice() {
        for index in 0..MenuChoice::LABELS.len() {
            assert!(MenuChoice::from_index(index).is_some());
        }
        assert_eq!(MenuChoice::from_index(MenuChoice::LABELS.len()), None);
    }

    #[test]
    fn exit_is_the_last_entry() {
        assert_eq!(
            MenuChoice::from_index(MenuChoice::LABELS.len() - 1),
            Some(MenuChoice::Exit)
        );
    }
}
