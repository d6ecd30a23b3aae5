//! Interactive session commands and their dispatch to the search controller.

use std::sync::Arc;

use client_core::{CandidateSearchController, SearchTicket};
use shared::domain::FilterField;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiIntent {
    SetFilter { field: FilterField, value: String },
    RemoveChip(FilterField),
    Clear,
    Search,
    Show,
    Help,
    Quit,
}

impl UiIntent {
    pub fn name(&self) -> &'static str {
        match self {
            UiIntent::SetFilter { .. } => "set_filter",
            UiIntent::RemoveChip(_) => "remove_chip",
            UiIntent::Clear => "clear",
            UiIntent::Search => "search",
            UiIntent::Show => "show",
            UiIntent::Help => "help",
            UiIntent::Quit => "quit",
        }
    }
}

pub const HELP: &str = "\
commands:
  set <field> <value>   update a filter (major, industry, minGpa, minExperienceYears, keyword)
  remove <field>        drop an active filter and search again
  clear                 reset all filters and search again
  search                run the search with the current filters
  show                  print filters, status and results
  help                  this text
  quit                  leave the session";

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_intent(line: &str) -> Result<Option<UiIntent>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let parse_field = |raw: &str| raw.parse::<FilterField>().map_err(|err| err.to_string());

    let intent = match command.to_ascii_lowercase().as_str() {
        "set" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None if !rest.is_empty() => (rest, ""),
                None => return Err("usage: set <field> <value>".to_string()),
            };
            UiIntent::SetFilter {
                field: parse_field(field)?,
                value: value.to_string(),
            }
        }
        "remove" | "rm" => {
            if rest.is_empty() {
                return Err("usage: remove <field>".to_string());
            }
            UiIntent::RemoveChip(parse_field(rest)?)
        }
        "clear" => UiIntent::Clear,
        "search" | "go" => UiIntent::Search,
        "show" => UiIntent::Show,
        "help" | "?" => UiIntent::Help,
        "quit" | "exit" => UiIntent::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(intent))
}

/// Applies an intent. Searches are issued here, in input order, and awaited on
/// a spawned task so the prompt stays responsive.
///
/// Returns false when the session should end.
pub fn dispatch_intent(controller: &Arc<CandidateSearchController>, intent: UiIntent) -> bool {
    tracing::debug!(intent = intent.name(), "dispatching ui intent");

    match intent {
        UiIntent::SetFilter { field, value } => controller.set_filter(field, &value),
        UiIntent::RemoveChip(field) => {
            spawn_search(controller, controller.begin_remove_filter_chip(field))
        }
        UiIntent::Clear => spawn_search(controller, controller.begin_clear_filters()),
        UiIntent::Search => spawn_search(controller, controller.begin_search()),
        UiIntent::Show => crate::render::print_snapshot(&controller.snapshot()),
        UiIntent::Help => println!("{HELP}"),
        UiIntent::Quit => return false,
    }
    true
}

fn spawn_search(controller: &Arc<CandidateSearchController>, ticket: SearchTicket) {
    let controller = Arc::clone(controller);
    tokio::spawn(async move {
        controller.finish_search(ticket).await;
    });
}
