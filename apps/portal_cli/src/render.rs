//! Plain-text rendering of controller state.

use client_core::{ControllerEvent, NotificationLevel, SearchSnapshot, SearchStatus};
use shared::{
    filters::{format_gpa, FilterChip},
    protocol::{CandidateSummary, FilterOptions},
};

pub fn format_chips(chips: &[FilterChip]) -> String {
    if chips.is_empty() {
        return "Active filters: none".to_string();
    }
    let labels: Vec<String> = chips
        .iter()
        .map(|chip| format!("[{}: {} ×]", chip.field, chip.label))
        .collect();
    format!("Active filters: {}", labels.join(" "))
}

pub fn format_candidate(candidate: &CandidateSummary) -> String {
    let mut line = format!("#{} {}", candidate.alumni_id, candidate.full_name);
    if !candidate.email.is_empty() {
        line.push_str(&format!(" <{}>", candidate.email));
    }
    if !candidate.major.is_empty() {
        line.push_str(&format!(" | {}", candidate.major));
    }
    if let Some(gpa) = candidate.gpa {
        line.push_str(&format!(" | GPA {}", format_gpa(gpa)));
    }
    if let Some(year) = candidate.grad_year {
        line.push_str(&format!(" | class of {year}"));
    }
    match (&candidate.current_title, &candidate.current_company) {
        (Some(title), Some(company)) => line.push_str(&format!(" | {title} at {company}")),
        (None, Some(company)) => line.push_str(&format!(" | {company}")),
        (Some(title), None) => line.push_str(&format!(" | {title}")),
        (None, None) => {}
    }
    if let Some(industry) = &candidate.industry {
        line.push_str(&format!(" | {industry}"));
    }
    if let Some(years) = candidate.years_since_grad {
        line.push_str(&format!(" | {years} years"));
    }
    line
}

pub fn format_result_header(count: usize) -> String {
    match count {
        0 => "No candidates found. Try adjusting your search criteria.".to_string(),
        1 => "Found 1 candidate".to_string(),
        n => format!("Found {n} candidates"),
    }
}

pub fn print_results(results: &[CandidateSummary]) {
    println!("{}", format_result_header(results.len()));
    for candidate in results {
        println!("  {}", format_candidate(candidate));
    }
}

pub fn print_options(options: &FilterOptions) {
    let list = |values: &[String]| {
        if values.is_empty() {
            "(none)".to_string()
        } else {
            values.join(", ")
        }
    };
    println!("Majors: {}", list(&options.majors));
    if !options.skills.is_empty() {
        println!("Skills: {}", list(&options.skills));
    } else {
        println!("Industries: {}", list(&options.industries));
    }
}

pub fn print_snapshot(snapshot: &SearchSnapshot) {
    println!("{}", format_chips(&snapshot.chips));
    println!("Status: {}", status_label(snapshot.status));
    print_results(&snapshot.results);
}

pub fn status_label(status: SearchStatus) -> &'static str {
    match status {
        SearchStatus::Idle => "idle",
        SearchStatus::Loading => "searching candidates...",
        SearchStatus::Ready => "ready",
        SearchStatus::Failed => "failed",
    }
}

/// One-line description of an event, or `None` for events not worth printing.
pub fn describe_event(event: &ControllerEvent) -> Option<String> {
    match event {
        ControllerEvent::StatusChanged(SearchStatus::Loading) => {
            Some(status_label(SearchStatus::Loading).to_string())
        }
        ControllerEvent::StatusChanged(_) => None,
        ControllerEvent::ResultsReplaced { count, .. } => Some(format_result_header(*count)),
        ControllerEvent::OptionsLoaded { majors, secondary } => {
            Some(format!("Loaded {majors} majors and {secondary} secondary options"))
        }
        ControllerEvent::Notification(notification) => {
            let prefix = match notification.level() {
                NotificationLevel::Success => "ok",
                NotificationLevel::Error => "error",
            };
            Some(format!("{prefix}: {}", notification.message()))
        }
    }
}
