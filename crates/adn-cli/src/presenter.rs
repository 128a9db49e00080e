//! Terminal presenters for the review state
//!
//! Review commands publish a [`ReviewView`] on a [`PresentationBus`]; the
//! presenters subscribed here print it.

use adn_core::{PresentationBus, PresentationObserver, ReviewView};
use colored::Colorize;

/// Human readable view, one field per line
pub fn format_view(view: &ReviewView) -> String {
    let tags: Vec<&str> = view.tags.iter().collect();
    let mut lines = vec![
        format!("Document: {}", view.document),
        format!("  Stage:   {}", view.stage),
        format!("  First:   {}", view.first_decision),
        format!("  Second:  {}", view.second_decision),
        format!("  Tags:    {}", tags.join(", ")),
    ];

    let actions = offered_actions(view);
    if actions.is_empty() {
        lines.push("  Actions: none".to_string());
    } else {
        lines.push(format!("  Actions: {}", actions.join("; ")));
    }
    lines.join("\n")
}

fn offered_actions(view: &ReviewView) -> Vec<String> {
    let controls = &view.controls;
    let mut actions = Vec::new();
    if controls.first_decision_enabled {
        actions.push("review set --first".to_string());
    }
    if controls.second_decision_enabled {
        actions.push("review set --second".to_string());
    }
    if controls.can_begin_extraction {
        actions.push("review extract".to_string());
    }
    if let Some(regression) = controls.regression {
        actions.push(format!("review back ({})", regression.label()));
    }
    actions
}

/// Prints views as text
pub struct ConsolePresenter;

impl PresentationObserver<ReviewView> for ConsolePresenter {
    fn render(&mut self, view: &ReviewView) {
        let text = format_view(view);
        let mut lines = text.lines();
        if let Some(first) = lines.next() {
            println!("{}", first.bold());
        }
        for line in lines {
            println!("{line}");
        }
    }
}

/// Prints views as pretty JSON
pub struct JsonPresenter;

impl PresentationObserver<ReviewView> for JsonPresenter {
    fn render(&mut self, view: &ReviewView) {
        match serde_json::to_string_pretty(view) {
            Ok(json) => println!("{json}"),
            Err(err) => tracing::error!("Failed to serialize review view: {}", err),
        }
    }
}

/// Bus with the terminal presenter for the requested format
pub fn terminal_bus(json: bool) -> PresentationBus<ReviewView> {
    let mut bus = PresentationBus::new();
    if json {
        bus.subscribe("terminal", Box::new(JsonPresenter));
    } else {
        bus.subscribe("terminal", Box::new(ConsolePresenter));
    }
    bus
}
