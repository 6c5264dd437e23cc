//! Rendering of coalesced discovery notifications.
//!
//! This is the UI boundary the aggregator dispatches to: it receives a
//! non-empty, deduplicated batch and is responsible for singular vs plural
//! phrasing.

use console::style;

use crate::model::Installation;

/// Print a notification for a batch of newly discovered installations.
pub fn show_notification(installations: &[Installation]) {
    println!("{}", render_notification(installations));
}

/// Format the notification text for a batch.
pub fn render_notification(installations: &[Installation]) -> String {
    match installations {
        [] => String::new(),
        [single] => format!(
            "{} {} was automatically added.",
            style("New runtime detected:").bold().green(),
            style(&single.name).cyan()
        ),
        many => {
            let mut out = format!(
                "{} {} new runtimes were automatically added.",
                style("New runtimes detected:").bold().green(),
                many.len()
            );
            for installation in many {
                out.push_str(&format!("\n  {}", style(&installation.name).cyan()));
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installation(name: &str) -> Installation {
        Installation::new(name, format!("/nonexistent/{name}"))
    }

    #[test]
    fn empty_batch_renders_nothing() {
        assert!(render_notification(&[]).is_empty());
    }

    #[test]
    fn single_installation_uses_singular_phrasing() {
        let text = render_notification(&[installation("[SDKMAN] temurin-21")]);
        assert!(text.contains("[SDKMAN] temurin-21"));
        assert!(text.contains("was automatically added"));
    }

    #[test]
    fn multiple_installations_use_plural_phrasing_with_count() {
        let text = render_notification(&[
            installation("[SDKMAN] temurin-21"),
            installation("[IntelliJ] zulu-17"),
        ]);
        assert!(text.contains("2 new runtimes"));
        assert!(text.contains("[SDKMAN] temurin-21"));
        assert!(text.contains("[IntelliJ] zulu-17"));
    }
}
