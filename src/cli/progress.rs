//! Step progress header
//!
//! A pure projection of the wizard position; no coupling to validation or
//! collected data.

use console::style;

use crate::core::step::{step_states, StepRegistry, StepState};

/// Plain-text progress line: `✓ done  ❯ active  ○ pending`
pub fn progress_line(position: usize, registry: &StepRegistry) -> String {
    step_states(position, registry)
        .iter()
        .zip(registry.iter())
        .map(|(state, step)| match state {
            StepState::Complete => format!("✓ {}", step.name),
            StepState::Active => format!("❯ {}", step.name),
            StepState::Pending => format!("○ {}", step.name),
        })
        .collect::<Vec<_>>()
        .join("   ")
}

/// Print the styled progress header
pub fn print_progress(position: usize, registry: &StepRegistry) {
    let rendered: Vec<String> = step_states(position, registry)
        .iter()
        .zip(registry.iter())
        .map(|(state, step)| match state {
            StepState::Complete => style(format!("✓ {}", step.name)).green().to_string(),
            StepState::Active => style(format!("❯ {}", step.name)).cyan().bold().to_string(),
            StepState::Pending => style(format!("○ {}", step.name)).dim().to_string(),
        })
        .collect();

    println!("{}", rendered.join("   "));
    println!("{}", style("─".repeat(50)).dim());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_line_marks_states() {
        let registry = StepRegistry::new();
        assert_eq!(
            progress_line(1, &registry),
            "✓ Personal Info   ❯ Address Details   ○ Account Setup"
        );
        assert_eq!(
            progress_line(0, &registry),
            "❯ Personal Info   ○ Address Details   ○ Account Setup"
        );
    }
}
