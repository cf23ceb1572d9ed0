//! `validate` command implementation.

use std::collections::HashSet;

use anyhow::{Context, Result};
use config_loader::{ConfigDocument, ConfigLoader};
use contracts::{EngineConfig, Scenario, StepAction, SurfaceConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    quiet_window_ms: f64,
    hint_ttl_ms: f64,
    default_refresh_hz: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_refresh_hz: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    surface_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    step_count: Option<usize>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            kind: None,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match ConfigLoader::load_any(&args.config) {
        Ok(ConfigDocument::Scenario(scenario)) => {
            let warnings = collect_warnings(&scenario);
            ValidationResult {
                valid: true,
                config_path,
                kind: Some("scenario"),
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    display_refresh_hz: Some(scenario.display.refresh_hz),
                    surface_count: Some(scenario.surfaces.len()),
                    step_count: Some(scenario.steps.len()),
                    ..engine_summary(&scenario.engine)
                }),
            }
        }
        Ok(ConfigDocument::Engine(engine)) => ValidationResult {
            valid: true,
            config_path,
            kind: Some("engine"),
            error: None,
            warnings: None,
            summary: Some(engine_summary(&engine)),
        },
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            kind: None,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

fn engine_summary(engine: &EngineConfig) -> ConfigSummary {
    ConfigSummary {
        quiet_window_ms: engine.quiet_window_ms,
        hint_ttl_ms: engine.hint_ttl_ms,
        default_refresh_hz: engine.refresh.default_hz,
        display_refresh_hz: None,
        surface_count: None,
        step_count: None,
    }
}

fn is_scrollable(surface: &SurfaceConfig, tolerance_px: f64) -> bool {
    (surface.overflow_x.allows_user_scroll()
        && surface.content_width - surface.visible_width > tolerance_px)
        || (surface.overflow_y.allows_user_scroll()
            && surface.content_height - surface.visible_height > tolerance_px)
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(scenario: &Scenario) -> Vec<String> {
    let mut warnings = Vec::new();

    if scenario.steps.is_empty() {
        warnings.push("No steps - the replay will produce no records".to_string());
    }

    let targeted: HashSet<&str> = scenario.steps.iter().map(|s| s.target.as_str()).collect();
    for surface in &scenario.surfaces {
        if !targeted.contains(surface.id.as_str()) {
            warnings.push(format!("Surface '{}' is never targeted", surface.id));
        }
    }

    // movement on a surface that cannot scroll is still tracked, but input
    // hints on it resolve to an ancestor
    let tolerance = scenario.engine.overflow_tolerance_px;
    for surface in &scenario.surfaces {
        let moved = scenario.steps.iter().any(|s| {
            s.target == surface.id && matches!(s.action, StepAction::Scroll { .. })
        });
        if moved && !is_scrollable(surface, tolerance) {
            warnings.push(format!(
                "Surface '{}' receives scroll steps but is not user-scrollable",
                surface.id
            ));
        }
    }

    if let (Some(until), Some(last)) = (scenario.run_until_ms, scenario.steps.last()) {
        if until < last.at_ms + scenario.engine.quiet_window_ms {
            warnings.push(format!(
                "run_until_ms ({until}) ends inside the quiet window after the last step - \
                 the final interaction will not be reported"
            ));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!(
            "✓ Configuration is valid: {} ({})",
            result.config_path,
            result.kind.unwrap_or("unknown")
        );

        if let Some(ref summary) = result.summary {
            println!("\n  Quiet window: {} ms", summary.quiet_window_ms);
            println!("  Hint TTL: {} ms", summary.hint_ttl_ms);
            println!("  Default refresh: {} Hz", summary.default_refresh_hz);
            if let Some(hz) = summary.display_refresh_hz {
                println!("  Display refresh: {} Hz", hz);
            }
            if let Some(count) = summary.surface_count {
                println!("  Surfaces: {}", count);
            }
            if let Some(count) = summary.step_count {
                println!("  Steps: {}", count);
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
