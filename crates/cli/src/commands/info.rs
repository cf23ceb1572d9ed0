//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{Scenario, StepAction, ROOT_SURFACE};
use serde::Serialize;
use tracing::info;

use super::simulate::load_scenario;
use crate::cli::InfoArgs;

/// Scenario info for JSON output
#[derive(Serialize)]
struct ScenarioInfo {
    version: String,
    display_refresh_hz: f64,
    engine: EngineInfo,
    viewport: ViewportInfo,
    surfaces: Vec<SurfaceInfo>,
    step_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    steps: Vec<StepInfo>,
    end_ms: f64,
}

#[derive(Serialize)]
struct EngineInfo {
    quiet_window_ms: f64,
    hint_ttl_ms: f64,
    overflow_tolerance_px: f64,
    default_refresh_hz: f64,
}

#[derive(Serialize)]
struct ViewportInfo {
    width: f64,
    height: f64,
    content_width: f64,
    content_height: f64,
}

#[derive(Serialize)]
struct SurfaceInfo {
    id: String,
    parent: String,
    kind: String,
    overflow: String,
    scroll_range: (f64, f64),
}

#[derive(Serialize)]
struct StepInfo {
    at_ms: f64,
    target: String,
    action: String,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(scenario = %args.scenario.display(), "Loading scenario info");

    let scenario = load_scenario(&args.scenario)?;

    if args.json {
        let info = build_scenario_info(&scenario, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize scenario info")?;
        println!("{}", json);
    } else {
        print_scenario_info(&scenario, args);
    }

    Ok(())
}

fn describe_action(action: &StepAction) -> String {
    match action {
        StepAction::Wheel => "wheel".to_string(),
        StepAction::TouchStart => "touch_start".to_string(),
        StepAction::TouchMove => "touch_move".to_string(),
        StepAction::Key { key } => format!("key {key}"),
        StepAction::Scroll { dx, dy } => format!("scroll ({dx}, {dy})"),
        StepAction::ScrollRoot { dx, dy } => format!("scroll_root ({dx}, {dy})"),
    }
}

fn build_scenario_info(scenario: &Scenario, args: &InfoArgs) -> ScenarioInfo {
    let surfaces = scenario
        .surfaces
        .iter()
        .map(|s| SurfaceInfo {
            id: s.id.clone(),
            parent: s.parent.clone().unwrap_or_else(|| "body".to_string()),
            kind: format!("{:?}", s.kind),
            overflow: format!("{:?}/{:?}", s.overflow_x, s.overflow_y),
            scroll_range: (
                (s.content_width - s.visible_width).max(0.0),
                (s.content_height - s.visible_height).max(0.0),
            ),
        })
        .collect();

    let steps = if args.steps {
        scenario
            .steps
            .iter()
            .map(|s| StepInfo {
                at_ms: s.at_ms,
                target: s.target.clone(),
                action: describe_action(&s.action),
            })
            .collect()
    } else {
        Vec::new()
    };

    ScenarioInfo {
        version: format!("{:?}", scenario.version),
        display_refresh_hz: scenario.display.refresh_hz,
        engine: EngineInfo {
            quiet_window_ms: scenario.engine.quiet_window_ms,
            hint_ttl_ms: scenario.engine.hint_ttl_ms,
            overflow_tolerance_px: scenario.engine.overflow_tolerance_px,
            default_refresh_hz: scenario.engine.refresh.default_hz,
        },
        viewport: ViewportInfo {
            width: scenario.viewport.width,
            height: scenario.viewport.height,
            content_width: scenario.viewport.content_width,
            content_height: scenario.viewport.content_height,
        },
        surfaces,
        step_count: scenario.steps.len(),
        steps,
        end_ms: scenario.effective_end_ms(),
    }
}

fn print_scenario_info(scenario: &Scenario, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 Scroll Timing Scenario                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("🖥  Display");
    println!("   ├─ Version: {:?}", scenario.version);
    println!("   ├─ Refresh: {} Hz", scenario.display.refresh_hz);
    println!(
        "   └─ Viewport: {}x{} (content {}x{})",
        scenario.viewport.width,
        scenario.viewport.height,
        scenario.viewport.content_width,
        scenario.viewport.content_height
    );

    let engine = &scenario.engine;
    println!("\n⚙️  Engine");
    println!("   ├─ Quiet window: {} ms", engine.quiet_window_ms);
    println!("   ├─ Hint TTL: {} ms", engine.hint_ttl_ms);
    println!("   ├─ Overflow tolerance: {} px", engine.overflow_tolerance_px);
    println!("   └─ Default refresh: {} Hz", engine.refresh.default_hz);

    println!("\n📜 Surfaces ({})", scenario.surfaces.len() + 1);
    println!("   ├─ {} (document)", ROOT_SURFACE);
    for (i, surface) in scenario.surfaces.iter().enumerate() {
        let prefix = if i == scenario.surfaces.len() - 1 {
            "└─"
        } else {
            "├─"
        };
        println!(
            "   {} {} in {} ({:?}/{:?}, {}x{} of {}x{})",
            prefix,
            surface.id,
            surface.parent.as_deref().unwrap_or("body"),
            surface.overflow_x,
            surface.overflow_y,
            surface.visible_width,
            surface.visible_height,
            surface.content_width,
            surface.content_height
        );
    }

    println!("\n⏱  Steps ({})", scenario.steps.len());
    if args.steps {
        for (i, step) in scenario.steps.iter().enumerate() {
            let prefix = if i == scenario.steps.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            println!(
                "   {} {:>9.1} ms  {:<10} {}",
                prefix,
                step.at_ms,
                step.target,
                describe_action(&step.action)
            );
        }
    }
    println!("   Replay ends at {:.1} ms", scenario.effective_end_ms());

    println!();
}
