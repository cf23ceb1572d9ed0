//! Scenario replay

use std::rc::Rc;

use contracts::{
    Clock, EventTarget, HostEvent, InputEvent, InteractionRecord, KeyEvent, Scenario, Step,
    StepAction,
};
use observer_registry::{ObserverRegistry, StatsSnapshot};
use scroll_engine::ScrollEngine;
use tracing::{debug, info, instrument};

use crate::document::SimDocument;
use crate::error::{Result, SimError};
use crate::host::{FaultConfig, SimHost};

/// Outcome of one replay
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Records in emission order
    pub records: Vec<InteractionRecord>,
    /// Engine's refresh estimate at the end of the run
    pub refresh_rate_hz: f64,
    pub steps_applied: usize,
    /// Virtual time the run stopped at
    pub end_ms: f64,
    /// Interactions still live when the run stopped
    pub unfinished: usize,
    /// Registry delivery counters
    pub delivery: StatsSnapshot,
}

/// Replays a scenario against a fresh engine on a [`SimHost`].
pub struct ScenarioRunner {
    scenario: Scenario,
    registry: Rc<ObserverRegistry>,
    faults: FaultConfig,
}

impl ScenarioRunner {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            registry: ObserverRegistry::shared(),
            faults: FaultConfig::default(),
        }
    }

    /// Emit records into `registry` instead of a private one.
    pub fn with_registry(mut self, registry: Rc<ObserverRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_faults(mut self, faults: FaultConfig) -> Self {
        self.faults = faults;
        self
    }

    pub fn registry(&self) -> &Rc<ObserverRegistry> {
        &self.registry
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    #[instrument(
        name = "scenario_run",
        skip(self),
        fields(steps = self.scenario.steps.len(), surfaces = self.scenario.surfaces.len())
    )]
    pub fn run(&self) -> Result<RunReport> {
        let document = SimDocument::from_scenario(&self.scenario)?;
        let mut host =
            SimHost::new(document, self.scenario.display.refresh_hz).with_faults(self.faults);
        let mut engine = ScrollEngine::new(self.scenario.engine.clone());
        let registry = Some(self.registry.as_ref());

        engine.start(&mut host);

        let mut records = Vec::new();
        for step in &self.scenario.steps {
            records.extend(host.advance_to(&mut engine, registry, step.at_ms));
            apply_step(&mut host, &mut engine, step)?;
        }

        let end_ms = self.scenario.effective_end_ms().max(host.now());
        records.extend(host.advance_to(&mut engine, registry, end_ms));

        info!(
            records = records.len(),
            unfinished = engine.active_interactions(),
            refresh_hz = engine.refresh_rate_hz(),
            "scenario finished"
        );

        Ok(RunReport {
            records,
            refresh_rate_hz: engine.refresh_rate_hz(),
            steps_applied: self.scenario.steps.len(),
            end_ms,
            unfinished: engine.active_interactions(),
            delivery: self.registry.stats(),
        })
    }
}

/// Turn one scripted step into document changes and host notifications.
fn apply_step(host: &mut SimHost, engine: &mut ScrollEngine, step: &Step) -> Result<()> {
    let node = host
        .document()
        .lookup(&step.target)
        .ok_or_else(|| SimError::UnknownSurface(step.target.clone()))?;
    let doc = host.document();

    let event = match &step.action {
        StepAction::Wheel => HostEvent::Wheel(InputEvent::with_path(node, doc.composed_path(node))),
        StepAction::TouchStart => {
            HostEvent::TouchStart(InputEvent::with_path(node, doc.composed_path(node)))
        }
        StepAction::TouchMove => {
            HostEvent::TouchMove(InputEvent::with_path(node, doc.composed_path(node)))
        }
        StepAction::Key { key } => HostEvent::KeyDown(KeyEvent::new(
            key.clone(),
            InputEvent::at(doc.scroll_target(node)),
        )),
        StepAction::Scroll { dx, dy } => {
            let target = doc.scroll_target(node);
            host.document_mut().scroll_by(node, *dx, *dy);
            HostEvent::Scroll {
                target: Some(target),
            }
        }
        StepAction::ScrollRoot { dx, dy } => {
            host.document_mut().scroll_by(node, *dx, *dy);
            HostEvent::Scroll {
                target: Some(EventTarget::Document),
            }
        }
    };

    debug!(at_ms = step.at_ms, target = %step.target, ?event, "step");
    engine.handle_event(host, &event);
    Ok(())
}
