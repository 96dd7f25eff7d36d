use anyhow::{bail, Result};
use cradle_mind::{Mind, SleepReport};
use cradle_world::{
    apply_event, apply_transition, generate_world,
    places::{BEDROOM, HOSPITAL},
    EventKind, ExperienceEvent, TransitionMode, WorldLayoutDocument, WorldState,
};
use serde_json::json;
use shared_logging::LogLevel;

use crate::{
    ambient::WorldEventGenerator,
    bridge::WorldBridge,
    caregiver::CaregiverFlow,
    config::SandboxConfig,
    curriculum::{self, CurriculumSignals},
    day_cycle::DayCycle,
    experience::{LifePhase, PhaseController},
    future_paths::{FuturePathRegistry, PathStatus, UnlockContext},
    helper::SimulationTelemetry,
    report::{DayReport, EngineSnapshot, RunReport, StepOutcome},
    routine::NewbornRoutine,
    schedule::{Schedule, BED},
    source::{ExperienceSource, SourceKind},
};

const CURRICULUM_BOT: &str = "curriculum";

/// Drives the sandbox: builds days, feeds events to the mind, applies what
/// the mind accepted to the world, and puts everyone to bed.
pub struct SimulationEngine {
    config: SandboxConfig,
    world: WorldState,
    mind: Mind,
    schedule: Schedule,
    cycle: DayCycle,
    source: Box<dyn ExperienceSource>,
    ambient: WorldEventGenerator,
    bridge: WorldBridge,
    phases: PhaseController,
    registry: FuturePathRegistry,
    telemetry: Option<SimulationTelemetry>,
}

impl SimulationEngine {
    /// Returns a builder.
    #[must_use]
    pub fn builder() -> SimulationEngineBuilder {
        SimulationEngineBuilder::default()
    }

    fn log(&self, level: LogLevel, message: &str, metadata: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(level, message, metadata);
        }
    }

    fn emit(&self, event_type: &str, payload: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.event(event_type, payload);
        }
    }

    /// Registers birth in the world and opens day 0. Needs day 0 loaded.
    pub fn birth(&mut self) -> Result<()> {
        if self.cycle.birthed {
            bail!("birth already happened");
        }
        self.schedule.authorise_wake()?;
        self.world.day = 0;
        self.world.register_birth();
        self.cycle.begin_birth();
        self.phases.advance_to(LifePhase::Birth);
        self.mind.wake(0);
        self.log(
            LogLevel::Info,
            "simulation.birth",
            json!({ "seed": self.config.seed, "place": HOSPITAL }),
        );
        self.emit("simulation.birth.completed", json!({ "day": 0 }));
        Ok(())
    }

    /// Builds the current day from the experience source and loads it.
    /// Returns the number of events.
    pub fn load_day(&mut self) -> Result<usize> {
        let day = self.cycle.day_index;
        let events = self.source.build_day(&mut self.world, day);
        self.load_events(day, events)
    }

    /// Loads explicit events for the current day.
    pub fn load_events(&mut self, day: u32, events: Vec<ExperienceEvent>) -> Result<usize> {
        let count = events.len();
        let start_place = self.world.current_place.clone();
        let start_room = self.world.current_room.clone();
        self.schedule
            .load(day, events, &start_place, start_room.as_deref())?;
        self.log(
            LogLevel::Info,
            "simulation.day.loaded",
            json!({ "day": day, "events": count, "source": self.source.name() }),
        );
        Ok(count)
    }

    /// Authorises a normal day to start.
    pub fn wake(&mut self) -> Result<()> {
        if self.cycle.is_birth_day() {
            bail!("day 0 opens with birth, not wake");
        }
        self.schedule.authorise_wake()?;
        self.cycle.wake();
        self.world.day = self.cycle.day_index;
        self.phases.resume_day();
        self.phases.advance_to(LifePhase::HomeDay);
        self.mind.wake(self.cycle.day_index);
        self.log(
            LogLevel::Info,
            "simulation.wake",
            json!({ "day": self.cycle.day_index }),
        );
        Ok(())
    }

    /// Feeds the next scheduled event through the mind. The world only
    /// changes when the mind accepted the event. `None` once the day is
    /// exhausted or while asleep.
    pub fn step(&mut self) -> Result<Option<StepOutcome>> {
        let Some(event) = self.schedule.next_event() else {
            return Ok(None);
        };
        let outcome = self.mind.ingest(&self.world, &event);

        if outcome.accepted {
            apply_event(&mut self.world, &event)?;
            if let Some(interaction) = &outcome.interaction {
                self.world.profiles.record_interaction(
                    &interaction.agent,
                    &interaction.outcome,
                    interaction.day,
                );
            }
            if let Some(phase) = phase_for(&event) {
                self.phases.advance_to(phase);
            }
            self.log(
                LogLevel::Debug,
                "simulation.step",
                json!({
                    "day": event.day,
                    "event": event.index,
                    "kind": event.kind,
                    "place": event.place_id,
                    "coherence": outcome.coherence.score,
                }),
            );
        } else {
            self.log(
                LogLevel::Warn,
                "simulation.step.blocked",
                json!({
                    "day": event.day,
                    "event": event.index,
                    "issues": outcome.coherence.issue_labels(),
                }),
            );
        }

        let packets = self.tick(self.config.tick_delta)?;
        Ok(Some(StepOutcome {
            day: event.day,
            index: event.index,
            kind: event.kind,
            place: event.place_id,
            accepted: outcome.accepted,
            coherence: outcome.coherence.score,
            issues: outcome.coherence.issues,
            body: outcome.body,
            packets,
        }))
    }

    /// Advances the world clock, records ambient events and hands new
    /// sensory packets to the mind. Does nothing while the world is frozen.
    pub fn tick(&mut self, delta: f32) -> Result<usize> {
        if self.world.is_frozen() {
            return Ok(0);
        }
        self.world.tick(delta);
        for event in self.ambient.generate(&self.world) {
            self.world.ensure_mutable()?;
            self.world.record(event);
        }
        Ok(self.deliver_packets())
    }

    fn deliver_packets(&mut self) -> usize {
        let packets = self.bridge.pull_new_packets(&self.world);
        let count = packets.len();
        for packet in packets {
            self.mind.receive_packet(packet);
        }
        count
    }

    /// Observer-triggered movement of the infant. The mind only notices it
    /// through the motion packet the bridge delivers.
    pub fn transition(
        &mut self,
        to: &str,
        mode: TransitionMode,
        description: &str,
    ) -> Result<usize> {
        apply_transition(&mut self.world, to, mode, description)?;
        self.log(
            LogLevel::Info,
            "simulation.transition",
            json!({ "to": to, "mode": mode.label() }),
        );
        Ok(self.deliver_packets())
    }

    /// Ends the day: consolidation runs on a frozen world, then the infant
    /// is put to bed and the cycle moves to the next day.
    pub fn sleep(&mut self) -> Result<SleepReport> {
        let day = self.cycle.day_index;
        self.cycle.sleep();
        self.world.freeze();
        let report = self.mind.sleep(day);
        self.world.thaw();

        self.schedule.end_day_enforced();
        self.world.current_place = BEDROOM.into();
        self.world.current_room = Some(BED.into());
        self.phases.advance_to(LifePhase::Sleep);
        self.cycle.advance_after_sleep();

        self.log(
            LogLevel::Info,
            "simulation.sleep",
            json!({
                "day": day,
                "replayed": report.replayed_count,
                "reinforced": report.reinforced,
            }),
        );
        self.emit(
            "simulation.sleep.completed",
            json!({ "day": day, "replayed": report.replayed_count }),
        );
        Ok(report)
    }

    /// Builds, wakes, lives and sleeps one day.
    pub fn run_day(&mut self) -> Result<DayReport> {
        self.load_day()?;
        self.live_loaded_day()
    }

    /// Runs `days` consecutive days.
    pub fn run(&mut self, days: u32) -> Result<RunReport> {
        let mut reports = Vec::new();
        for _ in 0..days {
            reports.push(self.run_day()?);
        }
        Ok(RunReport {
            seed: self.config.seed,
            days: reports,
            mind: self.mind.summary(),
        })
    }

    fn live_loaded_day(&mut self) -> Result<DayReport> {
        let day = self.cycle.day_index;
        if self.cycle.is_birth_day() && !self.cycle.birthed {
            self.birth()?;
        } else {
            self.wake()?;
        }

        let events = self.schedule.events().len();
        let (mut accepted, mut blocked, mut packets) = (0, 0, 0);
        while let Some(outcome) = self.step()? {
            if outcome.accepted {
                accepted += 1;
            } else {
                blocked += 1;
            }
            packets += outcome.packets;
        }

        let sleep = self.sleep()?;
        let report = DayReport {
            day,
            source: self.source.name().into(),
            events,
            accepted,
            blocked,
            packets,
            sleep,
            body: self.mind.body().snapshot(),
        };
        self.emit(
            "simulation.day.completed",
            json!({ "day": day, "accepted": accepted, "blocked": blocked }),
        );
        Ok(report)
    }

    /// Lets the curriculum bots propose future paths from current signals.
    pub fn propose_paths(&mut self) -> Vec<String> {
        let signals = CurriculumSignals::observe(&self.mind, &self.world);
        let mut ids =
            curriculum::propose_paths(CURRICULUM_BOT, &mut self.registry, &self.world, &signals);
        ids.extend(curriculum::propose_neighbour_visit(
            &mut self.registry,
            &self.world,
            &signals,
        ));
        self.log(
            LogLevel::Info,
            "simulation.paths.proposed",
            json!({ "count": ids.len(), "signals": signals }),
        );
        ids
    }

    /// Approves every proposed path whose unlock rule holds for the coming
    /// day. Returns the ids approved.
    pub fn approve_unlocked(&mut self) -> Vec<String> {
        let ctx = UnlockContext {
            day: self.cycle.day_index,
            cry: self.mind.body().cry_level(),
            place: &self.world.current_place,
            lexicon: self.mind.lexicon(),
        };
        let ids: Vec<String> = self
            .registry
            .list(Some(PathStatus::Proposed))
            .into_iter()
            .filter(|path| FuturePathRegistry::is_unlocked(path, &ctx))
            .map(|path| path.path_id.clone())
            .collect();
        for id in &ids {
            self.registry.approve(id);
        }
        ids
    }

    /// Lives one day built from approved paths, then marks them experienced.
    pub fn run_approved_day(&mut self) -> Result<DayReport> {
        if self.cycle.is_birth_day() {
            bail!("day 0 is always the birth day");
        }
        let day = self.cycle.day_index;
        let events = curriculum::build_day_from_approved(&mut self.registry, &mut self.world, day);
        if events.is_empty() {
            bail!("no approved paths to build day {day} from");
        }
        self.load_events(day, events)?;
        let report = self.live_loaded_day()?;
        let scheduled: Vec<String> = self
            .registry
            .list(Some(PathStatus::Scheduled))
            .into_iter()
            .map(|path| path.path_id.clone())
            .collect();
        for id in &scheduled {
            self.registry.mark_experienced(id);
        }
        Ok(report)
    }

    /// Observer snapshot.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            seed: self.config.seed,
            source: self.source.name().into(),
            phase: self.phases.phase(),
            cycle: self.cycle,
            schedule: self.schedule.status(),
            world: self.world.snapshot(),
            mind: self.mind.summary(),
            paths: self.registry.len(),
        }
    }

    /// Objective world.
    #[must_use]
    pub const fn world(&self) -> &WorldState {
        &self.world
    }

    /// The infant's mind.
    #[must_use]
    pub const fn mind(&self) -> &Mind {
        &self.mind
    }

    /// Schedule.
    #[must_use]
    pub const fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Future path registry.
    #[must_use]
    pub const fn registry(&self) -> &FuturePathRegistry {
        &self.registry
    }

    /// Mutable registry, for observer review.
    pub fn registry_mut(&mut self) -> &mut FuturePathRegistry {
        &mut self.registry
    }

    /// Current day.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.cycle.day_index
    }

    /// Returns telemetry handle.
    #[must_use]
    pub fn telemetry(&self) -> Option<&SimulationTelemetry> {
        self.telemetry.as_ref()
    }
}

fn phase_for(event: &ExperienceEvent) -> Option<LifePhase> {
    match event.kind {
        EventKind::Birth => Some(LifePhase::Birth),
        EventKind::Sleep => None,
        EventKind::Travel if event.day == 0 => Some(LifePhase::JourneyHome),
        _ if event.place_id == HOSPITAL => Some(LifePhase::Hospital),
        _ if event.day > 0 => Some(LifePhase::HomeDay),
        _ => None,
    }
}

/// Builder for `SimulationEngine`.
pub struct SimulationEngineBuilder {
    telemetry: Option<SimulationTelemetry>,
    config: SandboxConfig,
    source: Option<Box<dyn ExperienceSource>>,
}

impl SimulationEngineBuilder {
    /// Sets telemetry.
    #[must_use]
    pub fn telemetry(mut self, telemetry: SimulationTelemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Replaces the whole configuration, seed included.
    #[must_use]
    pub fn config(mut self, config: SandboxConfig) -> Self {
        self.config = config;
        self
    }

    /// Seeds the world, the routine and the ambient generator.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Overrides the experience source picked from the configuration.
    #[must_use]
    pub fn source(mut self, source: Box<dyn ExperienceSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Builds the engine.
    pub fn build(self) -> Result<SimulationEngine> {
        let config = self.config;
        let mut world = generate_world(config.seed);
        if let Some(path) = &config.world_layout {
            WorldLayoutDocument::load(path)?.apply(&mut world)?;
        }
        let source: Box<dyn ExperienceSource> = match self.source {
            Some(source) => source,
            None => match config.source {
                SourceKind::Newborn => Box::new(
                    NewbornRoutine::new(config.seed, config.newborn.clone())
                        .overnight_in_hospital(config.overnight_in_hospital),
                ),
                SourceKind::Caregiver => Box::new(CaregiverFlow::new(config.events_per_day)),
            },
        };
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(
                LogLevel::Info,
                "simulation.engine.built",
                json!({ "seed": config.seed, "source": source.name(), "places": world.places.len() }),
            );
        }
        Ok(SimulationEngine {
            mind: Mind::new(config.mind),
            ambient: WorldEventGenerator::new(config.seed.wrapping_add(1)),
            world,
            schedule: Schedule::default(),
            cycle: DayCycle::default(),
            source,
            bridge: WorldBridge::default(),
            phases: PhaseController::default(),
            registry: FuturePathRegistry::default(),
            telemetry: self.telemetry,
            config,
        })
    }
}

impl Default for SimulationEngineBuilder {
    fn default() -> Self {
        Self {
            telemetry: None,
            config: SandboxConfig {
                seed: crate::helper::random_seed(),
                ..SandboxConfig::default()
            },
            source: None,
        }
    }
}
