//! Prop service — binds the scheduler, weight trigger, countdown and route
//! table to the prop's actuators.
//!
//! [`PropService`] owns all controller state.  Hardware and the event sink
//! are passed in on every call, so there is no global state and exactly one
//! writer: whoever drives the loop.
//!
//! ```text
//!  host loop ──▶ tick(now) ──▶ Scheduler ──▶ WeightTrigger ─▶ actions ──▶ ActuatorPort
//!                                        ──▶ Timeout       ─▶ actions
//!                                        ──▶ Debug (log)
//!                         ──▶ InputPort (set-target button)
//!  transport ──▶ handle_request(raw) ──▶ dispatch ──▶ Command ─▶ actions ──▶ Response
//! ```

use log::{debug, info, warn};

use crate::config::{Action, PropConfig};
use crate::countdown::Countdown;
use crate::http::{Command, ROUTES, Response, dispatch, request_path};
use crate::scheduler::{PeriodicTask, Scheduler, TaskRunner};
use crate::trigger::{TriggerEdge, TriggerState, WeightTrigger};

use super::events::PropEvent;
use super::ports::{
    ActuatorId, ActuatorPort, EventSink, InputId, InputPort, PropHardware, ScalePort,
};

/// Periodic tasks, in the order they run within one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskId {
    WeightTrigger,
    Timeout,
    Debug,
}

/// Mutable prop parameters and flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropState {
    /// Set by `/open`, cleared by `/close`.  Suppresses trigger actions.
    pub override_engaged: bool,
    pub target_weight: i32,
    pub weight_window: u32,
    /// Latched by the weight trigger when the config asks for it.
    pub game_complete: bool,
}

// ───────────────────────────────────────────────────────────────
// PropService
// ───────────────────────────────────────────────────────────────

pub struct PropService {
    scheduler: Scheduler<TaskId>,
    core: PropCore,
}

/// Everything the tasks and handlers mutate, split from the scheduler so a
/// task runner can borrow it while the scheduler iterates.
struct PropCore {
    config: PropConfig,
    state: PropState,
    trigger: WeightTrigger,
    lower_door_timeout: Countdown<Action>,
    last_reading: Option<i32>,
}

impl PropService {
    /// Construct the service.  Does **not** register tasks; call
    /// [`start`](Self::start) next.
    pub fn new(config: PropConfig) -> Self {
        let state = PropState {
            override_engaged: false,
            target_weight: config.target_weight,
            weight_window: config.weight_window,
            game_complete: false,
        };
        let core = PropCore {
            trigger: WeightTrigger::new(config.debounce_threshold),
            lower_door_timeout: Countdown::new(config.tick_period_ms, Action::LowerDoorClose),
            state,
            last_reading: None,
            config,
        };
        Self {
            scheduler: Scheduler::new(),
            core,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Register the periodic tasks with `now_ms` as their epoch.
    pub fn start(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        let tick = self.core.config.tick_period_ms;
        let debug_period = self.core.config.debug_period_ms;

        let mut tasks = heapless::Vec::<PeriodicTask<TaskId>, 3>::new();
        let _ = tasks.push(PeriodicTask::new(TaskId::WeightTrigger, tick, now_ms));
        let _ = tasks.push(PeriodicTask::new(TaskId::Timeout, tick, now_ms));
        if debug_period > 0 {
            let _ = tasks.push(PeriodicTask::new(TaskId::Debug, debug_period, now_ms));
        }
        for task in tasks {
            if self.scheduler.register(task).is_err() {
                warn!("PropService: could not register {:?}", task.id());
            }
        }

        sink.emit(&PropEvent::Started);
        info!(
            "PropService started: target={} window={} threshold={} tick={}ms",
            self.core.state.target_weight,
            self.core.state.weight_window,
            self.core.config.debounce_threshold,
            tick
        );
    }

    // ── Per-pass orchestration ────────────────────────────────

    /// One host loop pass: run due tasks, then check the push buttons.
    pub fn tick<H: PropHardware, S: EventSink>(&mut self, now_ms: u64, hw: &mut H, sink: &mut S) {
        let mut ctx = TaskContext {
            core: &mut self.core,
            hw: &mut *hw,
            sink: &mut *sink,
        };
        self.scheduler.poll(now_ms, &mut ctx);

        if hw.check_low_and_clear(InputId::SetTarget) {
            self.core.set_target_from_scale(hw, sink);
        }
    }

    // ── Request handling ──────────────────────────────────────

    /// Handle one raw request.  `None` means no route matched and no
    /// response should be sent.
    pub fn handle_request(
        &mut self,
        raw: &str,
        hw: &mut impl PropHardware,
        sink: &mut impl EventSink,
    ) -> Option<Response> {
        let path = request_path(raw);
        let Some(cmd) = Command::from_dispatch(dispatch(ROUTES, path)) else {
            debug!("Request ignored: {:?}", path);
            return None;
        };
        Some(self.handle_command(cmd, hw, sink))
    }

    /// Execute a decoded command and build its response.
    pub fn handle_command(
        &mut self,
        cmd: Command<'_>,
        hw: &mut impl PropHardware,
        sink: &mut impl EventSink,
    ) -> Response {
        self.core.handle_command(cmd, hw, sink)
    }

    // ── Runtime parameters ────────────────────────────────────

    pub fn set_target_weight(&mut self, target: i32) {
        self.core.state.target_weight = target;
    }

    pub fn set_weight_window(&mut self, window: u32) {
        self.core.state.weight_window = window;
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> PropState {
        self.core.state
    }

    pub fn config(&self) -> &PropConfig {
        &self.core.config
    }

    pub fn trigger_state(&self) -> TriggerState {
        self.core.trigger.state()
    }

    /// Whether a lower-door re-lock is pending.
    pub fn lower_door_timeout_active(&self) -> bool {
        self.core.lower_door_timeout.is_active()
    }

    /// Reading seen by the most recent weight-trigger tick.
    pub fn last_reading(&self) -> Option<i32> {
        self.core.last_reading
    }

    pub fn task_count(&self) -> usize {
        self.scheduler.len()
    }
}

// ───────────────────────────────────────────────────────────────
// Task runner
// ───────────────────────────────────────────────────────────────

struct TaskContext<'a, H, S> {
    core: &'a mut PropCore,
    hw: &'a mut H,
    sink: &'a mut S,
}

impl<H: PropHardware, S: EventSink> TaskRunner<TaskId> for TaskContext<'_, H, S> {
    fn run_task(&mut self, id: TaskId, _due_ms: u64) {
        match id {
            TaskId::WeightTrigger => self.core.weight_trigger_task(self.hw, self.sink),
            TaskId::Timeout => self.core.timeout_task(self.hw, self.sink),
            TaskId::Debug => self.core.debug_task(),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Core behaviour
// ───────────────────────────────────────────────────────────────

impl PropCore {
    fn weight_trigger_task(&mut self, hw: &mut impl PropHardware, sink: &mut impl EventSink) {
        let reading = hw.read();
        self.last_reading = reading;

        let edge = self
            .trigger
            .tick(reading, self.state.target_weight, self.state.weight_window);
        let Some(edge) = edge else {
            return;
        };

        if self.state.override_engaged {
            info!("Weight trigger {:?} ignored: override engaged", edge);
            sink.emit(&PropEvent::TriggerSuppressed);
            return;
        }

        let trigger = self.config.trigger;
        match edge {
            TriggerEdge::Entered => {
                info!("Weight trigger! reading={:?}", reading);
                self.perform(trigger.on_high, hw);
                sink.emit(&PropEvent::Triggered {
                    reading,
                    action: trigger.on_high,
                });
                if trigger.completes_game && !self.state.game_complete {
                    self.state.game_complete = true;
                    sink.emit(&PropEvent::GameCompleted);
                }
            }
            TriggerEdge::Left => {
                info!("Weight released, reading={:?}", reading);
                if let Some(action) = trigger.on_low {
                    self.perform(action, hw);
                }
                sink.emit(&PropEvent::Released {
                    action: trigger.on_low,
                });
            }
        }
    }

    fn timeout_task(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        if let Some(action) = self.lower_door_timeout.tick() {
            info!("Timeout expired, running {:?}", action);
            self.perform(action, hw);
            sink.emit(&PropEvent::TimeoutFired(action));
        }
    }

    fn debug_task(&self) {
        debug!(
            "STATUS | reading={:?} target={}±{} | trigger={:?} | override={} complete={} | door_timeout={}",
            self.last_reading,
            self.state.target_weight,
            self.state.weight_window,
            self.trigger.state(),
            self.state.override_engaged,
            self.state.game_complete,
            if self.lower_door_timeout.is_active() {
                self.lower_door_timeout.remaining_ms()
            } else {
                0
            },
        );
    }

    fn handle_command(
        &mut self,
        cmd: Command<'_>,
        hw: &mut impl PropHardware,
        sink: &mut impl EventSink,
    ) -> Response {
        match cmd {
            Command::Raise => self.perform(Action::Raise, hw),
            Command::Lower => self.perform(Action::Lower, hw),
            Command::Stop => self.perform(Action::Stop, hw),
            Command::SetTarget => self.set_target_from_scale(hw, sink),
            Command::Tare => {
                if !hw.tare() {
                    warn!("Tare failed");
                }
            }
            Command::Open => {
                self.perform(Action::Open, hw);
                self.state.override_engaged = true;
            }
            Command::Close => {
                self.perform(Action::Close, hw);
                self.state.override_engaged = false;
            }
            Command::LowerDoorOpen { timeout_ms } => {
                self.perform(Action::LowerDoorOpen, hw);
                match timeout_ms {
                    Some(ms) => {
                        info!("Lower door re-locks in {} ms", ms);
                        self.lower_door_timeout.start(ms);
                    }
                    None => self.lower_door_timeout.cancel(),
                }
            }
            Command::LowerDoorClose => {
                self.lower_door_timeout.cancel();
                self.perform(Action::LowerDoorClose, hw);
            }
            Command::GameComplete => {
                let body = if self.state.game_complete {
                    "COMPLETE"
                } else {
                    "NOT COMPLETE"
                };
                return Response::ok().body(format_args!("{body}")).finish();
            }
            Command::SetScale(factor) => match factor {
                Some(f) if hw.set_scale(f) => info!("Scale factor set to {}", f),
                Some(f) => warn!("Scale factor {:?} rejected", f),
                None => warn!("Scale factor missing"),
            },
            Command::GetWeight => {
                return match hw.read() {
                    Some(w) => Response::ok().body(format_args!("{w}")).finish(),
                    None => {
                        warn!("Weight requested but scale not ready");
                        Response::ok().finish()
                    }
                };
            }
        }
        Response::ok().finish()
    }

    fn set_target_from_scale(&mut self, hw: &mut impl ScalePort, sink: &mut impl EventSink) {
        match hw.read() {
            Some(w) => {
                info!("Resetting target weight to {}", w);
                self.state.target_weight = w;
                sink.emit(&PropEvent::TargetUpdated { target: w });
            }
            None => warn!("Set target: scale not ready, target unchanged"),
        }
    }

    /// Drive the outputs for one action.  Repeating an action is harmless.
    fn perform(&mut self, action: Action, hw: &mut impl ActuatorPort) {
        match action {
            Action::Raise => {
                info!("Raise...");
                hw.set(ActuatorId::WinchUp, true);
                hw.set(ActuatorId::WinchDown, false);
            }
            Action::Lower => {
                info!("Lowering...");
                hw.set(ActuatorId::WinchUp, false);
                hw.set(ActuatorId::WinchDown, true);
            }
            Action::Stop => {
                info!("Stop...");
                hw.set(ActuatorId::WinchUp, false);
                hw.set(ActuatorId::WinchDown, false);
            }
            Action::Open => {
                info!("Maglock released");
                hw.set(ActuatorId::Maglock, false);
            }
            Action::Close => {
                info!("Maglock engaged");
                hw.set(ActuatorId::Maglock, true);
            }
            Action::LowerDoorOpen => {
                info!("Lower door released");
                hw.set(ActuatorId::LowerDoor, false);
            }
            Action::LowerDoorClose => {
                info!("Lower door engaged");
                hw.set(ActuatorId::LowerDoor, true);
            }
        }
    }
}
