//! Cooperative, tick-driven animation tasks
//!
//! Tasks never run inside the call that starts them. Each call to
//! [`Scheduler::tick`] gives every due task one turn; a turn is atomic and
//! ends with the task suspending until `tick_ms` later. Everything happens on
//! the caller's thread, so there are no locks and no preemption.
//!
//! There is no cancellation: a started task always runs to completion. Two
//! tasks driving the same sprite simply overwrite each other turn by turn.

use std::fmt;

use crate::motion::{orbit_position, Point2D};
use crate::scene::SpriteId;
use crate::transforms::{normalize_angle, shortest_delta};

/// Default interval between task turns.
pub const DEFAULT_TICK_MS: u32 = 20;

/// Handle to a spawned task, only useful for checking whether it finished.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// What a task needs from the world it animates.
///
/// A missing sprite reads as `None` and writes to it are dropped.
pub trait TaskHost {
    /// Current rotation, creating transform state if needed.
    fn rotation(&mut self, sprite: SpriteId) -> Option<f64>;
    fn set_rotation(&mut self, sprite: SpriteId, degrees: f64);
    fn position(&self, sprite: SpriteId) -> Option<Point2D>;
    fn set_position(&mut self, sprite: SpriteId, position: Point2D);
}

/// Number of turns for a duration: `max(1, duration / interval)`.
pub fn step_count(duration_ms: f64, interval_ms: u32) -> u32 {
    let interval = interval_ms.max(1) as f64;
    let steps = (duration_ms / interval).floor();
    if steps.is_finite() && steps >= 1.0 {
        steps.min(u32::MAX as f64) as u32
    } else {
        1
    }
}

/// The animation a task performs.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskKind {
    /// Turn towards `target` along the shortest arc.
    SmoothRotate { target: f64 },
    /// Circle `pivot` at `speed` degrees per second.
    Orbit { pivot: Point2D, radius: f64, speed: f64 },
}

/// State captured on a task's first turn.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Origin {
    Rotation { start: f64, delta: f64 },
    Orbit { bearing: f64, radius: f64 },
}

#[derive(Debug, Clone)]
pub struct Task {
    id: TaskId,
    sprite: SpriteId,
    kind: TaskKind,
    interval_ms: u32,
    steps: u32,
    step: u32,
    origin: Option<Origin>,
    wake_at_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turn {
    Suspend,
    Done,
}

impl Task {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn sprite(&self) -> SpriteId {
        self.sprite
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    /// Steps completed so far.
    pub fn progress(&self) -> (u32, u32) {
        (self.step, self.steps)
    }

    fn run_turn(&mut self, host: &mut dyn TaskHost) -> Turn {
        match self.kind {
            TaskKind::SmoothRotate { target } => self.rotate_turn(host, target),
            TaskKind::Orbit { pivot, radius, speed } => self.orbit_turn(host, pivot, radius, speed),
        }
    }

    fn rotate_turn(&mut self, host: &mut dyn TaskHost, target: f64) -> Turn {
        let (start, delta) = match self.origin {
            Some(Origin::Rotation { start, delta }) => (start, delta),
            _ => {
                let start = host.rotation(self.sprite).unwrap_or(0.0);
                let delta = shortest_delta(start, target);
                self.origin = Some(Origin::Rotation { start, delta });
                (start, delta)
            }
        };

        if self.step < self.steps {
            self.step += 1;
            let progress = self.step as f64 / self.steps as f64;
            host.set_rotation(self.sprite, start + delta * progress);
            return Turn::Suspend;
        }

        // Land exactly on the target, whatever rounding the steps picked up
        host.set_rotation(self.sprite, target);
        Turn::Done
    }

    fn orbit_turn(&mut self, host: &mut dyn TaskHost, pivot: Point2D, radius: f64, speed: f64) -> Turn {
        let (bearing, radius) = match self.origin {
            Some(Origin::Orbit { bearing, radius }) => (bearing, radius),
            _ => {
                let (bearing, radius) = match host.position(self.sprite) {
                    Some(pos) => {
                        let bearing = (pos.y - pivot.y).atan2(pos.x - pivot.x).to_degrees();
                        let radius = if radius <= 0.0 { pivot.distance(&pos) } else { radius };
                        (bearing, radius)
                    }
                    None => (0.0, radius.max(0.0)),
                };
                self.origin = Some(Origin::Orbit { bearing, radius });
                (bearing, radius)
            }
        };

        self.step += 1;
        // Elapsed time comes from the step index so error never accumulates
        let elapsed_sec = (self.step as f64 * self.interval_ms as f64) / 1000.0;
        let angle = bearing + speed * elapsed_sec;
        host.set_position(self.sprite, orbit_position(pivot, radius, angle));

        if self.step >= self.steps {
            Turn::Done
        } else {
            Turn::Suspend
        }
    }
}

/// Runs animation tasks one turn per tick.
#[derive(Debug)]
pub struct Scheduler {
    tick_ms: u32,
    now_ms: u64,
    next_id: u64,
    tasks: Vec<Task>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_MS)
    }
}

impl Scheduler {
    /// Create a scheduler whose clock advances `tick_ms` per tick.
    pub fn new(tick_ms: u32) -> Self {
        Self {
            tick_ms: tick_ms.max(1),
            now_ms: 0,
            next_id: 0,
            tasks: Vec::new(),
        }
    }

    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    /// Scheduler clock in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of tasks that have not finished.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_running(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Queue a task. Its first turn runs on the next tick.
    pub fn spawn(&mut self, sprite: SpriteId, kind: TaskKind, duration_ms: f64) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        let kind = match kind {
            TaskKind::SmoothRotate { target } => TaskKind::SmoothRotate {
                target: normalize_angle(target),
            },
            other => other,
        };
        let steps = step_count(duration_ms, self.tick_ms);
        tracing::debug!(%id, %sprite, ?kind, steps, "spawned task");

        self.tasks.push(Task {
            id,
            sprite,
            kind,
            interval_ms: self.tick_ms,
            steps,
            step: 0,
            origin: None,
            wake_at_ms: self.now_ms,
        });
        id
    }

    /// Give every due task one turn, then advance the clock by one tick.
    ///
    /// Returns the number of turns that ran.
    pub fn tick(&mut self, host: &mut dyn TaskHost) -> usize {
        let now = self.now_ms;
        let interval = self.tick_ms as u64;
        let mut turns = 0;

        self.tasks.retain_mut(|task| {
            if task.wake_at_ms > now {
                return true;
            }
            turns += 1;
            match task.run_turn(host) {
                Turn::Suspend => {
                    task.wake_at_ms = now + interval;
                    true
                }
                Turn::Done => {
                    tracing::debug!(id = %task.id, sprite = %task.sprite, "task finished");
                    false
                }
            }
        });

        self.now_ms += interval;
        turns
    }

    /// Tick until no tasks remain or `max_ticks` is reached.
    ///
    /// Returns the number of ticks taken.
    pub fn run_until_idle(&mut self, host: &mut dyn TaskHost, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while !self.is_idle() && ticks < max_ticks {
            self.tick(host);
            ticks += 1;
        }
        ticks
    }
}
