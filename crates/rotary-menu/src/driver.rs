use crate::animation::{LoopPhase, Tween, random_duration};
use crate::config::{self, Config, TransitionConfig};
use crate::events::{AppEvent, Status};
use crate::sink::{FrameSink, SinkError};
use async_channel::Receiver;
use parking_lot::RwLock;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rotary::{LayoutParameters, MenuItems, Placement, Point, Rect, RotaryLayout};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

pub type SharedStatus = Arc<RwLock<Status>>;

/// One computed frame: the layout snapshot and every placement it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub number: u64,
    pub layout: RotaryLayout,
    pub bounds: Rect,
    pub placements: Vec<Placement<usize>>,
}

impl Frame {
    /// Lays `items` out in a footprint sized for `layout`.
    pub fn compute(number: u64, layout: RotaryLayout, items: &MenuItems<usize>) -> Self {
        let bounds = Rect::new(Point::default(), layout.size_that_fits());
        Self {
            number,
            layout,
            bounds,
            placements: layout.layout(bounds, items.components()),
        }
    }
}

/// Owns the current and target state of the menu and advances it frame by
/// frame.
pub struct Driver {
    winding_count: f64,
    frame_rate: f64,
    transition: TransitionConfig,
    items: MenuItems<usize>,
    expansion: Tween<f64>,
    parameters: Tween<LayoutParameters>,
    phase: LoopPhase,
    looping: bool,
    dirty: bool,
    frame: u64,
    rng: StdRng,
}

fn ring_items(count: usize) -> MenuItems<usize> {
    MenuItems::new((1..=count).collect())
}

impl Driver {
    pub fn new(config: &Config) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    pub fn with_rng(config: &Config, rng: StdRng) -> Self {
        Self {
            winding_count: config.winding_count,
            frame_rate: config.frame_rate,
            transition: config.transition,
            items: ring_items(config.item_count),
            expansion: Tween::settled(0.0),
            parameters: Tween::settled(config.parameters),
            phase: LoopPhase::Idle,
            looping: false,
            dirty: true,
            frame: 0,
            rng,
        }
    }

    pub fn expansion_level(&self) -> f64 {
        self.expansion.value()
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_animating(&self) -> bool {
        !self.expansion.is_finished() || !self.parameters.is_finished()
    }

    pub fn layout(&self) -> RotaryLayout {
        RotaryLayout::new(
            self.winding_count,
            self.parameters.value(),
            self.expansion.value(),
        )
    }

    pub fn status(&self) -> Status {
        Status {
            frame: self.frame,
            expansion_level: self.expansion.value(),
            target_level: self.expansion.target(),
            phase: self.phase,
            looping: self.looping,
            animating: self.is_animating(),
        }
    }

    fn animate_to(&mut self, target: f64, duration: Duration) {
        self.expansion
            .retarget(target, duration, self.transition.easing);
        self.phase = LoopPhase::toward(target);
        self.dirty = true;
    }

    fn start_loop_leg(&mut self) {
        let target = LoopPhase::next_target(self.expansion.value());
        let duration = random_duration(
            &mut self.rng,
            self.transition.loop_min_duration,
            self.transition.loop_max_duration,
        );
        log::debug!("loop leg toward {target} over {duration:?}");
        self.animate_to(target, duration);
    }

    pub fn handle(&mut self, event: AppEvent) -> ControlFlow<()> {
        match event {
            AppEvent::Expand => {
                self.looping = false;
                self.animate_to(1.0, self.transition.duration());
            }
            AppEvent::Contract => {
                self.looping = false;
                self.animate_to(0.0, self.transition.duration());
            }
            AppEvent::Toggle => {
                self.looping = false;
                let target = LoopPhase::next_target(self.expansion.target());
                self.animate_to(target, self.transition.duration());
            }
            AppEvent::StartLoop => {
                if !self.looping {
                    self.looping = true;
                    self.start_loop_leg();
                }
            }
            AppEvent::StopLoop => {
                // the running leg still finishes
                self.looping = false;
            }
            AppEvent::ConfigReload => {
                log::debug!("config reload is handled by the frame loop");
            }
            AppEvent::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Applies a new configuration. Parameters blend over the transition
    /// duration; winding and item count switch immediately.
    pub fn apply_config(&mut self, config: &Config) {
        self.transition = config.transition;
        self.winding_count = config.winding_count;
        self.frame_rate = config.frame_rate;
        if self.items.ring.len() != config.item_count {
            self.items = ring_items(config.item_count);
        }
        if self.parameters.target() != config.parameters {
            self.parameters.retarget(
                config.parameters,
                self.transition.duration(),
                self.transition.easing,
            );
        }
        self.dirty = true;
    }

    /// Advances time by `dt`. Returns a frame when anything moved or changed
    /// since the last one.
    pub fn tick(&mut self, dt: Duration) -> Option<Frame> {
        let was_animating = self.is_animating();
        self.expansion.advance(dt);
        self.parameters.advance(dt);

        if self.expansion.is_finished() && self.phase != LoopPhase::Idle {
            if self.looping {
                self.start_loop_leg();
            } else {
                self.phase = LoopPhase::Idle;
            }
        }

        if !(was_animating || self.dirty) {
            return None;
        }
        self.dirty = false;
        self.frame += 1;
        Some(Frame::compute(self.frame, self.layout(), &self.items))
    }

    fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate)
    }

    /// Runs the frame loop until `Quit` arrives or every sender is gone.
    pub async fn run<S: FrameSink>(
        mut self,
        events: Receiver<AppEvent>,
        mut sink: S,
        status: SharedStatus,
        config_path: PathBuf,
    ) -> Result<(), SinkError> {
        let mut ticker = tokio::time::interval(self.frame_period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_tick = Instant::now();

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Ok(event) = event else { break };
                    if event == AppEvent::ConfigReload {
                        match config::load_config_from(&config_path) {
                            Ok(new_config) => {
                                let period = self.frame_period();
                                self.apply_config(&new_config);
                                if self.frame_period() != period {
                                    ticker = tokio::time::interval(self.frame_period());
                                    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                                }
                                log::info!("Configuration reloaded");
                            }
                            Err(e) => log::error!("Failed to reload config: {}", e),
                        }
                    } else if self.handle(event).is_break() {
                        break;
                    }
                }
                now = ticker.tick() => {
                    let dt = now.duration_since(last_tick);
                    last_tick = now;
                    if let Some(frame) = self.tick(dt) {
                        sink.present(&frame)?;
                    }
                    *status.write() = self.status();
                }
            }
        }

        log::info!("Driver stopped after {} frames", self.frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn driver() -> Driver {
        let config = Config {
            item_count: 4,
            ..Config::default()
        };
        Driver::with_rng(&config, StdRng::seed_from_u64(42))
    }

    fn run_for(driver: &mut Driver, seconds: f64) -> Vec<Frame> {
        let step = Duration::from_millis(10);
        let ticks = (seconds / step.as_secs_f64()).round() as usize;
        (0..ticks).filter_map(|_| driver.tick(step)).collect()
    }

    #[test]
    fn test_first_tick_emits_contracted_frame() {
        let mut driver = driver();
        let frame = driver.tick(Duration::from_millis(16)).unwrap();
        assert_eq!(frame.number, 1);
        assert_eq!(frame.placements.len(), 5);
        assert_eq!(frame.layout.expansion_level, 0.0);
        assert!(driver.tick(Duration::from_millis(16)).is_none());
    }

    #[test]
    fn test_expand_reaches_full_expansion() {
        let mut driver = driver();
        driver.tick(Duration::ZERO);
        let _ = driver.handle(AppEvent::Expand);
        assert_eq!(driver.phase(), LoopPhase::AnimatingToExpanded);

        let frames = run_for(&mut driver, 2.5);
        let last = frames.last().unwrap();
        assert_eq!(last.layout.expansion_level, 1.0);
        assert_eq!(driver.phase(), LoopPhase::Idle);
        assert!(!driver.is_animating());

        let levels: Vec<f64> = frames.iter().map(|f| f.layout.expansion_level).collect();
        assert!(levels.windows(2).all(|w| w[0] <= w[1]));
        assert!(driver.tick(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn test_toggle_alternates_targets() {
        let mut driver = driver();
        let _ = driver.handle(AppEvent::Toggle);
        assert_eq!(driver.status().target_level, 1.0);
        let _ = driver.handle(AppEvent::Toggle);
        assert_eq!(driver.status().target_level, 0.0);
    }

    #[test]
    fn test_loop_keeps_alternating_until_stopped() {
        let mut driver = driver();
        let _ = driver.handle(AppEvent::StartLoop);
        assert!(driver.is_looping());
        assert_eq!(driver.status().target_level, 1.0);

        let mut targets = vec![driver.status().target_level];
        for _ in 0..2000 {
            driver.tick(Duration::from_millis(10));
            let target = driver.status().target_level;
            if targets.last() != Some(&target) {
                targets.push(target);
            }
        }
        assert!(targets.len() >= 4, "loop produced {targets:?}");
        assert!(targets.windows(2).all(|w| w[0] != w[1]));

        let _ = driver.handle(AppEvent::StopLoop);
        run_for(&mut driver, 3.5);
        assert_eq!(driver.phase(), LoopPhase::Idle);
        let level = driver.expansion_level();
        assert!(level == 0.0 || level == 1.0);
    }

    #[test]
    fn test_quit_breaks() {
        let mut driver = driver();
        assert!(driver.handle(AppEvent::Quit).is_break());
        assert!(driver.handle(AppEvent::Expand).is_continue());
    }

    #[test]
    fn test_limit_config_runs_without_overflow() {
        let config = config::parse_config(
            r#"
            frame_rate = 1000

            [transition]
            duration = 3600
            loop_min_duration = 3600
            loop_max_duration = 3600
            "#,
        )
        .unwrap();
        let mut driver = Driver::with_rng(&config, StdRng::seed_from_u64(3));
        assert_eq!(driver.frame_period(), Duration::from_millis(1));

        let _ = driver.handle(AppEvent::Expand);
        assert!(driver.tick(Duration::from_secs(1800)).is_some());
        let _ = driver.handle(AppEvent::StartLoop);
        assert!(driver.tick(Duration::from_secs(3600)).is_some());
        assert!(driver.is_animating());

        let slowest = config::parse_config("frame_rate = 1").unwrap();
        assert_eq!(
            Driver::new(&slowest).frame_period(),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_config_reload_blends_parameters() {
        let mut driver = driver();
        driver.tick(Duration::ZERO);

        let mut config = Config {
            item_count: 6,
            ..Config::default()
        };
        config.parameters.center_item_radius_when_contracted = 76.0;
        driver.apply_config(&config);

        let frame = driver.tick(Duration::from_secs(1)).unwrap();
        assert_eq!(frame.placements.len(), 7);
        let center_radius = frame.layout.center_item_radius();
        assert!(center_radius > 56.0 && center_radius < 76.0);

        run_for(&mut driver, 1.5);
        assert_abs_diff_eq!(driver.layout().center_item_radius(), 76.0);
    }
}
