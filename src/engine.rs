//=========================================================================
// Cadence Engine
//
// Main entry point and real-time control loop.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Main Loop]
//         │                          │
//         ├─ with_frame_budget()     ├─ startup: palettes, sounds,
//         ├─ with_stall_threshold()  │           cursor, initial scene
//         ├─ with_resources()        └─ per tick (25 Hz):
//         ├─ with_cache()                 pace → guard {
//         └─ with_sleeper()                 state.update → pump →
//                                           scene.update → transitions →
//                                           swap | clear+render+sync }
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use crate::config::EngineConfig;
use crate::core::cache::Cache;
use crate::core::frame_pacer::{FrameDecision, FramePacer, FrameStats};
use crate::core::game_state::{GameState, Simulation};
use crate::core::platform_bridge::{Point, RenderWindow};
use crate::core::resources::{ResourceManager, ResourceProvider, ResourceTables};
use crate::core::scene::{
    transition_channel, Scene, SceneContext, SceneDirector, SceneFactory, SceneKey,
    SceneMachine, TransitionInbox,
};
use crate::error::{EngineError, Result};

//=== Sleeper =============================================================

/// Blocking sleep used to pace the loop. Defaults to [`thread::sleep`].
pub type Sleeper = Box<dyn FnMut(Duration) + Send>;

//=== TickOutcome =========================================================

/// How one loop iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Skipped because the clock went backwards.
    ClockAnomaly,

    /// Skipped because too much time passed since the last tick.
    Stalled,

    /// A pending scene was promoted; nothing was rendered.
    Swapped,

    /// The active scene was rendered and presented.
    Rendered,
}

//=== Archives ============================================================

struct Archives {
    provider: Box<dyn ResourceProvider>,
    manager: Box<dyn ResourceManager>,
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// The render window, scene factory, game state and initial scene are
/// required; everything else has a default.
///
/// # Default Values
///
/// - **Frame budget**: 40 ms (25 ticks per second)
/// - **Stall threshold**: 1000 ms
/// - **Transition capacity**: 16 queued requests
/// - **Cache**: a fresh cache owned by this engine
/// - **Resources**: none (bulk-load skipped)
pub struct EngineBuilder<S: SceneKey, W: RenderWindow, G: Simulation> {
    window: W,
    factory: Box<dyn SceneFactory<S>>,
    game_state: GameState<G>,
    initial_scene: S,
    config: EngineConfig,
    cache: Option<Arc<Cache>>,
    archives: Option<Archives>,
    sleeper: Sleeper,
}

impl<S: SceneKey, W: RenderWindow, G: Simulation> EngineBuilder<S, W, G> {
    /// Creates a builder with default settings.
    pub fn new<F>(window: W, factory: F, game_state: GameState<G>, initial_scene: S) -> Self
    where
        F: SceneFactory<S> + 'static,
    {
        Self {
            window,
            factory: Box::new(factory),
            game_state,
            initial_scene,
            config: EngineConfig::default(),
            cache: None,
            archives: None,
            sleeper: Box::new(thread::sleep),
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the target tick duration in milliseconds.
    ///
    /// Default: 40
    ///
    /// # Panics
    ///
    /// Panics if `budget_ms == 0`.
    pub fn with_frame_budget(mut self, budget_ms: u32) -> Self {
        assert!(budget_ms > 0, "Frame budget must be positive");
        self.config.frame_budget_ms = budget_ms;
        self
    }

    /// Sets the elapsed time above which a tick is dropped.
    ///
    /// Default: 1000
    pub fn with_stall_threshold(mut self, threshold_ms: u32) -> Self {
        self.config.stall_threshold_ms = threshold_ms;
        self
    }

    /// Sets how many scene requests may queue between ticks.
    ///
    /// Default: 16
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_transition_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Transition capacity must be positive");
        self.config.transition_capacity = capacity;
        self
    }

    /// Shares an existing cache instead of creating one.
    pub fn with_cache(mut self, cache: Arc<Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Enables the startup bulk-load of palettes and sound descriptors.
    pub fn with_resources<P, M>(mut self, provider: P, manager: M) -> Self
    where
        P: ResourceProvider + 'static,
        M: ResourceManager + 'static,
    {
        self.archives = Some(Archives {
            provider: Box::new(provider),
            manager: Box::new(manager),
        });
        self
    }

    /// Replaces the pacing sleep.
    pub fn with_sleeper<F>(mut self, sleeper: F) -> Self
    where
        F: FnMut(Duration) + Send + 'static,
    {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// Builds the engine instance.
    ///
    /// # Panics
    ///
    /// Panics if the frame budget or transition capacity is zero, or the
    /// stall threshold is below the frame budget. Values passed through
    /// [`with_config`](Self::with_config) are checked here.
    pub fn build(self) -> Engine<S, W, G> {
        assert!(self.config.frame_budget_ms > 0, "Frame budget must be positive");
        assert!(
            self.config.transition_capacity > 0,
            "Transition capacity must be positive"
        );

        info!(
            "Building engine (budget: {} ms, stall: {} ms, initial scene: {:?})",
            self.config.frame_budget_ms, self.config.stall_threshold_ms, self.initial_scene
        );

        let pacer = FramePacer::new(
            self.window.ticks(),
            self.config.frame_budget_ms,
            self.config.stall_threshold_ms,
        );
        let (director, inbox) = transition_channel(self.config.transition_capacity);

        Engine {
            window: self.window,
            factory: self.factory,
            game_state: self.game_state,
            scenes: SceneMachine::new(),
            director,
            inbox,
            cache: self.cache.unwrap_or_else(|| Arc::new(Cache::new("engine"))),
            resources: ResourceTables::default(),
            archives: self.archives,
            config: self.config,
            initial_scene: self.initial_scene,
            pacer,
            stats: FrameStats::default(),
            sleeper: self.sleeper,
            started: false,
        }
    }
}

//=== Engine ==============================================================

/// Engine runtime: owns the render window, the scene machine and the
/// main loop.
///
/// Create via [`EngineBuilder`]. [`Engine::run`] blocks until the window
/// stops running or a tick fails; [`Engine::spawn`] runs the same loop
/// on a dedicated thread. Dropping the engine disposes its scenes.
pub struct Engine<S: SceneKey, W: RenderWindow, G: Simulation> {
    window: W,
    factory: Box<dyn SceneFactory<S>>,
    game_state: GameState<G>,
    scenes: SceneMachine<S>,
    director: SceneDirector<S>,
    inbox: TransitionInbox<S>,
    cache: Arc<Cache>,
    resources: ResourceTables,
    archives: Option<Archives>,
    config: EngineConfig,
    initial_scene: S,
    pacer: FramePacer,
    stats: FrameStats,
    sleeper: Sleeper,
    started: bool,
}

impl<S: SceneKey, W: RenderWindow, G: Simulation> Engine<S, W, G> {
    //--- Execution --------------------------------------------------------

    /// Runs startup, then ticks until the window stops running.
    ///
    /// # Errors
    ///
    /// Any failure during startup or inside a tick ends the loop and is
    /// returned unchanged.
    pub fn run(&mut self) -> Result<()> {
        info!("Starting main loop ({:.1} TPS)", self.config.target_tps());

        self.startup()?;

        while self.window.is_running() {
            if let Err(err) = self.step() {
                error!("Main loop aborted: {}", err);
                return Err(err);
            }
        }

        info!(
            "Main loop exited ({} ticks, {} over budget)",
            self.stats.ticks, self.stats.over_budget
        );
        Ok(())
    }

    /// Runs the engine on a dedicated thread.
    ///
    /// The engine (and its scenes) is dropped on that thread when the loop
    /// ends.
    pub fn spawn(self) -> thread::JoinHandle<Result<()>>
    where
        S: 'static,
        W: 'static,
        G: 'static,
    {
        thread::spawn(move || {
            let mut engine = self;
            engine.run()
        })
    }

    /// Builds the scene for `key` and stages it as pending.
    ///
    /// Shows the loading indicator first. The current scene stays active
    /// until the next tick's swap point. A scene already pending is
    /// disposed and replaced.
    pub fn request_transition(&mut self, key: S) -> Result<()> {
        let Self {
            window,
            factory,
            game_state,
            scenes,
            cache,
            config,
            ..
        } = self;

        game_state.guarded(|_| stage_transition(window, factory.as_mut(), cache, config, scenes, key))
    }

    //--- Accessors --------------------------------------------------------

    /// Handle for requesting scene changes from other threads.
    pub fn director(&self) -> SceneDirector<S> {
        self.director.clone()
    }

    /// Loop counters since startup.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Engine memoization cache.
    pub fn cache(&self) -> &Arc<Cache> {
        &self.cache
    }

    /// Palette and sound tables.
    pub fn resources(&self) -> &ResourceTables {
        &self.resources
    }

    /// Guarded game state.
    pub fn game_state(&self) -> &GameState<G> {
        &self.game_state
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Key of the active scene.
    pub fn active_scene(&self) -> Option<S> {
        self.scenes.active_key()
    }

    /// Key of the pending scene.
    pub fn pending_scene(&self) -> Option<S> {
        self.scenes.pending_key()
    }

    /// Render window.
    pub fn window(&self) -> &W {
        &self.window
    }

    //--- Startup ----------------------------------------------------------

    pub(crate) fn startup(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }

        if let Some(archives) = &self.archives {
            self.resources.load_palettes(
                archives.provider.as_ref(),
                archives.manager.as_ref(),
                &self.cache,
                &self.config.palette_prefix,
                &self.config.palette_extension,
            )?;
            self.resources
                .load_sound_table(archives.provider.as_ref(), &self.config.sound_table_path)?;
        } else {
            info!("No resource provider configured, skipping bulk load");
        }

        self.install_cursor()?;

        if self.scenes.active_key().is_none() {
            let scene = construct_scene(self.factory.as_mut(), self.initial_scene)?;
            self.scenes.activate(self.initial_scene, scene);
        }

        self.pacer = FramePacer::new(
            self.window.ticks(),
            self.config.frame_budget_ms,
            self.config.stall_threshold_ms,
        );
        self.started = true;

        info!(
            "Startup complete ({} palettes, {} sounds)",
            self.resources.palette_count(),
            self.resources.sound_count()
        );
        Ok(())
    }

    fn install_cursor(&mut self) -> Result<()> {
        let config = &self.config;
        let sprite = self.window.load_sprite(
            &config.cursor_sprite_path,
            &config.cursor_palette,
            Point::default(),
        )?;
        let cursor = self
            .window
            .load_cursor(&sprite, config.cursor_frame, config.cursor_hotspot)?;
        self.window.set_mouse_cursor(cursor);
        Ok(())
    }

    //--- Main Loop --------------------------------------------------------

    /// Runs one loop iteration: pacing, then the guarded tick body.
    pub(crate) fn step(&mut self) -> Result<TickOutcome> {
        let now = self.window.ticks();
        let decision = self.pacer.advance(now);

        if decision.is_over_budget() {
            self.stats.over_budget += 1;
        }

        match decision {
            FrameDecision::ClockAnomaly { elapsed_ms } => {
                self.stats.clock_anomalies += 1;
                warn!("Clock went backwards by {} ms, skipping tick", -elapsed_ms);
                Ok(TickOutcome::ClockAnomaly)
            }
            FrameDecision::Stalled { elapsed_ms } => {
                self.stats.stalls += 1;
                info!("Full frame time used - {} milliseconds to frame", elapsed_ms);
                debug!("Stall detected, dropping tick");
                Ok(TickOutcome::Stalled)
            }
            FrameDecision::Run { elapsed_ms, sleep } => {
                match sleep {
                    Some(duration) => (self.sleeper)(duration),
                    None => info!("Full frame time used - {} milliseconds to frame", elapsed_ms),
                }
                self.tick(elapsed_ms)
            }
        }
    }

    fn tick(&mut self, elapsed_ms: u32) -> Result<TickOutcome> {
        let Self {
            window,
            factory,
            game_state,
            scenes,
            director,
            inbox,
            cache,
            resources,
            config,
            stats,
            ..
        } = self;

        let outcome = game_state.guarded(|game| -> Result<TickOutcome> {
            game.update(elapsed_ms)?;
            window.update()?;

            let ctx = SceneContext::new(resources, cache, director);
            scenes.update_active(&ctx, elapsed_ms)?;

            for key in inbox.drain() {
                stage_transition(window, factory.as_mut(), cache, config, scenes, key)?;
            }
            let deferred = inbox.len();
            if deferred > 0 {
                debug!("{} scene requests deferred to the next tick", deferred);
            }

            if let Some(key) = scenes.swap_pending() {
                debug!("Scene {:?} is now active, render skipped this tick", key);
                return Ok(TickOutcome::Swapped);
            }

            window.clear()?;
            scenes.render_active()?;
            window.sync()?;
            Ok(TickOutcome::Rendered)
        })?;

        stats.ticks += 1;
        match outcome {
            TickOutcome::Swapped => stats.swaps += 1,
            TickOutcome::Rendered => stats.rendered += 1,
            TickOutcome::ClockAnomaly | TickOutcome::Stalled => {}
        }

        Ok(outcome)
    }
}

impl<S: SceneKey, W: RenderWindow, G: Simulation> Drop for Engine<S, W, G> {
    fn drop(&mut self) {
        debug!("Engine dropped, disposing scenes");
        self.scenes.dispose_all();
    }
}

//=== Transitions =========================================================

fn stage_transition<S: SceneKey, W: RenderWindow>(
    window: &mut W,
    factory: &mut dyn SceneFactory<S>,
    cache: &Cache,
    config: &EngineConfig,
    scenes: &mut SceneMachine<S>,
    key: S,
) -> Result<()> {
    show_loading(window, cache, config)?;

    let scene = construct_scene(factory, key)?;
    scenes.stage(key, scene);
    Ok(())
}

fn construct_scene<S: SceneKey>(factory: &mut dyn SceneFactory<S>, key: S) -> Result<Box<dyn Scene<S>>> {
    factory.create(key).map_err(|err| match err {
        EngineError::SceneConstruction { .. } => err,
        other => EngineError::SceneConstruction {
            scene: format!("{:?}", key),
            reason: other.to_string(),
        },
    })
}

fn show_loading<W: RenderWindow>(window: &mut W, cache: &Cache, config: &EngineConfig) -> Result<()> {
    let sprite = cache.add_or_get_existing(
        &format!("sprite:{}", config.loading_sprite_path),
        || {
            window.load_sprite(
                &config.loading_sprite_path,
                &config.loading_palette,
                config.loading_position,
            )
        },
        None,
    )?;

    window.clear()?;
    window.draw(&sprite)?;
    window.sync()
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

    //--- Fixtures ---------------------------------------------------------

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestScene {
        MainMenu,
        Game,
        Credits,
        Broken,
        Missing,
    }

    impl SceneKey for TestScene {}

    type Journal = Arc<Mutex<Vec<String>>>;

    fn entries(journal: &Journal) -> Vec<String> {
        std::mem::take(&mut *journal.lock())
    }

    struct TestWindow {
        now: Arc<AtomicI64>,
        frames: Arc<AtomicUsize>,
        journal: Journal,
    }

    impl RenderWindow for TestWindow {
        type Sprite = String;
        type Cursor = String;

        fn ticks(&self) -> i64 {
            self.now.load(Ordering::SeqCst)
        }

        fn is_running(&self) -> bool {
            self.frames
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        }

        fn update(&mut self) -> Result<()> {
            self.journal.lock().push("pump".into());
            Ok(())
        }

        fn clear(&mut self) -> Result<()> {
            self.journal.lock().push("clear".into());
            Ok(())
        }

        fn draw(&mut self, sprite: &String) -> Result<()> {
            self.journal.lock().push(format!("draw:{}", sprite));
            Ok(())
        }

        fn sync(&mut self) -> Result<()> {
            self.journal.lock().push("sync".into());
            Ok(())
        }

        fn load_sprite(&mut self, path: &str, palette: &str, _position: Point) -> Result<String> {
            self.journal.lock().push(format!("load:{}", path));
            Ok(format!("{}@{}", path, palette))
        }

        fn load_cursor(&mut self, sprite: &String, frame: usize, _hotspot: Point) -> Result<String> {
            Ok(format!("{}#{}", sprite, frame))
        }

        fn set_mouse_cursor(&mut self, cursor: String) {
            self.journal.lock().push(format!("cursor:{}", cursor));
        }
    }

    struct World {
        journal: Journal,
    }

    impl Simulation for World {
        fn update(&mut self, elapsed_ms: u32) -> Result<()> {
            self.journal.lock().push(format!("state:{}", elapsed_ms));
            Ok(())
        }
    }

    struct TestSceneImpl {
        key: TestScene,
        journal: Journal,
        guard: GameState<World>,
        request: Option<TestScene>,
    }

    impl Scene<TestScene> for TestSceneImpl {
        fn update(&mut self, ctx: &SceneContext<'_, TestScene>, elapsed_ms: u32) -> Result<()> {
            if self.key == TestScene::Broken {
                return Err(EngineError::Scene("broken scene".into()));
            }
            assert!(self.guard.is_held(), "scene updated outside the guard");
            self.journal.lock().push(format!("{:?}:update:{}", self.key, elapsed_ms));
            if let Some(next) = self.request.take() {
                ctx.request_scene(next)?;
            }
            Ok(())
        }

        fn render(&mut self) -> Result<()> {
            self.journal.lock().push(format!("{:?}:render", self.key));
            Ok(())
        }

        fn dispose(&mut self) {
            self.journal.lock().push(format!("{:?}:dispose", self.key));
        }
    }

    struct Harness {
        engine: Engine<TestScene, TestWindow, World>,
        now: Arc<AtomicI64>,
        frames: Arc<AtomicUsize>,
        journal: Journal,
        sleeps: Arc<Mutex<Vec<Duration>>>,
        slept_under_guard: Arc<AtomicBool>,
    }

    impl Harness {
        /// Engine whose main menu requests `menu_request` on its first update.
        fn new(menu_request: Option<TestScene>) -> Self {
            let now = Arc::new(AtomicI64::new(1_000));
            let frames = Arc::new(AtomicUsize::new(0));
            let journal = Journal::default();
            let sleeps = Arc::new(Mutex::new(Vec::new()));

            let window = TestWindow {
                now: Arc::clone(&now),
                frames: Arc::clone(&frames),
                journal: Arc::clone(&journal),
            };
            let state = GameState::new(World {
                journal: Arc::clone(&journal),
            });

            let factory_journal = Arc::clone(&journal);
            let guard = state.clone();
            let mut menu_request = menu_request;
            let factory = move |key: TestScene| -> Result<Box<dyn Scene<TestScene>>> {
                factory_journal.lock().push(format!("create:{:?}", key));
                if key == TestScene::Missing {
                    return Err(EngineError::Resource {
                        path: "missing.ds1".into(),
                        reason: "not found".into(),
                    });
                }
                let request = match key {
                    TestScene::MainMenu => menu_request.take(),
                    _ => None,
                };
                Ok(Box::new(TestSceneImpl {
                    key,
                    journal: Arc::clone(&factory_journal),
                    guard: guard.clone(),
                    request,
                }))
            };

            let recorded = Arc::clone(&sleeps);
            let slept_under_guard = Arc::new(AtomicBool::new(false));
            let guard_seen = Arc::clone(&slept_under_guard);
            let pacing_view = state.clone();
            let engine = EngineBuilder::new(window, factory, state, TestScene::MainMenu)
                .with_sleeper(move |d| {
                    if pacing_view.is_held() {
                        guard_seen.store(true, Ordering::SeqCst);
                    }
                    recorded.lock().push(d);
                })
                .build();

            Self {
                engine,
                now,
                frames,
                journal,
                sleeps,
                slept_under_guard,
            }
        }

        fn started(menu_request: Option<TestScene>) -> Self {
            let mut harness = Self::new(menu_request);
            harness.engine.startup().unwrap();
            entries(&harness.journal);
            harness
        }

        fn advance(&self, ms: i64) {
            self.now.fetch_add(ms, Ordering::SeqCst);
        }

        fn step_after(&mut self, ms: i64) -> Result<TickOutcome> {
            self.advance(ms);
            self.engine.step()
        }
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let harness = Harness::new(None);
        let config = harness.engine.config();
        assert_eq!(config.frame_budget_ms, 40);
        assert_eq!(config.stall_threshold_ms, 1_000);
        assert_eq!(config.transition_capacity, 16);
        assert_eq!(harness.engine.active_scene(), None);
    }

    #[test]
    #[should_panic(expected = "Frame budget must be positive")]
    fn builder_with_zero_budget_panics() {
        let window = TestWindow {
            now: Arc::default(),
            frames: Arc::default(),
            journal: Journal::default(),
        };
        let state = GameState::new(World {
            journal: Journal::default(),
        });
        let factory = |_key: TestScene| -> Result<Box<dyn Scene<TestScene>>> { Err(EngineError::NoActiveScene) };

        EngineBuilder::new(window, factory, state, TestScene::MainMenu).with_frame_budget(0);
    }

    #[test]
    #[should_panic(expected = "Transition capacity must be positive")]
    fn builder_with_zero_capacity_panics() {
        let window = TestWindow {
            now: Arc::default(),
            frames: Arc::default(),
            journal: Journal::default(),
        };
        let state = GameState::new(World {
            journal: Journal::default(),
        });
        let factory = |_key: TestScene| -> Result<Box<dyn Scene<TestScene>>> { Err(EngineError::NoActiveScene) };

        EngineBuilder::new(window, factory, state, TestScene::MainMenu).with_transition_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Transition capacity must be positive")]
    fn build_rejects_zero_capacity_from_config() {
        let window = TestWindow {
            now: Arc::default(),
            frames: Arc::default(),
            journal: Journal::default(),
        };
        let state = GameState::new(World {
            journal: Journal::default(),
        });
        let factory = |_key: TestScene| -> Result<Box<dyn Scene<TestScene>>> { Err(EngineError::NoActiveScene) };
        let config = EngineConfig {
            transition_capacity: 0,
            ..EngineConfig::default()
        };

        EngineBuilder::new(window, factory, state, TestScene::MainMenu)
            .with_config(config)
            .build();
    }

    #[test]
    #[should_panic(expected = "Frame budget must be positive")]
    fn build_rejects_zero_budget_from_config() {
        let window = TestWindow {
            now: Arc::default(),
            frames: Arc::default(),
            journal: Journal::default(),
        };
        let state = GameState::new(World {
            journal: Journal::default(),
        });
        let factory = |_key: TestScene| -> Result<Box<dyn Scene<TestScene>>> { Err(EngineError::NoActiveScene) };
        let config = EngineConfig {
            frame_budget_ms: 0,
            ..EngineConfig::default()
        };

        EngineBuilder::new(window, factory, state, TestScene::MainMenu)
            .with_config(config)
            .build();
    }

    //=====================================================================
    // Startup Tests
    //=====================================================================

    #[test]
    fn startup_installs_cursor_and_initial_scene() {
        let mut harness = Harness::new(None);
        harness.engine.startup().unwrap();

        assert_eq!(harness.engine.active_scene(), Some(TestScene::MainMenu));
        assert_eq!(
            entries(&harness.journal),
            vec![
                "load:data\\global\\ui\\CURSOR\\ohand.DC6",
                "cursor:data\\global\\ui\\CURSOR\\ohand.DC6@units#0",
                "create:MainMenu",
            ]
        );
    }

    //=====================================================================
    // Pacing Tests
    //=====================================================================

    #[test]
    fn under_budget_tick_sleeps_then_renders() {
        let mut harness = Harness::started(None);

        assert_eq!(harness.step_after(10).unwrap(), TickOutcome::Rendered);

        assert_eq!(*harness.sleeps.lock(), vec![Duration::from_millis(30)]);
        assert!(!harness.slept_under_guard.load(Ordering::SeqCst));
        assert_eq!(
            entries(&harness.journal),
            vec!["state:10", "pump", "MainMenu:update:10", "clear", "MainMenu:render", "sync"]
        );
        assert_eq!(harness.engine.stats().over_budget, 0);
    }

    #[test]
    fn over_budget_tick_does_not_sleep() {
        let mut harness = Harness::started(None);

        assert_eq!(harness.step_after(40).unwrap(), TickOutcome::Rendered);
        assert_eq!(harness.step_after(1_000).unwrap(), TickOutcome::Rendered);

        assert!(harness.sleeps.lock().is_empty());
        assert_eq!(harness.engine.stats().over_budget, 2);
        assert_eq!(harness.engine.stats().rendered, 2);
    }

    #[test]
    fn stalled_tick_skips_update_and_render() {
        let mut harness = Harness::started(None);

        assert_eq!(harness.step_after(1_001).unwrap(), TickOutcome::Stalled);
        assert!(entries(&harness.journal).is_empty());
        assert_eq!(harness.engine.stats().stalls, 1);
        assert_eq!(harness.engine.stats().ticks, 0);

        // Measured from the stall, not from before it.
        harness.step_after(5).unwrap();
        assert_eq!(entries(&harness.journal)[0], "state:5");
    }

    #[test]
    fn clock_anomaly_skips_without_moving_last_tick() {
        let mut harness = Harness::started(None);

        assert_eq!(harness.step_after(-20).unwrap(), TickOutcome::ClockAnomaly);
        assert!(entries(&harness.journal).is_empty());
        assert!(harness.sleeps.lock().is_empty());

        harness.step_after(30).unwrap();
        assert_eq!(entries(&harness.journal)[0], "state:10");
    }

    //=====================================================================
    // Transition Tests
    //=====================================================================

    #[test]
    fn scene_request_swaps_without_rendering() {
        let mut harness = Harness::started(Some(TestScene::Game));

        assert_eq!(harness.step_after(10).unwrap(), TickOutcome::Swapped);
        assert_eq!(
            entries(&harness.journal),
            vec![
                "state:10",
                "pump",
                "MainMenu:update:10",
                "load:data\\global\\ui\\Loading\\loadingscreen.dc6",
                "clear",
                "draw:data\\global\\ui\\Loading\\loadingscreen.dc6@loading",
                "sync",
                "create:Game",
                "MainMenu:dispose",
            ]
        );
        assert_eq!(harness.engine.active_scene(), Some(TestScene::Game));
        assert_eq!(harness.engine.pending_scene(), None);

        assert_eq!(harness.step_after(40).unwrap(), TickOutcome::Rendered);
        assert_eq!(
            entries(&harness.journal),
            vec!["state:40", "pump", "Game:update:40", "clear", "Game:render", "sync"]
        );
        assert_eq!(harness.engine.stats().swaps, 1);
    }

    #[test]
    fn direct_request_keeps_active_scene_until_swap_point() {
        let mut harness = Harness::started(None);

        harness.engine.request_transition(TestScene::Game).unwrap();
        assert_eq!(harness.engine.active_scene(), Some(TestScene::MainMenu));
        assert_eq!(harness.engine.pending_scene(), Some(TestScene::Game));
        entries(&harness.journal);

        assert_eq!(harness.step_after(10).unwrap(), TickOutcome::Swapped);
        assert_eq!(
            entries(&harness.journal),
            vec!["state:10", "pump", "MainMenu:update:10", "MainMenu:dispose"]
        );
    }

    #[test]
    fn second_request_disposes_superseded_pending_scene() {
        let mut harness = Harness::started(None);

        harness.engine.request_transition(TestScene::Game).unwrap();
        harness.engine.request_transition(TestScene::Credits).unwrap();

        let log = entries(&harness.journal);
        assert!(log.contains(&"Game:dispose".to_string()));
        assert_eq!(harness.engine.pending_scene(), Some(TestScene::Credits));

        harness.step_after(10).unwrap();
        assert_eq!(harness.engine.active_scene(), Some(TestScene::Credits));
    }

    #[test]
    fn factory_failure_reports_scene_construction() {
        let mut harness = Harness::started(None);

        let err = harness.engine.request_transition(TestScene::Missing).unwrap_err();

        assert_eq!(
            err,
            EngineError::SceneConstruction {
                scene: "Missing".into(),
                reason: "resource missing.ds1 unavailable: not found".into(),
            }
        );
        assert_eq!(harness.engine.active_scene(), Some(TestScene::MainMenu));
        assert_eq!(harness.engine.pending_scene(), None);
        assert!(!harness.engine.game_state().is_held());
    }

    #[test]
    fn loading_sprite_is_loaded_once() {
        let mut harness = Harness::started(None);

        harness.engine.request_transition(TestScene::Game).unwrap();
        harness.engine.request_transition(TestScene::Credits).unwrap();

        let loads = entries(&harness.journal)
            .into_iter()
            .filter(|line| line.starts_with("load:"))
            .count();
        assert_eq!(loads, 1);
        assert!(harness
            .engine
            .cache()
            .exists("sprite:data\\global\\ui\\Loading\\loadingscreen.dc6"));
    }

    #[test]
    fn director_requests_from_other_threads_are_honored() {
        let mut harness = Harness::started(None);
        let director = harness.engine.director();

        thread::spawn(move || director.request(TestScene::Credits).unwrap())
            .join()
            .unwrap();

        assert_eq!(harness.step_after(10).unwrap(), TickOutcome::Swapped);
        assert_eq!(harness.engine.active_scene(), Some(TestScene::Credits));
    }

    //=====================================================================
    // Failure and Teardown Tests
    //=====================================================================

    #[test]
    fn scene_failure_ends_run() {
        let mut harness = Harness::started(Some(TestScene::Broken));
        harness.frames.store(10, Ordering::SeqCst);
        harness.advance(10);

        // First tick swaps to the broken scene, second tick fails.
        let err = harness.engine.run().unwrap_err();

        assert_eq!(err, EngineError::Scene("broken scene".into()));
        assert_eq!(harness.engine.stats().swaps, 1);
    }

    #[test]
    fn run_stops_when_window_closes() {
        let mut harness = Harness::new(None);
        harness.frames.store(3, Ordering::SeqCst);

        harness.engine.run().unwrap();

        // The clock never moves, so each tick sleeps the full budget.
        assert_eq!(harness.engine.stats().rendered, 3);
        assert_eq!(*harness.sleeps.lock(), vec![Duration::from_millis(40); 3]);
        assert!(!harness.slept_under_guard.load(Ordering::SeqCst));
    }

    #[test]
    fn drop_disposes_active_scene() {
        let harness = Harness::started(None);
        let journal = Arc::clone(&harness.journal);

        drop(harness);

        assert_eq!(entries(&journal), vec!["MainMenu:dispose"]);
    }
}
