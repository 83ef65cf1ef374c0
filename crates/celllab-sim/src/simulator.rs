//! The play/pause simulation engine.
//!
//! A [`Simulator`] owns the live grid pair (current + scratch), an
//! [`Automaton`] instance, and at most one background stepping task. Two
//! mutual-exclusion domains coordinate everything:
//!
//! - the **state lock** guards the grid pair and the automaton and is held
//!   for the duration of one generation advance, one reset/clear, or one
//!   cell edit. Row partitions run inside this critical section but write
//!   disjoint scratch rows, so they need no further locking;
//! - the **task lock** guards the run mode, frame rate and the active
//!   cancellation token, and is held only while stopping or starting the
//!   background task, never across a generation advance.
//!
//! Listener callbacks fire on whichever thread performed the mutation,
//! inside the relevant lock scope. They must not call back into mutating
//! simulator APIs.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info};

use celllab_core::{Automaton, Grid};

use crate::cancel::CancelToken;
use crate::error::{SimError, SimResult};
use crate::listeners::Listeners;
use crate::pool::WorkerPool;
use crate::splitter::{WorkSplitter, DEF_MIN_CELLS_PER_THREAD};

/// Default run mode.
pub const DEF_RUN_MODE: RunMode = RunMode::Loop;
/// Default frame rate for [`RunMode::FixedRate`], generations per second.
pub const DEF_FRAME_RATE: u32 = 60;
/// Default transition steps per generation.
pub const DEF_GENERATION_STEPS: u32 = 1;
/// Default neighbor topology (toroidal).
pub const DEF_WRAP_ENABLED: bool = true;
/// Whether reset/clear force a pause by default.
pub const DEF_PAUSE_ON_RESET_OR_CLEAR: bool = true;
/// Whether parallel compute is enabled by default.
pub const DEF_PARALLEL_COMPUTE_ENABLED: bool = true;

/// Scheduling policy of the background stepping task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Advance generations at a fixed rate of `frame_rate` per second.
    /// Overrunning firings are skipped, never overlapped.
    FixedRate,
    /// Advance generations back-to-back in a tight loop, unthrottled and
    /// frame-rate-independent.
    #[default]
    Loop,
}

impl RunMode {
    /// Whether this mode's pacing depends on the frame rate.
    pub fn is_frame_rate_dependent(self) -> bool {
        matches!(self, RunMode::FixedRate)
    }
}

/// Push notifications emitted by a [`Simulator`].
///
/// All methods default to no-ops; implementors override what they need.
/// For one generation advance the order is: one `state_changed` per
/// completed step, in step order, then at most one `generation_changed`.
#[allow(unused_variables)]
pub trait SimulatorListener: Send + Sync {
    /// The automaton (and grid pair) was replaced.
    fn automaton_changed(
        &self,
        sim: &Simulator,
        old_automaton: &Arc<dyn Automaton>,
        new_automaton: &Arc<dyn Automaton>,
    ) {
    }

    /// The frame rate changed.
    fn frame_rate_changed(&self, sim: &Simulator, old_rate: u32, new_rate: u32) {}

    /// The run mode changed.
    fn run_mode_changed(&self, sim: &Simulator, old_mode: RunMode, new_mode: RunMode) {}

    /// The simulation started or stopped playing.
    fn playing_changed(&self, sim: &Simulator, playing: bool) {}

    /// Steps-per-generation changed.
    fn generation_steps_changed(&self, sim: &Simulator, old_steps: u32, new_steps: u32) {}

    /// The neighbor topology toggled.
    fn wrap_enabled_changed(&self, sim: &Simulator, wrap_enabled: bool) {}

    /// One transition step completed. `step` is the zero-based step index
    /// within the generation that was current when the advance began.
    fn state_changed(
        &self,
        sim: &Simulator,
        old_state: Option<&Arc<Grid>>,
        new_state: &Arc<Grid>,
        generation: u64,
        step: u32,
    ) {
    }

    /// A generation committed. `steps_executed` counts the transition
    /// steps that actually ran, which is less than the configured step
    /// count when the advance was cancelled mid-generation.
    fn generation_changed(
        &self,
        sim: &Simulator,
        old_state: Option<&Arc<Grid>>,
        new_state: &Arc<Grid>,
        generation: u64,
        steps_executed: u32,
    ) {
    }

    /// A single cell was edited in place.
    fn cell_changed(&self, sim: &Simulator, state: &Arc<Grid>, indices: &[usize]) {}

    /// The worker pool's thread counts changed.
    fn thread_count_changed(&self, sim: &Simulator) {}

    /// Parallel compute was enabled or disabled.
    fn parallel_compute_enabled_changed(&self, sim: &Simulator, enabled: bool) {}
}

/// Grid pair and automaton, guarded by the state lock.
struct SimState {
    automaton: Arc<dyn Automaton>,
    current: Arc<Grid>,
    scratch: Option<Arc<Grid>>,
}

/// Background-task bookkeeping, guarded by the task lock.
struct SimTask {
    run_mode: RunMode,
    frame_rate: u32,
    canceller: Option<Arc<CancelToken>>,
}

/// Cellular automaton simulation engine.
///
/// Constructed behind an [`Arc`]; the background stepping task and async
/// submissions hold only a [`Weak`] reference, so dropping the last
/// external handle terminates any in-flight play session.
pub struct Simulator {
    state: Mutex<SimState>,
    task: Mutex<SimTask>,

    generation: AtomicU64,
    generation_steps: AtomicU32,
    wrap_enabled: AtomicBool,
    pause_on_reset_or_clear: AtomicBool,
    is_playing: AtomicBool,

    pool: WorkerPool,
    splitter: WorkSplitter,
    listeners: Listeners<dyn SimulatorListener>,
}

impl Simulator {
    /// Creates an engine over `automaton` with a zeroed grid of the given
    /// shape, sized for the host's core count.
    ///
    /// With `init_random_state` the initial random fill is submitted
    /// asynchronously, exactly like [`reset_state_async`](Self::reset_state_async).
    pub fn new(
        automaton: Arc<dyn Automaton>,
        shape: &[usize],
        init_random_state: bool,
    ) -> SimResult<Arc<Self>> {
        if automaton.dimensions() != shape.len() {
            return Err(SimError::DimensionMismatch {
                automaton: automaton.dimensions(),
                shape: shape.len(),
            });
        }

        let grid = Grid::new(shape)?;
        let pool = WorkerPool::with_host_sizing()?;

        info!(
            automaton = automaton.name(),
            ?shape,
            core_threads = pool.core_threads(),
            max_threads = pool.max_threads(),
            "simulator initialized"
        );

        let sim = Arc::new(Self {
            state: Mutex::new(SimState {
                automaton,
                current: Arc::new(grid),
                scratch: None,
            }),
            task: Mutex::new(SimTask {
                run_mode: DEF_RUN_MODE,
                frame_rate: DEF_FRAME_RATE,
                canceller: None,
            }),
            generation: AtomicU64::new(0),
            generation_steps: AtomicU32::new(DEF_GENERATION_STEPS),
            wrap_enabled: AtomicBool::new(DEF_WRAP_ENABLED),
            pause_on_reset_or_clear: AtomicBool::new(DEF_PAUSE_ON_RESET_OR_CLEAR),
            is_playing: AtomicBool::new(false),
            pool,
            splitter: WorkSplitter::new(DEF_PARALLEL_COMPUTE_ENABLED, DEF_MIN_CELLS_PER_THREAD),
            listeners: Listeners::new(),
        });

        if init_random_state {
            sim.reset_state_async();
        }

        Ok(sim)
    }

    /* ----------------------------- accessors ----------------------------- */

    /// Current generation count.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Snapshot of the current grid.
    ///
    /// The snapshot is immutable: it stays valid (and frozen) across later
    /// steps, which copy-on-write the engine-owned buffers instead of
    /// mutating shared ones.
    pub fn state(&self) -> Arc<Grid> {
        self.state.lock().current.clone()
    }

    /// The active automaton.
    pub fn automaton(&self) -> Arc<dyn Automaton> {
        self.state.lock().automaton.clone()
    }

    /// Value of one cell of the current grid.
    pub fn cell_state(&self, indices: &[usize]) -> SimResult<f32> {
        Ok(self.state.lock().current.get(indices)?)
    }

    /// Whether `indices` address a cell of the current grid. Callers
    /// performing user-driven edits pre-validate with this instead of
    /// using errors for control flow.
    pub fn are_indices_valid(&self, indices: &[usize]) -> bool {
        self.state.lock().current.are_indices_valid(indices)
    }

    /// Transition steps per generation.
    pub fn generation_steps(&self) -> u32 {
        self.generation_steps.load(Ordering::Acquire)
    }

    /// Sets the transition steps per generation (clamped to at least 1).
    pub fn set_generation_steps(&self, steps: u32) {
        let steps = steps.max(1);
        let prev = self.generation_steps.swap(steps, Ordering::AcqRel);
        if prev != steps {
            self.listeners
                .for_each(|l| l.generation_steps_changed(self, prev, steps));
        }
    }

    /// Whether neighbor lookup wraps toroidally.
    pub fn is_wrap_enabled(&self) -> bool {
        self.wrap_enabled.load(Ordering::Acquire)
    }

    /// Sets the neighbor topology.
    pub fn set_wrap_enabled(&self, wrap_enabled: bool) {
        if self.wrap_enabled.swap(wrap_enabled, Ordering::AcqRel) != wrap_enabled {
            self.listeners
                .for_each(|l| l.wrap_enabled_changed(self, wrap_enabled));
        }
    }

    /// Toggles the neighbor topology.
    pub fn toggle_wrap_enabled(&self) {
        self.set_wrap_enabled(!self.is_wrap_enabled());
    }

    /// Whether reset/clear force a pause first.
    pub fn is_pause_on_reset_or_clear_enabled(&self) -> bool {
        self.pause_on_reset_or_clear.load(Ordering::Acquire)
    }

    /// Sets whether reset/clear force a pause first.
    pub fn set_pause_on_reset_or_clear(&self, pause: bool) {
        self.pause_on_reset_or_clear.store(pause, Ordering::Release);
    }

    /// Registers a listener.
    pub fn add_listener(&self, listener: Arc<dyn SimulatorListener>) -> bool {
        self.listeners.add(listener)
    }

    /// Removes a listener.
    pub fn remove_listener(&self, listener: &Arc<dyn SimulatorListener>) -> bool {
        self.listeners.remove(listener)
    }

    /// Registers a listener unless already present.
    pub fn ensure_listener(&self, listener: Arc<dyn SimulatorListener>) -> bool {
        self.listeners.ensure(listener)
    }

    /* ---------------------------- cell edits ----------------------------- */

    /// Cycles one cell to its next state. Returns whether it changed.
    ///
    /// Edits mutate the current grid in place under the state lock; the
    /// generation count does not advance and only a cell-changed
    /// notification fires, and only on an actual change.
    pub fn cycle_cell_state(&self, indices: &[usize]) -> SimResult<bool> {
        self.edit_cell(indices, |automaton, grid| automaton.cycle_cell(grid, indices))
    }

    /// Sets one cell to an exact value. Returns whether it changed.
    pub fn set_cell_state(&self, indices: &[usize], value: f32) -> SimResult<bool> {
        self.edit_cell(indices, |automaton, grid| {
            automaton.set_cell(grid, indices, value)
        })
    }

    /// Steps one cell up or down. Returns whether it changed.
    pub fn step_cell_state(&self, indices: &[usize], step_up: bool) -> SimResult<bool> {
        self.edit_cell(indices, |automaton, grid| {
            automaton.step_cell(grid, indices, step_up)
        })
    }

    /// Sets one cell to the automaton's lowest state.
    pub fn set_cell_state_lowest(&self, indices: &[usize]) -> SimResult<bool> {
        let lowest = self.automaton().lowest_state();
        self.set_cell_state(indices, lowest)
    }

    /// Sets one cell to the automaton's highest state.
    pub fn set_cell_state_highest(&self, indices: &[usize]) -> SimResult<bool> {
        let highest = self.automaton().highest_state();
        self.set_cell_state(indices, highest)
    }

    fn edit_cell(
        &self,
        indices: &[usize],
        edit: impl FnOnce(&Arc<dyn Automaton>, &mut Grid) -> celllab_core::GridResult<bool>,
    ) -> SimResult<bool> {
        let mut st = self.state.lock();
        let automaton = st.automaton.clone();
        let changed = edit(&automaton, Arc::make_mut(&mut st.current))?;

        if changed {
            let grid = st.current.clone();
            self.listeners.for_each(|l| l.cell_changed(self, &grid, indices));
        }
        Ok(changed)
    }

    /* ------------------------- state transitions ------------------------- */

    /// Ensures the scratch grid exists with the current shape, runs `fill`
    /// from current into scratch, swaps the pair, and returns
    /// `(old, new)`. Caller holds the state lock.
    fn swap_next_state(
        &self,
        st: &mut SimState,
        fill: impl FnOnce(&Grid, &mut Grid),
    ) -> (Arc<Grid>, Arc<Grid>) {
        let mut scratch = match st.scratch.take() {
            Some(scratch) if scratch.is_same_shape(&st.current) => scratch,
            _ => Arc::new(st.current.like()),
        };

        // Copy-on-write: a stale reader still holding this Arc forces a
        // private clone instead of a torn in-place overwrite.
        fill(&st.current, Arc::make_mut(&mut scratch));

        let old = std::mem::replace(&mut st.current, scratch);
        st.scratch = Some(old.clone());
        (old, st.current.clone())
    }

    /// Runs one automaton transition from current into scratch and swaps.
    fn transition_locked(&self, st: &mut SimState) -> (Arc<Grid>, Arc<Grid>) {
        let automaton = st.automaton.clone();
        let wrap = self.is_wrap_enabled();

        self.swap_next_state(st, |cur, out| {
            if automaton.is_parallel_eligible() {
                let task = |band: &mut celllab_core::RowBand<'_>| {
                    automaton.compute_rows(cur, band, wrap)
                };
                self.splitter.compute(Some(&self.pool), out, &task);
            } else {
                automaton.compute_rows(cur, &mut out.full_band_mut(), wrap);
            }
        })
    }

    /// Advances one generation: up to `generation_steps` transition
    /// steps, checking `token` before each one.
    ///
    /// Partial completion commits: if at least one step ran, the
    /// generation counter increments by exactly one and the
    /// generation-changed notification reports the executed step count.
    pub fn advance_generation(&self, token: Option<&CancelToken>) {
        let mut st = self.state.lock();
        if token.is_some_and(|t| t.is_cancelled()) {
            return;
        }

        let gen = self.generation();
        let steps = self.generation_steps();
        let gen_start = st.current.clone();

        let mut executed = 0;
        while executed < steps {
            if token.is_some_and(|t| t.is_cancelled()) {
                break;
            }

            let (old, new) = self.transition_locked(&mut st);
            let step = executed;
            self.listeners
                .for_each(|l| l.state_changed(self, Some(&old), &new, gen, step));
            executed += 1;
        }

        if executed > 0 {
            self.generation.store(gen + 1, Ordering::Release);
            let new = st.current.clone();
            self.listeners
                .for_each(|l| l.generation_changed(self, Some(&gen_start), &new, gen, executed));
        }
    }

    fn refill_state(&self, fill_kind: FillKind) {
        if self.is_pause_on_reset_or_clear_enabled() {
            self.pause();
        }

        let mut st = self.state.lock();
        let automaton = st.automaton.clone();
        let wrap = self.is_wrap_enabled();

        let (old, new) = self.swap_next_state(&mut st, |cur, out| match fill_kind {
            FillKind::Reset => automaton.reset_state(cur, out, wrap),
            FillKind::Clear => automaton.clear_state(cur, out, wrap),
        });

        self.generation.store(0, Ordering::Release);
        self.listeners
            .for_each(|l| l.state_changed(self, Some(&old), &new, 0, 0));
        self.listeners
            .for_each(|l| l.generation_changed(self, Some(&old), &new, 0, 1));
    }

    /// Replaces the grid with a fresh random pattern and resets the
    /// generation count, pausing first when configured to. Blocks until
    /// done.
    pub fn reset_state_sync(&self) {
        self.refill_state(FillKind::Reset);
    }

    /// Submits [`reset_state_sync`](Self::reset_state_sync) to the worker
    /// pool and returns immediately.
    pub fn reset_state_async(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        self.pool.spawn(move || {
            if let Some(sim) = weak.upgrade() {
                sim.reset_state_sync();
            }
        });
    }

    /// Replaces the grid with the empty pattern and resets the generation
    /// count, pausing first when configured to. Blocks until done.
    pub fn clear_state_sync(&self) {
        self.refill_state(FillKind::Clear);
    }

    /// Submits [`clear_state_sync`](Self::clear_state_sync) to the worker
    /// pool and returns immediately.
    pub fn clear_state_async(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        self.pool.spawn(move || {
            if let Some(sim) = weak.upgrade() {
                sim.clear_state_sync();
            }
        });
    }

    /// Replaces the automaton and grid shape.
    ///
    /// Destructive: pauses the simulation, reallocates both grids and
    /// resets the generation count. A no-op when the automaton instance
    /// and shape are both unchanged. Fails (before any state change) on a
    /// dimension mismatch or malformed shape.
    pub fn set_automaton(
        self: &Arc<Self>,
        automaton: Arc<dyn Automaton>,
        shape: &[usize],
        init_random_state: bool,
    ) -> SimResult<()> {
        if automaton.dimensions() != shape.len() {
            return Err(SimError::DimensionMismatch {
                automaton: automaton.dimensions(),
                shape: shape.len(),
            });
        }
        let grid = Grid::new(shape)?;

        let mut st = self.state.lock();
        if Arc::ptr_eq(&st.automaton, &automaton) && st.current.shape() == shape {
            return Ok(());
        }

        self.pause();

        let old_automaton = std::mem::replace(&mut st.automaton, automaton.clone());
        st.current = Arc::new(grid);
        st.scratch = None;
        self.generation.store(0, Ordering::Release);

        if init_random_state {
            self.reset_state_async();
        }

        debug!(automaton = automaton.name(), ?shape, "automaton replaced");
        self.listeners
            .for_each(|l| l.automaton_changed(self, &old_automaton, &automaton));
        Ok(())
    }

    /* ------------------------------ playback ------------------------------ */

    /// Whether the background stepping task is active.
    pub fn is_playing(&self) -> bool {
        self.is_playing.load(Ordering::Acquire)
    }

    /// Starts or stops the background stepping task. No-op when already
    /// in the requested state.
    pub fn set_playing(self: &Arc<Self>, playing: bool) {
        if self.is_playing() == playing {
            return;
        }

        let mut task = self.task.lock();
        if self.is_playing() == playing {
            return;
        }

        self.is_playing.store(playing, Ordering::Release);
        if playing {
            self.requeue_sim_task(&mut task);
        } else {
            Self::cancel_sim_task(&mut task);
        }

        self.listeners.for_each(|l| l.playing_changed(self, playing));
    }

    /// Starts playing.
    pub fn play(self: &Arc<Self>) {
        self.set_playing(true);
    }

    /// Stops playing. No-op when already stopped; emits no notification
    /// in that case.
    pub fn pause(&self) {
        if !self.is_playing() {
            return;
        }

        let mut task = self.task.lock();
        if !self.is_playing() {
            return;
        }

        self.is_playing.store(false, Ordering::Release);
        Self::cancel_sim_task(&mut task);
        self.listeners.for_each(|l| l.playing_changed(self, false));
    }

    /// Toggles between playing and paused.
    pub fn toggle_playing(self: &Arc<Self>) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Current run mode.
    pub fn run_mode(&self) -> RunMode {
        self.task.lock().run_mode
    }

    /// Sets the run mode, restarting the background task under the new
    /// policy when playing.
    pub fn set_run_mode(self: &Arc<Self>, run_mode: RunMode) {
        let mut task = self.task.lock();
        if task.run_mode == run_mode {
            return;
        }

        let prev = task.run_mode;
        task.run_mode = run_mode;
        if self.is_playing() {
            self.requeue_sim_task(&mut task);
        }

        self.listeners
            .for_each(|l| l.run_mode_changed(self, prev, run_mode));
    }

    /// Current frame rate, generations per second.
    pub fn frame_rate(&self) -> u32 {
        self.task.lock().frame_rate
    }

    /// Sets the frame rate, restarting the background task when playing
    /// in a rate-dependent mode. Fails on a non-positive rate.
    pub fn set_frame_rate(self: &Arc<Self>, frame_rate: u32) -> SimResult<()> {
        if frame_rate == 0 {
            return Err(SimError::InvalidFrameRate(frame_rate));
        }

        let mut task = self.task.lock();
        if task.frame_rate == frame_rate {
            return Ok(());
        }

        let prev = task.frame_rate;
        task.frame_rate = frame_rate;
        if task.run_mode.is_frame_rate_dependent() && self.is_playing() {
            self.requeue_sim_task(&mut task);
        }

        self.listeners
            .for_each(|l| l.frame_rate_changed(self, prev, frame_rate));
        Ok(())
    }

    fn cancel_sim_task(task: &mut SimTask) {
        if let Some(canceller) = task.canceller.take() {
            canceller.cancel();
        }
    }

    /// Cancels any active task and starts a fresh one for the current run
    /// mode. Caller holds the task lock.
    fn requeue_sim_task(self: &Arc<Self>, task: &mut SimTask) {
        Self::cancel_sim_task(task);

        let token = Arc::new(CancelToken::new());
        task.canceller = Some(token.clone());
        let weak = Arc::downgrade(self);

        match task.run_mode {
            RunMode::FixedRate => {
                let period = Duration::from_secs_f64(1.0 / f64::from(task.frame_rate));
                debug!(?period, "starting fixed-rate stepping task");
                self.pool
                    .spawn(move || Self::run_fixed_rate(weak, token, period));
            }
            RunMode::Loop => {
                debug!("starting loop stepping task");
                self.pool.spawn(move || Self::run_loop(weak, token));
            }
        }
    }

    /// Fixed-rate pacing: one generation per period, sleeping to the next
    /// deadline. An overrunning step skips missed firings rather than
    /// letting them pile up or overlap.
    fn run_fixed_rate(weak: Weak<Simulator>, token: Arc<CancelToken>, period: Duration) {
        let mut deadline = Instant::now();
        while !token.is_cancelled() {
            let Some(sim) = weak.upgrade() else { break };
            sim.advance_generation(Some(&token));
            drop(sim);

            deadline += period;
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            } else {
                deadline = now;
            }
        }
    }

    /// Unthrottled pacing: back-to-back generations until cancelled.
    fn run_loop(weak: Weak<Simulator>, token: Arc<CancelToken>) {
        while !token.is_cancelled() {
            let Some(sim) = weak.upgrade() else { break };
            sim.advance_generation(Some(&token));
        }
    }

    /* ------------------------ pool and parallelism ------------------------ */

    /// Number of worker threads kept alive regardless of load.
    pub fn core_thread_count(&self) -> usize {
        self.pool.core_threads()
    }

    /// Sets the core worker thread count, `1 <= core <= max`.
    pub fn set_core_thread_count(&self, core_threads: usize) -> SimResult<()> {
        if self.pool.set_core_threads(core_threads)? {
            self.listeners.for_each(|l| l.thread_count_changed(self));
        }
        Ok(())
    }

    /// Maximum number of worker threads.
    pub fn max_thread_count(&self) -> usize {
        self.pool.max_threads()
    }

    /// Sets the maximum worker thread count, `core <= max`.
    pub fn set_max_thread_count(&self, max_threads: usize) -> SimResult<()> {
        if self.pool.set_max_threads(max_threads)? {
            self.listeners.for_each(|l| l.thread_count_changed(self));
        }
        Ok(())
    }

    /// Whether parallel compute is enabled on the work splitter.
    pub fn is_parallel_compute_enabled(&self) -> bool {
        self.splitter.is_parallel_enabled()
    }

    /// Enables or disables parallel compute.
    pub fn set_parallel_compute_enabled(&self, enabled: bool) {
        if self.splitter.set_parallel_enabled(enabled) {
            self.listeners
                .for_each(|l| l.parallel_compute_enabled_changed(self, enabled));
        }
    }

    /// Toggles parallel compute.
    pub fn toggle_parallel_compute_enabled(&self) {
        self.set_parallel_compute_enabled(!self.is_parallel_compute_enabled());
    }

    /// Minimum cell budget per worker thread.
    pub fn min_cells_per_thread(&self) -> usize {
        self.splitter.min_cells_per_thread()
    }

    /// Sets the minimum cell budget per worker thread.
    pub fn set_min_cells_per_thread(&self, min_cells: usize) {
        self.splitter.set_min_cells_per_thread(min_cells);
    }

    /// Whether the next transition would actually partition: the
    /// automaton allows it, the splitter is enabled and the pool is
    /// parallel-ready.
    pub fn is_parallel_compute_ready(&self) -> bool {
        self.automaton().is_parallel_eligible()
            && self.splitter.is_parallel_enabled()
            && self.pool.is_parallel_ready()
    }

    /// Worker count the splitter would choose for the current grid.
    pub fn worker_thread_count(&self) -> usize {
        let st = self.state.lock();
        self.splitter
            .worker_count(Some(&self.pool), st.current.len(), st.current.rows())
    }
}

enum FillKind {
    Reset,
    Clear,
}

impl Drop for Simulator {
    fn drop(&mut self) {
        // Stepping tasks hold only a Weak reference; flag the token too
        // so an in-flight session stops at its next step boundary.
        Self::cancel_sim_task(self.task.get_mut());
        self.pool.shutdown();
    }
}
