//! Frame scheduling.
//!
//! A [`FrameLoop`] runs one [`Animation::advance`] per callback and asks its
//! [`FrameScheduler`] for the next callback only after the current frame has
//! finished. In the browser the scheduler is `requestAnimationFrame`; tests
//! drive frames by hand with [`ManualScheduler`].

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use tracing::{debug, error};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::animation::Animation;
use crate::config::BackdropConfig;
use crate::error::{describe_js, BackdropError, Result};
use crate::render::Surface;

/// Callback invoked with the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Something that can run a callback "on the next frame".
pub trait FrameScheduler {
    fn schedule_next(&self, callback: FrameCallback) -> Result<()>;
}

/// `window.requestAnimationFrame` with a one-shot closure per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationFrameScheduler;

impl FrameScheduler for AnimationFrameScheduler {
    fn schedule_next(&self, callback: FrameCallback) -> Result<()> {
        let window = web_sys::window().ok_or(BackdropError::NoWindow)?;
        let closure = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        window
            .request_animation_frame(closure.unchecked_ref())
            .map(|_| ())
            .map_err(|e| BackdropError::Schedule(describe_js(&e)))
    }
}

/// Queue of callbacks run on demand. Clones share the queue.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<VecDeque<FrameCallback>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run the callbacks queued before this call. Callbacks they schedule
    /// wait for the next call. Returns how many ran.
    pub fn run_pending(&self, timestamp: f64) -> usize {
        let batch: Vec<FrameCallback> = self.queue.borrow_mut().drain(..).collect();
        let ran = batch.len();
        for callback in batch {
            callback(timestamp);
        }
        ran
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next(&self, callback: FrameCallback) -> Result<()> {
        self.queue.borrow_mut().push_back(callback);
        Ok(())
    }
}

struct LoopState<S> {
    animation: Animation,
    surface: S,
    running: bool,
    /// Bumped on every start so callbacks from an earlier run drop out.
    generation: u64,
}

/// Drives an [`Animation`] on a [`Surface`] one scheduled frame at a time.
///
/// Handles are cheap to clone and share the same loop. Pending callbacks only
/// hold a weak reference, so dropping every handle ends the loop.
pub struct FrameLoop<S, Q> {
    state: Rc<RefCell<LoopState<S>>>,
    scheduler: Rc<Q>,
}

impl<S, Q> Clone for FrameLoop<S, Q> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            scheduler: Rc::clone(&self.scheduler),
        }
    }
}

impl<S: Surface + 'static, Q: FrameScheduler + 'static> FrameLoop<S, Q> {
    /// Wrap an existing animation. The surface is used as is.
    pub fn new(animation: Animation, surface: S, scheduler: Q) -> Self {
        Self {
            state: Rc::new(RefCell::new(LoopState {
                animation,
                surface,
                running: false,
                generation: 0,
            })),
            scheduler: Rc::new(scheduler),
        }
    }

    /// Size `surface` to its display area and build an animation for it.
    pub fn attach(config: BackdropConfig, mut surface: S, scheduler: Q) -> Result<Self> {
        let viewport = surface.viewport();
        surface.configure(&viewport);
        let animation = Animation::new(config, viewport)?;
        Ok(Self::new(animation, surface, scheduler))
    }

    /// Begin scheduling frames. Does nothing when already running.
    pub fn start(&self) -> Result<()> {
        let generation = {
            let mut state = self.state.borrow_mut();
            if state.running {
                return Ok(());
            }
            state.running = true;
            state.generation += 1;
            state.generation
        };
        debug!(generation, "frame loop started");

        if let Err(err) = schedule(Rc::downgrade(&self.state), Rc::clone(&self.scheduler), generation)
        {
            self.state.borrow_mut().running = false;
            return Err(err);
        }
        Ok(())
    }

    /// Stop after the current frame; a frame already requested is skipped.
    pub fn stop(&self) {
        let mut state = self.state.borrow_mut();
        if state.running {
            state.running = false;
            debug!(frame = state.animation.frame(), "frame loop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    /// Re-read the surface's display size, resize its backing store and
    /// lay the scene out again.
    pub fn resize(&self) {
        let mut state = self.state.borrow_mut();
        let LoopState {
            animation, surface, ..
        } = &mut *state;
        let viewport = surface.viewport();
        surface.configure(&viewport);
        animation.resize(viewport);
    }

    /// Run one frame immediately, whether or not the loop is running.
    pub fn render_frame(&self) {
        let mut state = self.state.borrow_mut();
        let LoopState {
            animation, surface, ..
        } = &mut *state;
        animation.advance(surface);
    }

    /// Read access to the animation.
    pub fn with_animation<R>(&self, f: impl FnOnce(&Animation) -> R) -> R {
        f(&self.state.borrow().animation)
    }

    /// Mutable access to the surface.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.state.borrow_mut().surface)
    }
}

fn schedule<S, Q>(
    state: Weak<RefCell<LoopState<S>>>,
    scheduler: Rc<Q>,
    generation: u64,
) -> Result<()>
where
    S: Surface + 'static,
    Q: FrameScheduler + 'static,
{
    let next = Rc::clone(&scheduler);
    scheduler.schedule_next(Box::new(move |_timestamp| {
        tick(state, next, generation)
    }))
}

fn tick<S, Q>(state: Weak<RefCell<LoopState<S>>>, scheduler: Rc<Q>, generation: u64)
where
    S: Surface + 'static,
    Q: FrameScheduler + 'static,
{
    let Some(shared) = state.upgrade() else {
        return;
    };
    {
        let mut guard = shared.borrow_mut();
        if !guard.running || guard.generation != generation {
            return;
        }
        let LoopState {
            animation, surface, ..
        } = &mut *guard;
        animation.advance(surface);
    }

    if let Err(err) = schedule(state, scheduler, generation) {
        error!(error = %err, "frame loop halted");
        shared.borrow_mut().running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;
    use crate::viewport::Viewport;

    struct FailingScheduler;

    impl FrameScheduler for FailingScheduler {
        fn schedule_next(&self, _callback: FrameCallback) -> Result<()> {
            Err(BackdropError::Schedule("refused".into()))
        }
    }

    fn config() -> BackdropConfig {
        BackdropConfig {
            seed: Some(4),
            ..BackdropConfig::default()
        }
    }

    fn surface() -> RecordingSurface {
        RecordingSurface::new(Viewport::new(320.0, 240.0, 1.0))
    }

    #[test]
    fn test_manual_scheduler_runs_one_batch() {
        let scheduler = ManualScheduler::new();
        let hits = Rc::new(RefCell::new(Vec::new()));

        let inner = scheduler.clone();
        let log = Rc::clone(&hits);
        scheduler
            .schedule_next(Box::new(move |ts| {
                log.borrow_mut().push(ts);
                let log = Rc::clone(&log);
                inner
                    .schedule_next(Box::new(move |ts| log.borrow_mut().push(ts)))
                    .unwrap();
            }))
            .unwrap();

        assert_eq!(scheduler.run_pending(16.0), 1);
        assert_eq!(*hits.borrow(), vec![16.0]);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.run_pending(32.0), 1);
        assert_eq!(*hits.borrow(), vec![16.0, 32.0]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_attach_configures_surface() {
        let frames = FrameLoop::attach(config(), surface(), ManualScheduler::new()).unwrap();
        frames.with_surface(|s| {
            assert_eq!(s.commands().len(), 1);
        });
        frames.with_animation(|a| {
            assert_eq!(a.viewport().width, 320.0);
            assert_eq!(a.seed(), 4);
        });
    }

    #[test]
    fn test_each_frame_schedules_the_next() {
        let scheduler = ManualScheduler::new();
        let frames = FrameLoop::attach(config(), surface(), scheduler.clone()).unwrap();
        assert!(!frames.is_running());
        assert_eq!(scheduler.pending(), 0);

        frames.start().unwrap();
        assert!(frames.is_running());
        assert_eq!(scheduler.pending(), 1);

        for i in 1..=5 {
            assert_eq!(scheduler.run_pending(i as f64 * 16.0), 1);
            assert_eq!(scheduler.pending(), 1);
        }
        assert_eq!(frames.with_animation(|a| a.frame()), 5);
    }

    #[test]
    fn test_start_twice_keeps_one_chain() {
        let scheduler = ManualScheduler::new();
        let frames = FrameLoop::attach(config(), surface(), scheduler.clone()).unwrap();
        frames.start().unwrap();
        frames.start().unwrap();
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_stop_drops_pending_frame() {
        let scheduler = ManualScheduler::new();
        let frames = FrameLoop::attach(config(), surface(), scheduler.clone()).unwrap();
        frames.start().unwrap();
        scheduler.run_pending(0.0);
        frames.stop();

        scheduler.run_pending(16.0);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(frames.with_animation(|a| a.frame()), 1);
    }

    #[test]
    fn test_restart_ignores_stale_callback() {
        let scheduler = ManualScheduler::new();
        let frames = FrameLoop::attach(config(), surface(), scheduler.clone()).unwrap();
        frames.start().unwrap();
        frames.stop();
        frames.start().unwrap();
        assert_eq!(scheduler.pending(), 2);

        // Only the callback from the current run advances and reschedules.
        scheduler.run_pending(0.0);
        assert_eq!(frames.with_animation(|a| a.frame()), 1);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_dropped_loop_ends_chain() {
        let scheduler = ManualScheduler::new();
        let frames = FrameLoop::attach(config(), surface(), scheduler.clone()).unwrap();
        frames.start().unwrap();
        drop(frames);
        scheduler.run_pending(0.0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_start_fails_when_scheduler_refuses() {
        let frames = FrameLoop::attach(config(), surface(), FailingScheduler).unwrap();
        match frames.start() {
            Err(BackdropError::Schedule(msg)) => assert_eq!(msg, "refused"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!frames.is_running());
    }

    #[test]
    fn test_resize_follows_surface() {
        let frames = FrameLoop::attach(config(), surface(), ManualScheduler::new()).unwrap();
        frames.render_frame();
        frames.render_frame();

        let bigger = Viewport::new(1024.0, 768.0, 2.0);
        frames.with_surface(|s| s.set_viewport(bigger));
        frames.resize();

        frames.with_animation(|a| {
            assert_eq!(a.viewport(), bigger);
            assert_eq!(a.frame(), 2);
        });
        frames.with_surface(|s| {
            assert!(s.commands().contains(&crate::render::DrawCommand::Configure(bigger)));
        });
    }
}
