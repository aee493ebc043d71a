use anyhow::{Context, Result};

use crate::feed::{FeedInputs, InteractionSample};

use super::{Extent, PassBackend, PassResources, SimulationProgram};

/// Identity of one allocated simulation buffer.
///
/// Ids are unique per simulator and never reused, so a buffer allocated after a
/// resize is distinguishable from the one it replaced.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct BufferId(u64);

/// Token for the most recently published simulation result.
///
/// `buffer` is the `read` buffer at publication time and changes on every swap;
/// `frame` is the pass that produced it. Consumers compare handles to detect a
/// fresh result and must not hold the underlying target beyond the frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct OutputHandle {
    pub buffer: BufferId,
    pub frame: u32,
}

/// Result of one [`PingPong::advance`] call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AdvanceOutcome {
    /// Pass executed, buffers swapped, new handle published.
    Published(OutputHandle),
    /// Nothing happened this frame; the previous handle (if any) stays published.
    Skipped,
}

struct Buffer<T> {
    id: BufferId,
    target: T,
}

/// The two buffers plus which one currently plays `read`.
struct BufferPair<T> {
    extent: Extent,
    a: Buffer<T>,
    b: Buffer<T>,
    read_is_a: bool,
}

impl<T> BufferPair<T> {
    fn read(&self) -> &Buffer<T> {
        if self.read_is_a { &self.a } else { &self.b }
    }

    fn read_write(&mut self) -> (&Buffer<T>, &mut Buffer<T>) {
        if self.read_is_a {
            (&self.a, &mut self.b)
        } else {
            (&self.b, &mut self.a)
        }
    }

    fn swap(&mut self) {
        self.read_is_a = !self.read_is_a;
    }
}

/// Double-buffered simulation driven by one program.
///
/// Each [`advance`](Self::advance) reads the previous result from `read`, renders
/// the program into `write`, swaps the two and publishes the new `read`. GPU
/// resources are created lazily on the first advance and recreated (never
/// resized in place) after [`resize`](Self::resize).
pub struct PingPong<P: SimulationProgram, R: PassResources> {
    params: P::Params,
    extent: Extent,

    program: Option<R::Program>,
    buffers: Option<BufferPair<R::Target>>,

    frame: u32,
    published: Option<OutputHandle>,
    next_buffer_id: u64,

    /// Set while allocation keeps failing so the warning is logged once per streak.
    allocation_failing: bool,
}

impl<P: SimulationProgram, R: PassResources> PingPong<P, R> {
    pub fn new(extent: Extent, params: P::Params) -> Self {
        Self {
            params,
            extent,
            program: None,
            buffers: None,
            frame: 0,
            published: None,
            next_buffer_id: 0,
            allocation_failing: false,
        }
    }

    /// Requested resolution. May differ from the live buffers until the next
    /// successful advance.
    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Resolution of the buffers currently holding simulation state.
    pub fn allocated_extent(&self) -> Option<Extent> {
        self.buffers.as_ref().map(|p| p.extent)
    }

    #[inline]
    pub fn params(&self) -> P::Params {
        self.params
    }

    /// Replaces the tunables. Values are passed to the program as given.
    pub fn set_params(&mut self, params: P::Params) {
        self.params = params;
    }

    /// Passes executed since the current buffers were allocated.
    #[inline]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Requests a new resolution.
    ///
    /// The current buffers keep serving until the next advance allocates a
    /// blank pair at `extent`; from then on the frame counter restarts at zero
    /// and no earlier content is observable.
    pub fn resize(&mut self, extent: Extent) {
        if extent == self.extent {
            return;
        }
        log::debug!(
            "{}: resize requested {}x{} -> {}x{}",
            P::LABEL,
            self.extent.width,
            self.extent.height,
            extent.width,
            extent.height
        );
        self.extent = extent;
    }

    /// Handle of the latest published result.
    #[inline]
    pub fn output(&self) -> Option<OutputHandle> {
        self.published
    }

    /// Target behind the latest published handle, for consumers to sample.
    pub fn output_target(&self) -> Option<&R::Target> {
        let handle = self.published?;
        let pair = self.buffers.as_ref()?;
        let read = pair.read();
        (read.id == handle.buffer).then_some(&read.target)
    }

    /// Runs one simulation pass.
    ///
    /// Either the whole pass happens (draw, swap, publish) or nothing does; a
    /// failed allocation skips the frame and leaves the previous output in place.
    pub fn advance<B: PassBackend<R>>(
        &mut self,
        backend: &mut B,
        interaction: InteractionSample,
    ) -> AdvanceOutcome {
        if !self.ensure_program(backend) || !self.ensure_buffers(backend) {
            return AdvanceOutcome::Skipped;
        }

        let (Some(program), Some(pair)) = (self.program.as_mut(), self.buffers.as_mut()) else {
            return AdvanceOutcome::Skipped;
        };

        let uniforms = P::feed(&FeedInputs {
            resolution: pair.extent,
            interaction,
            params: self.params,
            frame: self.frame,
        });

        {
            let (read, write) = pair.read_write();
            backend.draw_fullscreen::<P>(program, &uniforms, &read.target, &mut write.target);
        }

        pair.swap();
        self.frame = self.frame.wrapping_add(1);

        let handle = OutputHandle {
            buffer: pair.read().id,
            frame: self.frame,
        };
        self.published = Some(handle);

        AdvanceOutcome::Published(handle)
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_program<B: PassBackend<R>>(&mut self, backend: &mut B) -> bool {
        if self.program.is_some() {
            return true;
        }
        match backend.create_program::<P>() {
            Ok(program) => {
                self.program = Some(program);
                true
            }
            Err(e) => {
                log::warn!("{}: program creation failed: {e:#}", P::LABEL);
                false
            }
        }
    }

    fn ensure_buffers<B: PassBackend<R>>(&mut self, backend: &mut B) -> bool {
        if self.buffers.as_ref().is_some_and(|p| p.extent == self.extent) {
            return true;
        }

        match self.allocate_pair(backend) {
            Ok(pair) => {
                log::debug!(
                    "{}: allocated buffers {}x{}",
                    P::LABEL,
                    pair.extent.width,
                    pair.extent.height
                );
                // Old pair (if any) is dropped here, never reused.
                self.buffers = Some(pair);
                self.frame = 0;
                self.allocation_failing = false;
                true
            }
            Err(e) => {
                if !self.allocation_failing {
                    log::warn!("{}: skipping frame, {e:#}", P::LABEL);
                }
                self.allocation_failing = true;
                false
            }
        }
    }

    fn allocate_pair<B: PassBackend<R>>(&mut self, backend: &mut B) -> Result<BufferPair<R::Target>> {
        let extent = self.extent;
        anyhow::ensure!(
            extent.is_valid(),
            "zero-sized simulation extent {}x{}",
            extent.width,
            extent.height
        );

        let a = self.allocate_buffer(backend, extent)?;
        let b = self.allocate_buffer(backend, extent)?;

        Ok(BufferPair {
            extent,
            a,
            b,
            read_is_a: true,
        })
    }

    fn allocate_buffer<B: PassBackend<R>>(
        &mut self,
        backend: &mut B,
        extent: Extent,
    ) -> Result<Buffer<R::Target>> {
        let id = BufferId(self.next_buffer_id);
        self.next_buffer_id += 1;

        let label = format!("tidepool {} buffer {}", P::LABEL, id.0);
        let target = backend
            .create_target::<P>(&label, extent)
            .with_context(|| format!("failed to allocate {label}"))?;

        Ok(Buffer { id, target })
    }
}
