//! Lifecycle of the ping-pong simulator, driven headless through the CPU backend.

use bytemuck::{Pod, Zeroable};

use tidepool_engine::feed::{FeedInputs, InteractionSample};
use tidepool_engine::sim::{
    AdvanceOutcome, Extent, OutputHandle, PingPong, Sampling, SimulationProgram, Software,
    SoftwareBackend, Texel, TexelGrid,
};

/// Counts passes in `r`, records the fed frame counter in `g`, the gain
/// parameter in `b` and the interaction flag in `a`.
struct CounterProgram;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CounterUniforms {
    frame: u32,
    gain: f32,
    active: f32,
    _pad: f32,
}

impl SimulationProgram for CounterProgram {
    type Params = f32;
    type Uniforms = CounterUniforms;

    const LABEL: &'static str = "counter";
    const WGSL: &'static str = "";
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;
    const SAMPLING: Sampling = Sampling::Nearest;

    fn feed(inputs: &FeedInputs<f32>) -> CounterUniforms {
        CounterUniforms {
            frame: inputs.frame,
            gain: inputs.params,
            active: inputs.interaction.active,
            _pad: 0.0,
        }
    }

    fn shade(u: &CounterUniforms, prev: &TexelGrid, x: u32, y: u32) -> Texel {
        let [passes, ..] = prev.get(x, y);
        [passes + 1.0, u.frame as f32, u.gain, u.active]
    }
}

type Counter = PingPong<CounterProgram, Software>;

const IDLE: InteractionSample = InteractionSample::released([0.5, 0.5]);

fn published(outcome: AdvanceOutcome) -> OutputHandle {
    match outcome {
        AdvanceOutcome::Published(handle) => handle,
        AdvanceOutcome::Skipped => panic!("pass was skipped"),
    }
}

fn output(sim: &Counter) -> &TexelGrid {
    sim.output_target().expect("no published output")
}

#[test]
fn nothing_is_allocated_before_the_first_advance() {
    let mut backend = SoftwareBackend::new();
    let mut sim = Counter::new(Extent::new(4, 4), 1.0);

    assert_eq!(sim.output(), None);
    assert!(sim.output_target().is_none());
    assert_eq!(backend.allocations(), 0);

    published(sim.advance(&mut backend, IDLE));
    assert_eq!(backend.allocations(), 2);
    assert_eq!(sim.allocated_extent(), Some(Extent::new(4, 4)));
}

#[test]
fn read_and_write_swap_every_pass() {
    let mut backend = SoftwareBackend::new();
    let mut sim = Counter::new(Extent::new(3, 2), 1.0);

    let handles: Vec<OutputHandle> = (0..6)
        .map(|_| published(sim.advance(&mut backend, IDLE)))
        .collect();

    for pair in handles.windows(2) {
        assert_ne!(pair[0].buffer, pair[1].buffer);
        assert_eq!(pair[1].frame, pair[0].frame + 1);
    }
    for pair in handles.windows(3) {
        assert_eq!(pair[0].buffer, pair[2].buffer);
    }

    // Each pass read the previous result, so the count accumulates.
    assert_eq!(output(&sim).get(2, 1)[0], 6.0);
    assert_eq!(backend.allocations(), 2);
}

#[test]
fn one_draw_and_one_publication_per_advance() {
    let mut backend = SoftwareBackend::new();
    let mut sim = Counter::new(Extent::new(2, 2), 1.0);

    let mut previous: Option<TexelGrid> = None;
    for n in 1..=4u64 {
        let handle = published(sim.advance(&mut backend, IDLE));
        assert_eq!(backend.draws(), n);
        assert_eq!(sim.output(), Some(handle));

        let current = output(&sim).clone();
        assert_ne!(previous.as_ref(), Some(&current));
        previous = Some(current);
    }
}

#[test]
fn frame_counter_is_fed_before_increment() {
    let mut backend = SoftwareBackend::new();
    let mut sim = Counter::new(Extent::new(1, 1), 1.0);

    for expected_seed in 0..3 {
        sim.advance(&mut backend, IDLE);
        assert_eq!(output(&sim).get(0, 0)[1], expected_seed as f32);
    }
    assert_eq!(sim.frame(), 3);
}

#[test]
fn resize_discards_state_and_restarts_the_frame_counter() {
    let mut backend = SoftwareBackend::new();
    let mut sim = Counter::new(Extent::new(4, 4), 1.0);

    let mut last = published(sim.advance(&mut backend, IDLE));
    for _ in 0..4 {
        last = published(sim.advance(&mut backend, IDLE));
    }
    assert_eq!(sim.frame(), 5);

    sim.resize(Extent::new(8, 2));
    // Deferred: the old pair keeps serving until the next advance.
    assert_eq!(sim.output(), Some(last));
    assert_eq!(sim.allocated_extent(), Some(Extent::new(4, 4)));

    let fresh = published(sim.advance(&mut backend, IDLE));
    assert_eq!(fresh.frame, 1);
    assert_ne!(fresh.buffer, last.buffer);
    assert_eq!(backend.allocations(), 4);

    let grid = output(&sim);
    assert_eq!(grid.extent(), Extent::new(8, 2));
    // One pass over a blank pair, fed with a counter of zero.
    assert!(grid.texels().iter().all(|t| t[0] == 1.0 && t[1] == 0.0));
}

#[test]
fn resizing_to_the_same_extent_keeps_state() {
    let mut backend = SoftwareBackend::new();
    let mut sim = Counter::new(Extent::new(4, 4), 1.0);

    sim.advance(&mut backend, IDLE);
    sim.advance(&mut backend, IDLE);
    sim.resize(Extent::new(4, 4));
    let handle = published(sim.advance(&mut backend, IDLE));

    assert_eq!(handle.frame, 3);
    assert_eq!(backend.allocations(), 2);
    assert_eq!(output(&sim).get(0, 0)[0], 3.0);
}

#[test]
fn failed_allocation_keeps_the_previous_output() {
    let mut backend = SoftwareBackend::new();
    let mut sim = Counter::new(Extent::new(4, 4), 1.0);

    sim.advance(&mut backend, IDLE);
    let before = published(sim.advance(&mut backend, IDLE));
    let content = output(&sim).clone();

    backend.fail_allocations(true);
    sim.resize(Extent::new(16, 16));

    for _ in 0..3 {
        assert_eq!(sim.advance(&mut backend, IDLE), AdvanceOutcome::Skipped);
        assert_eq!(sim.output(), Some(before));
        assert_eq!(output(&sim), &content);
    }
    assert_eq!(sim.frame(), 2);
    assert_eq!(backend.draws(), 2);

    // Next frame retries on its own once memory is back.
    backend.fail_allocations(false);
    let after = published(sim.advance(&mut backend, IDLE));
    assert_eq!(after.frame, 1);
    assert_eq!(output(&sim).extent(), Extent::new(16, 16));
}

#[test]
fn failed_first_allocation_publishes_nothing() {
    let mut backend = SoftwareBackend::new();
    backend.fail_allocations(true);
    let mut sim = Counter::new(Extent::new(4, 4), 1.0);

    assert_eq!(sim.advance(&mut backend, IDLE), AdvanceOutcome::Skipped);
    assert_eq!(sim.output(), None);
    assert_eq!(backend.draws(), 0);
}

#[test]
fn zero_sized_extent_skips_frames() {
    let mut backend = SoftwareBackend::new();
    let mut sim = Counter::new(Extent::new(0, 240), 1.0);

    assert_eq!(sim.advance(&mut backend, IDLE), AdvanceOutcome::Skipped);
    assert_eq!(sim.output(), None);

    sim.resize(Extent::new(2, 2));
    published(sim.advance(&mut backend, IDLE));
}

#[test]
fn params_reach_the_program_unclamped() {
    let mut backend = SoftwareBackend::new();
    let mut sim = Counter::new(Extent::new(1, 1), 1.0);

    for gain in [-3.5, 0.0, 1.0e6, f32::MAX] {
        sim.set_params(gain);
        assert_eq!(sim.params(), gain);
        sim.advance(&mut backend, IDLE);
        assert_eq!(output(&sim).get(0, 0)[2], gain);
    }
}

#[test]
fn each_pass_sees_the_sample_it_was_given() {
    let mut backend = SoftwareBackend::new();
    let mut sim = Counter::new(Extent::new(1, 1), 1.0);

    sim.advance(&mut backend, InteractionSample::pressed([0.2, 0.8]));
    assert_eq!(output(&sim).get(0, 0)[3], 1.0);

    sim.advance(&mut backend, IDLE);
    assert_eq!(output(&sim).get(0, 0)[3], 0.0);
}
