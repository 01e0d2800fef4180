//! Fixed-order pass executor.
//!
//! `FrameGraph` owns the ordered pass list and the renderer-wide
//! [`RenderState`]. Ordering is checked once at construction: a pass may only
//! read an offscreen target that an earlier pass writes, and every offscreen
//! target has exactly one writer. Each frame then replays the passes in order,
//! resetting the state from each pass's descriptor before it runs and back to
//! [`RenderState::DEFAULT`] when the frame ends.

use std::collections::HashMap;

use crate::error::{GraphError, RenderError};
use crate::graph::{Backend, FramePacket, RenderPass, RenderState, TargetId};

/// What one call to [`FrameGraph::execute`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub frame_index: u64,
    pub passes: usize,
}

pub struct FrameGraph<B: Backend> {
    passes: Vec<Box<dyn RenderPass<B>>>,
    state: RenderState,
    frames: u64,
}

impl<B: Backend> FrameGraph<B> {
    /// Validates pass ordering against `offscreen_targets` available targets.
    pub fn new(
        passes: Vec<Box<dyn RenderPass<B>>>,
        offscreen_targets: usize,
    ) -> Result<Self, GraphError> {
        let mut writers: HashMap<TargetId, &str> = HashMap::new();

        for pass in &passes {
            let desc = pass.descriptor();
            let name = pass.name();

            for &input in &desc.inputs {
                check_known(name, input, offscreen_targets)?;
                if input == desc.target {
                    return Err(GraphError::ReadsOwnTarget {
                        pass: name.to_owned(),
                        target: input,
                    });
                }
                if !writers.contains_key(&input) {
                    return Err(GraphError::InputNotWritten {
                        pass: name.to_owned(),
                        input,
                    });
                }
            }

            check_known(name, desc.target, offscreen_targets)?;
            if let TargetId::Offscreen(_) = desc.target {
                if let Some(first) = writers.get(&desc.target) {
                    return Err(GraphError::MultipleWriters {
                        target: desc.target,
                        first: (*first).to_owned(),
                        second: name.to_owned(),
                    });
                }
            }
            writers.insert(desc.target, name);
        }

        log::debug!(
            "frame graph: {}",
            passes.iter().map(|p| p.name()).collect::<Vec<_>>().join(" -> ")
        );

        Ok(Self {
            passes,
            state: RenderState::DEFAULT,
            frames: 0,
        })
    }

    /// Runs every pass once, in order.
    ///
    /// On error the remaining passes are skipped; the state is reset either
    /// way.
    pub fn execute(
        &mut self,
        ctx: &B::Context,
        frame: &mut B::Frame<'_>,
        packet: &FramePacket,
    ) -> Result<FrameStats, RenderError> {
        let result = self.run_passes(ctx, frame, packet);
        self.state = RenderState::DEFAULT;

        let frame_index = self.frames;
        self.frames += 1;
        result.map(|passes| FrameStats { frame_index, passes })
    }

    fn run_passes(
        &mut self,
        ctx: &B::Context,
        frame: &mut B::Frame<'_>,
        packet: &FramePacket,
    ) -> Result<usize, RenderError> {
        for pass in &mut self.passes {
            self.state = RenderState::for_pass(pass.descriptor());
            pass.prepare(ctx, packet);
            let mut open = B::begin_pass(frame, pass.descriptor(), &self.state)?;
            pass.record(&mut open, packet);
        }
        Ok(self.passes.len())
    }

    /// Current state flags. Outside `execute` this is always the default.
    #[inline]
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn pass_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.passes.iter().map(|p| p.name())
    }

    /// Number of frames executed so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

fn check_known(pass: &str, target: TargetId, count: usize) -> Result<(), GraphError> {
    match target {
        TargetId::Offscreen(index) if index >= count => Err(GraphError::UnknownTarget {
            pass: pass.to_owned(),
            index,
            count,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::graph::{DepthCompare, PassDescriptor};

    /// Backend that records which pass opened with which state.
    struct Recorder;

    #[derive(Default)]
    struct Tape {
        opened: Vec<(String, RenderState)>,
        fail_on: Option<String>,
    }

    impl Backend for Recorder {
        type Context = ();
        type Frame<'f> = Tape;
        type Pass<'p> = &'p mut Tape;

        fn begin_pass<'p, 'f: 'p>(
            frame: &'p mut Self::Frame<'f>,
            desc: &PassDescriptor,
            state: &RenderState,
        ) -> Result<&'p mut Tape, RenderError> {
            if frame.fail_on.as_deref() == Some(desc.label.as_str()) {
                return Err(RenderError::RuntimeState(format!("{} refused", desc.label)));
            }
            frame.opened.push((desc.label.clone(), *state));
            Ok(frame)
        }
    }

    /// Sequence counter shared by every probe pass.
    type Counter = Rc<RefCell<Vec<(u64, String)>>>;

    struct Probe {
        desc: PassDescriptor,
        counter: Counter,
    }

    impl RenderPass<Recorder> for Probe {
        fn descriptor(&self) -> &PassDescriptor {
            &self.desc
        }

        fn record(&mut self, _pass: &mut &mut Tape, packet: &FramePacket) {
            self.counter
                .borrow_mut()
                .push((packet.frame_index, self.desc.label.clone()));
        }
    }

    fn refraction_descriptors() -> Vec<PassDescriptor> {
        vec![
            PassDescriptor::new("front", TargetId::Offscreen(0))
                .clear_color([0.0; 4])
                .clear_depth(1.0)
                .depth(DepthCompare::NearerWins, true),
            PassDescriptor::new("back", TargetId::Offscreen(1))
                .clear_color([0.0; 4])
                .clear_depth(0.0)
                .depth(DepthCompare::FartherWins, true),
            PassDescriptor::new("composite", TargetId::Screen)
                .clear_color([0.0, 0.0, 0.0, 1.0])
                .clear_depth(1.0)
                .depth(DepthCompare::NearerWins, true)
                .reads(TargetId::Offscreen(0))
                .reads(TargetId::Offscreen(1)),
            PassDescriptor::new("skybox", TargetId::Screen)
                .depth(DepthCompare::EqualOrNearer, false),
        ]
    }

    fn graph(descs: Vec<PassDescriptor>, counter: &Counter) -> Result<FrameGraph<Recorder>, GraphError> {
        let passes = descs
            .into_iter()
            .map(|desc| {
                Box::new(Probe {
                    desc,
                    counter: counter.clone(),
                }) as Box<dyn RenderPass<Recorder>>
            })
            .collect();
        FrameGraph::new(passes, 2)
    }

    #[test]
    fn passes_run_in_fixed_order_every_frame() {
        let counter = Counter::default();
        let mut g = graph(refraction_descriptors(), &counter).unwrap();

        for i in 0..3 {
            let mut tape = Tape::default();
            let packet = FramePacket { frame_index: i, ..Default::default() };
            let stats = g.execute(&(), &mut tape, &packet).unwrap();
            assert_eq!(stats, FrameStats { frame_index: i, passes: 4 });
        }

        let log = counter.borrow();
        assert_eq!(log.len(), 12);
        for (seq, (frame, name)) in log.iter().enumerate() {
            assert_eq!(*frame, seq as u64 / 4);
            assert_eq!(name, ["front", "back", "composite", "skybox"][seq % 4]);
        }
        assert_eq!(g.frames(), 3);
    }

    #[test]
    fn each_pass_opens_with_its_own_state() {
        let counter = Counter::default();
        let mut g = graph(refraction_descriptors(), &counter).unwrap();
        let mut tape = Tape::default();
        g.execute(&(), &mut tape, &FramePacket::default()).unwrap();

        let states: Vec<_> = tape.opened.iter().map(|(_, s)| *s).collect();
        assert_eq!(states[0].depth.compare, DepthCompare::NearerWins);
        assert_eq!(states[0].clear_depth, Some(1.0));
        assert_eq!(states[1].depth.compare, DepthCompare::FartherWins);
        assert_eq!(states[1].clear_depth, Some(0.0));
        assert_eq!(states[2].depth.compare, DepthCompare::NearerWins);
        assert_eq!(states[2].clear_depth, Some(1.0));
        assert_eq!(states[3].depth.compare, DepthCompare::EqualOrNearer);
        assert_eq!(states[3].clear_depth, None);
        assert!(!states[3].depth.write);
    }

    #[test]
    fn state_is_restored_after_frame() {
        let counter = Counter::default();
        let mut g = graph(refraction_descriptors(), &counter).unwrap();
        g.execute(&(), &mut Tape::default(), &FramePacket::default()).unwrap();
        assert_eq!(*g.state(), RenderState::DEFAULT);

        let mut failing = Tape { fail_on: Some("composite".into()), ..Default::default() };
        assert!(g.execute(&(), &mut failing, &FramePacket::default()).is_err());
        assert_eq!(failing.opened.len(), 2);
        assert_eq!(*g.state(), RenderState::DEFAULT);
    }

    #[test]
    fn reading_before_writing_is_rejected() {
        let mut descs = refraction_descriptors();
        descs.swap(1, 2); // composite before back capture
        let err = graph(descs, &Counter::default()).err().unwrap();
        assert_eq!(
            err,
            GraphError::InputNotWritten {
                pass: "composite".into(),
                input: TargetId::Offscreen(1)
            }
        );
    }

    #[test]
    fn capture_targets_have_one_writer() {
        let mut descs = refraction_descriptors();
        descs[1].target = TargetId::Offscreen(0);
        let err = graph(descs, &Counter::default()).err().unwrap();
        assert!(matches!(err, GraphError::MultipleWriters { .. }));
    }

    #[test]
    fn unknown_and_self_reads_are_rejected() {
        let mut descs = refraction_descriptors();
        descs[0].target = TargetId::Offscreen(5);
        assert!(matches!(
            graph(descs, &Counter::default()).err().unwrap(),
            GraphError::UnknownTarget { index: 5, .. }
        ));

        let mut descs = refraction_descriptors();
        descs[0].inputs.push(TargetId::Offscreen(0));
        assert!(matches!(
            graph(descs, &Counter::default()).err().unwrap(),
            GraphError::ReadsOwnTarget { .. }
        ));
    }
}
