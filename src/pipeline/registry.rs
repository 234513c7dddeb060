//! The pass registry: explicit enabled/disabled entries and ordering.

use crate::error::PipelineError;
use crate::gpu::GpuContext;
use crate::pipeline::chain::EffectChain;
use crate::pipeline::pass::EffectPass;

/// A registered effect with its enable switch.
///
/// Disabled entries stay constructed and keep their parameters, so toggling
/// an effect on is a registry change rather than new wiring.
pub struct PassEntry {
    pub pass: Box<dyn EffectPass>,
    pub enabled: bool,
}

/// Append-only collection of effect passes, frozen into an [`EffectChain`].
///
/// # Example
///
/// ```ignore
/// let mut registry = PassRegistry::new();
/// registry
///     .register(Box::new(geometry), true)
///     .register(Box::new(ssgi), true)
///     .register(Box::new(motion_blur), false);   // available but detached
/// let chain = registry.into_chain(&gpu)?;
/// ```
pub struct PassRegistry {
    entries: Vec<PassEntry>,
}

impl PassRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, pass: Box<dyn EffectPass>, enabled: bool) -> &mut Self {
        log::debug!(
            "registered pass '{}' ({})",
            pass.label(),
            if enabled { "enabled" } else { "disabled" }
        );
        self.entries.push(PassEntry { pass, enabled });
        self
    }

    /// Freeze the registry into an executable chain.
    ///
    /// Validates the ordering invariant and drops disabled entries. The
    /// returned chain executes the geometry-buffer producer first, then the
    /// remaining enabled passes in registration order.
    pub fn into_chain(self, gpu: &GpuContext) -> Result<EffectChain, PipelineError> {
        let order = resolve_order(&self.entries)?;
        let mut slots: Vec<Option<Box<dyn EffectPass>>> =
            self.entries.into_iter().map(|e| Some(e.pass)).collect();
        let passes = order
            .into_iter()
            .map(|i| slots[i].take().expect("ordering indices are unique"))
            .collect();
        Ok(EffectChain::new(gpu, passes))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the execution order over the enabled entries.
///
/// Producers of the shared geometry buffers are hoisted to the front
/// (keeping their relative order); every other enabled pass follows in
/// registration order. Fails when an enabled consumer has no enabled
/// producer ahead of it.
pub(crate) fn resolve_order(entries: &[PassEntry]) -> Result<Vec<usize>, PipelineError> {
    let mut producers = Vec::new();
    let mut rest = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        if !entry.enabled {
            continue;
        }
        if entry.pass.produces_geometry() {
            producers.push(i);
        } else {
            rest.push(i);
        }
    }

    if producers.is_empty() {
        if let Some(&i) = rest
            .iter()
            .find(|&&i| entries[i].pass.consumes_geometry())
        {
            return Err(PipelineError::MissingProducer(entries[i].pass.label()));
        }
    }

    producers.extend(rest);
    Ok(producers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::pass::FrameContext;

    struct StubPass {
        label: &'static str,
        produces: bool,
        consumes: bool,
    }

    impl EffectPass for StubPass {
        fn label(&self) -> &'static str {
            self.label
        }
        fn produces_geometry(&self) -> bool {
            self.produces
        }
        fn consumes_geometry(&self) -> bool {
            self.consumes
        }
        fn execute(
            &mut self,
            _ctx: &mut FrameContext,
            _input: Option<&wgpu::TextureView>,
            _target: &wgpu::TextureView,
        ) {
            unreachable!("stub passes are never executed");
        }
    }

    fn entry(label: &'static str, produces: bool, consumes: bool, enabled: bool) -> PassEntry {
        PassEntry {
            pass: Box::new(StubPass {
                label,
                produces,
                consumes,
            }),
            enabled,
        }
    }

    fn labels(entries: &[PassEntry], order: &[usize]) -> Vec<&'static str> {
        order.iter().map(|&i| entries[i].pass.label()).collect()
    }

    #[test]
    fn register_grows_the_registry() {
        let mut registry = PassRegistry::new();
        assert!(registry.is_empty());
        registry
            .register(Box::new(StubPass {
                label: "gbuffer",
                produces: true,
                consumes: false,
            }), true)
            .register(Box::new(StubPass {
                label: "ssgi",
                produces: false,
                consumes: true,
            }), false);
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }

    #[test]
    fn producer_precedes_consumers_for_every_permutation() {
        // All 6 orderings of (producer, consumer, plain).
        let perms: [[usize; 3]; 6] = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        let make = |which: usize| match which {
            0 => entry("gbuffer", true, false, true),
            1 => entry("ssgi", false, true, true),
            _ => entry("sharpen", false, false, true),
        };
        for perm in perms {
            let entries: Vec<PassEntry> = perm.into_iter().map(make).collect();
            let order = resolve_order(&entries).unwrap();
            let resolved = labels(&entries, &order);
            let producer_at = resolved.iter().position(|&l| l == "gbuffer").unwrap();
            let consumer_at = resolved.iter().position(|&l| l == "ssgi").unwrap();
            assert!(producer_at < consumer_at, "failed for {perm:?}");
            assert_eq!(producer_at, 0);
        }
    }

    #[test]
    fn non_producers_keep_registration_order() {
        let entries = vec![
            entry("ssgi", false, true, true),
            entry("sharpen", false, false, true),
            entry("gbuffer", true, false, true),
            entry("bloom", false, false, true),
        ];
        let order = resolve_order(&entries).unwrap();
        assert_eq!(
            labels(&entries, &order),
            vec!["gbuffer", "ssgi", "sharpen", "bloom"]
        );
    }

    #[test]
    fn disabled_passes_are_excluded() {
        let entries = vec![
            entry("gbuffer", true, false, true),
            entry("motion_blur", false, true, false),
            entry("sharpen", false, false, true),
        ];
        let order = resolve_order(&entries).unwrap();
        assert_eq!(labels(&entries, &order), vec!["gbuffer", "sharpen"]);
    }

    #[test]
    fn enabled_consumer_without_producer_is_an_error() {
        let entries = vec![
            entry("gbuffer", true, false, false),
            entry("ssgi", false, true, true),
        ];
        assert_eq!(
            resolve_order(&entries),
            Err(PipelineError::MissingProducer("ssgi"))
        );
    }

    #[test]
    fn consumer_disabled_with_producer_disabled_is_fine() {
        let entries = vec![
            entry("gbuffer", true, false, false),
            entry("sharpen", false, false, true),
        ];
        let order = resolve_order(&entries).unwrap();
        assert_eq!(labels(&entries, &order), vec!["sharpen"]);
    }
}
