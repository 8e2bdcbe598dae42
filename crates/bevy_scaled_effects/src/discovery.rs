use bevy::prelude::*;

use crate::{
    asset::{EffectConfig, EmitterSettings},
    emitter::VirtualEmitter,
    runtime::ParticleEmitter,
};

/// An emitter found under an effect root, before sub-emitter filtering.
#[derive(Debug, Clone, Copy)]
pub struct EmitterCandidate<'a, H> {
    /// Engine handle of the emitter.
    pub handle: H,
    /// Authored parameters.
    pub settings: &'a EmitterSettings,
    /// Emitters this one drives as sub-emitters.
    pub sub_emitters: &'a [H],
    /// Whether `sub_emitters` is active.
    pub sub_emitters_enabled: bool,
}

/// Builds virtual emitters from `candidates`, keeping discovery order.
///
/// Candidates referenced as an enabled sub-emitter of another candidate are dropped,
/// since their parent drives them.
pub fn collect_virtual_emitters<H: Copy + PartialEq>(
    candidates: &[EmitterCandidate<'_, H>],
    config: &EffectConfig,
) -> Vec<VirtualEmitter<H>> {
    candidates
        .iter()
        .filter(|candidate| !is_sub_emitter(candidate.handle, candidates))
        .map(|candidate| {
            VirtualEmitter::from_settings(candidate.handle, candidate.settings)
                .with_empty_batches(config.emit_empty_batches)
        })
        .collect()
}

fn is_sub_emitter<H: PartialEq>(handle: H, candidates: &[EmitterCandidate<'_, H>]) -> bool {
    candidates.iter().any(|candidate| {
        candidate.sub_emitters_enabled && candidate.sub_emitters.contains(&handle)
    })
}

/// Collects the emitters on `root` and its descendants.
pub fn discover_emitters(
    root: Entity,
    children: &Query<&Children>,
    emitters: &Query<&ParticleEmitter>,
    config: &EffectConfig,
) -> Vec<VirtualEmitter<Entity>> {
    let candidates: Vec<EmitterCandidate<'_, Entity>> = std::iter::once(root)
        .chain(children.iter_descendants(root))
        .filter_map(move |entity| {
            emitters.get(entity).ok().map(|emitter| EmitterCandidate {
                handle: entity,
                settings: &emitter.settings,
                sub_emitters: &emitter.sub_emitters,
                sub_emitters_enabled: emitter.sub_emitters_enabled,
            })
        })
        .collect();

    let found = candidates.len();
    let virtual_emitters = collect_virtual_emitters(&candidates, config);
    debug!(
        "discovered {} emitters under {root:?} ({} driven as sub-emitters)",
        virtual_emitters.len(),
        found - virtual_emitters.len()
    );
    virtual_emitters
}
