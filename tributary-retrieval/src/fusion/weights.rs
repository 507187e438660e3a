//! Availability-adjusted modality weights.

use tributary_core::config::FusionWeights;
use tributary_core::models::Modality;

use super::ModalityHits;

/// Zero the weight of every modality with no hits and rescale the rest to
/// sum to 1. With no hits anywhere, every weight is 0.
pub fn availability_weights(base: &FusionWeights, lists: &[ModalityHits]) -> FusionWeights {
    let mut adjusted = FusionWeights::new(0.0, 0.0, 0.0);
    for modality in Modality::ALL {
        let present = lists
            .iter()
            .any(|list| list.modality == modality && !list.hits.is_empty());
        if present {
            adjusted.set(modality, base.get(modality));
        }
    }

    let total = adjusted.total();
    if total > 0.0 {
        for modality in Modality::ALL {
            adjusted.set(modality, adjusted.get(modality) / total);
        }
    }
    adjusted
}
