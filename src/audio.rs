//! Sound-cue signalling
//!
//! Playback lives outside the core. A press emits one of
//! `SOUND_CUE_COUNT` chisel-strike cues; the embedding UI decides what a
//! cue actually sounds like.

use rand::Rng;

use crate::consts::SOUND_CUE_COUNT;

/// One of the chisel-strike audio cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundCue(pub u8);

impl SoundCue {
    /// Pick a cue at random, matching the original strike-sound shuffle.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        SoundCue(rng.random_range(0..SOUND_CUE_COUNT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_cues_stay_in_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            assert!(SoundCue::random(&mut rng).0 < SOUND_CUE_COUNT);
        }
    }

    #[test]
    fn test_seeded_selection_is_deterministic() {
        let mut a = Pcg32::seed_from_u64(5);
        let mut b = Pcg32::seed_from_u64(5);
        for _ in 0..20 {
            assert_eq!(SoundCue::random(&mut a), SoundCue::random(&mut b));
        }
    }
}
