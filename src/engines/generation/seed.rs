use crate::error::ValidationError;
use crate::types::{Individual, Population, PopulationShape, ScaleIndex};

/// Deterministic first generation.
///
/// Voices `0..voices` are laid out in blocks, each voice a melody that holds a
/// single scale step, and blocks repeat until `population_size` is reached.
/// The last block is cut short when the size is not a multiple of `voices`.
/// Every voice must be a scale step that fits a `ScaleIndex`.
pub fn seed_population(
    shape: &PopulationShape,
    voices: usize,
) -> Result<Population, ValidationError> {
    let voices = voices.max(1);
    let highest = voices - 1;
    if highest >= shape.scale_size || ScaleIndex::try_from(highest).is_err() {
        return Err(ValidationError::InvalidNote {
            value: highest,
            scale_size: shape.scale_size,
        });
    }
    let blocks = shape.population_size.div_ceil(voices);

    let individuals = (0..blocks)
        .flat_map(|_| 0..=highest as ScaleIndex)
        .take(shape.population_size)
        .map(|voice| Individual::constant(voice, shape.sequence_length))
        .collect();

    Ok(Population::new(0, individuals))
}

/// Single-note melodies for voices `0..count`, wrapping around the scale.
pub fn single_note_melodies(count: usize, sequence_length: usize, scale_size: usize) -> Vec<Individual> {
    // A scale index tops out at 255.
    let steps = scale_size.clamp(1, usize::from(ScaleIndex::MAX) + 1);
    (0..count)
        .map(|i| Individual::constant((i % steps) as ScaleIndex, sequence_length))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn shape(population_size: usize) -> PopulationShape {
        PopulationShape {
            population_size,
            sequence_length: 16,
            scale_size: 16,
        }
    }

    #[test]
    fn test_seed_layout_matches_blocks() {
        let population = seed_population(&shape(48), 16).unwrap();
        assert_eq!(population.len(), 48);
        assert_eq!(population.generation, 0);

        for (i, individual) in population.individuals().iter().enumerate() {
            assert_eq!(individual.len(), 16);
            assert!(individual.notes().iter().all(|&n| usize::from(n) == i % 16));
        }
    }

    #[test]
    fn test_seed_truncates_last_block() {
        let population = seed_population(&shape(20), 16).unwrap();
        assert_eq!(population.len(), 20);
        let voices: BTreeSet<u8> = population.individuals().iter().map(|m| m.notes()[0]).collect();
        assert_eq!(voices.len(), 16);
        assert_eq!(population.get(19).unwrap().notes()[0], 3);
    }

    #[test]
    fn test_seed_is_deterministic() {
        assert_eq!(
            seed_population(&shape(48), 16).unwrap(),
            seed_population(&shape(48), 16).unwrap()
        );
    }

    #[test]
    fn test_seed_rejects_voices_beyond_scale() {
        assert_eq!(
            seed_population(&shape(48), 17).unwrap_err(),
            ValidationError::InvalidNote { value: 16, scale_size: 16 }
        );

        let wide = PopulationShape {
            population_size: 300,
            sequence_length: 4,
            scale_size: 300,
        };
        assert_eq!(
            seed_population(&wide, 257).unwrap_err(),
            ValidationError::InvalidNote { value: 256, scale_size: 300 }
        );
        assert_eq!(seed_population(&wide, 256).unwrap().len(), 300);
    }

    #[test]
    fn test_single_note_melodies_wrap() {
        let melodies = single_note_melodies(5, 4, 3);
        let notes: Vec<u8> = melodies.iter().map(|m| m.notes()[0]).collect();
        assert_eq!(notes, vec![0, 1, 2, 0, 1]);
    }
}
