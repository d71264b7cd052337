use crate::data::validator::PopulationValidator;
use crate::error::ValidationError;
use crate::types::{Individual, ScaleIndex};

/// Perfect-shuffle crossover.
///
/// The parents are interleaved note by note into a sequence `z` of length `2L`
/// (`m1` on even positions, `m2` on odd ones). The first child is `z[0..L]`;
/// the second reads `L` notes of `z` starting at `shift`, wrapping around.
/// Larger shifts mix the parents more thoroughly; the shift is taken modulo `2L`.
pub fn perfect_shuffle(
    m1: &Individual,
    m2: &Individual,
    shift: usize,
) -> Result<(Individual, Individual), ValidationError> {
    if m1.len() != m2.len() {
        return Err(ValidationError::LengthMismatch {
            left: m1.len(),
            right: m2.len(),
        });
    }

    let len = m1.len();
    if len == 0 {
        return Ok((Individual::new(Vec::new()), Individual::new(Vec::new())));
    }

    let interleaved: Vec<ScaleIndex> = m1
        .notes()
        .iter()
        .zip(m2.notes())
        .flat_map(|(&a, &b)| [a, b])
        .collect();
    let span = interleaved.len();
    let offset = shift % span;

    let first = interleaved[..len].to_vec();
    let second = (0..len)
        .map(|j| interleaved[(j + offset) % span])
        .collect();

    Ok((Individual::new(first), Individual::new(second)))
}

/// Replace every occurrence of `from` with `to`.
pub fn replace_note(
    individual: &Individual,
    from: usize,
    to: usize,
    scale_size: usize,
) -> Result<Individual, ValidationError> {
    let from = PopulationValidator::validate_note(from, scale_size)?;
    let to = PopulationValidator::validate_note(to, scale_size)?;

    Ok(individual
        .notes()
        .iter()
        .map(|&note| if note == from { to } else { note })
        .collect::<Vec<_>>()
        .into())
}
