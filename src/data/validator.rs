use crate::error::ValidationError;
use crate::types::{Individual, Population, PopulationShape, ScaleIndex};

pub struct PopulationValidator;

impl PopulationValidator {
    /// Check length and note range of one individual. `index` is only used for reporting.
    pub fn validate_individual(
        index: usize,
        individual: &Individual,
        shape: &PopulationShape,
    ) -> Result<(), ValidationError> {
        if individual.len() != shape.sequence_length {
            return Err(ValidationError::InvalidLength {
                individual: index,
                expected: shape.sequence_length,
                actual: individual.len(),
            });
        }

        if let Some((position, &value)) = individual
            .notes()
            .iter()
            .enumerate()
            .find(|(_, &note)| usize::from(note) >= shape.scale_size)
        {
            return Err(ValidationError::IndexOutOfRange {
                individual: index,
                position,
                value: usize::from(value),
                scale_size: shape.scale_size,
            });
        }

        Ok(())
    }

    /// Check population size, then every individual in order.
    pub fn validate_population(
        population: &Population,
        shape: &PopulationShape,
    ) -> Result<(), ValidationError> {
        if population.len() != shape.population_size {
            return Err(ValidationError::PopulationSize {
                expected: shape.population_size,
                actual: population.len(),
            });
        }

        for (i, individual) in population.individuals().iter().enumerate() {
            Self::validate_individual(i, individual, shape)?;
        }

        Ok(())
    }

    /// Convert a caller-supplied note number into a scale index.
    pub fn validate_note(value: usize, scale_size: usize) -> Result<ScaleIndex, ValidationError> {
        if value >= scale_size {
            return Err(ValidationError::InvalidNote { value, scale_size });
        }
        ScaleIndex::try_from(value).map_err(|_| ValidationError::InvalidNote { value, scale_size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> PopulationShape {
        PopulationShape {
            population_size: 2,
            sequence_length: 4,
            scale_size: 3,
        }
    }

    #[test]
    fn test_valid_population() {
        let population = Population::new(
            0,
            vec![Individual::new(vec![0, 1, 2, 0]), Individual::constant(2, 4)],
        );
        assert!(PopulationValidator::validate_population(&population, &shape()).is_ok());
    }

    #[test]
    fn test_reports_offending_position() {
        let population = Population::new(
            0,
            vec![Individual::constant(0, 4), Individual::new(vec![0, 1, 3, 0])],
        );
        let err = PopulationValidator::validate_population(&population, &shape()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::IndexOutOfRange {
                individual: 1,
                position: 2,
                value: 3,
                scale_size: 3
            }
        );
    }

    #[test]
    fn test_reports_wrong_length() {
        let population = Population::new(
            0,
            vec![Individual::constant(0, 5), Individual::constant(0, 4)],
        );
        let err = PopulationValidator::validate_population(&population, &shape()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidLength {
                individual: 0,
                expected: 4,
                actual: 5
            }
        );
    }

    #[test]
    fn test_reports_wrong_size() {
        let population = Population::new(0, vec![Individual::constant(0, 4)]);
        let err = PopulationValidator::validate_population(&population, &shape()).unwrap_err();
        assert_eq!(err, ValidationError::PopulationSize { expected: 2, actual: 1 });
    }

    #[test]
    fn test_validate_note() {
        assert_eq!(PopulationValidator::validate_note(2, 3), Ok(2));
        assert_eq!(
            PopulationValidator::validate_note(3, 3),
            Err(ValidationError::InvalidNote { value: 3, scale_size: 3 })
        );
    }
}
