use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tunebreed::config::evolution::{EvolutionConfig, FillerMode, PairingPolicy};
use tunebreed::engines::generation::{
    perfect_shuffle, seed_population, sort_by_fitness, EvolutionEngine, SilentProgressCallback,
};
use tunebreed::{Individual, PopulationShape, Ratings};

fn random_melody(rng: &mut StdRng, len: usize, scale_size: u8) -> Individual {
    Individual::new((0..len).map(|_| rng.gen_range(0..scale_size)).collect())
}

fn engine(pairing: PairingPolicy, filler_mode: FillerMode, seed: u64) -> EvolutionEngine {
    let config = EvolutionConfig {
        population_size: 48,
        survivors: 16,
        shift: 8,
        seed_voices: 16,
        filler_mode,
        pairing,
        seed: Some(seed),
        max_brood: None,
    };
    EvolutionEngine::new(config, shape()).unwrap()
}

fn shape() -> PopulationShape {
    PopulationShape {
        population_size: 48,
        sequence_length: 64,
        scale_size: 16,
    }
}

#[test]
fn test_crossover_children_come_from_matching_parity() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..200 {
        let len = rng.gen_range(1..40);
        let m1 = random_melody(&mut rng, len, 16);
        let m2 = random_melody(&mut rng, len, 16);
        let shift = rng.gen_range(0..2 * len);

        let (a, b) = perfect_shuffle(&m1, &m2, shift).unwrap();
        assert_eq!(a.len(), len);
        assert_eq!(b.len(), len);

        for (j, &note) in a.notes().iter().enumerate() {
            let parent = if j % 2 == 0 { &m1 } else { &m2 };
            assert_eq!(note, parent.notes()[j / 2]);
        }
        for (j, &note) in b.notes().iter().enumerate() {
            let k = (j + shift) % (2 * len);
            let parent = if k % 2 == 0 { &m1 } else { &m2 };
            assert_eq!(note, parent.notes()[k / 2]);
        }
    }
}

#[test]
fn test_crossover_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(7);
    let m1 = random_melody(&mut rng, 256, 16);
    let m2 = random_melody(&mut rng, 256, 16);

    let first = perfect_shuffle(&m1, &m2, 8).unwrap();
    for _ in 0..10 {
        assert_eq!(perfect_shuffle(&m1, &m2, 8).unwrap(), first);
    }
}

#[test]
fn test_zero_shift_gives_identical_children() {
    let mut rng = StdRng::seed_from_u64(8);
    let m1 = random_melody(&mut rng, 31, 16);
    let m2 = random_melody(&mut rng, 31, 16);
    let (a, b) = perfect_shuffle(&m1, &m2, 0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_fitness_ties_keep_input_order() {
    let rated = vec![
        Individual::constant(0, 4).rated(5),
        Individual::constant(1, 4).rated(5),
        Individual::constant(2, 4).rated(9),
    ];
    let order: Vec<u8> = sort_by_fitness(rated)
        .iter()
        .map(|r| r.individual.notes()[0])
        .collect();
    assert_eq!(order, vec![2, 0, 1]);
}

#[test]
fn test_population_size_holds_for_random_ratings() {
    let mut rng = StdRng::seed_from_u64(1234);

    for pairing in [
        PairingPolicy::ReinsertParents,
        PairingPolicy::DoubleShuffle,
        PairingPolicy::Legacy,
    ] {
        for filler_mode in [FillerMode::Random, FillerMode::Cycle] {
            let mut engine = engine(pairing, filler_mode, rng.gen());
            let mut population = seed_population(&shape(), 16).unwrap();

            for generation in 1..=25u64 {
                let scores: Vec<u32> = (0..48)
                    .map(|_| if rng.gen_bool(0.3) { rng.gen_range(0..10) } else { 0 })
                    .collect();
                population = engine
                    .evolve(&population, &Ratings::from_scores(scores), &mut SilentProgressCallback)
                    .unwrap();

                assert_eq!(population.generation, generation);
                assert_eq!(population.len(), 48, "{:?}/{:?}", pairing, filler_mode);
                for melody in population.individuals() {
                    assert_eq!(melody.len(), 64);
                    assert!(melody.notes().iter().all(|&n| n < 16));
                }
            }
        }
    }
}

#[test]
fn test_survivors_reappear_unchanged() {
    let mut engine = engine(PairingPolicy::ReinsertParents, FillerMode::Random, 99);
    let mut rng = StdRng::seed_from_u64(5);
    let individuals: Vec<Individual> = (0..48).map(|_| random_melody(&mut rng, 64, 16)).collect();
    let population = tunebreed::Population::new(3, individuals.clone());

    let selected: Vec<usize> = (0..48).step_by(3).collect();
    assert_eq!(selected.len(), 16);
    let ratings = Ratings::from_selection(&selected, 48).unwrap();

    let next = engine
        .evolve(&population, &ratings, &mut SilentProgressCallback)
        .unwrap();
    assert_eq!(next.generation, 4);
    for &i in &selected {
        assert!(next.individuals().contains(&individuals[i]), "survivor {} missing", i);
    }
}

#[test]
fn test_unselected_melodies_do_not_survive_verbatim() {
    let mut engine = engine(PairingPolicy::ReinsertParents, FillerMode::Cycle, 3);
    let mut rng = StdRng::seed_from_u64(6);
    let individuals: Vec<Individual> = (0..48).map(|_| random_melody(&mut rng, 64, 16)).collect();
    let population = tunebreed::Population::new(0, individuals.clone());

    let ratings = Ratings::from_selection(&(0..16).collect::<Vec<_>>(), 48).unwrap();
    let next = engine
        .evolve(&population, &ratings, &mut SilentProgressCallback)
        .unwrap();

    for loser in &individuals[16..] {
        assert!(!next.individuals().contains(loser));
    }
}
