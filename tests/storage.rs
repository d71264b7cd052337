use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use tunebreed::data::{JsonFileStore, MemoryStore, PopulationStore};
use tunebreed::error::{StorageError, TunebreedError, ValidationError};
use tunebreed::{Individual, Population, PopulationShape};

fn shape() -> PopulationShape {
    PopulationShape {
        population_size: 48,
        sequence_length: 256,
        scale_size: 16,
    }
}

fn random_population(rng: &mut StdRng) -> Population {
    let individuals = (0..48)
        .map(|_| Individual::new((0..256).map(|_| rng.gen_range(0..16)).collect()))
        .collect();
    Population::new(rng.gen_range(0..1000), individuals)
}

#[test]
fn test_empty_storage_yields_seed_population() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("population.json"), shape(), 16);
    let population = store.load().unwrap();

    assert_eq!(population.len(), 48);
    let mut voices = BTreeSet::new();
    for melody in population.individuals() {
        let first = melody.notes()[0];
        assert!(melody.notes().iter().all(|&n| n == first));
        voices.insert(first);
    }
    assert_eq!(voices, (0..16).collect::<BTreeSet<u8>>());
}

#[test]
fn test_save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut file_store = JsonFileStore::new(dir.path().join("population.json"), shape(), 16);
    let mut memory_store = MemoryStore::new(shape(), 16);
    let mut rng = StdRng::seed_from_u64(77);

    for _ in 0..5 {
        let population = random_population(&mut rng);

        file_store.save(&population).unwrap();
        assert_eq!(file_store.load().unwrap(), population);

        memory_store.save(&population).unwrap();
        assert_eq!(memory_store.load().unwrap(), population);
    }
}

#[test]
fn test_file_written_by_other_shape_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("population.json");

    let long = PopulationShape {
        sequence_length: 512,
        ..shape()
    };
    JsonFileStore::new(&path, long, 16).load().unwrap();

    let mut store = JsonFileStore::new(&path, shape(), 16);
    assert!(matches!(
        store.load(),
        Err(TunebreedError::Storage(StorageError::SchemaMismatch { .. }))
    ));
}

#[test]
fn test_tampered_note_is_reported_not_repaired() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("population.json");
    let mut store = JsonFileStore::new(&path, shape(), 16);
    store.load().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&text).unwrap();
    value["individuals"][7][100] = serde_json::json!(20);
    std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

    match store.load() {
        Err(TunebreedError::Storage(StorageError::Corrupt(ValidationError::IndexOutOfRange {
            individual,
            position,
            value,
            scale_size,
        }))) => {
            assert_eq!((individual, position, value, scale_size), (7, 100, 20, 16));
        }
        other => panic!("expected corrupt data error, got {:?}", other),
    }
}

#[test]
fn test_memory_store_rejects_corrupt_text() {
    let mut store = MemoryStore::from_encoded("[]".to_string(), shape(), 16);
    assert!(matches!(
        store.load(),
        Err(TunebreedError::Storage(StorageError::Malformed(_)))
    ));
}
