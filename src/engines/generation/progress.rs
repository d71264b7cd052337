use super::evolution_engine::ProgressCallback;
use crate::types::Fitness;

/// Reports through the `log` facade.
pub struct LogProgressCallback;

impl ProgressCallback for LogProgressCallback {
    fn on_cycle_start(&mut self, generation: u64) {
        log::info!("Generation {} starting...", generation);
    }

    fn on_survivors_selected(&mut self, survivors: usize, best_fitness: Fitness) {
        log::debug!("Kept {} survivors, best fitness {}", survivors, best_fitness);
    }

    fn on_cycle_complete(&mut self, generation: u64, population_size: usize) {
        log::info!(
            "Generation {} complete with {} melodies",
            generation,
            population_size
        );
    }
}

pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_cycle_start(&mut self, _generation: u64) {}
    fn on_survivors_selected(&mut self, _survivors: usize, _best_fitness: Fitness) {}
    fn on_cycle_complete(&mut self, _generation: u64, _population_size: usize) {}
}

// For handing progress to another thread
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressMessage {
    CycleStart(u64),
    SurvivorsSelected { survivors: usize, best_fitness: Fitness },
    CycleComplete { generation: u64, population_size: usize },
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_cycle_start(&mut self, generation: u64) {
        let _ = self.sender.send(ProgressMessage::CycleStart(generation));
    }

    fn on_survivors_selected(&mut self, survivors: usize, best_fitness: Fitness) {
        let _ = self.sender.send(ProgressMessage::SurvivorsSelected {
            survivors,
            best_fitness,
        });
    }

    fn on_cycle_complete(&mut self, generation: u64, population_size: usize) {
        let _ = self.sender.send(ProgressMessage::CycleComplete {
            generation,
            population_size,
        });
    }
}
