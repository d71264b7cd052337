// Standard MIDI File output for a single melody.
//
// One track, format 0: a text event, a program change, then each note held for
// a fixed number of ticks with no rests in between.

use super::renderer::Renderer;
use crate::config::{AppConfig, RenderConfig, ScaleConfig};
use crate::error::RenderError;
use crate::types::Individual;
use midly::{
    num::{u15, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};

const CHANNEL: u8 = 0;

pub struct MidiRenderer {
    pitches: Vec<u8>,
    program: u8,
    velocity: u8,
    ticks_per_quarter: u16,
    ticks_per_note: u32,
    title: String,
}

impl MidiRenderer {
    pub fn new(scale: &ScaleConfig, render: &RenderConfig) -> Self {
        Self {
            pitches: scale.notes.clone(),
            program: render.program,
            velocity: render.velocity,
            ticks_per_quarter: render.ticks_per_quarter,
            ticks_per_note: render.ticks_per_note,
            title: render.title.clone(),
        }
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(&config.scale, &config.render)
    }

    fn pitch(&self, position: usize, note: u8) -> Result<u7, RenderError> {
        match self.pitches.get(usize::from(note)) {
            Some(&pitch) if pitch <= 127 => Ok(u7::new(pitch)),
            Some(&pitch) => Err(RenderError::Encoding(format!(
                "pitch {} is outside the MIDI range",
                pitch
            ))),
            None => Err(RenderError::UnmappedNote {
                position,
                value: usize::from(note),
            }),
        }
    }

    fn track<'a>(&'a self, individual: &Individual) -> Result<Track<'a>, RenderError> {
        if self.program > 127 || self.velocity > 127 {
            return Err(RenderError::Encoding(
                "program and velocity must be below 128".to_string(),
            ));
        }
        let channel = u4::new(CHANNEL);
        let velocity = u7::new(self.velocity);
        let hold = u28::new(self.ticks_per_note);

        let mut track: Track<'a> = Vec::with_capacity(individual.len() * 2 + 3);
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Text(self.title.as_bytes())),
        });
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(self.program),
                },
            },
        });

        for (position, &note) in individual.notes().iter().enumerate() {
            let key = self.pitch(position, note)?;
            track.push(TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOn { key, vel: velocity },
                },
            });
            track.push(TrackEvent {
                delta: hold,
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOff { key, vel: velocity },
                },
            });
        }

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });
        Ok(track)
    }
}

impl Renderer for MidiRenderer {
    fn render(&self, individual: &Individual) -> Result<Vec<u8>, RenderError> {
        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(self.ticks_per_quarter)),
        ));
        smf.tracks.push(self.track(individual)?);

        let mut buf = Vec::new();
        smf.write_std(&mut buf)
            .map_err(|e| RenderError::Encoding(e.to_string()))?;
        Ok(buf)
    }

    fn extension(&self) -> &'static str {
        "mid"
    }
}
