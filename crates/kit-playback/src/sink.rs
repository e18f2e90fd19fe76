//! Event sinks that turn hits into playback commands

use gesture_engine::{EventSink, HiHatVariant, Instrument};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::bank::SoundBank;

/// Instruction for the audio side
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PlaybackCommand {
    Play {
        instrument: Instrument,
        variant: Option<HiHatVariant>,
        sound_key: &'static str,
        path: String,
        left_gain: f32,
        right_gain: f32,
    },
    Stop {
        instrument: Instrument,
        sound_key: &'static str,
    },
}

impl PlaybackCommand {
    /// Resolve a play against the bank. `None` when the sound is not registered.
    pub fn play(
        bank: &SoundBank,
        instrument: Instrument,
        variant: Option<HiHatVariant>,
    ) -> Option<Self> {
        match bank.resolve(instrument, variant) {
            Ok((sound_key, spec)) => Some(PlaybackCommand::Play {
                instrument,
                variant,
                sound_key,
                path: spec.path.clone(),
                left_gain: spec.left_gain,
                right_gain: spec.right_gain,
            }),
            Err(e) => {
                warn!("Dropping hit: {}", e);
                None
            }
        }
    }

    /// A stop always targets the sound a plain hit would start; for the
    /// hi-hat that is the open hat.
    pub fn stop(instrument: Instrument) -> Self {
        PlaybackCommand::Stop {
            instrument,
            sound_key: instrument.sound_key(None),
        }
    }

    /// Get the bank key this command targets
    pub fn sound_key(&self) -> &'static str {
        match self {
            PlaybackCommand::Play { sound_key, .. } | PlaybackCommand::Stop { sound_key, .. } => {
                sound_key
            }
        }
    }

    /// Log the command the way an audio backend would report it
    pub fn log(&self) {
        match self {
            PlaybackCommand::Play {
                sound_key,
                path,
                left_gain,
                right_gain,
                ..
            } => info!(
                sound = sound_key,
                path = %path,
                left_gain,
                right_gain,
                "Play"
            ),
            PlaybackCommand::Stop { sound_key, .. } => debug!(sound = sound_key, "Stop"),
        }
    }
}

/// Sink that only logs what would be played
pub struct LoggingSink {
    bank: SoundBank,
    played: u64,
    stopped: u64,
}

impl LoggingSink {
    /// Create a sink over a validated bank
    pub fn new(bank: SoundBank) -> Self {
        Self {
            bank,
            played: 0,
            stopped: 0,
        }
    }

    /// Report a command resolved elsewhere, e.g. one received from a `ChannelSink`
    pub fn apply(&mut self, command: &PlaybackCommand) {
        command.log();
        match command {
            PlaybackCommand::Play { .. } => self.played += 1,
            PlaybackCommand::Stop { .. } => self.stopped += 1,
        }
    }

    /// Get the number of plays reported
    pub fn played(&self) -> u64 {
        self.played
    }

    /// Get the number of stops reported
    pub fn stopped(&self) -> u64 {
        self.stopped
    }
}

impl EventSink for LoggingSink {
    fn play(&mut self, instrument: Instrument, variant: Option<HiHatVariant>) {
        if let Some(command) = PlaybackCommand::play(&self.bank, instrument, variant) {
            self.apply(&command);
        }
    }

    fn stop(&mut self, instrument: Instrument) {
        self.apply(&PlaybackCommand::stop(instrument));
    }
}

/// Sink that forwards commands to an audio task over a bounded channel.
/// Never waits: a full or closed channel drops the command.
pub struct ChannelSink {
    bank: SoundBank,
    sender: mpsc::Sender<PlaybackCommand>,
    dropped: u64,
}

impl ChannelSink {
    /// Create a sink and the receiver the audio task reads from
    pub fn channel(bank: SoundBank, capacity: usize) -> (Self, mpsc::Receiver<PlaybackCommand>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (
            Self {
                bank,
                sender,
                dropped: 0,
            },
            receiver,
        )
    }

    /// Commands that could not be delivered
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn forward(&mut self, command: PlaybackCommand) {
        if let Err(e) = self.sender.try_send(command) {
            self.dropped += 1;
            match e {
                mpsc::error::TrySendError::Full(cmd) => {
                    warn!("Playback queue full, dropping {}", cmd.sound_key())
                }
                mpsc::error::TrySendError::Closed(cmd) => {
                    warn!("Playback task gone, dropping {}", cmd.sound_key())
                }
            }
        }
    }
}

impl EventSink for ChannelSink {
    fn play(&mut self, instrument: Instrument, variant: Option<HiHatVariant>) {
        if let Some(command) = PlaybackCommand::play(&self.bank, instrument, variant) {
            self.forward(command);
        }
    }

    fn stop(&mut self, instrument: Instrument) {
        self.forward(PlaybackCommand::stop(instrument));
    }
}
