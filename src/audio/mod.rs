pub mod decode;
pub mod music;
pub mod output;
pub mod probe;

pub use decode::{decode_file, DecodedAudio};
pub use music::{MusicPlayer, MusicStatus, ProcessMusicPlayer};
pub use output::{LoopingSource, StreamMusicPlayer};
pub use probe::AudioProbe;
