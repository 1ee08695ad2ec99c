pub mod archiver;
pub mod optimizer;
pub mod workdir;

pub use archiver::ARCHIVE_NAME;
pub use optimizer::SpawnOutcome;
pub use workdir::WorkDir;
