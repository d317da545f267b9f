use crate::detail::Move;
use crate::error::KomikError;
use crate::loader::LoadOutcome;

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Tick,

    // Mount lifecycle
    Reload,
    DetailLoaded { outcome: LoadOutcome, mount_id: u64 },

    // Chapter grid
    MoveCursor(Move),
    ReadSelected,
    ReadFromStart,
    ContinueReading,

    GoHome,
    OpenCover,
    DismissAlert,

    Error(String),
    None,
}

impl From<KomikError> for Action {
    fn from(err: KomikError) -> Self {
        Action::Error(err.to_string())
    }
}
