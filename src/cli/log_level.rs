use clap::ValueEnum;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    None,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Verbosity as understood by stderrlog
    pub fn get_level(&self) -> usize {
        match self {
            Self::None | Self::Error => 0,
            Self::Warn => 1,
            Self::Info => 2,
            Self::Debug => 3,
            Self::Trace => 4,
        }
    }
}
