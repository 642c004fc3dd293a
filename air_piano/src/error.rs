use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Window Error: {0}")]
    Window(#[from] minifb::Error),

    #[error("Config Parsing Error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("MIDI Error: {0}")]
    Midi(String),
}

pub type AppResult<T> = Result<T, AppError>;
