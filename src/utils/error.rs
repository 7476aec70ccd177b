use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarmError {
    #[error("Invalid value for {field}: {value} (must be a positive number)")]
    InvalidValue { field: String, value: String },

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("A paddock named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u32 },

    #[error("Paddock {paddock} is already occupied by mob '{occupant}'")]
    PaddockOccupied { paddock: String, occupant: String },

    #[error("Invalid date: {message}")]
    InvalidDate { message: String },

    #[error("Persistence failure: {message}")]
    PersistenceFailure { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Seed data error: {message}")]
    SeedError { message: String },

    #[error("Farm state is inconsistent: {message}")]
    InvalidState { message: String },

    #[error("No {entity} ids left to allocate")]
    IdExhausted { entity: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Persistence,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FarmError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidValue { .. } | Self::InvalidName { .. } | Self::InvalidDate { .. } => {
                ErrorCategory::Validation
            }
            Self::DuplicateName { .. } | Self::PaddockOccupied { .. } | Self::IdExhausted { .. } => {
                ErrorCategory::Conflict
            }
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::PersistenceFailure { .. }
            | Self::IoError(_)
            | Self::SerializationError(_)
            | Self::CsvError(_)
            | Self::InvalidState { .. } => ErrorCategory::Persistence,
            Self::ConfigError { .. } | Self::SeedError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::NotFound => ErrorSeverity::High,
            ErrorCategory::Conflict => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Persistence => ErrorSeverity::Critical,
        }
    }

    /// Short message suitable for printing to a farm operator.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidValue { field, .. } => format!("{} must be greater than zero", field),
            Self::InvalidName { name, reason } => format!("'{}' is not a valid name: {}", name, reason),
            Self::DuplicateName { name } => format!("The paddock name '{}' is already taken", name),
            Self::NotFound { entity, id } => format!("No {} with id {}", entity.to_lowercase(), id),
            Self::PaddockOccupied { paddock, occupant } => {
                format!("{} already has mob '{}' in it", paddock, occupant)
            }
            Self::InvalidDate { message } => message.clone(),
            Self::PersistenceFailure { .. }
            | Self::IoError(_)
            | Self::SerializationError(_)
            | Self::CsvError(_) => "The farm data could not be saved or loaded".to_string(),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::SeedError { message } => format!("Reset data is inconsistent: {}", message),
            Self::InvalidState { message } => format!("Stored farm data is inconsistent: {}", message),
            Self::IdExhausted { entity } => format!("No more {} ids are available", entity.to_lowercase()),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidValue { .. } => "Enter an area and dry matter density above zero",
            Self::InvalidName { .. } => {
                "Use letters, optionally followed by a number (e.g. 'Hill' or 'Hill 2')"
            }
            Self::DuplicateName { .. } => "Choose a name no other paddock uses",
            Self::NotFound { .. } => "List paddocks or mobs to find a valid id",
            Self::PaddockOccupied { .. } => "Pick a paddock from the available list",
            Self::InvalidDate { .. } => "Check the animal's date of birth against the current date",
            Self::PersistenceFailure { .. } | Self::IoError(_) => {
                "Check that the data directory exists and is writable"
            }
            Self::SerializationError(_) => "The snapshot file may be corrupt; run a reset",
            Self::CsvError(_) | Self::SeedError { .. } => "Check the seed CSV files",
            Self::ConfigError { .. } => "Check the configuration file and command line flags",
            Self::InvalidState { .. } => "Fix the snapshot by hand or run a reset",
            Self::IdExhausted { .. } => "Renumber the paddocks in the seed data and run a reset",
        }
    }

    pub(crate) fn not_found_paddock(id: u32) -> Self {
        Self::NotFound { entity: "Paddock", id }
    }

    pub(crate) fn not_found_mob(id: u32) -> Self {
        Self::NotFound { entity: "Mob", id }
    }
}

pub type Result<T> = std::result::Result<T, FarmError>;
