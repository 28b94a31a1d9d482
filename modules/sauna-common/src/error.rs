use thiserror::Error;

/// A tag string that names none of the enum's variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseTagError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("sauna name must not be empty")]
    EmptyName,

    #[error("opening hours are missing an entry for {0}")]
    MissingDay(&'static str),

    #[error("update carries no fields")]
    EmptyPatch,

    #[error("a new suggestion needs a sauna name")]
    SuggestionWithoutName,

    #[error("a correction report needs the id of the sauna it corrects")]
    CorrectionWithoutSauna,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}
