//! Validation error types

use std::fmt;

/// Validation error for request input
///
/// Every variant except `NothingToUpdate` names the offending field, which
/// the HTTP layer reports back under `fieldErrors`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is missing, or empty after normalization
    Required { field: &'static str },

    /// Field is present but not a JSON string
    NotAString { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Field could not be parsed into the expected shape
    Invalid { field: &'static str },

    /// Update body carried none of the updatable fields
    NothingToUpdate,
}

impl ValidationError {
    /// Field the error refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Required { field }
            | Self::NotAString { field }
            | Self::TooLong { field, .. }
            | Self::Invalid { field } => Some(*field),
            Self::NothingToUpdate => None,
        }
    }

    /// Short message shown next to the field in a form.
    pub fn field_message(&self) -> String {
        match self {
            Self::Required { .. } => "Obrigatório".to_string(),
            Self::NotAString { .. } => "Deve ser uma string.".to_string(),
            Self::TooLong { max, .. } => format!("Máximo de {} caracteres.", max),
            Self::Invalid { .. } => "Valor inválido.".to_string(),
            Self::NothingToUpdate => String::new(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field } => write!(f, "{} é obrigatório", field),
            Self::NotAString { field } => write!(f, "{} inválido", field),
            Self::TooLong { field, max } => {
                write!(f, "{} excede o limite de {} caracteres", field, max)
            }
            Self::Invalid { field } => write!(f, "{} inválido", field),
            Self::NothingToUpdate => write!(f, "Nada para atualizar"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "nome_item",
            max: 255,
        };
        assert_eq!(err.to_string(), "nome_item excede o limite de 255 caracteres");
        assert_eq!(err.field_message(), "Máximo de 255 caracteres.");
    }

    #[test]
    fn nothing_to_update_has_no_field() {
        assert_eq!(ValidationError::NothingToUpdate.field(), None);
        assert_eq!(
            ValidationError::Required { field: "id_item" }.field(),
            Some("id_item")
        );
    }
}
