//! Custom column definitions and value validation
//!
//! A column's type is a tagged [`ColumnSpec`]; the extra data each type needs
//! (SELECT options, FORMULA expression) lives in its variant, so validation
//! dispatches on the tag.

use std::collections::BTreeMap;

use super::ServiceError;
use crate::core::constants::{NAME_MAX_LEN, SELECT_OPTIONS_MAX};
use crate::data::types::{ColumnDefinition, ColumnRow, ColumnType, ValueWrite};
use crate::utils::string::is_blank_value;

/// Requested values keyed by column id; `None` or a blank string clears
pub type ValueInput = BTreeMap<String, Option<String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    Text,
    LongText,
    Select { options: Vec<String> },
    User,
    Date,
    Number,
    Formula { expression: String },
}

impl ColumnSpec {
    /// Build from loose parts, rejecting what the type does not allow
    ///
    /// Options and expression are dropped for types that do not use them.
    pub fn from_parts(
        data_type: ColumnType,
        options: Vec<String>,
        formula_expression: Option<String>,
    ) -> Result<Self, ServiceError> {
        let spec = match data_type {
            ColumnType::Text => Self::Text,
            ColumnType::LongText => Self::LongText,
            ColumnType::User => Self::User,
            ColumnType::Date => Self::Date,
            ColumnType::Number => Self::Number,
            ColumnType::Select => Self::Select {
                options: validate_options(options)?,
            },
            ColumnType::Formula => {
                let expression = formula_expression
                    .map(|e| e.trim().to_string())
                    .filter(|e| !e.is_empty())
                    .ok_or_else(|| {
                        ServiceError::validation("FORMULA columns require a formula expression")
                    })?;
                Self::Formula { expression }
            }
        };
        Ok(spec)
    }

    pub fn data_type(&self) -> ColumnType {
        match self {
            Self::Text => ColumnType::Text,
            Self::LongText => ColumnType::LongText,
            Self::Select { .. } => ColumnType::Select,
            Self::User => ColumnType::User,
            Self::Date => ColumnType::Date,
            Self::Number => ColumnType::Number,
            Self::Formula { .. } => ColumnType::Formula,
        }
    }

    pub fn from_row(row: &ColumnRow) -> Result<Self, ServiceError> {
        Self::from_parts(
            row.data_type,
            row.options.clone(),
            row.formula_expression.clone(),
        )
    }

    pub fn into_definition(self, name: String) -> ColumnDefinition {
        let data_type = self.data_type();
        let (options, formula_expression) = match self {
            Self::Select { options } => (options, None),
            Self::Formula { expression } => (Vec::new(), Some(expression)),
            _ => (Vec::new(), None),
        };
        ColumnDefinition {
            name,
            data_type,
            options,
            formula_expression,
        }
    }

    /// Check a non-blank value against the column
    ///
    /// Only SELECT constrains values (exact, case-sensitive match).
    pub fn check_value(&self, column_name: &str, value: &str) -> Result<(), ServiceError> {
        match self {
            Self::Select { options } if !options.iter().any(|o| o == value) => {
                Err(ServiceError::validation(format!(
                    "Invalid value '{}' for column '{}'. Valid options: {}",
                    value,
                    column_name,
                    options.join(", ")
                )))
            }
            _ => Ok(()),
        }
    }
}

fn validate_options(options: Vec<String>) -> Result<Vec<String>, ServiceError> {
    let options: Vec<String> = options.into_iter().map(|o| o.trim().to_string()).collect();
    if options.is_empty() {
        return Err(ServiceError::validation(
            "SELECT columns require at least one option",
        ));
    }
    if options.len() > SELECT_OPTIONS_MAX {
        return Err(ServiceError::validation(format!(
            "SELECT columns allow at most {} options",
            SELECT_OPTIONS_MAX
        )));
    }
    if options.iter().any(|o| o.is_empty()) {
        return Err(ServiceError::validation("Options cannot be blank"));
    }
    for (i, option) in options.iter().enumerate() {
        if options[..i].contains(option) {
            return Err(ServiceError::validation(format!(
                "Duplicate option '{}'",
                option
            )));
        }
    }
    Ok(options)
}

/// Trimmed non-blank name within the length limit
pub fn validate_name(field: &str, name: &str) -> Result<String, ServiceError> {
    require_text(field, name, NAME_MAX_LEN as usize)
}

/// Trimmed non-blank text of at most `max_len` characters
pub fn require_text(field: &str, text: &str, max_len: usize) -> Result<String, ServiceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(format!("{} is required", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(ServiceError::validation(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(trimmed.to_string())
}

/// Requested column definition (create)
#[derive(Debug, Clone)]
pub struct ColumnInput {
    pub name: String,
    pub data_type: ColumnType,
    pub options: Vec<String>,
    pub formula_expression: Option<String>,
}

/// Partial column update; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct ColumnPatch {
    pub name: Option<String>,
    pub data_type: Option<ColumnType>,
    pub options: Option<Vec<String>>,
    pub formula_expression: Option<String>,
}

impl ColumnPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.data_type.is_none()
            && self.options.is_none()
            && self.formula_expression.is_none()
    }
}

/// Validate a new column definition
pub fn define(input: ColumnInput) -> Result<ColumnDefinition, ServiceError> {
    let name = validate_name("Column name", &input.name)?;
    let spec = ColumnSpec::from_parts(input.data_type, input.options, input.formula_expression)?;
    Ok(spec.into_definition(name))
}

/// Apply a patch to the current definition and re-validate the whole result
pub fn merge_patch(current: &ColumnRow, patch: ColumnPatch) -> Result<ColumnDefinition, ServiceError> {
    let name = match patch.name {
        Some(name) => validate_name("Column name", &name)?,
        None => current.name.clone(),
    };
    let data_type = patch.data_type.unwrap_or(current.data_type);
    let options = patch.options.unwrap_or_else(|| current.options.clone());
    let formula_expression = patch
        .formula_expression
        .or_else(|| current.formula_expression.clone());
    let spec = ColumnSpec::from_parts(data_type, options, formula_expression)?;
    Ok(spec.into_definition(name))
}

/// Validate requested values against a board's columns
///
/// Every column id must belong to the board. Blank values and `"null"` become
/// clears; everything else is checked against the column's type.
pub fn validate_values(
    columns: &[ColumnRow],
    values: ValueInput,
) -> Result<Vec<ValueWrite>, ServiceError> {
    let mut writes = Vec::with_capacity(values.len());

    for (column_id, value) in values {
        let column = columns
            .iter()
            .find(|c| c.id == column_id)
            .ok_or_else(|| {
                ServiceError::validation(format!(
                    "Column '{}' does not belong to this board",
                    column_id
                ))
            })?;

        let value = value.filter(|v| !is_blank_value(v));
        if let Some(v) = &value {
            ColumnSpec::from_row(column)?.check_value(&column.name, v)?;
        }
        writes.push(ValueWrite { column_id, value });
    }

    Ok(writes)
}
