//! Field table for the posting wizard
//!
//! The target site renders its form controls with framework-generated
//! identifiers that change between page loads, so every control is located
//! through its visible label instead. Each field pairs the label text used
//! to find the control with the value to enter or select, and dropdown
//! fields additionally carry the option-matching policy for that field.

use serde::{Deserialize, Serialize};

/// How a rendered dropdown option is compared against the target value.
///
/// Both sides are normalized (lowercased, whitespace stripped) before the
/// comparison. Postal-code options are rendered as "64420 - Centro", so the
/// target must match as a substring; city options are rendered bare, and a
/// substring match would wrongly accept partial city names, so they require
/// equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Normalized option text must equal the normalized target.
    #[default]
    Exact,
    /// Normalized target must appear within the normalized option text.
    Substring,
}

impl MatchMode {
    /// Compare a normalized option text against a normalized target.
    pub fn matches(&self, option: &str, target: &str) -> bool {
        match self {
            MatchMode::Exact => option == target,
            MatchMode::Substring => option.contains(target),
        }
    }
}

/// Normalize text for option comparison: lowercase, all whitespace removed.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect()
}

/// A custom-dropdown field: label, target option, and matching policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropdownField {
    /// Visible label text used to locate the control (substring match).
    pub label: String,
    /// Option to select.
    pub value: String,
    /// Option comparison policy.
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Whether to type the value into the control to filter the option
    /// list before reading it.
    #[serde(default)]
    pub searchable: bool,
}

impl DropdownField {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            match_mode: MatchMode::Exact,
            searchable: false,
        }
    }
}

/// A plain text input located by label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputField {
    pub label: String,
    pub value: String,
}

impl InputField {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// The ordered field table applied on the vehicle-details step.
///
/// `dropdowns` are applied in order; the location fields (postal code,
/// city) are resolved afterwards and get a dedicated failure message when
/// no option matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTable {
    pub dropdowns: Vec<DropdownField>,
    pub postal_code: DropdownField,
    pub city: DropdownField,
    pub mileage: InputField,
    pub phone: InputField,
}

impl Default for FieldTable {
    fn default() -> Self {
        Self {
            dropdowns: vec![
                DropdownField::new("Marca", "Acura"),
                DropdownField::new("Modelo", "ILX"),
                DropdownField::new("Año", "2018"),
                DropdownField::new("Versión", "2.4 Tech At"),
                DropdownField::new("Subtipo", "Sedán"),
                DropdownField::new("Color", "Negro"),
            ],
            postal_code: DropdownField {
                match_mode: MatchMode::Substring,
                searchable: true,
                ..DropdownField::new("Código Postal", "64000")
            },
            city: DropdownField::new("Ciudad del vehículo", "Monterrey"),
            mileage: InputField::new("Recorrido", "50000"),
            phone: InputField::new("Teléfono celular", "1234567890"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_whitespace_and_case() {
        assert_eq!(normalize("San Nicolas"), "sannicolas");
        assert_eq!(normalize("  64420 - Centro "), "64420-centro");
        assert_eq!(normalize("2.4 Tech At"), "2.4techat");
    }

    #[test]
    fn test_postal_code_substring_match() {
        let mode = MatchMode::Substring;
        assert!(mode.matches(&normalize("64420 - Centro"), &normalize("64420")));
        assert!(!mode.matches(&normalize("64000 - Centro"), &normalize("64420")));
    }

    #[test]
    fn test_city_exact_match_rejects_partial() {
        let mode = MatchMode::Exact;
        assert!(!mode.matches(&normalize("San Nicolas"), &normalize("San")));
        assert!(mode.matches(&normalize("Monterrey"), &normalize("monterrey")));
    }

    #[test]
    fn test_default_dropdown_order() {
        let table = FieldTable::default();
        let labels: Vec<&str> = table.dropdowns.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Marca", "Modelo", "Año", "Versión", "Subtipo", "Color"]
        );
    }

    #[test]
    fn test_default_location_policies() {
        let table = FieldTable::default();
        assert_eq!(table.postal_code.match_mode, MatchMode::Substring);
        assert!(table.postal_code.searchable);
        assert_eq!(table.city.match_mode, MatchMode::Exact);
        assert!(!table.city.searchable);
    }

    #[test]
    fn test_match_mode_deserializes_lowercase() {
        let field: DropdownField = toml::from_str(
            r#"
            label = "Código Postal"
            value = "64000"
            match_mode = "substring"
            searchable = true
            "#,
        )
        .unwrap();
        assert_eq!(field.match_mode, MatchMode::Substring);
        assert!(field.searchable);
    }
}
