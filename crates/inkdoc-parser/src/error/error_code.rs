//! Error codes for the Inkdoc diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Parser configuration errors
//! - `E1xx` - Doc block errors
//! - `E2xx` - Element path errors
//! - `E3xx` - Tag settings errors

use std::fmt;

use inkdoc_core::settings::SettingsError;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Configuration Errors (E0xx)
    // =========================================================================
    /// Invalid pattern.
    ///
    /// One of the configured delimiter or tag patterns is not a valid
    /// regular expression.
    E001,

    /// Tag pattern without a `tag` group.
    ///
    /// The tag-marker pattern must capture the tag name in a named group
    /// called `tag`, for example `@(?P<tag>\S+)\s`.
    E002,

    // =========================================================================
    // Doc Block Errors (E1xx)
    // =========================================================================
    /// Missing element tag.
    ///
    /// A doc block has tags, but none of them names a tag type.
    E100,

    /// Duplicate element tag.
    ///
    /// A doc block declares more than one element.
    E101,

    /// Missing element name.
    ///
    /// An element tag is not followed by a name.
    E102,

    /// Unknown tag.
    ///
    /// A tag is neither a tag type, an alias of one, nor a property tag.
    E103,

    /// Malformed tag value.
    ///
    /// The text after a strict property tag does not match its grammar.
    E104,

    // =========================================================================
    // Element Path Errors (E2xx)
    // =========================================================================
    /// Invalid element path.
    ///
    /// A declared name has an empty segment where none is allowed, such as
    /// `core..Parser` or a trailing dot.
    E200,

    /// No parent element.
    ///
    /// A relative name uses more leading dots than there are earlier
    /// declarations in the file.
    E201,

    // =========================================================================
    // Tag Settings Errors (E3xx)
    // =========================================================================
    /// Missing settings property.
    ///
    /// No tag type in a parent chain defines a required property.
    E300,

    /// Unknown parent type.
    ///
    /// A tag type names a parent type that is not in the table.
    E301,

    /// Duplicate alias.
    ///
    /// An alias is claimed by two tag types or shadows a tag type name.
    E302,

    /// Cyclic parent chain.
    ///
    /// Following `parent_type` from a tag type leads back to itself.
    E303,

    /// Unknown tag type.
    ///
    /// A tag type was looked up that is not in the table.
    E304,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Configuration errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            // Doc block errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            // Element path errors
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            // Tag settings errors
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
            ErrorCode::E304 => "E304",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Configuration errors
            ErrorCode::E001 => "invalid pattern",
            ErrorCode::E002 => "tag pattern has no `tag` group",
            // Doc block errors
            ErrorCode::E100 => "missing element tag",
            ErrorCode::E101 => "duplicate element tag",
            ErrorCode::E102 => "missing element name",
            ErrorCode::E103 => "unknown tag",
            ErrorCode::E104 => "malformed tag value",
            // Element path errors
            ErrorCode::E200 => "invalid element path",
            ErrorCode::E201 => "no parent element",
            // Tag settings errors
            ErrorCode::E300 => "missing settings property",
            ErrorCode::E301 => "unknown parent type",
            ErrorCode::E302 => "duplicate alias",
            ErrorCode::E303 => "cyclic parent chain",
            ErrorCode::E304 => "unknown tag type",
        }
    }

    /// Returns the code of a tag settings error.
    pub fn for_settings(err: &SettingsError) -> Self {
        match err {
            SettingsError::MissingSettingsProperty { .. } => ErrorCode::E300,
            SettingsError::UnknownParentType { .. } => ErrorCode::E301,
            SettingsError::DuplicateAlias { .. } => ErrorCode::E302,
            SettingsError::CyclicParentType { .. } => ErrorCode::E303,
            SettingsError::UnknownTagType(_) => ErrorCode::E304,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E104.to_string(), "E104");
        assert_eq!(ErrorCode::E201.to_string(), "E201");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E100.description(), "missing element tag");
        assert_eq!(ErrorCode::E200.description(), "invalid element path");
        assert_eq!(ErrorCode::E301.description(), "unknown parent type");
    }

    #[test]
    fn test_settings_error_codes() {
        let err = SettingsError::CyclicParentType {
            type_name: "a".to_string(),
        };
        assert_eq!(ErrorCode::for_settings(&err), ErrorCode::E303);
        assert_eq!(
            ErrorCode::for_settings(&SettingsError::UnknownTagType("x".to_string())),
            ErrorCode::E304
        );
    }
}
