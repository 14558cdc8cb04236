/// Convenience result type used across reelscript.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by the script compiler.
///
/// Every variant is fatal to the whole compilation. Variants that stem from script text carry the
/// offending line (or sub-command) verbatim so an author can locate it without a line number.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// First token of an action line is not a known action type.
    #[error("invalid action type '{found}' in '{line}' (allowed: {allowed})")]
    InvalidActionType {
        /// The rejected token.
        found: String,
        /// Comma-separated list of accepted action types.
        allowed: String,
        /// Offending line.
        line: String,
    },

    /// A token after the action type is not a `key=value` pair.
    #[error("malformed parameter '{token}' in '{line}'{hint}")]
    MalformedParameter {
        /// The rejected token.
        token: String,
        /// Offending line.
        line: String,
        /// Optional authoring hint, already prefixed with `"; "`.
        hint: String,
    },

    /// A parameter key is not accepted by its action type.
    #[error("unknown parameter '{key}' for action '{action}' in '{line}' (allowed: {allowed})")]
    UnknownParameter {
        /// The rejected key.
        key: String,
        /// Action type the key was given to.
        action: String,
        /// Comma-separated list of accepted keys.
        allowed: String,
        /// Offending line.
        line: String,
    },

    /// A parameter value could not be interpreted as the type its consumer needs.
    #[error("invalid value '{value}' for parameter '{key}' in '{line}' (expected {expected})")]
    InvalidParameterValue {
        /// Parameter key.
        key: String,
        /// The rejected value.
        value: String,
        /// Human-readable description of the accepted values.
        expected: String,
        /// Offending line.
        line: String,
    },

    /// An action lacks a parameter it cannot work without.
    #[error("action '{action}' requires parameter '{key}' in '{line}'")]
    MissingRequiredParameter {
        /// Action type.
        action: String,
        /// Missing key (or `a|b` when one of several is required).
        key: String,
        /// Offending line.
        line: String,
    },

    /// Two sub-commands of one bundle disagree on a shared parameter.
    #[error("conflicting values for '{key}' within one simultaneous block '{line}'")]
    ConflictingParameter {
        /// Parameter key.
        key: String,
        /// Offending block.
        line: String,
    },

    /// Two incompatible action types were bundled together.
    #[error("'{first}' cannot be combined with '{second}' in '{line}'")]
    MutualExclusionViolation {
        /// First action type.
        first: String,
        /// Second action type.
        second: String,
        /// Offending block.
        line: String,
    },

    /// An instantaneous action type was bundled with a finite-duration one.
    #[error(
        "instantaneous action '{instantaneous}' cannot share a time window with '{finite}' in '{line}'"
    )]
    InstantaneousCombination {
        /// The instantaneous action type.
        instantaneous: String,
        /// The finite-duration action type.
        finite: String,
        /// Offending block.
        line: String,
    },

    /// A bundle-only action type appeared on its own line.
    #[error("action '{action}' is only valid inside a simultaneous {{...}} block: '{line}'")]
    OverlayOutsideBundle {
        /// Action type.
        action: String,
        /// Offending line.
        line: String,
    },

    /// An action refers to an alias that is not active in its scene.
    #[error("unknown {kind} alias '{alias}' in '{line}' (active: {active})")]
    UnknownAlias {
        /// Entity kind (`label`, `distance`, `highlight`).
        kind: String,
        /// The unknown alias.
        alias: String,
        /// Comma-separated list of currently active aliases.
        active: String,
        /// Offending line.
        line: String,
    },

    /// An action registers an alias that is already active in its scene.
    #[error("{kind} alias '{alias}' is already in use in '{line}'")]
    DuplicateAlias {
        /// Entity kind (`label`, `distance`, `highlight`).
        kind: String,
        /// The duplicated alias.
        alias: String,
        /// Offending line.
        line: String,
    },

    /// A `{` block never saw its closing `}`.
    #[error("unterminated {{...}} block starting at '{line}'")]
    UnterminatedBlock {
        /// First line of the block.
        line: String,
    },

    /// A `$` directive names an unknown namespace.
    #[error("unknown directive '${namespace}' (allowed: {allowed})")]
    UnknownDirective {
        /// The rejected namespace.
        namespace: String,
        /// Comma-separated list of accepted namespaces.
        allowed: String,
    },

    /// A `$` directive carries a key outside its namespace's allow-list.
    #[error("unknown parameter '{key}' for directive '${namespace}' (allowed: {allowed})")]
    UnknownDirectiveParameter {
        /// Directive namespace.
        namespace: String,
        /// The rejected key.
        key: String,
        /// Comma-separated list of accepted keys.
        allowed: String,
    },

    /// Two scenes share a name.
    #[error("scene '{name}' is declared more than once")]
    DuplicateScene {
        /// Scene name.
        name: String,
    },

    /// An action line appeared before any `#scene` header.
    #[error("action '{line}' appears before any #scene header")]
    ActionOutsideScene {
        /// Offending line.
        line: String,
    },

    /// Invalid configuration or cross-scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Curve synthesis inputs outside the supported domain.
    #[error("animation error: {0}")]
    Animation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`ReelError::MalformedParameter`] value without a hint.
    pub fn malformed(token: impl Into<String>, line: impl Into<String>) -> Self {
        Self::MalformedParameter {
            token: token.into(),
            line: line.into(),
            hint: String::new(),
        }
    }

    /// Build a [`ReelError::InvalidParameterValue`] value.
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
        line: impl Into<String>,
    ) -> Self {
        Self::InvalidParameterValue {
            key: key.into(),
            value: value.into(),
            expected: expected.into(),
            line: line.into(),
        }
    }

    /// Build a [`ReelError::MissingRequiredParameter`] value.
    pub fn missing(
        action: impl Into<String>,
        key: impl Into<String>,
        line: impl Into<String>,
    ) -> Self {
        Self::MissingRequiredParameter {
            action: action.into(),
            key: key.into(),
            line: line.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
