//! Static allow-lists: action types, their parameter keys, bundle rules and directive
//! namespaces.

use std::fmt;

/// Every action type the script language accepts.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    DoNothing,
    Animate,
    Rotate,
    ZoomIn,
    ZoomOut,
    MakeTransparent,
    MakeOpaque,
    Highlight,
    CenterView,
    ShowFigure,
    AddOverlay,
    AddLabel,
    RemoveLabel,
    AddDistance,
    RemoveDistance,
    FitTrajectory,
}

impl ActionKind {
    pub const ALL: [ActionKind; 16] = [
        Self::DoNothing,
        Self::Animate,
        Self::Rotate,
        Self::ZoomIn,
        Self::ZoomOut,
        Self::MakeTransparent,
        Self::MakeOpaque,
        Self::Highlight,
        Self::CenterView,
        Self::ShowFigure,
        Self::AddOverlay,
        Self::AddLabel,
        Self::RemoveLabel,
        Self::AddDistance,
        Self::RemoveDistance,
        Self::FitTrajectory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::DoNothing => "do_nothing",
            Self::Animate => "animate",
            Self::Rotate => "rotate",
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::MakeTransparent => "make_transparent",
            Self::MakeOpaque => "make_opaque",
            Self::Highlight => "highlight",
            Self::CenterView => "center_view",
            Self::ShowFigure => "show_figure",
            Self::AddOverlay => "add_overlay",
            Self::AddLabel => "add_label",
            Self::RemoveLabel => "remove_label",
            Self::AddDistance => "add_distance",
            Self::RemoveDistance => "remove_distance",
            Self::FitTrajectory => "fit_trajectory",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Comma-separated list of every action type, for error messages.
    pub fn allowed_names() -> String {
        Self::ALL.map(Self::name).join(", ")
    }

    pub fn allowed_params(self) -> &'static [&'static str] {
        match self {
            Self::DoNothing => &["t"],
            Self::Animate => &["frames", "smooth", "t"],
            Self::Rotate => &["angle", "axis", "t", "sigmoid", "abruptness"],
            Self::ZoomIn | Self::ZoomOut => &["scale", "t", "sigmoid", "abruptness"],
            Self::MakeTransparent | Self::MakeOpaque => {
                &["material", "t", "sigmoid", "limit", "start", "abruptness"]
            }
            Self::Highlight => &["selection", "t", "color", "mode", "style", "alias"],
            Self::CenterView => &["selection"],
            Self::ShowFigure => &["figure", "t", "datafile", "dataframes"],
            Self::AddOverlay => &[
                "figure",
                "t",
                "origin",
                "relative_size",
                "dataframes",
                "aspect_ratio",
                "datafile",
                "2D",
                "text",
                "textsize",
                "sigmoid",
            ],
            Self::AddLabel => &["label_color", "atom_index", "label", "text_size", "alias"],
            Self::RemoveLabel | Self::RemoveDistance => &["alias", "all"],
            Self::AddDistance => &[
                "selection1",
                "selection2",
                "label_color",
                "text_size",
                "alias",
            ],
            Self::FitTrajectory => &["selection"],
        }
    }

    pub fn accepts(self, key: &str) -> bool {
        self.allowed_params().contains(&key)
    }

    /// Zero-duration actions; they cannot share a bundle with finite-duration ones.
    pub fn is_instantaneous(self) -> bool {
        matches!(
            self,
            Self::CenterView
                | Self::AddLabel
                | Self::RemoveLabel
                | Self::AddDistance
                | Self::RemoveDistance
                | Self::FitTrajectory
        )
    }

    /// Only valid as a sub-command of a `{...}` bundle.
    pub fn bundle_only(self) -> bool {
        matches!(self, Self::AddOverlay)
    }

    /// May occur more than once in one bundle, each occurrence keeping its own sub-map.
    pub fn repeatable(self) -> bool {
        matches!(
            self,
            Self::Rotate
                | Self::MakeTransparent
                | Self::MakeOpaque
                | Self::Highlight
                | Self::AddOverlay
                | Self::AddLabel
                | Self::RemoveLabel
                | Self::AddDistance
                | Self::RemoveDistance
        )
    }

    /// Prefix of automatically generated aliases for types that create a referable entity.
    pub fn alias_prefix(self) -> Option<&'static str> {
        match self {
            Self::Highlight => Some("highlight"),
            Self::AddOverlay => Some("overlay"),
            Self::AddLabel => Some("label"),
            Self::AddDistance => Some("distance"),
            _ => None,
        }
    }

    /// Default of the `sigmoid` flag for types that accept it.
    pub fn sigmoid_default(self) -> bool {
        !matches!(self, Self::AddOverlay)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pairs of action types that cannot share one bundle.
pub const EXCLUSIVE_PAIRS: &[(ActionKind, ActionKind)] = &[
    (ActionKind::ZoomIn, ActionKind::ZoomOut),
    (ActionKind::MakeTransparent, ActionKind::MakeOpaque),
];

pub fn mutually_exclusive(a: ActionKind, b: ActionKind) -> bool {
    if a == b {
        return !a.repeatable();
    }
    EXCLUSIVE_PAIRS
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

/// Fixed `$` directive namespaces and their keys.
pub const GLOBAL_DIRECTIVES: &[(&str, &[&str])] = &[
    ("global", &["fps", "keepframes", "draft", "name", "render"]),
    ("layout", &["columns", "rows"]),
];

/// Keys of the per-scene `$<scene>` directive namespace.
pub const SCENE_DIRECTIVE_KEYS: &[&str] = &[
    "visualization",
    "structure",
    "trajectory",
    "position",
    "resolution",
    "pdb_code",
];

#[cfg(test)]
#[path = "../../tests/unit/script/registry.rs"]
mod tests;
