use std::fmt;

use serde::ser::SerializeMap as _;

/// Name of one per-frame curve handed to the rendering-script emitter.
///
/// Slot-indexed tags render without a suffix for slot 0 (`rot`, `rot1`, `rot2`, ...);
/// alias-keyed tags embed the alias (`hl_ca_atoms`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CurveTag {
    /// Rotation angle increments (`rot`).
    Rotate { slot: usize },
    /// Zoom-in scale factors (`zin`).
    ZoomIn,
    /// Zoom-out scale factors (`zou`).
    ZoomOut,
    /// Absolute opacity while fading a material out (`mtr`).
    MakeTransparent { slot: usize },
    /// Absolute opacity while fading a material in (`mop`).
    MakeOpaque { slot: usize },
    /// Trajectory frame indices (`ani`).
    Animate,
    /// Highlight opacity (`hl_<alias>`).
    Highlight { alias: String },
    /// Overlay opacity envelope (`ovl_<alias>`).
    Overlay { alias: String },
    /// Overlay data cursor (`ovd_<alias>`).
    OverlayData { alias: String },
    /// Data-row cursor of a full-frame figure (`fig`).
    Figure,
}

impl fmt::Display for CurveTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn slotted(f: &mut fmt::Formatter<'_>, base: &str, slot: usize) -> fmt::Result {
            if slot == 0 {
                f.write_str(base)
            } else {
                write!(f, "{base}{slot}")
            }
        }

        match self {
            Self::Rotate { slot } => slotted(f, "rot", *slot),
            Self::ZoomIn => f.write_str("zin"),
            Self::ZoomOut => f.write_str("zou"),
            Self::MakeTransparent { slot } => slotted(f, "mtr", *slot),
            Self::MakeOpaque { slot } => slotted(f, "mop", *slot),
            Self::Animate => f.write_str("ani"),
            Self::Highlight { alias } => write!(f, "hl_{alias}"),
            Self::Overlay { alias } => write!(f, "ovl_{alias}"),
            Self::OverlayData { alias } => write!(f, "ovd_{alias}"),
            Self::Figure => f.write_str("fig"),
        }
    }
}

/// Ordered set of curves produced for one action.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurveSet {
    entries: Vec<(CurveTag, Vec<f64>)>,
}

impl CurveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a curve; a tag already present is replaced in place.
    pub fn insert(&mut self, tag: CurveTag, values: Vec<f64>) {
        match self.entries.iter_mut().find(|(t, _)| *t == tag) {
            Some((_, v)) => *v = values,
            None => self.entries.push((tag, values)),
        }
    }

    pub fn get(&self, tag: &CurveTag) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, v)| v.as_slice())
    }

    /// Look a curve up by its rendered tag name (`"rot"`, `"hl_x"`).
    pub fn by_name(&self, name: &str) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|(t, _)| t.to_string() == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CurveTag, &[f64])> {
        self.entries.iter().map(|(t, v)| (t, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `tag -> "v1 v2 ..."` pairs in insertion order.
    pub fn to_text(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(t, v)| (t.to_string(), format_values(v)))
            .collect()
    }
}

/// Space-separated textual list of values.
pub fn format_values(values: &[f64]) -> String {
    let mut out = String::with_capacity(values.len() * 8);
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&v.to_string());
    }
    out
}

impl serde::Serialize for CurveSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (tag, text) in self.to_text() {
            map.serialize_entry(&tag, &text)?;
        }
        map.end()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/track.rs"]
mod tests;
