//! Actions: parsing of single lines and `{...}` bundles, typed parameter access.

use crate::{
    animation::ease::{Ease, parse_flag},
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::{ReelError, ReelResult},
    script::model::{Entity, SceneRegistry},
    script::registry::{ActionKind, mutually_exclusive},
    script::tokenize::{split_outside_quotes, tokenize, unquote},
};

/// Ordered `key -> value` map of raw parameter strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace, keeping the original position of a replaced key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl serde::Serialize for Params {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// One parsed `action_type key=value ...` command.
///
/// Inside a bundle every step keeps its own parameters, so two `rotate` sub-commands never
/// overwrite each other's `angle`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Step {
    pub kind: ActionKind,
    pub params: Params,
    /// Source text of the command, quoted in error messages.
    pub source: String,
    /// Occurrence index of `kind` within its action.
    pub slot: usize,
    /// Alias of the entity this step creates or refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Step {
    /// Parse one command: the action type, then `key=value` tokens checked against the type's
    /// allow-list. Values lose surrounding quotes; a trailing `s` is removed from `t`.
    pub fn parse(text: &str) -> ReelResult<Self> {
        let source = text.trim().to_string();
        let tokens = tokenize(&source);
        let Some((head, rest)) = tokens.split_first() else {
            return Err(ReelError::malformed("", source));
        };
        let kind = ActionKind::from_name(head).ok_or_else(|| ReelError::InvalidActionType {
            found: head.clone(),
            allowed: ActionKind::allowed_names(),
            line: source.clone(),
        })?;

        let mut params = Params::default();
        for token in rest {
            let Some((key, value)) = token.split_once('=').filter(|(k, v)| {
                !k.is_empty() && !v.is_empty() && !k.starts_with(['"', '\''])
            }) else {
                let hint = if ActionKind::from_name(token).is_some() {
                    "; missing ';' between sub-commands?".to_string()
                } else {
                    String::new()
                };
                return Err(ReelError::MalformedParameter {
                    token: token.clone(),
                    line: source,
                    hint,
                });
            };
            if !kind.accepts(key) {
                return Err(ReelError::UnknownParameter {
                    key: key.to_string(),
                    action: kind.name().to_string(),
                    allowed: kind.allowed_params().join(", "),
                    line: source,
                });
            }
            let mut value = unquote(value).trim();
            if key == "t" {
                value = value.strip_suffix('s').unwrap_or(value).trim_end();
            }
            if params.get(key).is_some_and(|prev| prev != value) {
                return Err(ReelError::ConflictingParameter {
                    key: key.to_string(),
                    line: source,
                });
            }
            params.insert(key, value);
        }

        Ok(Self {
            kind,
            params,
            source,
            slot: 0,
            alias: None,
        })
    }

    /// Sub-map key: the alias when there is one, otherwise `<action_type><slot>`.
    pub fn key(&self) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => format!("{}{}", self.kind.name(), self.slot),
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }

    pub fn require_str(&self, key: &str) -> ReelResult<&str> {
        self.get_str(key)
            .ok_or_else(|| ReelError::missing(self.kind.name(), key, &self.source))
    }

    pub fn get_float(&self, key: &str) -> ReelResult<Option<f64>> {
        let Some(raw) = self.get_str(key) else {
            return Ok(None);
        };
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(self.invalid(key, raw, "a finite number")),
        }
    }

    pub fn require_float(&self, key: &str) -> ReelResult<f64> {
        self.get_float(key)?
            .ok_or_else(|| ReelError::missing(self.kind.name(), key, &self.source))
    }

    pub fn get_int(&self, key: &str) -> ReelResult<Option<i64>> {
        let Some(raw) = self.get_str(key) else {
            return Ok(None);
        };
        raw.parse::<i64>()
            .map(Some)
            .map_err(|_| self.invalid(key, raw, "an integer"))
    }

    /// Boolean-like value (`y/t/yes/true`, `n/f/no/false`), `default` when absent.
    pub fn get_bool(&self, key: &str, default: bool) -> ReelResult<bool> {
        match self.get_str(key) {
            None => Ok(default),
            Some(raw) => parse_flag(raw)
                .ok_or_else(|| self.invalid(key, raw, "one of y, t, yes, true, n, f, no, false")),
        }
    }

    /// Case-insensitive choice among `allowed`; returns the canonical spelling.
    pub fn get_enum(
        &self,
        key: &str,
        allowed: &[&'static str],
    ) -> ReelResult<Option<&'static str>> {
        let Some(raw) = self.get_str(key) else {
            return Ok(None);
        };
        allowed
            .iter()
            .find(|a| a.eq_ignore_ascii_case(raw))
            .copied()
            .map(Some)
            .ok_or_else(|| self.invalid(key, raw, format!("one of {}", allowed.join(", "))))
    }

    /// `A:B` numeric range.
    pub fn get_range(&self, key: &str) -> ReelResult<Option<(f64, f64)>> {
        let Some(raw) = self.get_str(key) else {
            return Ok(None);
        };
        raw.split_once(':')
            .and_then(|(a, b)| {
                Some((
                    a.trim().parse::<f64>().ok()?,
                    b.trim().parse::<f64>().ok()?,
                ))
            })
            .filter(|(a, b)| a.is_finite() && b.is_finite())
            .map(Some)
            .ok_or_else(|| self.invalid(key, raw, "a range A:B"))
    }

    /// `X,Y` numeric pair.
    pub fn get_pair(&self, key: &str) -> ReelResult<Option<(f64, f64)>> {
        let Some(raw) = self.get_str(key) else {
            return Ok(None);
        };
        crate::foundation::core::parse_pair::<f64>(raw)
            .filter(|(a, b)| a.is_finite() && b.is_finite())
            .map(Some)
            .ok_or_else(|| self.invalid(key, raw, "a pair X,Y"))
    }

    /// Declared duration in seconds (`t`), if any.
    pub fn duration_secs(&self) -> ReelResult<Option<f64>> {
        match self.get_float("t")? {
            Some(t) if t < 0.0 => Err(self.invalid("t", t.to_string(), "a duration >= 0")),
            other => Ok(other),
        }
    }

    /// Curve family from `sigmoid` and `abruptness`.
    pub fn ease(&self) -> ReelResult<Ease> {
        let abruptness = self.get_float("abruptness")?.unwrap_or(1.0);
        if abruptness <= 0.0 {
            return Err(self.invalid("abruptness", abruptness.to_string(), "a number > 0"));
        }
        match self.get_str("sigmoid") {
            None if self.kind.sigmoid_default() => Ok(Ease::Sigmoid { abruptness }),
            None => Ok(Ease::Linear),
            Some(raw) => Ease::from_param(raw, abruptness)
                .ok_or_else(|| self.invalid("sigmoid", raw, "a boolean-like value or sls")),
        }
    }

    fn invalid(
        &self,
        key: &str,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> ReelError {
        ReelError::invalid_value(key, value, expected, &self.source)
    }

    /// Required parameters and value domains of each action type.
    fn validate(&self) -> ReelResult<()> {
        self.duration_secs()?;
        match self.kind {
            ActionKind::DoNothing | ActionKind::FitTrajectory => {}
            ActionKind::Rotate => {
                self.require_float("angle")?;
                self.get_enum("axis", &["x", "y", "z"])?;
                self.ease()?;
            }
            ActionKind::ZoomIn | ActionKind::ZoomOut => {
                let scale = self.require_float("scale")?;
                if scale <= 0.0 {
                    return Err(self.invalid("scale", scale.to_string(), "a number > 0"));
                }
                self.ease()?;
            }
            ActionKind::MakeTransparent | ActionKind::MakeOpaque => {
                self.get_float("start")?;
                self.get_float("limit")?;
                self.ease()?;
            }
            ActionKind::Highlight => {
                if self.highlight_mode()? != "d" {
                    self.require_str("selection")?;
                }
            }
            ActionKind::CenterView => {
                self.require_str("selection")?;
            }
            ActionKind::Animate => {
                if self.get_range("frames")?.is_none() {
                    return Err(ReelError::missing(self.kind.name(), "frames", &self.source));
                }
                if let Some(smooth) = self.get_int("smooth")?
                    && smooth < 0
                {
                    return Err(self.invalid("smooth", smooth.to_string(), "an integer >= 0"));
                }
            }
            ActionKind::ShowFigure => {
                self.require_one_of(&["figure", "datafile"])?;
                self.get_range("dataframes")?;
            }
            ActionKind::AddOverlay => {
                self.require_one_of(&["figure", "datafile", "text"])?;
                if self.get_str("text").is_none() {
                    let size = self.require_float("relative_size")?;
                    if size <= 0.0 || size > 1.0 {
                        return Err(self.invalid(
                            "relative_size",
                            size.to_string(),
                            "a fraction in (0, 1]",
                        ));
                    }
                }
                self.get_pair("origin")?;
                self.get_range("dataframes")?;
                self.get_bool("2D", false)?;
                if let Some(size) = self.get_int("textsize")?
                    && size <= 0
                {
                    return Err(self.invalid("textsize", size.to_string(), "an integer > 0"));
                }
                if let Some(ratio) = self.get_float("aspect_ratio")?
                    && ratio <= 0.0
                {
                    return Err(self.invalid("aspect_ratio", ratio.to_string(), "a number > 0"));
                }
                self.ease()?;
            }
            ActionKind::AddLabel => {
                if self.get_int("atom_index")?.is_none_or(|i| i < 0) {
                    return match self.get_str("atom_index") {
                        None => Err(ReelError::missing(
                            self.kind.name(),
                            "atom_index",
                            &self.source,
                        )),
                        Some(raw) => Err(self.invalid("atom_index", raw, "an integer >= 0")),
                    };
                }
                if let Some(size) = self.get_float("text_size")?
                    && size <= 0.0
                {
                    return Err(self.invalid("text_size", size.to_string(), "a number > 0"));
                }
            }
            ActionKind::AddDistance => {
                self.require_str("selection1")?;
                self.require_str("selection2")?;
            }
            ActionKind::RemoveLabel | ActionKind::RemoveDistance => {
                if !self.get_bool("all", false)? && self.get_str("alias").is_none() {
                    return Err(ReelError::missing(self.kind.name(), "alias|all", &self.source));
                }
            }
        }
        Ok(())
    }

    /// `u` (fade in, default), `d` (fade out) or `ud` (in then out).
    pub fn highlight_mode(&self) -> ReelResult<&'static str> {
        Ok(self.get_enum("mode", &["u", "d", "ud"])?.unwrap_or("u"))
    }

    fn require_one_of(&self, keys: &[&str]) -> ReelResult<()> {
        if keys.iter().any(|k| self.params.contains(k)) {
            Ok(())
        } else {
            Err(ReelError::missing(self.kind.name(), keys.join("|"), &self.source))
        }
    }

    /// Attach an alias and apply the step's effect on the scene's alias registries.
    fn bind(&mut self, registry: &mut SceneRegistry) -> ReelResult<()> {
        let explicit = self.get_str("alias").map(str::to_string);
        match self.kind {
            ActionKind::AddLabel | ActionKind::AddDistance => {
                let entity = if self.kind == ActionKind::AddLabel {
                    Entity::Label
                } else {
                    Entity::Distance
                };
                let alias = explicit.unwrap_or_else(|| registry.auto_alias(self.kind));
                registry.register(entity, &alias, &self.source)?;
                self.alias = Some(alias);
            }
            ActionKind::RemoveLabel | ActionKind::RemoveDistance => {
                let entity = if self.kind == ActionKind::RemoveLabel {
                    Entity::Label
                } else {
                    Entity::Distance
                };
                if self.get_bool("all", false)? {
                    registry.clear(entity);
                } else if let Some(alias) = explicit {
                    registry.deregister(entity, &alias, &self.source)?;
                    self.alias = Some(alias);
                }
            }
            ActionKind::Highlight => match self.highlight_mode()? {
                "d" => {
                    let alias = explicit.ok_or_else(|| {
                        ReelError::missing(self.kind.name(), "alias", &self.source)
                    })?;
                    registry.deregister(Entity::Highlight, &alias, &self.source)?;
                    self.alias = Some(alias);
                }
                "ud" => {
                    self.alias = Some(explicit.unwrap_or_else(|| registry.auto_alias(self.kind)));
                }
                _ => {
                    let alias = explicit.unwrap_or_else(|| registry.auto_alias(self.kind));
                    registry.register(Entity::Highlight, &alias, &self.source)?;
                    self.alias = Some(alias);
                }
            },
            ActionKind::AddOverlay => {
                self.alias = Some(registry.auto_alias(self.kind));
            }
            _ => {}
        }
        Ok(())
    }
}

/// Two or more steps sharing one time window.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Bundle {
    pub steps: Vec<Step>,
}

impl Bundle {
    /// Indexed sub-maps of the repeatable steps, keyed by [`Step::key`].
    pub fn sub_maps(&self) -> impl Iterator<Item = (String, &Params)> {
        self.steps
            .iter()
            .filter(|s| s.kind.repeatable())
            .map(|s| (s.key(), &s.params))
    }

    /// Aliases of the steps of one type, in declaration order.
    pub fn aliases(&self, kind: ActionKind) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .filter(move |s| s.kind == kind)
            .filter_map(|s| s.alias.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum ActionBody {
    Single(Step),
    Bundle(Bundle),
}

/// One unit of movie behavior within a scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Action {
    /// Script text the action was parsed from.
    pub description: String,
    pub body: ActionBody,
    /// First frame (assigned by the timing resolver).
    pub initframe: FrameIndex,
    /// Frame count (assigned by the timing resolver).
    pub framenum: u64,
}

impl Action {
    /// Parse a standalone action line. Bundle-only types are rejected.
    pub fn parse_line(line: &str, registry: &mut SceneRegistry) -> ReelResult<Self> {
        let mut step = Step::parse(line)?;
        if step.kind.bundle_only() {
            return Err(ReelError::OverlayOutsideBundle {
                action: step.kind.name().to_string(),
                line: step.source,
            });
        }
        step.validate()?;
        step.bind(registry)?;
        Ok(Self::new(step.source.clone(), ActionBody::Single(step)))
    }

    /// Parse a `{ cmd; cmd; ... }` block. A block holding one command yields a single action.
    pub fn parse_block(block: &str, registry: &mut SceneRegistry) -> ReelResult<Self> {
        let description = block.trim().to_string();
        let inner = block_contents(&description)?;

        let mut steps = Vec::new();
        for command in split_outside_quotes(inner, ';') {
            if command.is_empty() {
                continue;
            }
            let step = Step::parse(command)?;
            step.validate()?;
            steps.push(step);
        }
        if steps.is_empty() {
            return Err(ReelError::malformed("{}", description));
        }

        check_combination(&steps, &description)?;
        common_duration(&steps, &description)?;

        for i in 0..steps.len() {
            let kind = steps[i].kind;
            let slot = steps[..i].iter().filter(|s| s.kind == kind).count();
            steps[i].slot = slot;
            steps[i].bind(registry)?;
        }

        let body = if steps.len() == 1 {
            ActionBody::Single(steps.remove(0))
        } else {
            ActionBody::Bundle(Bundle { steps })
        };
        Ok(Self::new(description, body))
    }

    fn new(description: String, body: ActionBody) -> Self {
        Self {
            description,
            body,
            initframe: FrameIndex(0),
            framenum: 0,
        }
    }

    /// Action types in declaration order (one entry for a single action).
    pub fn action_types(&self) -> Vec<ActionKind> {
        self.steps().iter().map(|s| s.kind).collect()
    }

    pub fn steps(&self) -> &[Step] {
        match &self.body {
            ActionBody::Single(step) => std::slice::from_ref(step),
            ActionBody::Bundle(bundle) => &bundle.steps,
        }
    }

    /// Merged parameters: everything from non-repeatable steps plus the shared duration.
    /// Repeatable steps keep their parameters in [`Bundle::sub_maps`].
    pub fn parameters(&self) -> Params {
        match &self.body {
            ActionBody::Single(step) => step.params.clone(),
            ActionBody::Bundle(bundle) => {
                let mut merged = Params::default();
                for step in &bundle.steps {
                    for (k, v) in step.params.iter() {
                        if !step.kind.repeatable() || k == "t" {
                            merged.insert(k, v);
                        }
                    }
                }
                merged
            }
        }
    }

    /// Declared duration in seconds; `None` for instantaneous actions.
    pub fn duration_secs(&self) -> ReelResult<Option<f64>> {
        common_duration(self.steps(), &self.description)
    }

    pub fn is_instantaneous(&self) -> bool {
        self.steps().iter().all(|s| s.kind.is_instantaneous())
    }

    /// Frames covered by this action.
    pub fn frames(&self) -> FrameRange {
        FrameRange::starting_at(self.initframe, self.framenum)
    }
}

fn block_contents(block: &str) -> ReelResult<&str> {
    let Some(open) = block.strip_prefix('{') else {
        return Err(ReelError::malformed(block, block));
    };
    let Some(close) = open.rfind('}') else {
        return Err(ReelError::UnterminatedBlock {
            line: block.to_string(),
        });
    };
    let trailing = open[close + 1..].trim();
    if !trailing.is_empty() {
        return Err(ReelError::malformed(trailing, block));
    }
    Ok(&open[..close])
}

fn check_combination(steps: &[Step], line: &str) -> ReelResult<()> {
    for (i, a) in steps.iter().enumerate() {
        for b in &steps[i + 1..] {
            if mutually_exclusive(a.kind, b.kind) {
                return Err(ReelError::MutualExclusionViolation {
                    first: a.kind.name().to_string(),
                    second: b.kind.name().to_string(),
                    line: line.to_string(),
                });
            }
        }
    }
    let instantaneous = steps.iter().find(|s| s.kind.is_instantaneous());
    let finite = steps.iter().find(|s| !s.kind.is_instantaneous());
    if let (Some(i), Some(f)) = (instantaneous, finite) {
        return Err(ReelError::InstantaneousCombination {
            instantaneous: i.kind.name().to_string(),
            finite: f.kind.name().to_string(),
            line: line.to_string(),
        });
    }
    Ok(())
}

/// The one duration all timed steps agree on.
fn common_duration(steps: &[Step], line: &str) -> ReelResult<Option<f64>> {
    let mut common: Option<f64> = None;
    for step in steps {
        let Some(t) = step.duration_secs()? else {
            continue;
        };
        match common {
            Some(c) if c != t => {
                return Err(ReelError::ConflictingParameter {
                    key: "t".to_string(),
                    line: line.to_string(),
                });
            }
            _ => common = Some(t),
        }
    }
    Ok(common)
}

#[cfg(test)]
#[path = "../../tests/unit/script/action.rs"]
mod tests;
