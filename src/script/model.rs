use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context as _;

use crate::{
    animation::ease::parse_flag,
    foundation::core::{Fps, GridPosition, Resolution},
    foundation::error::{ReelError, ReelResult},
    script::action::Action,
    script::registry::{ActionKind, GLOBAL_DIRECTIVES, SCENE_DIRECTIVE_KEYS},
};

/// A parsed movie script: directives plus scenes in declaration order.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct Script {
    pub directives: Directives,
    pub scenes: Vec<Scene>,
}

impl FromStr for Script {
    type Err = ReelError;

    fn from_str(text: &str) -> ReelResult<Self> {
        crate::script::assemble::assemble(text)
    }
}

impl Script {
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read script '{}'", path.display()))?;
        text.parse()
    }

    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.name == name)
    }

    pub fn config(&self) -> ReelResult<GlobalConfig> {
        GlobalConfig::from_directives(&self.directives)
    }

    pub fn layout(&self) -> ReelResult<Option<Layout>> {
        Layout::from_directives(&self.directives)
    }

    /// Check every directive namespace, key and value against the declared scenes.
    pub fn validate(&self) -> ReelResult<()> {
        for (namespace, params) in self.directives.iter() {
            let global = GLOBAL_DIRECTIVES.iter().find(|(ns, _)| *ns == namespace);
            let allowed: &[&str] = match global {
                Some((_, keys)) => *keys,
                None if self.scene(namespace).is_some() => SCENE_DIRECTIVE_KEYS,
                None => {
                    let mut names: Vec<&str> =
                        GLOBAL_DIRECTIVES.iter().map(|(ns, _)| *ns).collect();
                    names.extend(self.scenes.iter().map(|s| s.name.as_str()));
                    return Err(ReelError::UnknownDirective {
                        namespace: namespace.to_string(),
                        allowed: names.join(", "),
                    });
                }
            };
            if let Some(key) = params.keys().find(|k| !allowed.contains(&k.as_str())) {
                return Err(ReelError::UnknownDirectiveParameter {
                    namespace: namespace.to_string(),
                    key: key.clone(),
                    allowed: allowed.join(", "),
                });
            }
        }

        self.config()?;
        self.layout()?;
        for scene in &self.scenes {
            SceneConfig::from_directives(&self.directives, &scene.name)?;
        }
        Ok(())
    }
}

/// One independently rendered sub-movie.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Scene {
    pub name: String,
    pub actions: Vec<Action>,
    /// Frames covered by all actions, set by the timing resolver.
    pub total_frames: u64,
    #[serde(skip)]
    pub registry: SceneRegistry,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
            total_frames: 0,
            registry: SceneRegistry::default(),
        }
    }

    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Parse a single-action line against this scene's registry and append it.
    pub fn push_line(&mut self, line: &str) -> ReelResult<()> {
        let action = Action::parse_line(line, &mut self.registry)?;
        self.add_action(action);
        Ok(())
    }

    /// Parse a `{...}` block against this scene's registry and append it.
    pub fn push_block(&mut self, block: &str) -> ReelResult<()> {
        let action = Action::parse_block(block, &mut self.registry)?;
        self.add_action(action);
        Ok(())
    }
}

/// Entities that later actions can refer to by alias.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    Label,
    Distance,
    Highlight,
}

impl Entity {
    pub fn name(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Distance => "distance",
            Self::Highlight => "highlight",
        }
    }
}

/// Scene-scoped alias bookkeeping: auto-alias counters and the currently active entities.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneRegistry {
    counters: BTreeMap<ActionKind, u32>,
    labels: Vec<String>,
    distances: Vec<String>,
    highlights: Vec<String>,
}

impl SceneRegistry {
    /// Next generated alias for `kind` (`label0`, `label1`, ...). Counters only move when an
    /// alias is generated.
    pub fn auto_alias(&mut self, kind: ActionKind) -> String {
        let prefix = kind.alias_prefix().unwrap_or(kind.name());
        let n = self.counters.entry(kind).or_insert(0);
        let alias = format!("{prefix}{n}");
        *n += 1;
        alias
    }

    pub fn active(&self, entity: Entity) -> &[String] {
        match entity {
            Entity::Label => &self.labels,
            Entity::Distance => &self.distances,
            Entity::Highlight => &self.highlights,
        }
    }

    pub fn is_active(&self, entity: Entity, alias: &str) -> bool {
        self.active(entity).iter().any(|a| a == alias)
    }

    pub fn register(&mut self, entity: Entity, alias: &str, line: &str) -> ReelResult<()> {
        if self.is_active(entity, alias) {
            return Err(ReelError::DuplicateAlias {
                kind: entity.name().to_string(),
                alias: alias.to_string(),
                line: line.to_string(),
            });
        }
        self.set_mut(entity).push(alias.to_string());
        Ok(())
    }

    pub fn deregister(&mut self, entity: Entity, alias: &str, line: &str) -> ReelResult<()> {
        let Some(pos) = self.active(entity).iter().position(|a| a == alias) else {
            return Err(ReelError::UnknownAlias {
                kind: entity.name().to_string(),
                alias: alias.to_string(),
                active: self.active(entity).join(", "),
                line: line.to_string(),
            });
        };
        self.set_mut(entity).remove(pos);
        Ok(())
    }

    pub fn clear(&mut self, entity: Entity) {
        self.set_mut(entity).clear();
    }

    fn set_mut(&mut self, entity: Entity) -> &mut Vec<String> {
        match entity {
            Entity::Label => &mut self.labels,
            Entity::Distance => &mut self.distances,
            Entity::Highlight => &mut self.highlights,
        }
    }
}

/// `$namespace key=value ...` records. A namespace repeated on several lines merges its keys;
/// a later value replaces an earlier one.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Directives {
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl Directives {
    /// Record a namespace even when its line carries no keys.
    pub fn declare(&mut self, namespace: &str) {
        self.entries.entry(namespace.to_string()).or_default();
    }

    pub fn insert(&mut self, namespace: &str, key: &str, value: &str) {
        self.entries
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, namespace: &str, key: &str) -> Option<&str> {
        self.entries.get(namespace)?.get(key).map(String::as_str)
    }

    pub fn namespace(&self, namespace: &str) -> Option<&BTreeMap<String, String>> {
        self.entries.get(namespace)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, String>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Movie-wide settings from `$global`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct GlobalConfig {
    pub name: String,
    pub fps: Fps,
    pub keepframes: bool,
    pub draft: bool,
    pub render: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            name: "movie".to_string(),
            fps: Fps::default(),
            keepframes: false,
            draft: false,
            render: true,
        }
    }
}

impl GlobalConfig {
    pub fn from_directives(directives: &Directives) -> ReelResult<Self> {
        let mut cfg = Self::default();
        let get = |key| directives.get("global", key);
        if let Some(name) = get("name") {
            if name.is_empty() {
                return Err(ReelError::validation("$global name must not be empty"));
            }
            cfg.name = name.to_string();
        }
        if let Some(fps) = get("fps") {
            cfg.fps = Fps::parse(fps)?;
        }
        cfg.keepframes = flag("global", "keepframes", get("keepframes"), cfg.keepframes)?;
        cfg.draft = flag("global", "draft", get("draft"), cfg.draft)?;
        cfg.render = flag("global", "render", get("render"), cfg.render)?;
        Ok(cfg)
    }
}

/// Per-scene settings from `$<scene>`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct SceneConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trajectory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdb_code: Option<String>,
    pub position: GridPosition,
    pub resolution: Resolution,
    /// Whether `position` was given explicitly.
    #[serde(skip)]
    pub positioned: bool,
}

impl SceneConfig {
    pub fn from_directives(directives: &Directives, scene: &str) -> ReelResult<Self> {
        let get = |key| directives.get(scene, key).map(str::to_string);
        let mut cfg = Self {
            visualization: get("visualization"),
            structure: get("structure"),
            trajectory: get("trajectory"),
            pdb_code: get("pdb_code"),
            ..Self::default()
        };
        if let Some(position) = directives.get(scene, "position") {
            cfg.position = GridPosition::parse(position)?;
            cfg.positioned = true;
        }
        if let Some(resolution) = directives.get(scene, "resolution") {
            cfg.resolution = Resolution::parse(resolution)?;
        }
        if cfg.trajectory.is_some() && cfg.structure.is_none() {
            return Err(ReelError::validation(format!(
                "scene '{scene}': trajectory requires structure"
            )));
        }
        Ok(cfg)
    }
}

/// Grid the scenes are composited into, from `$layout`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Layout {
    pub rows: u32,
    pub columns: u32,
}

impl Layout {
    /// `None` when the script has no `$layout` line.
    pub fn from_directives(directives: &Directives) -> ReelResult<Option<Self>> {
        if directives.namespace("layout").is_none() {
            return Ok(None);
        }
        let dim = |key: &str| -> ReelResult<u32> {
            let raw = directives
                .get("layout", key)
                .ok_or_else(|| ReelError::validation(format!("$layout requires '{key}'")))?;
            match raw.parse::<u32>() {
                Ok(v) if v > 0 => Ok(v),
                _ => Err(ReelError::validation(format!(
                    "$layout {key}='{raw}' must be an integer > 0"
                ))),
            }
        };
        Ok(Some(Self {
            rows: dim("rows")?,
            columns: dim("columns")?,
        }))
    }

    pub fn contains(self, pos: GridPosition) -> bool {
        pos.row < self.rows && pos.column < self.columns
    }
}

fn flag(namespace: &str, key: &str, raw: Option<&str>, default: bool) -> ReelResult<bool> {
    match raw {
        None => Ok(default),
        Some(v) => parse_flag(v).ok_or_else(|| {
            ReelError::validation(format!(
                "${namespace} {key}='{v}' is not a boolean (y/t/yes/true or n/f/no/false)"
            ))
        }),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/model.rs"]
mod tests;
