use rayon::prelude::*;
use tracing::debug;

use crate::{
    animation::track::CurveSet,
    compile::curves::action_curves,
    foundation::core::{Fps, FrameRange},
    foundation::error::{ReelError, ReelResult},
    script::action::{Action, ActionBody, Params},
    script::model::{Layout, Scene, SceneConfig, Script},
    script::registry::ActionKind,
    timing::resolve::resolve_scene,
};

/// Knobs that override or complement the script's own directives.
#[derive(Clone, Debug, Default)]
pub struct CompileOptions {
    /// Replaces `$global fps`.
    pub fps: Option<Fps>,
    /// Worker threads for per-scene compilation; `None` uses rayon's default.
    pub threads: Option<usize>,
}

/// A fully validated, timed movie with every per-frame curve materialized.
#[derive(Clone, Debug, serde::Serialize)]
pub struct CompiledScript {
    pub name: String,
    pub fps: Fps,
    pub keepframes: bool,
    pub draft: bool,
    pub render: bool,
    /// Length of the composed movie: the longest scene.
    pub movie_frames: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutGrid>,
    pub scenes: Vec<CompiledScene>,
}

impl CompiledScript {
    pub fn scene(&self, name: &str) -> Option<&CompiledScene> {
        self.scenes.iter().find(|s| s.name == name)
    }
}

/// Row-major grid of scene names; `None` marks an empty cell.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LayoutGrid {
    pub rows: u32,
    pub columns: u32,
    pub cells: Vec<Vec<Option<String>>>,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct CompiledScene {
    pub name: String,
    pub config: SceneConfig,
    pub total_frames: u64,
    /// Frames the compositor appends (repeating the last one) to reach `movie_frames`.
    pub padding_frames: u64,
    pub actions: Vec<CompiledAction>,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct CompiledAction {
    pub description: String,
    pub action_types: Vec<ActionKind>,
    pub parameters: Params,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_maps: Vec<SubMap>,
    pub frames: FrameRange,
    pub curves: CurveSet,
}

/// Parameters of one repeatable sub-command, keyed by alias or `<type><slot>`.
#[derive(Clone, Debug, serde::Serialize)]
pub struct SubMap {
    pub key: String,
    pub params: Params,
}

/// Parse and compile script text.
pub fn compile_source(text: &str, opts: &CompileOptions) -> ReelResult<CompiledScript> {
    compile_script(text.parse()?, opts)
}

/// Resolve timing and generate curves for every scene, then lay the scenes out and equalize
/// their lengths.
#[tracing::instrument(skip(script, opts), fields(scenes = script.scenes.len()))]
pub fn compile_script(script: Script, opts: &CompileOptions) -> ReelResult<CompiledScript> {
    let global = script.config()?;
    let fps = opts.fps.unwrap_or(global.fps);
    let layout = script.layout()?;

    let configs = script
        .scenes
        .iter()
        .map(|s| SceneConfig::from_directives(&script.directives, &s.name))
        .collect::<ReelResult<Vec<_>>>()?;
    let grid = layout_grid(&script.scenes, &configs, layout)?;

    let pool = build_thread_pool(opts.threads)?;
    let compiled = pool.install(|| {
        script
            .scenes
            .into_par_iter()
            .zip(configs)
            .map(|(scene, config)| compile_scene(scene, config, fps))
            .collect::<Vec<_>>()
    });
    let mut scenes = compiled.into_iter().collect::<ReelResult<Vec<_>>>()?;

    let movie_frames = scenes.iter().map(|s| s.total_frames).max().unwrap_or(0);
    for scene in &mut scenes {
        scene.padding_frames = movie_frames - scene.total_frames;
    }
    debug!(movie_frames, %fps, "compiled script");

    Ok(CompiledScript {
        name: global.name,
        fps,
        keepframes: global.keepframes,
        draft: global.draft,
        render: global.render,
        movie_frames,
        layout: grid,
        scenes,
    })
}

fn compile_scene(mut scene: Scene, config: SceneConfig, fps: Fps) -> ReelResult<CompiledScene> {
    resolve_scene(&mut scene, fps)?;
    let actions = scene
        .actions
        .iter()
        .map(compile_action)
        .collect::<ReelResult<Vec<_>>>()?;
    Ok(CompiledScene {
        name: scene.name,
        config,
        total_frames: scene.total_frames,
        padding_frames: 0,
        actions,
    })
}

fn compile_action(action: &Action) -> ReelResult<CompiledAction> {
    let sub_maps = match &action.body {
        ActionBody::Bundle(bundle) => bundle
            .sub_maps()
            .map(|(key, params)| SubMap {
                key,
                params: params.clone(),
            })
            .collect(),
        ActionBody::Single(_) => Vec::new(),
    };
    Ok(CompiledAction {
        description: action.description.clone(),
        action_types: action.action_types(),
        parameters: action.parameters(),
        sub_maps,
        frames: action.frames(),
        curves: action_curves(action)?,
    })
}

/// Place scenes on the `$layout` grid. Several scenes need a layout and an explicit, distinct
/// position each.
fn layout_grid(
    scenes: &[Scene],
    configs: &[SceneConfig],
    layout: Option<Layout>,
) -> ReelResult<Option<LayoutGrid>> {
    let Some(layout) = layout else {
        if scenes.len() > 1 {
            return Err(ReelError::validation(
                "a script with several scenes requires $layout rows=.. columns=..",
            ));
        }
        return Ok(None);
    };

    let mut cells = vec![vec![None; layout.columns as usize]; layout.rows as usize];
    for (scene, config) in scenes.iter().zip(configs) {
        if scenes.len() > 1 && !config.positioned {
            return Err(ReelError::validation(format!(
                "scene '{}' needs ${} position=ROW,COL in a multi-scene layout",
                scene.name, scene.name
            )));
        }
        let pos = config.position;
        if !layout.contains(pos) {
            return Err(ReelError::validation(format!(
                "scene '{}' position {},{} lies outside the {}x{} layout",
                scene.name, pos.row, pos.column, layout.rows, layout.columns
            )));
        }
        let cell = &mut cells[pos.row as usize][pos.column as usize];
        if let Some(other) = cell {
            return Err(ReelError::validation(format!(
                "scenes '{other}' and '{}' share layout position {},{}",
                scene.name, pos.row, pos.column
            )));
        }
        *cell = Some(scene.name.clone());
    }
    Ok(Some(LayoutGrid {
        rows: layout.rows,
        columns: layout.columns,
        cells,
    }))
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::validation("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
