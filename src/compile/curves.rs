//! Per-action curve generation: the numeric half of the handoff to the rendering-script emitter.

use crate::{
    animation::curve::{cumulative, linspace, overlay_envelope, sigmoid_norm_sum},
    animation::ease::Ease,
    animation::track::{CurveSet, CurveTag},
    foundation::error::{ReelError, ReelResult},
    script::action::{Action, Step},
    script::registry::ActionKind,
};

/// Build every curve of `action`. Each curve holds exactly `action.framenum` values; actions
/// spanning no frames produce an empty set.
pub fn action_curves(action: &Action) -> ReelResult<CurveSet> {
    let n = usize::try_from(action.framenum)
        .map_err(|_| ReelError::animation(format!("frame count {} too large", action.framenum)))?;
    let mut set = CurveSet::new();
    if n == 0 {
        return Ok(set);
    }
    for step in action.steps() {
        step_curves(step, n, &mut set)?;
    }
    Ok(set)
}

fn step_curves(step: &Step, n: usize, set: &mut CurveSet) -> ReelResult<()> {
    match step.kind {
        ActionKind::Rotate => {
            let angle = step.require_float("angle")?;
            set.insert(
                CurveTag::Rotate { slot: step.slot },
                step.ease()?.sum_steps(angle, n),
            );
        }
        ActionKind::ZoomIn => {
            let scale = step.require_float("scale")?;
            set.insert(CurveTag::ZoomIn, step.ease()?.prod_steps(scale, n)?);
        }
        ActionKind::ZoomOut => {
            let scale = step.require_float("scale")?;
            set.insert(CurveTag::ZoomOut, step.ease()?.prod_steps(1.0 / scale, n)?);
        }
        ActionKind::MakeTransparent => {
            let values = opacity_ramp(step, 1.0, 0.0, n)?;
            set.insert(CurveTag::MakeTransparent { slot: step.slot }, values);
        }
        ActionKind::MakeOpaque => {
            let values = opacity_ramp(step, 0.0, 1.0, n)?;
            set.insert(CurveTag::MakeOpaque { slot: step.slot }, values);
        }
        ActionKind::Animate => {
            if let Some((from, to)) = step.get_range("frames")? {
                set.insert(CurveTag::Animate, indices(from, to, n));
            }
        }
        ActionKind::Highlight => {
            let alias = step_alias(step)?;
            set.insert(
                CurveTag::Highlight { alias },
                highlight_opacity(step.highlight_mode()?, n),
            );
        }
        ActionKind::AddOverlay => {
            let alias = step_alias(step)?;
            let smooth = !matches!(step.ease()?, Ease::Linear);
            set.insert(
                CurveTag::Overlay {
                    alias: alias.clone(),
                },
                overlay_envelope(n, smooth),
            );
            if let Some((from, to)) = step.get_range("dataframes")? {
                set.insert(CurveTag::OverlayData { alias }, indices(from, to, n));
            }
        }
        ActionKind::ShowFigure => {
            if let Some((from, to)) = step.get_range("dataframes")? {
                set.insert(CurveTag::Figure, indices(from, to, n));
            }
        }
        ActionKind::DoNothing
        | ActionKind::CenterView
        | ActionKind::AddLabel
        | ActionKind::RemoveLabel
        | ActionKind::AddDistance
        | ActionKind::RemoveDistance
        | ActionKind::FitTrajectory => {}
    }
    Ok(())
}

/// Absolute opacity moving from `start` to `limit`, landing exactly on `limit`.
fn opacity_ramp(step: &Step, start: f64, limit: f64, n: usize) -> ReelResult<Vec<f64>> {
    let start = step.get_float("start")?.unwrap_or(start);
    let limit = step.get_float("limit")?.unwrap_or(limit);
    let mut values = cumulative(start, &step.ease()?.sum_steps(limit - start, n));
    if let Some(last) = values.last_mut() {
        *last = limit;
    }
    Ok(values)
}

/// Highlight opacity: `u` fades 0 to 1, `d` fades 1 to 0, `ud` rises over the first half and
/// falls over the rest.
fn highlight_opacity(mode: &str, n: usize) -> Vec<f64> {
    let rise = |len: usize| {
        let mut v = cumulative(0.0, &sigmoid_norm_sum(1.0, len, 1.0));
        if let Some(last) = v.last_mut() {
            *last = 1.0;
        }
        v
    };
    let fall = |len: usize| rise(len).into_iter().map(|v| 1.0 - v).collect::<Vec<_>>();
    match mode {
        "d" => fall(n),
        "ud" => {
            let up = n / 2;
            let mut values = rise(up);
            values.extend(fall(n - up));
            values
        }
        _ => rise(n),
    }
}

/// Integer positions from `from` to `to` (trajectory frames, data rows).
fn indices(from: f64, to: f64, n: usize) -> Vec<f64> {
    linspace(from, to, n).into_iter().map(f64::trunc).collect()
}

fn step_alias(step: &Step) -> ReelResult<String> {
    step.alias.clone().ok_or_else(|| {
        ReelError::animation(format!("'{}' has no alias to key its curve", step.source))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compile/curves.rs"]
mod tests;
