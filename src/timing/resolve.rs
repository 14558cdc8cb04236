use tracing::debug;

use crate::{
    foundation::core::{Fps, FrameIndex},
    foundation::error::{ReelError, ReelResult},
    script::model::Scene,
};

/// Longest span one action may cover; every curve of the action holds this many values.
pub const MAX_ACTION_FRAMES: u64 = 1 << 22;

/// Assign each action its first frame and frame count, in declaration order.
///
/// Spans are contiguous: action `i + 1` starts where action `i` ends. A duration that floors to
/// zero frames leaves the action instantaneous. Spans longer than [`MAX_ACTION_FRAMES`] are
/// rejected.
#[tracing::instrument(skip(scene), fields(scene = %scene.name))]
pub fn resolve_scene(scene: &mut Scene, fps: Fps) -> ReelResult<u64> {
    let mut cursor: u64 = 0;
    for action in &mut scene.actions {
        let framenum = match action.duration_secs()? {
            Some(secs) => fps.secs_to_frames_floor(secs),
            None => 0,
        };
        if framenum > MAX_ACTION_FRAMES {
            return Err(ReelError::validation(format!(
                "action '{}' spans {framenum} frames at {fps} fps (at most {MAX_ACTION_FRAMES})",
                action.description
            )));
        }
        action.initframe = FrameIndex(cursor);
        action.framenum = framenum;
        cursor = match cursor.checked_add(framenum) {
            Some(end) => end,
            None => {
                return Err(ReelError::validation(format!(
                    "scene '{}' overflows the frame counter at action '{}'",
                    scene.name, action.description
                )));
            }
        };
    }
    scene.total_frames = cursor;
    debug!(total_frames = cursor, "resolved scene timing");
    Ok(cursor)
}

#[cfg(test)]
#[path = "../../tests/unit/timing/resolve.rs"]
mod tests;
