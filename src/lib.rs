//! reelscript compiles a line-oriented molecular movie script into a validated, timed action
//! list with precomputed per-frame animation curves.
//!
//! # Pipeline overview
//!
//! 1. **Assemble**: script text -> [`Script`] (directives, scenes, validated [`Action`]s)
//! 2. **Resolve**: [`Fps`] + scene -> first frame and frame count of every action
//! 3. **Synthesize**: action -> [`CurveSet`] (rotation increments, zoom factors, opacities, ...)
//! 4. **Compose**: scenes -> [`CompiledScript`] with a layout grid and equalized lengths
//!
//! Every validation failure is fatal: either the whole script compiles or a [`ReelError`] names
//! the offending line and the accepted alternatives.
//!
//! ```
//! let movie = reelscript::compile_source(
//!     "$global fps=20\n#s1\nrotate angle=360 axis=y t=2s\n",
//!     &reelscript::CompileOptions::default(),
//! )?;
//! let rot = movie.scenes[0].actions[0].curves.by_name("rot").unwrap();
//! assert_eq!(rot.len(), 40);
//! # Ok::<(), reelscript::ReelError>(())
//! ```
#![forbid(unsafe_code)]

mod animation;
mod compile;
mod foundation;
mod script;
mod timing;

pub use animation::curve::{
    DEFAULT_LINEAR_FRACTION, OVERLAY_FADE_FRACTION, SIGMOID_DOMAIN, cumulative, linspace,
    logistic, logistic_deriv, overlay_envelope, sigmoid_increments, sigmoid_norm_prod,
    sigmoid_norm_prod_linear_mid, sigmoid_norm_sum, sigmoid_norm_sum_linear_mid, sigmoid_weights,
    uniform_prod, uniform_sum,
};
pub use animation::ease::{Ease, parse_flag};
pub use animation::track::{CurveSet, CurveTag, format_values};
pub use compile::curves::action_curves;
pub use compile::plan::{
    CompileOptions, CompiledAction, CompiledScene, CompiledScript, LayoutGrid, SubMap,
    compile_script, compile_source,
};
pub use foundation::core::{Fps, FrameIndex, FrameRange, GridPosition, Resolution};
pub use foundation::error::{ReelError, ReelResult};
pub use script::action::{Action, ActionBody, Bundle, Params, Step};
pub use script::assemble::{assemble, strip_comment};
pub use script::model::{
    Directives, Entity, GlobalConfig, Layout, Scene, SceneConfig, SceneRegistry, Script,
};
pub use script::registry::{
    ActionKind, EXCLUSIVE_PAIRS, GLOBAL_DIRECTIVES, SCENE_DIRECTIVE_KEYS, mutually_exclusive,
};
pub use script::tokenize::{split_outside_quotes, tokenize, unquote};
pub use timing::resolve::{MAX_ACTION_FRAMES, resolve_scene};
