//! Line-oriented assembly of a script into directives and scenes.
//!
//! Grammar, one logical line at a time:
//!
//! ```text
//! ! comment            (from the first '!' to the end of the line)
//! $namespace k=v ...   directive
//! #scene_name          opens a scene
//! { cmd; cmd; ... }    simultaneous block, may span lines until '}'
//! action k=v ...       single action
//! ```

use tracing::debug;

use crate::{
    foundation::error::{ReelError, ReelResult},
    script::model::{Directives, Scene, Script},
    script::tokenize::{tokenize, unquote},
};

pub const COMMENT_MARKER: char = '!';
pub const SCENE_MARKER: char = '#';
pub const DIRECTIVE_MARKER: char = '$';

/// A `{` block still waiting for its `}`.
struct OpenBlock {
    first_line: String,
    text: String,
}

/// Parse a whole script. Directives are checked once every scene header has been seen, so a
/// `$<scene>` line may precede its `#<scene>` header.
#[tracing::instrument(skip(text), fields(bytes = text.len()))]
pub fn assemble(text: &str) -> ReelResult<Script> {
    let mut script = Script::default();
    let mut directive_lines: Vec<String> = Vec::new();
    let mut block: Option<OpenBlock> = None;

    for raw in text.lines() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(open) = block.as_mut() {
            open.text.push(' ');
            open.text.push_str(line);
            if line.contains('}') {
                let closed = std::mem::take(&mut open.text);
                block = None;
                current_scene(&mut script, &closed)?.push_block(&closed)?;
            }
            continue;
        }

        if let Some(name) = line.strip_prefix(SCENE_MARKER) {
            open_scene(&mut script, name.trim())?;
        } else if line.starts_with(DIRECTIVE_MARKER) {
            directive_lines.push(line.to_string());
        } else if line.starts_with('{') {
            if line.contains('}') {
                current_scene(&mut script, line)?.push_block(line)?;
            } else {
                current_scene(&mut script, line)?;
                block = Some(OpenBlock {
                    first_line: line.to_string(),
                    text: line.to_string(),
                });
            }
        } else {
            current_scene(&mut script, line)?.push_line(line)?;
        }
    }

    if let Some(open) = block {
        return Err(ReelError::UnterminatedBlock {
            line: open.first_line,
        });
    }

    for line in &directive_lines {
        parse_directive(line, &mut script.directives)?;
    }
    script.validate()?;

    for scene in &script.scenes {
        debug!(scene = %scene.name, actions = scene.actions.len(), "assembled scene");
    }
    Ok(script)
}

/// Drop everything from the first comment marker on.
pub fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_MARKER) {
        Some(i) => &line[..i],
        None => line,
    }
}

fn open_scene(script: &mut Script, name: &str) -> ReelResult<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ReelError::validation(format!(
            "invalid scene header '#{name}' (expected #name without spaces)"
        )));
    }
    if script.scene(name).is_some() {
        return Err(ReelError::DuplicateScene {
            name: name.to_string(),
        });
    }
    debug!(scene = name, "opened scene");
    script.scenes.push(Scene::new(name));
    Ok(())
}

fn current_scene<'a>(script: &'a mut Script, line: &str) -> ReelResult<&'a mut Scene> {
    script
        .scenes
        .last_mut()
        .ok_or_else(|| ReelError::ActionOutsideScene {
            line: line.to_string(),
        })
}

/// Parse `$namespace key=value ...` into `directives`. Allow-lists are checked later by
/// [`Script::validate`].
fn parse_directive(line: &str, directives: &mut Directives) -> ReelResult<()> {
    let tokens = tokenize(line.trim_start_matches(DIRECTIVE_MARKER));
    let Some((namespace, rest)) = tokens.split_first() else {
        return Err(ReelError::malformed(line, line));
    };
    directives.declare(namespace);
    for token in rest {
        match token.split_once('=') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => {
                directives.insert(namespace, key, unquote(value));
            }
            _ => return Err(ReelError::malformed(token.as_str(), line)),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/script/assemble.rs"]
mod tests;
