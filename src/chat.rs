//! Terminal front end
//!
//! Each input line is one command. `listen` hands the session to the voice
//! capture; when that capture is the same line reader, the next typed line is
//! what the assistant "hears".

use anyhow::Result;
use std::io::Write;
use tokio::io::AsyncBufRead;

use crate::recipe::ImageLoadResult;
use crate::session::{Assistant, Frame, ListenOutcome};
use crate::voice::LineCapture;

/// Run the chat loop until the input closes or the session terminates
pub async fn run<R, W>(assistant: &mut Assistant, input: &LineCapture<R>, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write,
{
    writeln!(out, "Recipes: {}", assistant.catalog().names().join(", "))?;
    writeln!(
        out,
        "Type a command, \"use <recipe>\", \"listen\", or an empty line to refresh."
    )?;

    write_frame(out, &assistant.render())?;

    while let Some(line) = input.next_line().await? {
        let line = line.trim();

        let frame = if line.is_empty() {
            assistant.render()
        } else if line.eq_ignore_ascii_case("listen") {
            match assistant.listen().await {
                ListenOutcome::Heard(outcome) => {
                    writeln!(out, "You said: {}", outcome.transcript)?;
                    outcome.frame
                }
                ListenOutcome::NotUnderstood { frame } => frame,
            }
        } else if let Some(name) = line.strip_prefix("use ") {
            match assistant.select_recipe(name.trim()) {
                Ok(frame) => frame,
                Err(e) => {
                    writeln!(out, "{}", e)?;
                    continue;
                }
            }
        } else {
            assistant.handle_transcript(line).frame
        };

        write_frame(out, &frame)?;

        if assistant.is_terminated() {
            break;
        }
    }

    out.flush()?;
    Ok(())
}

pub fn write_frame<W: Write>(out: &mut W, frame: &Frame) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "🍳 {}", frame.recipe)?;
    writeln!(out, "### {}", frame.step.heading())?;
    writeln!(out, "{}", frame.step.text)?;

    if let ImageLoadResult::Found(path) = &frame.step.image {
        writeln!(out, "🖼  {}", path.display())?;
    }

    match frame.scaled_for {
        Some(servings) => writeln!(out, "### Adjusted Ingredients ({} servings):", servings)?,
        None if frame.ingredients.is_empty() => {}
        None => writeln!(out, "### Ingredients:")?,
    }
    for ingredient in &frame.ingredients {
        writeln!(out, "• {}", ingredient)?;
    }

    for timer in &frame.timers {
        writeln!(out, "{}", timer.line())?;
    }

    for warning in &frame.warnings {
        writeln!(out, "⚠ {}", warning)?;
    }

    Ok(())
}
