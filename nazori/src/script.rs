//! Scripted input. A script is a TOML list of steps replayed against a [`DrawingSession`], standing in
//! for a person with a pen:
//!
//! ```toml
//! [[steps]]
//! op = "down"
//! x = 10
//! y = 10
//!
//! [[steps]]
//! op = "up"
//! x = 40
//! y = 25
//!
//! [[steps]]
//! op = "export"
//! path = "out.png"
//! ```

use nazori_core::{geometry::Size, renderer::PointerSample, session::DrawingSession, style::StylePatch};

fn default_pointer_type() -> String {
    "pen".to_owned()
}

#[derive(serde::Deserialize, Clone, Debug, PartialEq)]
pub struct PointerStep {
    #[serde(default)]
    pub id: u32,
    #[serde(default = "default_pointer_type")]
    pub pointer_type: String,
    pub x: f32,
    pub y: f32,
}
impl From<&PointerStep> for PointerSample {
    fn from(step: &PointerStep) -> Self {
        PointerSample::new(step.id, step.pointer_type.clone(), step.x, step.y)
    }
}

#[derive(serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Down(PointerStep),
    Move(PointerStep),
    Up(PointerStep),
    Leave(PointerStep),
    Resize { width: u32, height: u32 },
    Style(StylePatch),
    Undo,
    Redo,
    Clear,
    NewDrawing,
    /// Index into the drawing list, newest first.
    Select { index: usize },
    /// Index into the drawing list, newest first.
    Delete { index: usize },
    /// Write the canvas as a PNG.
    Export { path: std::path::PathBuf },
}

#[derive(serde::Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<Step>,
}
impl Script {
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let string = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&string)?)
    }
    /// Replay every step, letting one frame pass before each.
    pub async fn run(
        &self,
        session: &mut DrawingSession,
        frames: &mut tokio::time::Interval,
    ) -> anyhow::Result<()> {
        for (number, step) in self.steps.iter().enumerate() {
            frames.tick().await;
            session.tick();
            log::trace!("Step {number}: {step:?}");
            apply(session, step).await?;
            if let Some(e) = session.take_error() {
                log::warn!("Step {number} ({step:?}) partially failed: {e}");
            }
        }
        // Let the last stroke's buffered samples drain, if it was left open.
        frames.tick().await;
        session.tick();
        Ok(())
    }
}

fn drawing_at(session: &DrawingSession, index: usize) -> anyhow::Result<nazori_core::state::DrawingId> {
    session
        .drawings()
        .drawings()
        .get(index)
        .map(|drawing| drawing.id)
        .ok_or_else(|| anyhow::anyhow!("no drawing at index {index}"))
}

async fn apply(session: &mut DrawingSession, step: &Step) -> anyhow::Result<()> {
    match step {
        Step::Down(pointer) => session.pointer_down(&PointerSample::from(pointer)),
        Step::Move(pointer) => session.pointer_move(&PointerSample::from(pointer)),
        Step::Up(pointer) => {
            session.pointer_up(&PointerSample::from(pointer)).await;
        }
        Step::Leave(pointer) => {
            session.pointer_leave(&PointerSample::from(pointer)).await;
        }
        Step::Resize { width, height } => {
            session.on_container_resize(Size::new(*width, *height));
        }
        Step::Style(patch) => session.update_style(*patch).await,
        Step::Undo => {
            session.undo().await;
        }
        Step::Redo => {
            session.redo().await;
        }
        Step::Clear => session.clear_canvas().await,
        Step::NewDrawing => {
            session.create_drawing().await;
        }
        Step::Select { index } => {
            let id = drawing_at(session, *index)?;
            session.select_drawing(id).await;
        }
        Step::Delete { index } => {
            let id = drawing_at(session, *index)?;
            session.delete_drawing(id).await;
        }
        Step::Export { path } => {
            let blob = session.export()?;
            std::fs::write(path, blob.as_bytes())?;
            log::info!("Exported {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{PointerStep, Script, Step};
    use nazori_core::style::StylePatch;

    #[test]
    fn parses_every_kind_of_step() {
        let script: Script = toml::from_str(
            r##"
            [[steps]]
            op = "down"
            x = 10
            y = 10.5

            [[steps]]
            op = "move"
            id = 3
            pointer_type = "mouse"
            x = 20
            y = 20

            [[steps]]
            op = "style"
            line_color = "#ef4444"
            is_eraser = true

            [[steps]]
            op = "undo"

            [[steps]]
            op = "resize"
            width = 640
            height = 480

            [[steps]]
            op = "select"
            index = 1

            [[steps]]
            op = "export"
            path = "out.png"
            "##,
        )
        .unwrap();

        assert_eq!(script.steps.len(), 7);
        assert_eq!(
            script.steps[0],
            Step::Down(PointerStep {
                id: 0,
                pointer_type: "pen".into(),
                x: 10.0,
                y: 10.5,
            })
        );
        assert!(matches!(&script.steps[1], Step::Move(p) if p.id == 3 && p.pointer_type == "mouse"));
        assert_eq!(
            script.steps[2],
            Step::Style(StylePatch {
                line_color: Some("#ef4444".parse().unwrap()),
                is_eraser: Some(true),
                ..StylePatch::default()
            })
        );
        assert_eq!(script.steps[3], Step::Undo);
        assert_eq!(
            script.steps[4],
            Step::Resize {
                width: 640,
                height: 480
            }
        );
        assert_eq!(script.steps[5], Step::Select { index: 1 });
    }
    #[test]
    fn unknown_op_rejected() {
        assert!(toml::from_str::<Script>("[[steps]]\nop = \"explode\"").is_err());
    }
    #[test]
    fn empty_script_is_fine() {
        assert_eq!(toml::from_str::<Script>("").unwrap(), Script::default());
    }
}
