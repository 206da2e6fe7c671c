use data::heatmap::{Geometry, HoveredBucket};
use iced::widget::canvas::{self, Path, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme, mouse, window};

use crate::chart::keyboard_nav;
use crate::screen::heatmap::Message;

const HOVER_OUTLINE: Color = Color::from_rgb8(43, 62, 228);
const HOVER_OUTLINE_WIDTH: f32 = 1.0;

/// Plot area of the heatmap. Cells come from the batched geometry and are
/// recorded once into `cache`; only the hover outline is drawn every frame.
pub struct HeatmapCanvas<'a> {
    pub geometry: &'a Geometry,
    pub hovered: Option<&'a HoveredBucket>,
    pub cache: &'a canvas::Cache,
}

#[derive(Debug, Default)]
pub struct State {
    last_size: Option<Size>,
}

impl canvas::Program<Message> for HeatmapCanvas<'_> {
    type State = State;

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        match event {
            iced::Event::Window(window::Event::RedrawRequested(_)) => {
                let size = bounds.size();
                if state.last_size == Some(size) {
                    return None;
                }
                state.last_size = Some(size);
                Some(canvas::Action::publish(Message::BoundsChanged(size)))
            }
            iced::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let position = cursor.position()?;
                Some(canvas::Action::publish(Message::PointerMoved {
                    position: Point::new(position.x - bounds.x, position.y - bounds.y),
                    bounds: bounds.size(),
                }))
            }
            iced::Event::Mouse(mouse::Event::CursorLeft) => {
                Some(canvas::Action::publish(Message::PointerLeft))
            }
            iced::Event::Keyboard(event) => keyboard_nav::handle(event)
                .map(|command| canvas::Action::publish(Message::Command(command)).and_capture()),
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        if bounds.width < 1.0 || bounds.height < 1.0 {
            return vec![];
        }

        let cells = self.cache.draw(renderer, bounds.size(), |frame| {
            frame.fill_rectangle(Point::ORIGIN, frame.size(), Color::WHITE);

            // One fill per saturation level, however many cells share it.
            for batch in self.geometry.batches() {
                let path = Path::new(|builder| {
                    for rect in &batch.rects {
                        builder.rectangle(rect.position(), rect.size());
                    }
                });
                frame.fill(&path, batch.color);
            }
        });

        let Some(hovered) = self.hovered else {
            return vec![cells];
        };

        let mut frame = canvas::Frame::new(renderer, bounds.size());
        frame.stroke(
            &Path::rectangle(hovered.cell.position(), hovered.cell.size()),
            Stroke::default()
                .with_color(HOVER_OUTLINE)
                .with_width(HOVER_OUTLINE_WIDTH),
        );

        vec![cells, frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}
