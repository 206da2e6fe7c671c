use std::sync::Arc;

use data::heatmap::{ColorMode, Command, Controller, Error, Geometry, Outcome, Viewport};
use data::{Config, SampleProvider};
use iced::widget::{button, canvas, column, container, row, text};
use iced::{Alignment, Element, Length, Point, Size};

use crate::widget::heatmap::HeatmapCanvas;

const LABEL_SIZE: f32 = 13.0;

#[derive(Debug, Clone)]
pub enum Message {
    BoundsChanged(Size),
    PointerMoved { position: Point, bounds: Size },
    PointerLeft,
    Command(Command),
}

pub struct HeatmapView {
    controller: Controller,
    viewport: Option<Viewport>,
    geometry: Arc<Geometry>,
    plot_cache: canvas::Cache,
}

impl HeatmapView {
    pub fn new(config: &Config, provider: &impl SampleProvider) -> Result<Self, Error> {
        Ok(Self {
            controller: Controller::new(config, provider)?,
            viewport: None,
            geometry: Arc::default(),
            plot_cache: canvas::Cache::new(),
        })
    }

    pub fn title(&self) -> &'static str {
        "Processor utilization heatmap"
    }

    pub fn update(&mut self, message: Message, provider: &impl SampleProvider) {
        match message {
            Message::BoundsChanged(size) => {
                self.viewport = Some(size.into());
            }
            Message::PointerMoved { position, bounds } => {
                let viewport = Viewport::from(bounds);
                self.viewport = Some(viewport);
                self.controller
                    .heatmap_mut()
                    .capture_pointer(position, viewport);
            }
            Message::PointerLeft => {
                self.controller.heatmap_mut().release_pointer();
            }
            Message::Command(command) => match self.controller.apply(command, provider) {
                Ok(Outcome::Unchanged) => {}
                Ok(outcome) => log::debug!("{command:?}: {outcome:?}"),
                Err(err) => log::error!("Failed to apply {command:?}: {err}"),
            },
        }

        self.layout();
    }

    /// Refreshes the geometry and hover for the current viewport, dropping the
    /// recorded canvas frame only when the geometry was actually rebuilt.
    fn layout(&mut self) {
        let Some(viewport) = self.viewport else {
            return;
        };

        let geometry = self.controller.heatmap_mut().layout(viewport);
        if !Arc::ptr_eq(&geometry, &self.geometry) {
            self.plot_cache.clear();
            self.geometry = geometry;
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let heatmap = self.controller.heatmap();

        let plot = canvas(HeatmapCanvas {
            geometry: &self.geometry,
            hovered: heatmap.hovered(),
            cache: &self.plot_cache,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let hover_label = text(
            heatmap
                .hovered()
                .map(ToString::to_string)
                .unwrap_or_default(),
        )
        .size(LABEL_SIZE);

        let status = text(format!(
            "time bucket {:?}, value bucket {} of {}",
            heatmap.x_bucket_size(),
            heatmap.y_bucket_size(),
            heatmap.max_y()
        ))
        .size(LABEL_SIZE);

        let mode_picker = ColorMode::ALL.into_iter().fold(
            row![text("Saturation").size(LABEL_SIZE)]
                .spacing(4)
                .align_y(Alignment::Center),
            |picker, mode| {
                let style = if mode == heatmap.color_mode() {
                    button::primary
                } else {
                    button::secondary
                };
                picker.push(
                    button(text(mode.to_string()).size(LABEL_SIZE))
                        .style(style)
                        .on_press(Message::Command(Command::SetColorMode(mode))),
                )
            },
        );

        container(
            column![
                plot,
                hover_label,
                row![status, mode_picker]
                    .spacing(16)
                    .align_y(Alignment::Center),
            ]
            .spacing(6),
        )
        .padding(8)
        .into()
    }
}
