mod chart;
mod demo;
mod logger;
mod screen;
mod widget;

use std::path::PathBuf;

use data::{Config, Trace};
use iced::widget::{center, text};
use iced::{Element, Size, Task};

use crate::screen::heatmap::{self, HeatmapView};

const DEMO_SEED: u64 = 0x6275_7379;

fn main() -> iced::Result {
    if let Err(err) = logger::setup(cfg!(debug_assertions)) {
        eprintln!("Failed to initialize logger: {err}");
    }

    iced::application(Busymap::new, Busymap::update, Busymap::view)
        .title(Busymap::title)
        .window_size(Size::new(1024.0, 640.0))
        .run()
}

#[derive(Debug, Clone)]
enum Message {
    Heatmap(heatmap::Message),
}

enum Screen {
    Heatmap(HeatmapView),
    Failed(String),
}

struct Busymap {
    trace: Trace,
    screen: Screen,
}

impl Busymap {
    fn new() -> (Self, Task<Message>) {
        let config = data::config::load().unwrap_or_else(|err| {
            log::warn!("{err}, falling back to defaults");
            Config::default()
        });

        let trace = match std::env::args_os().nth(1).map(PathBuf::from) {
            Some(path) => match Trace::load(&path) {
                Ok(trace) => trace,
                Err(err) => {
                    log::error!("{err}");
                    let screen = Screen::Failed(format!("{}: {err}", path.display()));
                    return (
                        Self {
                            trace: Trace::default(),
                            screen,
                        },
                        Task::none(),
                    );
                }
            },
            None => demo::trace(DEMO_SEED),
        };

        let screen = match HeatmapView::new(&config, &trace) {
            Ok(view) => Screen::Heatmap(view),
            Err(err) => {
                log::error!("Failed to build heatmap: {err}");
                Screen::Failed(format!("Failed to build heatmap: {err}"))
            }
        };

        (Self { trace, screen }, Task::none())
    }

    fn title(&self) -> String {
        match &self.screen {
            Screen::Heatmap(view) => format!("busymap - {}", view.title()),
            Screen::Failed(_) => "busymap".to_string(),
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Heatmap(message) => {
                if let Screen::Heatmap(view) = &mut self.screen {
                    view.update(message, &self.trace);
                }
            }
        }

        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        match &self.screen {
            Screen::Heatmap(view) => view.view().map(Message::Heatmap),
            Screen::Failed(reason) => center(text(reason.as_str())).into(),
        }
    }
}
