use coveragecore::quality::Rgb;
use coveragecore::record::ViewportBound;
use coveragecore::render::{LegendEntry, MarkerDescriptor};
use coveragecore::CoverageView;
use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, pick_list, row, scrollable, text, Column, Container, Row,
    },
    Alignment, Color, Element, Length, Pixels, Point, Rectangle, Renderer, Subscription, Task,
    Theme,
};
use projection::Direction;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod projection;

const ZOOM_IN: f64 = 0.5;
const ZOOM_OUT: f64 = 2.0;

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Network Availability Map".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_secs(1)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

fn bridge_url(path: &str) -> String {
    let base = std::env::var("VIZ_BRIDGE_URL").unwrap_or_else(|_| "http://127.0.0.1:9000".into());
    format!("{}/{}", base.trim_end_matches('/'), path)
}

#[derive(Debug)]
struct Visualizer {
    networks: Vec<String>,
    selected: Option<String>,
    view: Option<CoverageView>,
    /// Visible rectangle; only reported to the bridge once the user moves it.
    camera: Option<ViewportBound>,
    /// Network the camera was framed for; survives failed fetches.
    framed_network: Option<String>,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    NetworksFetched(Result<NetworkOptions, String>),
    ViewFetched(Result<CoverageView, String>),
    NetworkSelected(String),
    SelectionPosted(Result<String, String>),
    Pan(Direction),
    Zoom(f64),
    ViewportPosted(Result<String, String>),
    Reload,
    Reloaded(Result<String, String>),
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                networks: Vec::new(),
                selected: None,
                view: None,
                camera: None,
                framed_network: None,
                status: "Waiting for coverage data...".into(),
                history: Vec::new(),
            },
            Task::batch([
                Task::perform(fetch_networks(), Message::NetworksFetched),
                Task::perform(fetch_view(), Message::ViewFetched),
            ]),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::batch([
                Task::perform(fetch_networks(), Message::NetworksFetched),
                Task::perform(fetch_view(), Message::ViewFetched),
            ]),
            Message::NetworksFetched(Ok(options)) => {
                state.networks = options.options;
                state.selected = options.selected;
                Task::none()
            }
            Message::NetworksFetched(Err(err)) => {
                state.status = format!("Bridge error: {err}");
                Task::none()
            }
            Message::ViewFetched(Ok(view)) => {
                let recenter = state.camera.is_none()
                    || state.framed_network.as_deref() != Some(view.network.as_str());
                // A fresh camera no longer matches whatever viewport the bridge holds.
                let task = if recenter {
                    state.camera = Some(projection::camera_from_center(
                        view.center.position,
                        view.center.zoom,
                    ));
                    state.framed_network = Some(view.network.clone());
                    if view.viewport.is_some() {
                        Task::perform(clear_viewport(), Message::ViewportPosted)
                    } else {
                        Task::none()
                    }
                } else {
                    Task::none()
                };
                state.status = format!(
                    "{}: {} points, {}",
                    view.network,
                    view.markers.len(),
                    view.legend.summary_label
                );
                state.view = Some(view);
                task
            }
            Message::ViewFetched(Err(err)) => {
                state.status = format!("No data available: {err}");
                state.view = None;
                Task::none()
            }
            Message::NetworkSelected(network) => {
                state.selected = Some(network.clone());
                Task::perform(post_selection(network), Message::SelectionPosted)
            }
            Message::SelectionPosted(Ok(message)) => {
                state.push_history(message);
                Task::perform(fetch_view(), Message::ViewFetched)
            }
            Message::SelectionPosted(Err(err)) => {
                state.status = format!("Selection error: {err}");
                Task::none()
            }
            Message::Pan(direction) => {
                let Some(camera) = state.camera else {
                    return Task::none();
                };
                state.move_camera(projection::pan(&camera, direction))
            }
            Message::Zoom(factor) => {
                let Some(camera) = state.camera else {
                    return Task::none();
                };
                state.move_camera(projection::zoom(&camera, factor))
            }
            Message::ViewportPosted(Ok(_)) => Task::perform(fetch_view(), Message::ViewFetched),
            Message::ViewportPosted(Err(err)) => {
                state.status = format!("Viewport error: {err}");
                Task::none()
            }
            Message::Reload => Task::perform(post_reload(), Message::Reloaded),
            Message::Reloaded(Ok(message)) => {
                state.push_history(message);
                Task::none()
            }
            Message::Reloaded(Err(err)) => {
                state.status = format!("Reload failed: {err}");
                Task::none()
            }
        }
    }

    fn move_camera(&mut self, camera: ViewportBound) -> Task<Message> {
        self.camera = Some(camera);
        self.push_history(format!(
            "Viewport S {:.3} N {:.3} W {:.3} E {:.3}",
            camera.south, camera.north, camera.west, camera.east
        ));
        Task::perform(post_viewport(camera), Message::ViewportPosted)
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let markers = state
            .view
            .as_ref()
            .map(|view| view.markers.clone())
            .unwrap_or_default();
        let entries = state
            .view
            .as_ref()
            .map(|view| view.legend.entries.clone())
            .unwrap_or_default();
        let summary = state
            .view
            .as_ref()
            .map(|view| view.legend.summary_label.clone())
            .unwrap_or_else(|| "No data available".into());

        let controls = column![
            text("Select Network").size(20),
            pick_list(
                state.networks.as_slice(),
                state.selected.clone(),
                Message::NetworkSelected
            )
            .placeholder("No networks loaded")
            .padding(6),
            text("Navigate").size(16),
            row![
                button("N").on_press(Message::Pan(Direction::North)),
                button("S").on_press(Message::Pan(Direction::South)),
                button("W").on_press(Message::Pan(Direction::West)),
                button("E").on_press(Message::Pan(Direction::East)),
            ]
            .spacing(6),
            row![
                button("Zoom +").on_press(Message::Zoom(ZOOM_IN)),
                button("Zoom -").on_press(Message::Zoom(ZOOM_OUT)),
            ]
            .spacing(6),
            button("Reload data").on_press(Message::Reload).padding(8),
            text(&state.status).size(14),
            text("Legend").size(20),
            text(
                state
                    .view
                    .as_ref()
                    .map(|view| format!("Network: {}", view.network))
                    .unwrap_or_default()
            )
            .size(14),
            legend_column(&entries),
            text(summary).size(16),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(300.0));

        let map: Element<'_, Message> = match state.camera {
            Some(camera) => Canvas::new(MapCanvas { markers, camera })
                .width(Length::Fill)
                .height(Length::Fixed(520.0))
                .into(),
            None => text("Map will appear once data arrives").size(16).into(),
        };

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let map_column = column![
            text("Network Availability Map").size(26),
            map,
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![controls, map_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn legend_column<'a>(entries: &[LegendEntry]) -> Column<'a, Message> {
    entries
        .iter()
        .fold(Column::new().spacing(4), |col, entry| {
            col.push(
                Row::new()
                    .spacing(8)
                    .align_y(Alignment::Center)
                    .push(
                        Canvas::new(Swatch { color: entry.color })
                            .width(Length::Fixed(12.0))
                            .height(Length::Fixed(12.0)),
                    )
                    .push(text(entry.label.clone()).size(14)),
            )
        })
}

fn to_color(rgb: Rgb, alpha: f32) -> Color {
    let [r, g, b] = rgb.0;
    Color::from_rgba8(r, g, b, alpha)
}

async fn fetch_networks() -> Result<NetworkOptions, String> {
    let response = reqwest::get(bridge_url("networks"))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<NetworkOptions>()
        .await
        .map_err(|e| e.to_string())
}

async fn fetch_view() -> Result<CoverageView, String> {
    let response = reqwest::get(bridge_url("view"))
        .await
        .map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        let reply = response
            .json::<StatusReply>()
            .await
            .map_err(|e| e.to_string())?;
        return Err(reply.message);
    }
    response
        .json::<CoverageView>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_json<T: Serialize>(path: &str, body: &T) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(bridge_url(path))
        .json(body)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let status = response.status();
    let reply = response
        .json::<StatusReply>()
        .await
        .map_err(|e| e.to_string())?;
    if status.is_success() {
        Ok(reply.message)
    } else {
        Err(format!("{}: {}", status, reply.message))
    }
}

async fn clear_viewport() -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .delete(bridge_url("viewport"))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let status = response.status();
    let reply = response
        .json::<StatusReply>()
        .await
        .map_err(|e| e.to_string())?;
    if status.is_success() {
        Ok(reply.message)
    } else {
        Err(format!("{}: {}", status, reply.message))
    }
}

async fn post_selection(network: String) -> Result<String, String> {
    post_json("select", &SelectRequest { network }).await
}

async fn post_viewport(bound: ViewportBound) -> Result<String, String> {
    post_json("viewport", &bound).await
}

async fn post_reload() -> Result<String, String> {
    post_json("reload", &serde_json::json!({})).await
}

#[derive(Debug, Clone, Deserialize)]
struct NetworkOptions {
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    selected: Option<String>,
}

#[derive(Debug, Serialize)]
struct SelectRequest {
    network: String,
}

#[derive(Debug, Clone, Deserialize)]
struct StatusReply {
    #[allow(dead_code)]
    status: String,
    message: String,
}

#[derive(Clone)]
struct Swatch {
    color: Rgb,
}

impl canvas::Program<Message> for Swatch {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), to_color(self.color, 1.0));
        vec![frame.into_geometry()]
    }
}

#[derive(Clone)]
struct MapCanvas {
    markers: Vec<MarkerDescriptor>,
    camera: ViewportBound,
}

impl canvas::Program<Message> for MapCanvas {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.93, 0.93, 0.9),
        );

        let graticule = Path::new(|builder| {
            for step in 1..4 {
                let x = bounds.width * step as f32 / 4.0;
                let y = bounds.height * step as f32 / 4.0;
                builder.move_to(Point::new(x, 0.0));
                builder.line_to(Point::new(x, bounds.height));
                builder.move_to(Point::new(0.0, y));
                builder.line_to(Point::new(bounds.width, y));
            }
        });
        frame.stroke(
            &graticule,
            Stroke::default()
                .with_color(Color::from_rgb(0.8, 0.8, 0.78))
                .with_width(1.0),
        );

        let hover = cursor.position_in(bounds);
        let mut hovered: Option<(Point, &MarkerDescriptor)> = None;

        for marker in &self.markers {
            let Some((x, y)) =
                projection::project(&self.camera, marker.position, bounds.width, bounds.height)
            else {
                continue;
            };
            let center = Point::new(x, y);
            let dot = Path::new(|builder| builder.circle(center, marker.style.radius));
            frame.fill(&dot, to_color(marker.color, marker.style.fill_opacity));

            if let Some(cursor_point) = hover {
                if cursor_point.distance(center) <= marker.style.radius + 3.0 {
                    hovered = Some((center, marker));
                }
            }
        }

        if let Some((anchor, marker)) = hovered {
            let content = marker.tooltip.to_string();
            for (line_index, line) in content.lines().enumerate() {
                frame.fill_text(canvas::Text {
                    content: line.to_string(),
                    position: Point::new(anchor.x + 8.0, anchor.y - 8.0 + line_index as f32 * 14.0),
                    color: Color::BLACK,
                    size: Pixels(12.0),
                    ..canvas::Text::default()
                });
            }
        }

        vec![frame.into_geometry()]
    }
}
