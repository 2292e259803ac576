use crate::gui_bridge::model::{NetworkOptions, SelectRequest, SessionState, StatusReply};
use crate::store::RecordStore;
use crate::workflow::runner::Runner;
use anyhow::{bail, Context, Result};
use coveragecore::record::ViewportBound;
use coveragecore::telemetry::MetricsSnapshot;
use coveragecore::CoverageView;
use log::{error, info};
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    thread,
};
use tokio::runtime::Builder;
use warp::{
    http::StatusCode,
    reply::{json, with_status, Json, WithStatus},
    Filter,
};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Session-owning state shared by every HTTP handler.
#[derive(Clone)]
pub struct BridgeContext {
    store: Arc<RwLock<RecordStore>>,
    session: Arc<RwLock<SessionState>>,
    runner: Arc<Runner>,
}

impl BridgeContext {
    pub fn new(store: RecordStore, runner: Runner, network: Option<String>) -> Self {
        let snapshot = store.snapshot();
        runner.record_load(&snapshot);
        let mut session = SessionState {
            network,
            viewport: None,
        };
        session.reconcile(&snapshot.networks);

        Self {
            store: Arc::new(RwLock::new(store)),
            session: Arc::new(RwLock::new(session)),
            runner: Arc::new(runner),
        }
    }

    pub fn networks(&self) -> NetworkOptions {
        NetworkOptions {
            options: read(&self.store).snapshot().networks.clone(),
            selected: read(&self.session).network.clone(),
        }
    }

    pub fn view(&self) -> Result<CoverageView> {
        let snapshot = read(&self.store).snapshot();
        let session = read(&self.session).clone();
        let network = session
            .network
            .as_deref()
            .context("no data available: no network to select")?;
        self.runner.execute(&snapshot, network, session.viewport)
    }

    /// Switching network recenters the map, so the old viewport is dropped.
    pub fn select(&self, network: &str) -> Result<()> {
        let snapshot = read(&self.store).snapshot();
        if !snapshot.networks.iter().any(|option| option == network) {
            bail!("unknown network {:?}", network);
        }
        let mut session = write(&self.session);
        if session.network.as_deref() != Some(network) {
            session.network = Some(network.to_string());
            session.viewport = None;
        }
        Ok(())
    }

    pub fn set_viewport(&self, viewport: Option<ViewportBound>) {
        write(&self.session).viewport = viewport;
    }

    /// Blocking; call off the async executor. The store lock is only taken
    /// to copy the source and to swap in the result, never across the fetch.
    pub fn reload(&self) -> bool {
        let source = read(&self.store).source().clone();
        let result = source.fetch();
        let (loaded, snapshot) = {
            let mut store = write(&self.store);
            let loaded = store.install(result);
            (loaded, store.snapshot())
        };
        self.runner.record_load(&snapshot);
        write(&self.session).reconcile(&snapshot.networks);
        loaded
    }

    pub fn status(&self) -> String {
        read(&self.store).status().to_string()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.runner.metrics()
    }

    #[cfg(test)]
    pub fn session(&self) -> SessionState {
        read(&self.session).clone()
    }
}

fn with_context(
    ctx: BridgeContext,
) -> impl Filter<Extract = (BridgeContext,), Error = Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

fn status_reply(reply: StatusReply, code: StatusCode) -> WithStatus<Json> {
    with_status(json(&reply), code)
}

/// All HTTP routes of the bridge.
pub fn routes(
    ctx: BridgeContext,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let networks_route = warp::path("networks")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_context(ctx.clone()))
        .map(|ctx: BridgeContext| json(&ctx.networks()));

    let view_route = warp::path("view")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_context(ctx.clone()))
        .map(|ctx: BridgeContext| match ctx.view() {
            Ok(view) => with_status(json(&view), StatusCode::OK),
            Err(err) => status_reply(
                StatusReply::error("no_data", format!("{:#}; {}", err, ctx.status())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        });

    let select_route = warp::path("select")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_context(ctx.clone()))
        .map(
            |request: SelectRequest, ctx: BridgeContext| match ctx.select(&request.network) {
                Ok(()) => status_reply(
                    StatusReply::ok(format!("selected {}", request.network)),
                    StatusCode::OK,
                ),
                Err(err) => status_reply(
                    StatusReply::error("invalid_selection", err.to_string()),
                    StatusCode::BAD_REQUEST,
                ),
            },
        );

    let viewport_route = warp::path("viewport")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_context(ctx.clone()))
        .map(|bound: ViewportBound, ctx: BridgeContext| {
            ctx.set_viewport(Some(bound));
            status_reply(StatusReply::ok("viewport updated"), StatusCode::OK)
        });

    let clear_viewport_route = warp::path("viewport")
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_context(ctx.clone()))
        .map(|ctx: BridgeContext| {
            ctx.set_viewport(None);
            status_reply(StatusReply::ok("viewport cleared"), StatusCode::OK)
        });

    let reload_route = warp::path("reload")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_context(ctx.clone()))
        .and_then(|ctx: BridgeContext| async move {
            let outcome = tokio::task::spawn_blocking(move || {
                let loaded = ctx.reload();
                (loaded, ctx.status())
            })
            .await;
            let reply = match outcome {
                Ok((true, message)) => status_reply(StatusReply::ok(message), StatusCode::OK),
                Ok((false, message)) => status_reply(
                    StatusReply::error("no_data", message),
                    StatusCode::SERVICE_UNAVAILABLE,
                ),
                Err(err) => {
                    error!("reload task failed: {}", err);
                    status_reply(
                        StatusReply::error("error", err.to_string()),
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                }
            };
            Ok::<_, warp::Rejection>(reply)
        });

    let metrics_route = warp::path("metrics")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_context(ctx))
        .map(|ctx: BridgeContext| json(&ctx.metrics()));

    networks_route
        .or(view_route)
        .or(select_route)
        .or(viewport_route)
        .or(clear_viewport_route)
        .or(reload_route)
        .or(metrics_route)
        .recover(handle_rejection)
}

/// Bodies that fail to deserialize (bad JSON, or a viewport failing
/// validation) get the same JSON reply shape as every other 400.
async fn handle_rejection(err: warp::Rejection) -> Result<WithStatus<Json>, warp::Rejection> {
    match err.find::<warp::filters::body::BodyDeserializeError>() {
        Some(cause) => Ok(status_reply(
            StatusReply::error("invalid_request", cause.to_string()),
            StatusCode::BAD_REQUEST,
        )),
        None => Err(err),
    }
}

/// Hosts the HTTP routes on a background thread.
pub struct GuiBridge {
    ctx: BridgeContext,
}

impl GuiBridge {
    pub fn start(ctx: BridgeContext, addr: SocketAddr) -> Self {
        let server_routes = routes(ctx.clone());
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                match warp::serve(server_routes).try_bind_ephemeral(addr) {
                    Ok((bound, server)) => {
                        info!("bridge listening on http://{}", bound);
                        server.await;
                    }
                    Err(err) => error!("failed to bind bridge on {}: {}", addr, err),
                }
            });
        });

        Self { ctx }
    }

    pub fn context(&self) -> &BridgeContext {
        &self.ctx
    }

    pub fn publish_status(&self, message: &str) {
        println!("[GUI] {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordSource;
    use crate::workflow::config::DashboardConfig;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV: &str = "X,Y,Network,Signal Strength,Signal Quality\n\
                       20,10,Jazz,-75,Good\n\
                       21,11,Jazz,-65,Great\n\
                       60,50,Zong,-110,Bad\n";

    fn context_from(contents: &str) -> (BridgeContext, NamedTempFile) {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(contents.as_bytes()).unwrap();
        let store = RecordStore::load(RecordSource::File(temp.path().to_path_buf()));
        let runner = Runner::new(&DashboardConfig::default()).unwrap();
        (BridgeContext::new(store, runner, None), temp)
    }

    #[test]
    fn context_defaults_to_first_network() {
        let (ctx, _temp) = context_from(CSV);
        let networks = ctx.networks();
        assert_eq!(networks.options, vec!["Jazz", "Zong"]);
        assert_eq!(networks.selected.as_deref(), Some("Jazz"));
    }

    #[test]
    fn selecting_other_network_clears_viewport() {
        let (ctx, _temp) = context_from(CSV);
        ctx.set_viewport(Some(ViewportBound::new(9.0, 12.0, 19.0, 22.0).unwrap()));
        ctx.select("Jazz").unwrap();
        assert!(ctx.session().viewport.is_some());

        ctx.select("Zong").unwrap();
        assert_eq!(ctx.session().viewport, None);
        assert!(ctx.select("Ufone").is_err());
    }

    #[tokio::test]
    async fn view_route_reports_average_after_viewport() {
        let (ctx, _temp) = context_from(CSV);
        let api = routes(ctx);

        let pending = warp::test::request()
            .method("GET")
            .path("/view")
            .reply(&api)
            .await;
        assert_eq!(pending.status(), StatusCode::OK);
        let view: CoverageView = serde_json::from_slice(pending.body()).unwrap();
        assert_eq!(view.legend.summary_label, "Zoom or pan the map to update");

        let posted = warp::test::request()
            .method("POST")
            .path("/viewport")
            .json(&serde_json::json!({"south": 9, "north": 12, "west": 19, "east": 22}))
            .reply(&api)
            .await;
        assert_eq!(posted.status(), StatusCode::OK);

        let averaged = warp::test::request()
            .method("GET")
            .path("/view")
            .reply(&api)
            .await;
        let view: CoverageView = serde_json::from_slice(averaged.body()).unwrap();
        assert_eq!(view.summary().quality(), Some("Good"));
        assert_eq!(view.markers.len(), 2);
    }

    #[tokio::test]
    async fn invalid_viewport_and_selection_are_bad_requests() {
        let (ctx, _temp) = context_from(CSV);
        let api = routes(ctx);

        let inverted = warp::test::request()
            .method("POST")
            .path("/viewport")
            .json(&serde_json::json!({"south": 12, "north": 9, "west": 19, "east": 22}))
            .reply(&api)
            .await;
        assert_eq!(inverted.status(), StatusCode::BAD_REQUEST);
        let reply: StatusReply = serde_json::from_slice(inverted.body()).unwrap();
        assert_eq!(reply.status, "invalid_request");
        assert!(reply.message.contains("south 12 above north 9"), "{}", reply.message);

        let malformed = warp::test::request()
            .method("POST")
            .path("/select")
            .header("content-type", "application/json")
            .body("{\"network\":")
            .reply(&api)
            .await;
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
        let reply: StatusReply = serde_json::from_slice(malformed.body()).unwrap();
        assert_eq!(reply.status, "invalid_request");

        let unknown = warp::test::request()
            .method("POST")
            .path("/select")
            .json(&serde_json::json!({"network": "Ufone"}))
            .reply(&api)
            .await;
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
        let reply: StatusReply = serde_json::from_slice(unknown.body()).unwrap();
        assert_eq!(reply.status, "invalid_selection");

        let missing = warp::test::request()
            .method("GET")
            .path("/nowhere")
            .reply(&api)
            .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn view_answers_while_reload_is_in_flight() {
        use std::io::{BufRead, BufReader};
        use std::net::TcpListener;
        use std::sync::mpsc;
        use std::time::Duration;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/signal.csv", listener.local_addr().unwrap());
        let (accepted_tx, accepted_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            accepted_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                CSV.len(),
                CSV
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        let store = RecordStore::new(RecordSource::Url(url));
        let runner = Runner::new(&DashboardConfig::default()).unwrap();
        let ctx = BridgeContext::new(store, runner, None);

        let reloading = ctx.clone();
        let reload = thread::spawn(move || reloading.reload());
        accepted_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        let (answer_tx, answer_rx) = mpsc::channel();
        let reader = ctx.clone();
        thread::spawn(move || {
            let answered = reader.view().is_err() && reader.networks().options.is_empty();
            answer_tx.send((answered, reader.status())).unwrap();
        });
        let (answered, status) = answer_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(answered);
        assert_eq!(status, "no data loaded");

        release_tx.send(()).unwrap();
        assert!(reload.join().unwrap());
        server.join().unwrap();
        assert_eq!(ctx.networks().selected.as_deref(), Some("Jazz"));
        assert!(ctx.view().is_ok());
    }

    #[tokio::test]
    async fn empty_store_reports_no_data_and_recovers_on_reload() {
        let (ctx, temp) = context_from("X,Y,Network,Signal Quality\n");
        let api = routes(ctx.clone());

        let empty = warp::test::request()
            .method("GET")
            .path("/view")
            .reply(&api)
            .await;
        assert_eq!(empty.status(), StatusCode::SERVICE_UNAVAILABLE);

        std::fs::write(temp.path(), CSV).unwrap();
        let reloaded = warp::test::request()
            .method("POST")
            .path("/reload")
            .reply(&api)
            .await;
        assert_eq!(reloaded.status(), StatusCode::OK);
        assert_eq!(ctx.networks().selected.as_deref(), Some("Jazz"));

        let view = warp::test::request()
            .method("GET")
            .path("/view")
            .reply(&api)
            .await;
        assert_eq!(view.status(), StatusCode::OK);
    }
}
