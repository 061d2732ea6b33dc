use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::stream::SplitStream;
use futures::{sink::SinkExt, stream::StreamExt};
use plotarea_core::geometry::Coordinate;
use plotarea_core::maps::{LocationError, MapSessionOrchestrator, OrchestrationError};
use plotarea_core::render::SurfaceEvent;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

mod config;
mod protocol;
mod remote;

use config::BackendConfig;
use protocol::ClientMessage;
use remote::{ClientLocation, RemoteMapLoader, SecretStore};

// Application State
struct AppState {
    config: BackendConfig,
}

/// Inputs for a running session, after startup.
enum SessionCommand {
    Surface(SurfaceEvent),
    Reset,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = BackendConfig::load();
    let addr = config.bind_addr;
    let static_dir = config.static_dir.clone();

    let shared_state = Arc::new(AppState { config });

    let app = Router::new()
        .route("/", get(root))
        .route("/ws", get(ws_handler))
        .nest_service("/app", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state);

    info!("listening on {}", addr);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server stopped: {}", e);
    }
}

async fn root() -> String {
    format!("plotarea {}", plotarea_core::version())
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

fn startup_error_code(error: &OrchestrationError) -> &'static str {
    match error {
        OrchestrationError::LocationUnavailable(_) => "LOCATION_UNAVAILABLE",
        OrchestrationError::ConfigurationMissing(_) => "CONFIGURATION_MISSING",
        OrchestrationError::RenderingUnavailable(_) => "RENDERING_UNAVAILABLE",
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let client_id = Uuid::new_v4();
    info!("Client {} connected", client_id);

    let (mut sink, stream) = socket.split();
    let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<String>();

    let writer = tokio::spawn(async move {
        while let Some(text) = outbound_rx.recv().await {
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let (location_tx, location_rx) = oneshot::channel();
    let (map_ready_tx, map_ready_rx) = oneshot::channel();
    let (command_tx, mut command_rx) = mpsc::unbounded_channel();
    let reader = tokio::spawn(route_incoming(stream, location_tx, map_ready_tx, command_tx));

    let config = &state.config;
    let mut location = ClientLocation::new(outbound.clone(), location_rx, config.location_timeout());
    let secrets = SecretStore::new(config.secrets.clone());
    let mut loader = RemoteMapLoader::new(outbound.clone(), map_ready_rx, config.map_load_timeout());

    let orchestrator = MapSessionOrchestrator::new(config.map.clone());
    let mut session = match orchestrator.start(&mut location, &secrets, &mut loader).await {
        Ok(session) => session,
        Err(e) => {
            let message = protocol::format_error(startup_error_code(&e), &e.to_string(), "error");
            let _ = outbound.send(message);
            drop((location, loader, outbound));
            reader.abort();
            let _ = writer.await;
            info!("Client {} dropped before a map session started", client_id);
            return;
        }
    };

    let area_out = outbound.clone();
    if let Err(e) = session.on_area_change(move |area| {
        let _ = area_out.send(protocol::area_frame(area));
    }) {
        error!("Could not forward area updates: {}", e);
    }
    let reset_out = outbound.clone();
    if let Err(e) = session.on_reset(move || {
        let _ = reset_out.send(protocol::RESET_DONE.to_string());
    }) {
        error!("Could not forward resets: {}", e);
    }

    while let Some(command) = command_rx.recv().await {
        match command {
            SessionCommand::Surface(event) => session.dispatch(event),
            SessionCommand::Reset => session.reset(),
        }
    }

    info!("Client {} disconnected", client_id);
    drop((session, location, loader, outbound));
    let _ = writer.await;
}

/// Reads client frames until the socket closes and routes each one to the
/// startup step or the running session that waits for it.
async fn route_incoming(
    mut stream: SplitStream<WebSocket>,
    location_tx: oneshot::Sender<Result<Coordinate, LocationError>>,
    map_ready_tx: oneshot::Sender<Result<(), String>>,
    command_tx: mpsc::UnboundedSender<SessionCommand>,
) {
    let mut location_tx = Some(location_tx);
    let mut map_ready_tx = Some(map_ready_tx);

    while let Some(msg) = stream.next().await {
        let msg = if let Ok(msg) = msg {
            msg
        } else {
            return;
        };

        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => return,
            _ => continue,
        };

        let message = match protocol::parse_client_message(&text) {
            Ok(message) => message,
            Err(e) => {
                warn!("Ignoring client frame: {}", e);
                continue;
            }
        };

        let delivered = match message {
            ClientMessage::Location(fix) => location_tx.take().map(|tx| tx.send(Ok(fix)).is_ok()),
            ClientMessage::LocationFailed(e) => location_tx.take().map(|tx| tx.send(Err(e)).is_ok()),
            ClientMessage::MapReady => map_ready_tx.take().map(|tx| tx.send(Ok(())).is_ok()),
            ClientMessage::MapFailed(reason) => {
                map_ready_tx.take().map(|tx| tx.send(Err(reason)).is_ok())
            }
            ClientMessage::Surface(event) => Some(command_tx.send(SessionCommand::Surface(event)).is_ok()),
            ClientMessage::Reset => Some(command_tx.send(SessionCommand::Reset).is_ok()),
        };

        match delivered {
            Some(true) => {}
            Some(false) => warn!("Dropped client frame, nobody is waiting: {}", text),
            None => warn!("Ignoring repeated client frame: {}", text),
        }
    }
}
