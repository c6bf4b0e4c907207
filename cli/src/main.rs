//! Headless room participant.
//!
//! Joins a room on a live relay and either tails the fan-out, drops a
//! sticky note, or sweeps the cursor across the canvas — enough to smoke-
//! test relaying between real clients from two terminals.

use std::time::Duration;

use clap::{Parser, Subcommand};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

use wire::{CursorMove, Envelope, Event, JoinRoom, NoteRecord};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket send failed: {0}")]
    WsSend(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket receive failed: {0}")]
    WsRecv(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket closed by relay")]
    WsClosed,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "corkboard-cli", about = "Corkboard relay CLI")]
struct Cli {
    /// Relay websocket URL.
    #[arg(long, env = "CORKBOARD_URL", default_value = "ws://127.0.0.1:3000/ws")]
    url: String,

    /// Room to join.
    #[arg(long, env = "CORKBOARD_ROOM", default_value = "lobby")]
    room: String,

    /// Display name announced to the room.
    #[arg(long, env = "CORKBOARD_NAME", default_value = "cli")]
    name: String,

    /// Cursor color; the relay picks one when omitted.
    #[arg(long, env = "CORKBOARD_COLOR")]
    color: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Join the room and print every event the relay fans out.
    Tail,
    /// Join and drop a sticky note at the given world position.
    Note {
        #[arg(long, default_value = "Untitled")]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
        #[arg(long, default_value_t = 0.0)]
        x: f64,
        #[arg(long, default_value_t = 0.0)]
        y: f64,
    },
    /// Join and sweep the cursor across the canvas.
    Sweep {
        /// Number of cursor positions to emit, 50 ms apart.
        #[arg(long, default_value_t = 20)]
        steps: u32,
    },
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let (mut ws, _) = connect_async(&cli.url)
        .await
        .map_err(|e| CliError::WsConnect(Box::new(e)))?;

    let participant_id = format!("cli-{}", Uuid::new_v4());
    send(
        &mut ws,
        Event::JoinRoom(JoinRoom {
            participant_id: participant_id.clone(),
            room_id: cli.room.clone(),
            display_name: cli.name.clone(),
            cursor_color: cli.color.clone(),
        }),
    )
    .await?;
    eprintln!("joined room {:?} as {:?}", cli.room, cli.name);

    match cli.command {
        Command::Tail => tail(&mut ws).await,
        Command::Note { title, body, x, y } => {
            let record = NoteRecord {
                id: wire::temp_note_id(),
                title,
                body,
                x,
                y,
                z_index: None,
                color: cli.color,
                created_by: Some(cli.name),
            };
            println!("{}", serde_json::to_string(&record)?);
            send(&mut ws, Event::NoteCreate(record)).await?;
            // Give the relay a beat to fan out before dropping the socket.
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(())
        }
        Command::Sweep { steps } => {
            for i in 0..steps {
                let t = f64::from(i) * 40.0;
                send(&mut ws, Event::CursorMove(CursorMove { x: t, y: t * 0.5 })).await?;
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Ok(())
        }
    }
}

/// Print the relay fan-out until the connection closes or ctrl-c.
async fn tail(ws: &mut WsStream) -> Result<(), CliError> {
    loop {
        let Some(msg) = ws.next().await else {
            return Err(CliError::WsClosed);
        };
        let msg = msg.map_err(|e| CliError::WsRecv(Box::new(e)))?;
        match msg {
            Message::Text(text) => match serde_json::from_str::<Envelope>(text.as_str()) {
                Ok(envelope) => {
                    println!(
                        "{:>13} ts={} from={} {}",
                        envelope.event.name(),
                        envelope.ts,
                        envelope.from.as_deref().unwrap_or("-"),
                        summarize(&envelope.event),
                    );
                }
                Err(e) => eprintln!("unparseable frame: {e}"),
            },
            Message::Close(_) => return Err(CliError::WsClosed),
            _ => {}
        }
    }
}

async fn send(ws: &mut WsStream, event: Event) -> Result<(), CliError> {
    let json = serde_json::to_string(&Envelope::new(event))?;
    ws.send(Message::Text(json.into()))
        .await
        .map_err(|e| CliError::WsSend(Box::new(e)))
}

fn summarize(event: &Event) -> String {
    match event {
        Event::ParticipantJoined(p) => format!("{} ({})", p.display_name, p.cursor_color),
        Event::ParticipantLeft(p) => p.display_name.clone(),
        Event::CursorMove(pos) => format!("({:.1}, {:.1})", pos.x, pos.y),
        Event::NoteCreate(note) => format!("{} {:?} at ({:.1}, {:.1})", note.id, note.title, note.x, note.y),
        Event::NoteUpdate(update) => update.note_id.clone(),
        Event::NoteMove(mv) => format!("{} -> ({:.1}, {:.1})", mv.note_id, mv.x, mv.y),
        Event::NoteDelete(del) => del.note_id.clone(),
        Event::NoteCreateAck(ack) => format!("{} -> {}", ack.temporary_id, ack.durable_id),
        Event::NoteCreateRollback(rollback) => rollback.temporary_id.clone(),
        Event::JoinRoom(join) => join.room_id.clone(),
    }
}
