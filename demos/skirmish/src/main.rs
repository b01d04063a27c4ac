//! Skirmish: two peers keeping a tiny battlefield in sync.
//!
//! A host sets up a table — an infantry counter with rotation and
//! movement-marking traits, plus a standard carrying a module-specific
//! `banner;` trait — then plays a few actions. Every action becomes one
//! command line, shipped to a guest over a loopback TCP relay and
//! appended to a game log. At the end both tables must agree, and a
//! third, fresh module rebuilds the whole session from the log alone.
//!
//! Run with `RUST_LOG=debug` to watch the command stream.

use std::path::Path;
use std::sync::Arc;

use tessera::prelude::*;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Module assembly
// ---------------------------------------------------------------------------

/// Both peers assemble the same module: same piece kinds, same
/// prefixes. The `banner;` layer is this module's own addition,
/// registered through the public extension hook.
fn build_module(log_path: Option<&Path>) -> GameModule {
    let mut builder = GameModule::builder("skirmish").register_layer(
        "banner;",
        |ty, inner| Box::new(Marker::from_type(ty, inner)),
    );
    if let Some(path) = log_path {
        builder = builder.log_to(path);
    }
    builder.build().expect("module should assemble")
}

/// The infantry counter: movement marking outside, rotation inside.
fn infantry_type() -> String {
    let leaf = Box::new(BasicPiece::new("units/inf.png", "Infantry"));
    let rotate = Box::new(Rotate::new(
        6,
        KeyStroke::ctrl('R'),
        KeyStroke::ctrl('L'),
        leaf,
    ));
    let mark = MoveMark::new(KeyStroke::ctrl('M'), rotate);
    mark.piece_type()
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tessera::init_tracing();

    let config = EngineConfig::load("tessera.json");
    tracing::info!(
        server = %config.server_url_and_port(),
        "community server configured"
    );

    let relay = TcpRelay::bind("127.0.0.1:0").await?;
    let addr = relay.local_addr()?.to_string();

    // -- guest: apply every line the host sends -------------------------
    let guest_task = tokio::spawn(async move {
        let link = TcpLink::connect(&addr).await.expect("guest connects");
        let mut module = build_module(None);
        while let Some(line) =
            link.recv_line().await.expect("guest receives")
        {
            match module.receive_line(&line) {
                Ok(command) => {
                    tracing::debug!(?command, "guest applied");
                }
                Err(error) => {
                    tracing::warn!(%error, line, "guest skipped a command");
                }
            }
        }
        module
    });

    // -- host: outbound lines go through a dispatcher -------------------
    let link = relay.accept().await?;
    let (outbound, queue) = mpsc::channel(32);
    let dispatcher = tokio::spawn(run_dispatcher(Arc::new(link), queue));

    let log_path = std::env::temp_dir().join("skirmish.vlog");
    let mut host = build_module(Some(&log_path));

    // set the table
    let infantry = host.create_piece(&infantry_type())?;
    let standard =
        host.create_piece("banner;rally\tpiece;flags/std.png;Standard")?;
    for id in [&infantry, &standard] {
        let add = host.add_command_for(id)?;
        let line = host.emit(&add)?;
        outbound.send(Outbound::Line(line)).await?;
    }

    // rotate the infantry twice and march it forward
    for _ in 0..2 {
        let line = host.press_key(&infantry, KeyStroke::ctrl('R'))?;
        outbound.send(Outbound::Line(line)).await?;
    }
    let march = Command::Move(MovePiece {
        id: Some(infantry.clone()),
        new_group: Some("front".to_owned()),
        new_position: Point::new(6, 3),
        new_under: None,
        old_group: None,
        old_position: Point::new(0, 0),
        old_under: None,
        player: "host".to_owned(),
    });
    host.state_mut().apply(&march)?;
    let line = host.emit(&march)?;
    outbound.send(Outbound::Line(line)).await?;

    // and a dice rattle for everyone
    let rattle = Command::PlayClip {
        clip: "sounds/dice.wav".to_owned(),
    };
    host.state_mut().apply(&rattle)?;
    let line = host.emit(&rattle)?;
    outbound.send(Outbound::Line(line)).await?;

    outbound.send(Outbound::Fin).await?;
    dispatcher.await?;
    let guest = guest_task.await?;

    // -- both tables must agree -----------------------------------------
    println!("host and guest after the session:");
    for id in [&infantry, &standard] {
        let host_piece = host.state().lookup(id).expect("host has the piece");
        let guest_piece =
            guest.state().lookup(id).expect("guest has the piece");
        let in_sync = host_piece.state() == guest_piece.state();
        println!(
            "  {id}: {} at {} — {}",
            host_piece.name(),
            host_piece.position(),
            if in_sync { "in sync" } else { "DIVERGED" },
        );
        assert!(in_sync, "peer states diverged for {id}");
    }
    println!(
        "  infantry facing {} / moved {}",
        guest
            .state()
            .lookup(&infantry)
            .and_then(|p| p.property("Facing"))
            .unwrap_or_default(),
        guest
            .state()
            .lookup(&infantry)
            .and_then(|p| p.property("Moved"))
            .unwrap_or_default(),
    );

    // -- the log alone rebuilds the session ------------------------------
    let mut revived = build_module(None);
    let applied = revived.replay_log(&log_path)?;
    let piece = revived
        .state()
        .lookup(&infantry)
        .expect("replay restores the infantry");
    println!(
        "replayed {applied} commands from {}: infantry back at {}",
        log_path.display(),
        piece.position(),
    );
    std::fs::remove_file(&log_path).ok();

    Ok(())
}
